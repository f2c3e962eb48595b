//! Error types for `cepex-core`.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{family::FamilyTag, user::UserRole};

#[derive(Debug, Error)]
pub enum Error {
  #[error("{family} opportunity not found: {id}")]
  OpportunityNotFound { family: FamilyTag, id: Uuid },

  #[error("candidate not found: {0}")]
  CandidateNotFound(Uuid),

  #[error(
    "no {family} application by candidate {candidate_id} for opportunity \
     {opportunity_id}"
  )]
  ApplicationNotFound {
    family:         FamilyTag,
    opportunity_id: Uuid,
    candidate_id:   Uuid,
  },

  #[error("application already approved, cannot reapply")]
  AlreadyApproved,

  #[error("application already pending")]
  AlreadyPending,

  #[error("cannot cancel an approved application")]
  CannotCancelApproved,

  #[error("application already cancelled")]
  AlreadyCancelled,

  #[error("unknown opportunity family: {0:?}")]
  UnknownFamily(String),

  #[error("invalid {family} status: {value:?}")]
  InvalidStatus { family: FamilyTag, value: String },

  #[error("{role} may not {action}")]
  Forbidden { role: UserRole, action: &'static str },

  #[error("store returned a {found} opportunity for a {expected} lookup")]
  FamilyMismatch { expected: FamilyTag, found: FamilyTag },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The stable category of an [`Error`], used by transport layers to choose a
/// response status without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  NotFound,
  Conflict,
  InvalidArgument,
  Forbidden,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::OpportunityNotFound { .. }
      | Self::CandidateNotFound(_)
      | Self::ApplicationNotFound { .. } => ErrorKind::NotFound,
      Self::AlreadyApproved
      | Self::AlreadyPending
      | Self::CannotCancelApproved
      | Self::AlreadyCancelled => ErrorKind::Conflict,
      Self::UnknownFamily(_) | Self::InvalidStatus { .. } => {
        ErrorKind::InvalidArgument
      }
      Self::Forbidden { .. } => ErrorKind::Forbidden,
      Self::FamilyMismatch { .. } | Self::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
