//! The `AcademicStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `cepex-store-sqlite`).
//! The lifecycle, approval, and catalog services depend on this abstraction,
//! never on a concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  family::FamilyTag,
  lifecycle::{ApplicationRecord, ApplicationStatus, EnrollmentAction},
  opportunity::Opportunity,
  user::{Discipline, NewProfessor, NewUser, Professor, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`AcademicStore::list_applications`]. Unset fields do not
/// filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationQuery {
  pub opportunity_id: Option<Uuid>,
  pub candidate_id:   Option<Uuid>,
  pub status:         Option<ApplicationStatus>,
}

impl ApplicationQuery {
  pub fn for_opportunity(opportunity_id: Uuid) -> Self {
    Self { opportunity_id: Some(opportunity_id), ..Self::default() }
  }

  pub fn for_candidate(candidate_id: Uuid) -> Self {
    Self { candidate_id: Some(candidate_id), ..Self::default() }
  }

  pub fn with_status(status: ApplicationStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the academic record store.
///
/// Opportunities and application records are partitioned by [`FamilyTag`];
/// every family lives in its own tables and identities never collide across
/// families in practice, but lookups are always scoped to one family.
///
/// Backend errors must convert into [`crate::Error`]. A backend that runs the
/// lifecycle decision itself (see [`transition_application`]) reports domain
/// failures through that conversion so their [`ErrorKind`] survives.
///
/// [`transition_application`]: AcademicStore::transition_application
/// [`ErrorKind`]: crate::ErrorKind
pub trait AcademicStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Returns `None` if no user has this id.
  fn get_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn add_professor(
    &self,
    input: NewProfessor,
  ) -> impl Future<Output = Result<Professor, Self::Error>> + Send + '_;

  fn add_discipline(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Discipline, Self::Error>> + Send + '_;

  // ── Opportunities ─────────────────────────────────────────────────────

  /// Fetch one opportunity with its relation labels resolved.
  fn get_opportunity(
    &self,
    family: FamilyTag,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Opportunity>, Self::Error>> + Send + '_;

  /// Every opportunity of one family, in insertion order.
  fn list_opportunities(
    &self,
    family: FamilyTag,
  ) -> impl Future<Output = Result<Vec<Opportunity>, Self::Error>> + Send + '_;

  /// Insert or replace an opportunity and return it as re-read from the
  /// store. Relation labels on the input are ignored.
  fn save_opportunity(
    &self,
    opportunity: Opportunity,
  ) -> impl Future<Output = Result<Opportunity, Self::Error>> + Send + '_;

  // ── Application records ───────────────────────────────────────────────

  fn find_application(
    &self,
    family: FamilyTag,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> impl Future<Output = Result<Option<ApplicationRecord>, Self::Error>>
  + Send
  + '_;

  /// Records of one family matching `query`, in insertion order.
  fn list_applications(
    &self,
    family: FamilyTag,
    query: ApplicationQuery,
  ) -> impl Future<Output = Result<Vec<ApplicationRecord>, Self::Error>>
  + Send
  + '_;

  /// Atomically load the record for the pair, apply
  /// [`lifecycle::next_record`](crate::lifecycle::next_record), and persist
  /// the outcome. Nothing is written when the transition is refused.
  fn transition_application(
    &self,
    family: FamilyTag,
    action: EnrollmentAction,
    opportunity_id: Uuid,
    candidate_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<ApplicationRecord, Self::Error>> + Send + '_;
}

// ─── Error lifting ───────────────────────────────────────────────────────────

/// Convert a backend result into a core result at the service boundary.
pub(crate) trait StoreResultExt<T> {
  fn lift(self) -> crate::Result<T>;
}

impl<T, E: Into<crate::Error>> StoreResultExt<T> for Result<T, E> {
  fn lift(self) -> crate::Result<T> { self.map_err(Into::into) }
}
