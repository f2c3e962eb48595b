//! Users, roles, and the explicit caller identity passed into services.
//!
//! Professors and disciplines are thin lookup rows: they exist so the store
//! can resolve the labels shown in the approval queue.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Roles ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
  Admin,
  Student,
  Professor,
  Coordination,
  Secretary,
}

impl UserRole {
  pub const fn label(self) -> &'static str {
    match self {
      Self::Admin => "ADMIN",
      Self::Student => "STUDENT",
      Self::Professor => "PROFESSOR",
      Self::Coordination => "COORDINATION",
      Self::Secretary => "SECRETARY",
    }
  }

  /// Roles that decide on opportunities and see the approval queue.
  pub const fn is_reviewer(self) -> bool {
    matches!(self, Self::Admin | Self::Coordination | Self::Secretary)
  }

  /// Reviewers plus professors.
  pub const fn is_staff(self) -> bool {
    self.is_reviewer() || matches!(self, Self::Professor)
  }
}

impl fmt::Display for UserRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Returned when a role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
  type Err = UnknownRole;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "ADMIN" => Ok(Self::Admin),
      "STUDENT" => Ok(Self::Student),
      "PROFESSOR" => Ok(Self::Professor),
      "COORDINATION" => Ok(Self::Coordination),
      "SECRETARY" => Ok(Self::Secretary),
      _ => Err(UnknownRole(s.to_owned())),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A user account. Candidates are users; the candidate id of an application
/// is a `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub login:      String,
  pub email:      String,
  pub active:     bool,
  pub role:       UserRole,
  pub created_at: DateTime<Utc>,
}

/// Input for [`AcademicStore::add_user`](crate::store::AcademicStore::add_user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub login: String,
  pub email: String,
  pub role:  UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
  pub professor_id: Uuid,
  pub user_id:      Uuid,
  pub first_name:   String,
  pub last_name:    String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfessor {
  pub user_id:    Uuid,
  pub first_name: String,
  pub last_name:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
  pub discipline_id: Uuid,
  pub name:          String,
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated identity on whose behalf a service call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id: Uuid,
  pub role:    UserRole,
}

impl Caller {
  pub const fn new(user_id: Uuid, role: UserRole) -> Self {
    Self { user_id, role }
  }

  /// Whether this caller may apply, cancel, or probe on behalf of `candidate`.
  pub fn may_act_for(&self, candidate_id: Uuid) -> bool {
    self.user_id == candidate_id || self.role == UserRole::Admin
  }

  pub fn require_candidate(
    &self,
    candidate_id: Uuid,
    action: &'static str,
  ) -> Result<()> {
    if self.may_act_for(candidate_id) {
      Ok(())
    } else {
      Err(self.forbidden(action))
    }
  }

  pub fn require_reviewer(&self, action: &'static str) -> Result<()> {
    if self.role.is_reviewer() {
      Ok(())
    } else {
      Err(self.forbidden(action))
    }
  }

  pub fn require_staff(&self, action: &'static str) -> Result<()> {
    if self.role.is_staff() {
      Ok(())
    } else {
      Err(self.forbidden(action))
    }
  }

  fn forbidden(&self, action: &'static str) -> Error {
    Error::Forbidden { role: self.role, action }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reviewer_roles() {
    assert!(UserRole::Admin.is_reviewer());
    assert!(UserRole::Coordination.is_reviewer());
    assert!(UserRole::Secretary.is_reviewer());
    assert!(!UserRole::Professor.is_reviewer());
    assert!(!UserRole::Student.is_reviewer());
    assert!(UserRole::Professor.is_staff());
    assert!(!UserRole::Student.is_staff());
  }

  #[test]
  fn admin_may_act_for_anyone() {
    let someone = Uuid::new_v4();
    let admin = Caller::new(Uuid::new_v4(), UserRole::Admin);
    let student = Caller::new(Uuid::new_v4(), UserRole::Student);
    assert!(admin.may_act_for(someone));
    assert!(!student.may_act_for(someone));
    assert!(student.may_act_for(student.user_id));
  }

  #[test]
  fn forbidden_carries_role_and_action() {
    let student = Caller::new(Uuid::new_v4(), UserRole::Student);
    let err = student.require_reviewer("approve opportunities").unwrap_err();
    assert_eq!(err.to_string(), "STUDENT may not approve opportunities");
  }
}
