//! Application records and the enrollment state machine.
//!
//! ```text
//!   (none) --apply--> PENDING --cancel--> CANCELLED --apply--> PENDING
//!                     PENDING --approve--> APPROVED (terminal)
//!                     PENDING --reject--> REJECTED --apply--> PENDING
//! ```
//!
//! [`next_record`] is a pure function: stores call it inside their own
//! transaction so the read-decide-write sequence is atomic.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, family::FamilyTag, opportunity::UnknownStatus};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
  Pending,
  Approved,
  Rejected,
  Cancelled,
}

impl ApplicationStatus {
  pub const fn label(self) -> &'static str {
    match self {
      Self::Pending => "PENDING",
      Self::Approved => "APPROVED",
      Self::Rejected => "REJECTED",
      Self::Cancelled => "CANCELLED",
    }
  }

  /// `PENDING` and `APPROVED` hold a seat; the other two do not.
  pub const fn is_active(self) -> bool {
    matches!(self, Self::Pending | Self::Approved)
  }
}

impl fmt::Display for ApplicationStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for ApplicationStatus {
  type Err = UnknownStatus;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "PENDING" => Ok(Self::Pending),
      "APPROVED" => Ok(Self::Approved),
      "REJECTED" => Ok(Self::Rejected),
      "CANCELLED" => Ok(Self::Cancelled),
      _ => Err(UnknownStatus(s.to_owned())),
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One candidate's application to one opportunity. There is at most one
/// record per (opportunity, candidate) pair; it is reused, never duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
  pub application_id: Uuid,
  pub family:         FamilyTag,
  pub opportunity_id: Uuid,
  pub candidate_id:   Uuid,
  pub status:         ApplicationStatus,
  pub applied_at:     DateTime<Utc>,
}

/// A candidate-initiated change to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentAction {
  Apply,
  Cancel,
}

// ─── Transition ──────────────────────────────────────────────────────────────

/// Decide the record that should be persisted after `action`.
///
/// `existing` is the current record for the pair, if any. On success the
/// returned record is either brand new (fresh `application_id`) or `existing`
/// with its status and possibly timestamp overwritten.
pub fn next_record(
  action: EnrollmentAction,
  family: FamilyTag,
  opportunity_id: Uuid,
  candidate_id: Uuid,
  existing: Option<&ApplicationRecord>,
  now: DateTime<Utc>,
) -> Result<ApplicationRecord> {
  match (action, existing) {
    (EnrollmentAction::Apply, None) => Ok(ApplicationRecord {
      application_id: Uuid::new_v4(),
      family,
      opportunity_id,
      candidate_id,
      status: ApplicationStatus::Pending,
      applied_at: now,
    }),
    (EnrollmentAction::Apply, Some(record)) => match record.status {
      ApplicationStatus::Approved => Err(Error::AlreadyApproved),
      ApplicationStatus::Pending => Err(Error::AlreadyPending),
      ApplicationStatus::Cancelled | ApplicationStatus::Rejected => {
        Ok(ApplicationRecord {
          status: ApplicationStatus::Pending,
          applied_at: refreshed(record.applied_at, now),
          ..record.clone()
        })
      }
    },
    (EnrollmentAction::Cancel, None) => Err(Error::ApplicationNotFound {
      family,
      opportunity_id,
      candidate_id,
    }),
    (EnrollmentAction::Cancel, Some(record)) => match record.status {
      ApplicationStatus::Approved => Err(Error::CannotCancelApproved),
      ApplicationStatus::Cancelled => Err(Error::AlreadyCancelled),
      ApplicationStatus::Pending | ApplicationStatus::Rejected => {
        Ok(ApplicationRecord {
          status: ApplicationStatus::Cancelled,
          ..record.clone()
        })
      }
    },
  }
}

/// A re-activation timestamp strictly later than `previous`, even when the
/// clock has not advanced (or went backwards).
fn refreshed(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
  if now > previous {
    now
  } else {
    previous + Duration::microseconds(1)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(status: ApplicationStatus, at: DateTime<Utc>) -> ApplicationRecord {
    ApplicationRecord {
      application_id: Uuid::new_v4(),
      family: FamilyTag::Research,
      opportunity_id: Uuid::new_v4(),
      candidate_id: Uuid::new_v4(),
      status,
      applied_at: at,
    }
  }

  fn apply(
    existing: &ApplicationRecord,
    now: DateTime<Utc>,
  ) -> Result<ApplicationRecord> {
    next_record(
      EnrollmentAction::Apply,
      existing.family,
      existing.opportunity_id,
      existing.candidate_id,
      Some(existing),
      now,
    )
  }

  fn cancel(existing: &ApplicationRecord) -> Result<ApplicationRecord> {
    next_record(
      EnrollmentAction::Cancel,
      existing.family,
      existing.opportunity_id,
      existing.candidate_id,
      Some(existing),
      Utc::now(),
    )
  }

  #[test]
  fn fresh_apply_is_pending() {
    let now = Utc::now();
    let (opp, cand) = (Uuid::new_v4(), Uuid::new_v4());
    let rec = next_record(
      EnrollmentAction::Apply,
      FamilyTag::Extension,
      opp,
      cand,
      None,
      now,
    )
    .unwrap();
    assert_eq!(rec.status, ApplicationStatus::Pending);
    assert_eq!(rec.applied_at, now);
    assert_eq!(rec.opportunity_id, opp);
    assert_eq!(rec.candidate_id, cand);
    assert_eq!(rec.family, FamilyTag::Extension);
  }

  #[test]
  fn reapply_reuses_record_with_later_timestamp() {
    let at = Utc::now();
    for status in [ApplicationStatus::Cancelled, ApplicationStatus::Rejected] {
      let old = record(status, at);
      // Clock did not move: the refreshed timestamp must still be later.
      let new = apply(&old, at).unwrap();
      assert_eq!(new.application_id, old.application_id);
      assert_eq!(new.status, ApplicationStatus::Pending);
      assert!(new.applied_at > old.applied_at);
    }
  }

  #[test]
  fn reapply_uses_now_when_clock_advanced() {
    let at = Utc::now();
    let later = at + Duration::seconds(5);
    let new = apply(&record(ApplicationStatus::Cancelled, at), later).unwrap();
    assert_eq!(new.applied_at, later);
  }

  #[test]
  fn apply_conflicts() {
    let at = Utc::now();
    assert!(matches!(
      apply(&record(ApplicationStatus::Approved, at), at),
      Err(Error::AlreadyApproved)
    ));
    assert!(matches!(
      apply(&record(ApplicationStatus::Pending, at), at),
      Err(Error::AlreadyPending)
    ));
  }

  #[test]
  fn cancel_keeps_timestamp() {
    let old = record(ApplicationStatus::Pending, Utc::now());
    let new = cancel(&old).unwrap();
    assert_eq!(new.status, ApplicationStatus::Cancelled);
    assert_eq!(new.applied_at, old.applied_at);
  }

  #[test]
  fn cancel_conflicts() {
    let at = Utc::now();
    let err = cancel(&record(ApplicationStatus::Approved, at)).unwrap_err();
    assert!(matches!(err, Error::CannotCancelApproved));
    let err = cancel(&record(ApplicationStatus::Cancelled, at)).unwrap_err();
    assert!(matches!(err, Error::AlreadyCancelled));
    assert_eq!(err.kind(), crate::ErrorKind::Conflict);
  }

  #[test]
  fn cancel_without_record_is_not_found() {
    let err = next_record(
      EnrollmentAction::Cancel,
      FamilyTag::Assistantship,
      Uuid::new_v4(),
      Uuid::new_v4(),
      None,
      Utc::now(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::NotFound);
  }
}
