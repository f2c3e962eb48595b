//! Dashboard counters for the assistantship programme.

use serde::Serialize;
use tracing::debug;

use crate::{
  Result,
  family::{Assistantship, Family, FamilyTag, OpportunityRecord as _},
  lifecycle::ApplicationStatus,
  opportunity::AssistantshipStatus,
  store::{AcademicStore, ApplicationQuery, StoreResultExt as _},
  user::Caller,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssistantshipStatistics {
  /// Postings neither cancelled nor rejected. Approved postings count as
  /// open, so this is wider than the approval queue.
  pub open_count:              usize,
  /// Applications that were approved.
  pub active_assistant_count:  usize,
  /// Applications still waiting on a decision.
  pub pending_candidate_count: usize,
}

/// Reviewer-only summary of assistantship postings and applications.
pub async fn assistantship_statistics<S: AcademicStore>(
  store: &S,
  caller: &Caller,
) -> Result<AssistantshipStatistics> {
  caller.require_reviewer("view assistantship statistics")?;

  let postings =
    store.list_opportunities(FamilyTag::Assistantship).await.lift()?;
  let mut open_count = 0;
  for opportunity in postings {
    let posting = Assistantship::narrow(opportunity)?;
    if !matches!(
      posting.status(),
      AssistantshipStatus::Cancelled | AssistantshipStatus::Rejected
    ) {
      open_count += 1;
    }
  }

  let active_assistant_count =
    count_applications(store, ApplicationStatus::Approved).await?;
  let pending_candidate_count =
    count_applications(store, ApplicationStatus::Pending).await?;

  let stats = AssistantshipStatistics {
    open_count,
    active_assistant_count,
    pending_candidate_count,
  };
  debug!(?stats, "assistantship statistics computed");
  Ok(stats)
}

async fn count_applications<S: AcademicStore>(
  store: &S,
  status: ApplicationStatus,
) -> Result<usize> {
  let records = store
    .list_applications(
      FamilyTag::Assistantship,
      ApplicationQuery::with_status(status),
    )
    .await
    .lift()?;
  Ok(records.len())
}
