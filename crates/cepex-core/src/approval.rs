//! The reviewer approval queue and the approve/reject dispatch.
//!
//! The queue merges the three families into one uniform [`ApprovalItem`]
//! list. A decision comes back with the family tag the item carried and is
//! re-dispatched to the matching family before anything is mutated.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  family::{
    Assistantship, Extension, Family, FamilyTag, OpportunityRecord, Research,
  },
  opportunity::{
    AssistantshipPosting, AssistantshipStatus, ExtensionProject, Opportunity,
    ProjectStatus, ResearchProject,
  },
  store::{AcademicStore, StoreResultExt as _},
  user::Caller,
};

/// Label used when a creator or area relation is absent or dangling.
pub const PLACEHOLDER: &str = "N/A";

/// The display status of every queue item.
pub const AWAITING_DECISION: &str = "PENDING";

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
  Approve,
  Reject,
}

/// One entry in the reviewer queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalItem {
  pub id:           Uuid,
  pub title:        String,
  #[serde(rename = "type")]
  pub family:       FamilyTag,
  pub creator:      String,
  pub area:         String,
  pub submitted_at: DateTime<Utc>,
  pub status:       &'static str,
}

/// What the queue needs from an opportunity beyond [`OpportunityRecord`].
pub trait Reviewable: OpportunityRecord {
  fn creator_label(&self) -> Option<&str>;
  fn area_label(&self) -> Option<&str>;
  fn submitted_on(&self) -> Option<NaiveDate>;

  /// Further labels a catalog search matches against, besides the title and
  /// the creator.
  fn search_labels(&self) -> Vec<&str> { Vec::new() }

  /// The status a decision moves this opportunity to.
  fn decision_target(decision: Decision) -> Self::Status;
}

impl Reviewable for AssistantshipPosting {
  fn creator_label(&self) -> Option<&str> { self.supervisor_login.as_deref() }

  fn area_label(&self) -> Option<&str> { self.discipline_name.as_deref() }

  fn submitted_on(&self) -> Option<NaiveDate> { self.starts_on }

  fn search_labels(&self) -> Vec<&str> {
    [&self.supervisor_first_name, &self.discipline_name]
      .into_iter()
      .filter_map(|l| l.as_deref())
      .collect()
  }

  fn decision_target(decision: Decision) -> AssistantshipStatus {
    match decision {
      Decision::Approve => AssistantshipStatus::Approved,
      Decision::Reject => AssistantshipStatus::Rejected,
    }
  }
}

impl Reviewable for ResearchProject {
  fn creator_label(&self) -> Option<&str> {
    self.lead_researcher_login.as_deref()
  }

  fn area_label(&self) -> Option<&str> { self.research_line.as_deref() }

  fn submitted_on(&self) -> Option<NaiveDate> { self.starts_on }

  // Approval opens the review phase rather than closing it.
  fn decision_target(decision: Decision) -> ProjectStatus {
    match decision {
      Decision::Approve => ProjectStatus::InReview,
      Decision::Reject => ProjectStatus::Cancelled,
    }
  }
}

impl Reviewable for ExtensionProject {
  fn creator_label(&self) -> Option<&str> { self.coordinator_login.as_deref() }

  fn area_label(&self) -> Option<&str> { self.location.as_deref() }

  fn submitted_on(&self) -> Option<NaiveDate> { self.starts_on }

  fn decision_target(decision: Decision) -> ProjectStatus {
    match decision {
      Decision::Approve => ProjectStatus::InReview,
      Decision::Reject => ProjectStatus::Cancelled,
    }
  }
}

fn project<O: Reviewable>(
  family: FamilyTag,
  opportunity: &O,
  now: DateTime<Utc>,
) -> ApprovalItem {
  let label = |l: Option<&str>| l.unwrap_or(PLACEHOLDER).to_owned();
  ApprovalItem {
    id: opportunity.id(),
    title: opportunity.title().to_owned(),
    family,
    creator: label(opportunity.creator_label()),
    area: label(opportunity.area_label()),
    submitted_at: opportunity
      .submitted_on()
      .map_or(now, |d| d.and_time(NaiveTime::default()).and_utc()),
    status: AWAITING_DECISION,
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

pub struct ApprovalService<S> {
  store: Arc<S>,
}

impl<S> Clone for ApprovalService<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: AcademicStore> ApprovalService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Everything awaiting a decision: assistantships, then research, then
  /// extension, each in store order.
  pub async fn pending_approvals(
    &self,
    caller: &Caller,
  ) -> Result<Vec<ApprovalItem>> {
    caller.require_reviewer("view the approval queue")?;
    let now = Utc::now();
    let mut items = self.pending_of::<Assistantship>(now).await?;
    items.extend(self.pending_of::<Research>(now).await?);
    items.extend(self.pending_of::<Extension>(now).await?);
    debug!(count = items.len(), "approval queue assembled");
    Ok(items)
  }

  pub async fn approve(
    &self,
    caller: &Caller,
    id: Uuid,
    tag: &str,
  ) -> Result<Opportunity> {
    self.decide(caller, id, tag, Decision::Approve).await
  }

  pub async fn reject(
    &self,
    caller: &Caller,
    id: Uuid,
    tag: &str,
  ) -> Result<Opportunity> {
    self.decide(caller, id, tag, Decision::Reject).await
  }

  /// Apply `decision` to the opportunity named by `id` and the raw family
  /// `tag`. The tag is validated before the store is touched.
  pub async fn decide(
    &self,
    caller: &Caller,
    id: Uuid,
    tag: &str,
    decision: Decision,
  ) -> Result<Opportunity> {
    caller.require_reviewer("decide on opportunities")?;
    match tag.parse::<FamilyTag>()? {
      FamilyTag::Assistantship => self
        .decide_family::<Assistantship>(id, decision)
        .await
        .map(Assistantship::wrap),
      FamilyTag::Research => self
        .decide_family::<Research>(id, decision)
        .await
        .map(Research::wrap),
      FamilyTag::Extension => self
        .decide_family::<Extension>(id, decision)
        .await
        .map(Extension::wrap),
    }
  }

  async fn decide_family<F>(
    &self,
    id: Uuid,
    decision: Decision,
  ) -> Result<F::Opportunity>
  where
    F: Family,
    F::Opportunity: Reviewable,
  {
    let found = self.store.get_opportunity(F::TAG, id).await.lift()?;
    let mut opportunity = match found {
      Some(found) => F::narrow(found)?,
      None => return Err(Error::OpportunityNotFound { family: F::TAG, id }),
    };

    let previous = opportunity.status();
    let target = <F::Opportunity as Reviewable>::decision_target(decision);
    opportunity.set_status(target);
    let saved =
      self.store.save_opportunity(F::wrap(opportunity)).await.lift()?;

    info!(
      family = %F::TAG,
      %id,
      ?decision,
      from = %previous,
      to = %target,
      "opportunity decided"
    );
    F::narrow(saved)
  }

  async fn pending_of<F>(&self, now: DateTime<Utc>) -> Result<Vec<ApprovalItem>>
  where
    F: Family,
    F::Opportunity: Reviewable,
  {
    let all = self.store.list_opportunities(F::TAG).await.lift()?;
    let mut items = Vec::new();
    for opportunity in all {
      let opportunity = F::narrow(opportunity)?;
      if opportunity.awaiting_decision() {
        items.push(project(F::TAG, &opportunity, now));
      }
    }
    Ok(items)
  }
}
