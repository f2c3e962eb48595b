//! The enrollment lifecycle manager.
//!
//! One implementation serves all three families; [`Enrollments`] is
//! parameterised by a [`Family`] marker and the per-family adapters are plain
//! type aliases.

use std::{marker::PhantomData, sync::Arc};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  family::{Assistantship, Extension, Family, Research},
  lifecycle::{ApplicationRecord, EnrollmentAction},
  store::{AcademicStore, ApplicationQuery, StoreResultExt as _},
  user::{Caller, User},
};

pub type AssistantshipEnrollments<S> = Enrollments<S, Assistantship>;
pub type ResearchEnrollments<S> = Enrollments<S, Research>;
pub type ExtensionEnrollments<S> = Enrollments<S, Extension>;

/// Apply, cancel, and inspect applications for one opportunity family.
pub struct Enrollments<S, F> {
  store:   Arc<S>,
  _family: PhantomData<fn() -> F>,
}

impl<S, F> Clone for Enrollments<S, F> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), _family: PhantomData }
  }
}

impl<S: AcademicStore, F: Family> Enrollments<S, F> {
  pub fn new(store: Arc<S>) -> Self { Self { store, _family: PhantomData } }

  // ── Transitions ───────────────────────────────────────────────────────

  /// Submit (or re-submit) `candidate_id`'s application to `opportunity_id`.
  ///
  /// Fails with `NotFound` if either side is missing and with `Conflict` if
  /// the existing application is pending or approved.
  pub async fn apply(
    &self,
    caller: &Caller,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> Result<ApplicationRecord> {
    caller.require_candidate(candidate_id, "apply on behalf of this candidate")?;
    self.transition(EnrollmentAction::Apply, opportunity_id, candidate_id).await
  }

  /// Withdraw a pending or rejected application. The submission timestamp is
  /// left as it was.
  pub async fn cancel(
    &self,
    caller: &Caller,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> Result<()> {
    caller
      .require_candidate(candidate_id, "cancel on behalf of this candidate")?;
    self
      .transition(EnrollmentAction::Cancel, opportunity_id, candidate_id)
      .await
      .map(|_| ())
  }

  async fn transition(
    &self,
    action: EnrollmentAction,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> Result<ApplicationRecord> {
    self.require_opportunity(opportunity_id).await?;
    self.require_candidate(candidate_id).await?;

    let outcome = self
      .store
      .transition_application(
        F::TAG,
        action,
        opportunity_id,
        candidate_id,
        Utc::now(),
      )
      .await
      .lift();

    match &outcome {
      Ok(record) => info!(
        family = %F::TAG,
        ?action,
        %opportunity_id,
        %candidate_id,
        status = %record.status,
        "application transitioned"
      ),
      Err(err) => warn!(
        family = %F::TAG,
        ?action,
        %opportunity_id,
        %candidate_id,
        %err,
        "application transition refused"
      ),
    }
    outcome
  }

  // ── Queries ───────────────────────────────────────────────────────────

  /// Whether the candidate holds a pending or approved application.
  ///
  /// Never reports a domain error: a missing opportunity, candidate, or
  /// record, or a caller not entitled to ask, all answer `false`. Only a
  /// store failure surfaces as `Err`.
  pub async fn has_active_application(
    &self,
    caller: &Caller,
    opportunity_id: Uuid,
    candidate_id: Uuid,
  ) -> Result<bool> {
    if !caller.may_act_for(candidate_id) {
      debug!(
        family = %F::TAG,
        caller = %caller.user_id,
        %candidate_id,
        "status probe by unrelated caller"
      );
      return Ok(false);
    }

    let record = self
      .store
      .find_application(F::TAG, opportunity_id, candidate_id)
      .await
      .lift()?;
    Ok(record.is_some_and(|r| r.status.is_active()))
  }

  /// Every application submitted to one opportunity. Staff only.
  pub async fn list_by_opportunity(
    &self,
    caller: &Caller,
    opportunity_id: Uuid,
  ) -> Result<Vec<ApplicationRecord>> {
    caller.require_staff("list applications for an opportunity")?;
    self.require_opportunity(opportunity_id).await?;
    debug!(family = %F::TAG, %opportunity_id, "listing applications");
    self
      .store
      .list_applications(F::TAG, ApplicationQuery::for_opportunity(opportunity_id))
      .await
      .lift()
  }

  /// Every application one candidate has submitted in this family.
  pub async fn list_by_candidate(
    &self,
    caller: &Caller,
    candidate_id: Uuid,
  ) -> Result<Vec<ApplicationRecord>> {
    require_self_or_staff(caller, candidate_id)?;
    self.require_candidate(candidate_id).await?;
    debug!(family = %F::TAG, %candidate_id, "listing applications");
    self
      .store
      .list_applications(F::TAG, ApplicationQuery::for_candidate(candidate_id))
      .await
      .lift()
  }

  /// The opportunities a candidate holds an application for, whatever its
  /// status, in application order.
  pub async fn opportunities_for_candidate(
    &self,
    caller: &Caller,
    candidate_id: Uuid,
  ) -> Result<Vec<F::Opportunity>> {
    let records = self.list_by_candidate(caller, candidate_id).await?;
    let mut opportunities = Vec::with_capacity(records.len());
    for record in records {
      let found = self
        .store
        .get_opportunity(F::TAG, record.opportunity_id)
        .await
        .lift()?;
      if let Some(opportunity) = found {
        opportunities.push(F::narrow(opportunity)?);
      }
    }
    Ok(opportunities)
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn require_opportunity(&self, id: Uuid) -> Result<F::Opportunity> {
    match self.store.get_opportunity(F::TAG, id).await.lift()? {
      Some(opportunity) => F::narrow(opportunity),
      None => Err(Error::OpportunityNotFound { family: F::TAG, id }),
    }
  }

  async fn require_candidate(&self, id: Uuid) -> Result<User> {
    self
      .store
      .get_user(id)
      .await
      .lift()?
      .ok_or(Error::CandidateNotFound(id))
  }
}

fn require_self_or_staff(caller: &Caller, candidate_id: Uuid) -> Result<()> {
  if caller.user_id == candidate_id {
    Ok(())
  } else {
    caller.require_staff("list another candidate's applications")
  }
}
