//! Handlers for the reviewer approval queue.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cepex_core::{
  approval::{ApprovalItem, ApprovalService, Decision},
  opportunity::Opportunity,
  store::AcademicStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Authenticated, error::ApiError};

/// `?type=` names the family of the opportunity being decided. A missing tag
/// is passed through as empty and rejected as an unknown family.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionParams {
  #[serde(rename = "type", default)]
  pub family: String,
}

/// `GET /approvals/pending`
pub async fn pending<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<Vec<ApprovalItem>>, ApiError> {
  let items = ApprovalService::new(store).pending_approvals(&caller).await?;
  Ok(Json(items))
}

/// `PUT /approvals/{id}/approve?type=<family>`
pub async fn approve<S: AcademicStore>(
  state: State<Arc<S>>,
  auth: Authenticated,
  path: Path<Uuid>,
  query: Query<DecisionParams>,
) -> Result<Json<Opportunity>, ApiError> {
  decide(state, auth, path, query, Decision::Approve).await
}

/// `PUT /approvals/{id}/reject?type=<family>`
pub async fn reject<S: AcademicStore>(
  state: State<Arc<S>>,
  auth: Authenticated,
  path: Path<Uuid>,
  query: Query<DecisionParams>,
) -> Result<Json<Opportunity>, ApiError> {
  decide(state, auth, path, query, Decision::Reject).await
}

async fn decide<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path(id): Path<Uuid>,
  Query(params): Query<DecisionParams>,
  decision: Decision,
) -> Result<Json<Opportunity>, ApiError> {
  let decided = ApprovalService::new(store)
    .decide(&caller, id, &params.family, decision)
    .await?;
  Ok(Json(decided))
}
