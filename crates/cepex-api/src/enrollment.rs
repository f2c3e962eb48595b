//! Handlers for applying to and withdrawing from opportunities.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/opportunities/{family}/{id}/enrollment` | `?candidate_id=` defaults to the caller |
//! | `DELETE` | `/opportunities/{family}/{id}/enrollment` | 204 on success |
//! | `GET`    | `/opportunities/{family}/{id}/enrollment/status` | JSON `true`/`false` |
//! | `GET`    | `/opportunities/{family}/{id}/applications` | staff only |
//! | `GET`    | `/candidates/{id}/applications/{family}` | self or staff |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use cepex_core::{
  enrollment::Enrollments,
  lifecycle::ApplicationRecord,
  store::AcademicStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Authenticated, error::ApiError, parse_family};

/// Admins may act for another candidate; everyone else acts for themself.
#[derive(Debug, Default, Deserialize)]
pub struct CandidateParam {
  pub candidate_id: Option<Uuid>,
}

// ─── Apply / cancel ───────────────────────────────────────────────────────────

/// `POST /opportunities/{family}/{id}/enrollment`
pub async fn apply<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((family, id)): Path<(String, Uuid)>,
  Query(param): Query<CandidateParam>,
) -> Result<impl IntoResponse, ApiError> {
  let candidate_id = param.candidate_id.unwrap_or(caller.user_id);
  let record = for_family!(parse_family(&family)?, F => {
    Enrollments::<S, F>::new(store)
      .apply(&caller, id, candidate_id)
      .await?
  });
  Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /opportunities/{family}/{id}/enrollment`
pub async fn cancel<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((family, id)): Path<(String, Uuid)>,
  Query(param): Query<CandidateParam>,
) -> Result<StatusCode, ApiError> {
  let candidate_id = param.candidate_id.unwrap_or(caller.user_id);
  for_family!(parse_family(&family)?, F => {
    Enrollments::<S, F>::new(store)
      .cancel(&caller, id, candidate_id)
      .await?
  });
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /opportunities/{family}/{id}/enrollment/status`
pub async fn status<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((family, id)): Path<(String, Uuid)>,
  Query(param): Query<CandidateParam>,
) -> Result<Json<bool>, ApiError> {
  let candidate_id = param.candidate_id.unwrap_or(caller.user_id);
  let active = for_family!(parse_family(&family)?, F => {
    Enrollments::<S, F>::new(store)
      .has_active_application(&caller, id, candidate_id)
      .await?
  });
  Ok(Json(active))
}

// ─── Listings ─────────────────────────────────────────────────────────────────

/// `GET /opportunities/{family}/{id}/applications`
pub async fn by_opportunity<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((family, id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<ApplicationRecord>>, ApiError> {
  let records = for_family!(parse_family(&family)?, F => {
    Enrollments::<S, F>::new(store)
      .list_by_opportunity(&caller, id)
      .await?
  });
  Ok(Json(records))
}

/// `GET /candidates/{id}/applications/{family}`
pub async fn by_candidate<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((candidate_id, family)): Path<(Uuid, String)>,
) -> Result<Json<Vec<ApplicationRecord>>, ApiError> {
  let records = for_family!(parse_family(&family)?, F => {
    Enrollments::<S, F>::new(store)
      .list_by_candidate(&caller, candidate_id)
      .await?
  });
  Ok(Json(records))
}
