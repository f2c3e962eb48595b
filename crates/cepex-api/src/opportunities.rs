//! Handlers for the opportunity catalog.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/opportunities/{family}` | `?search=&status=`, both optional |
//! | `GET`   | `/opportunities/assistantship/published` | approved postings only |
//! | `PATCH` | `/opportunities/{family}/{id}/status` | body: `{"status":"COMPLETED"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cepex_core::{
  catalog,
  family::Family as _,
  opportunity::{AssistantshipPosting, Opportunity},
  store::AcademicStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{Authenticated, error::ApiError, parse_family};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search: Option<String>,
  pub status: Option<String>,
}

/// `GET /opportunities/{family}[?search=..&status=..]`
pub async fn list<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(_): Authenticated,
  Path(family): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Opportunity>>, ApiError> {
  let search = params.search.as_deref();
  let status = params.status.as_deref();
  let listed: Vec<Opportunity> = for_family!(parse_family(&family)?, F => {
    catalog::list_opportunities::<S, F>(store.as_ref(), search, status)
      .await?
      .into_iter()
      .map(F::wrap)
      .collect()
  });
  Ok(Json(listed))
}

/// `GET /opportunities/assistantship/published[?search=..]`
pub async fn published<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(_): Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AssistantshipPosting>>, ApiError> {
  let postings =
    catalog::published_assistantships(store.as_ref(), params.search.as_deref())
      .await?;
  Ok(Json(postings))
}

// ─── Status override ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PATCH /opportunities/{family}/{id}/status`
pub async fn override_status<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
  Path((family, id)): Path<(String, Uuid)>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Opportunity>, ApiError> {
  let updated = for_family!(parse_family(&family)?, F => {
    let opportunity = catalog::override_status::<S, F>(
      store.as_ref(),
      &caller,
      id,
      &body.status,
    )
    .await?;
    F::wrap(opportunity)
  });
  Ok(Json(updated))
}
