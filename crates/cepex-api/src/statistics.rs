//! `GET /statistics/assistantships`

use std::sync::Arc;

use axum::{Json, extract::State};
use cepex_core::{
  statistics::{AssistantshipStatistics, assistantship_statistics},
  store::AcademicStore,
};

use crate::{Authenticated, error::ApiError};

pub async fn assistantships<S: AcademicStore>(
  State(store): State<Arc<S>>,
  Authenticated(caller): Authenticated,
) -> Result<Json<AssistantshipStatistics>, ApiError> {
  let stats = assistantship_statistics(store.as_ref(), &caller).await?;
  Ok(Json(stats))
}
