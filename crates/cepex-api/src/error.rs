//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use cepex_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing or invalid caller identity")]
  Unauthorized,

  #[error(transparent)]
  Domain(#[from] cepex_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Domain(e) => match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let kind = match &self {
      ApiError::Unauthorized => json!("unauthorized"),
      ApiError::Domain(e) => json!(e.kind()),
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({ "error": self.to_string(), "kind": kind });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use cepex_core::{Error, family::FamilyTag};
  use uuid::Uuid;

  use super::*;

  #[test]
  fn kinds_map_to_statuses() {
    let cases = [
      (
        Error::OpportunityNotFound {
          family: FamilyTag::Research,
          id:     Uuid::nil(),
        },
        StatusCode::NOT_FOUND,
      ),
      (Error::AlreadyPending, StatusCode::CONFLICT),
      (Error::UnknownFamily("x".into()), StatusCode::BAD_REQUEST),
      (Error::Store("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
      assert_eq!(ApiError::from(err).status(), expected);
    }
    assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
  }
}
