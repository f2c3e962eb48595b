//! Caller identity extractor.
//!
//! Authentication happens upstream. The gateway forwards the authenticated
//! user as two headers, which this extractor turns into a [`Caller`]:
//!
//! | Header        | Value                                   |
//! |---------------|-----------------------------------------|
//! | `x-user-id`   | UUID of the user                        |
//! | `x-user-role` | `ADMIN`, `STUDENT`, `PROFESSOR`, ...    |

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use cepex_core::user::{Caller, UserRole};
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Present in a handler's arguments means the request named a caller.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Caller);

/// Read the caller from request headers.
pub fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, ApiError> {
  let header = |name: &str| {
    headers
      .get(name)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .ok_or(ApiError::Unauthorized)
  };

  let user_id: Uuid =
    header(USER_ID_HEADER)?.parse().map_err(|_| ApiError::Unauthorized)?;
  let role: UserRole =
    header(USER_ROLE_HEADER)?.parse().map_err(|_| ApiError::Unauthorized)?;
  Ok(Caller::new(user_id, role))
}

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    caller_from_headers(&parts.headers).map(Authenticated)
  }
}
