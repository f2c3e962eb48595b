//! JSON REST API for CEPEX.
//!
//! Exposes an axum [`Router`] backed by any
//! [`cepex_core::store::AcademicStore`]. Callers are identified by headers set
//! by the upstream gateway (see [`caller`]); TLS and token handling are not
//! this crate's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cepex_api::api_router(store.clone()))
//! ```

/// Evaluate `$body` with `$f` naming the family marker type for `$tag`.
macro_rules! for_family {
  ($tag:expr, $f:ident => $body:expr) => {
    match $tag {
      ::cepex_core::family::FamilyTag::Assistantship => {
        type $f = ::cepex_core::family::Assistantship;
        $body
      }
      ::cepex_core::family::FamilyTag::Research => {
        type $f = ::cepex_core::family::Research;
        $body
      }
      ::cepex_core::family::FamilyTag::Extension => {
        type $f = ::cepex_core::family::Extension;
        $body
      }
    }
  };
}

pub mod approvals;
pub mod caller;
pub mod enrollment;
pub mod error;
pub mod opportunities;
pub mod statistics;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use cepex_core::{family::FamilyTag, store::AcademicStore};

pub use caller::Authenticated;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AcademicStore + 'static,
{
  Router::new()
    // Catalog
    .route(
      "/opportunities/assistantship/published",
      get(opportunities::published::<S>),
    )
    .route("/opportunities/{family}", get(opportunities::list::<S>))
    .route(
      "/opportunities/{family}/{id}/status",
      patch(opportunities::override_status::<S>),
    )
    // Enrollment
    .route(
      "/opportunities/{family}/{id}/enrollment",
      post(enrollment::apply::<S>).delete(enrollment::cancel::<S>),
    )
    .route(
      "/opportunities/{family}/{id}/enrollment/status",
      get(enrollment::status::<S>),
    )
    .route(
      "/opportunities/{family}/{id}/applications",
      get(enrollment::by_opportunity::<S>),
    )
    .route(
      "/candidates/{id}/applications/{family}",
      get(enrollment::by_candidate::<S>),
    )
    // Approvals
    .route("/approvals/pending", get(approvals::pending::<S>))
    .route("/approvals/{id}/approve", put(approvals::approve::<S>))
    .route("/approvals/{id}/reject", put(approvals::reject::<S>))
    // Statistics
    .route(
      "/statistics/assistantships",
      get(statistics::assistantships::<S>),
    )
    .with_state(store)
}

/// Parse a `{family}` path segment.
pub(crate) fn parse_family(raw: &str) -> Result<FamilyTag, ApiError> {
  Ok(raw.parse()?)
}

#[cfg(test)]
mod tests;
