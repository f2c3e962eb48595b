//! SQLite backend for the CEPEX academic store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every call is serialised on that
//! thread, and lifecycle transitions additionally run inside one SQLite
//! transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
