//! Core types and services for the CEPEX enrollment and approval workflow.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! owns the application lifecycle state machine, the reviewer approval queue,
//! and the small reporting helpers built on top of them. Storage is reached
//! only through the [`store::AcademicStore`] trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod approval;
pub mod catalog;
pub mod enrollment;
pub mod error;
pub mod family;
pub mod lifecycle;
pub mod opportunity;
pub mod statistics;
pub mod store;
pub mod user;

pub use error::{Error, ErrorKind, Result};

#[cfg(test)]
mod tests;
