//! Error type for `cepex-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule refused the operation (e.g. a duplicate application).
  #[error(transparent)]
  Core(#[from] cepex_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A column held a value that does not decode into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for cepex_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(core) => core,
      other => cepex_core::Error::Store(Box::new(other)),
    }
  }
}
