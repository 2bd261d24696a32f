//! Error type for `intake-store-sqlite`.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("decode error: {0}")]
  Decode(String),

  /// The per-operation deadline expired before the database answered.
  #[error("store operation timed out after {0:?}")]
  Timeout(Duration),

  /// The operation referenced a submission that does not exist (or, for
  /// mutations, one that has been soft-deleted).
  #[error("submission not found: {0}")]
  SubmissionNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Map onto the core taxonomy so callers can tell "not found / deleted"
/// apart from "temporarily unavailable, retry".
impl From<Error> for intake_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::SubmissionNotFound(id) => intake_core::Error::NotFound(id),
      other => intake_core::Error::StoreUnavailable(other.to_string()),
    }
  }
}
