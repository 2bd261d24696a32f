//! Error types for `intake-core`.
//!
//! This is the error taxonomy every caller-facing layer maps onto: a failed
//! mutation must let the operator distinguish "not found / deleted" from
//! "temporarily unavailable, retry" from "invalid input".

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation referenced a submission that does not exist or has been
  /// soft-deleted.
  #[error("submission not found: {0}")]
  NotFound(Uuid),

  /// Malformed input rejected before it reaches storage.
  #[error("invalid input: {0}")]
  Validation(String),

  /// Transient backend failure (connection lost, operation timed out).
  #[error("store unavailable: {0}")]
  StoreUnavailable(String),

  /// The caller lacks rights. Credential checking itself lives with the
  /// HTTP layer; this variant only carries the verdict.
  #[error("unauthorized")]
  Unauthorized,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
