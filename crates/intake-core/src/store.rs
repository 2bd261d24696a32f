//! The `SubmissionStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `intake-store-sqlite`).
//! Higher layers (`intake-api`, the lifecycle rules in this crate) depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  lifecycle::TagEdit,
  note::{NewNote, Note},
  submission::{NewSubmission, Status, Submission},
};

/// Abstraction over a submission store backend — the core's only allowed
/// interaction with persistent state.
///
/// Mutations on a given submission id must be serialised by the backend (the
/// tag edit in particular is a read-modify-write and would otherwise lose
/// updates). Operations on different ids may proceed fully in parallel.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SubmissionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Persist a new submission with `status = new` and no tags. The id and
  /// `created_at` are assigned by the store.
  fn create(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<Submission, Self::Error>> + Send + '_;

  /// Retrieve a submission by id, soft-deleted ones included (callers decide
  /// visibility). Returns `None` only for ids that never existed.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + '_;

  /// All submissions with `deleted_at` null, newest first.
  fn list_active(
    &self,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + '_;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Replace the status. Fails with the backend's not-found error for
  /// unknown or soft-deleted ids. Never touches `resurface_date`; that is a
  /// lifecycle-rules decision.
  fn update_status(
    &self,
    id: Uuid,
    status: Status,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Apply a pure tag-set transformation atomically and return the
  /// resulting set. The read and write happen inside one serialised store
  /// call, so concurrent edits on the same id cannot lose updates.
  fn edit_tags(
    &self,
    id: Uuid,
    edit: TagEdit,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Set or clear the resurface date.
  fn update_resurface_date(
    &self,
    id: Uuid,
    date: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set `deleted_at = now`. Idempotent: deleting twice is not an error.
  /// Fails only for ids that never existed.
  fn soft_delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Append a note. The id and `created_at` are assigned by the store.
  fn add_note(
    &self,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// All notes for a submission, newest first. Works for soft-deleted
  /// submissions too — the timeline stays readable for audit.
  fn list_notes(
    &self,
    submission_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  // ── Rate-limit bookkeeping ────────────────────────────────────────────

  /// Count submissions recorded from `ip` since the given instant. Used by
  /// the public contact endpoint to enforce its per-IP budget.
  fn recent_submissions_from<'a>(
    &'a self,
    ip: &'a str,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
