//! Read-only snapshot handed to the external suggestion generator.
//!
//! The core gathers what the LLM collaborator needs — submission fields,
//! tags, the notes history, optional free-text context — and stops there.
//! Prompting and the generated text are outside this crate; the response is
//! opaque display content.

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  lifecycle::suggested_action,
  note::Note,
  store::SubmissionStore,
  submission::Submission,
};

/// Everything the suggestion generator sees about a lead.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionSnapshot {
  pub submission:       Submission,
  /// Newest first, straight from the store.
  pub notes:            Vec<Note>,
  pub further_context:  Option<String>,
  pub suggested_action: &'static str,
}

/// Assemble a snapshot for a live submission. Soft-deleted submissions are
/// not suggestible and report `NotFound`.
pub async fn gather_snapshot<S>(
  store: &S,
  id: Uuid,
  further_context: Option<String>,
) -> Result<SuggestionSnapshot>
where
  S: SubmissionStore,
  S::Error: Into<Error>,
{
  let submission = store
    .get(id)
    .await
    .map_err(Into::into)?
    .filter(|s| s.deleted_at.is_none())
    .ok_or(Error::NotFound(id))?;

  let notes = store.list_notes(id).await.map_err(Into::into)?;
  let suggested_action = suggested_action(submission.status);

  Ok(SuggestionSnapshot {
    submission,
    notes,
    further_context,
    suggested_action,
  })
}
