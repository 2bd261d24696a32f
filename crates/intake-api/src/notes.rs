//! Admin handlers for the notes timeline.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/submissions/:id/notes` | Optional `?q=` substring filter |
//! | `POST` | `/submissions/:id/notes` | Author = authenticated username |
//! | `GET`  | `/submissions/:id/notes/templates` | Quick-start bodies, name filled in |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use intake_core::{
  note::{NewNote, Note, NoteType},
  store::SubmissionStore,
  timeline,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
  ApiState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q: Option<String>,
}

/// `GET /submissions/:id/notes[?q=<text>]` — newest first. Notes of a
/// soft-deleted submission remain retrievable for audit.
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  // 404 only for ids that never existed.
  state
    .store
    .get(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("submission {id} not found")))?;

  let notes = state.store.list_notes(id).await.map_err(store_err)?;

  let notes = match params.q.as_deref() {
    Some(query) => timeline::filter_by_text(&notes, query)
      .into_iter()
      .cloned()
      .collect(),
    None => notes,
  };

  Ok(Json(notes))
}

// ─── Templates ────────────────────────────────────────────────────────────────

/// `GET /submissions/:id/notes/templates` — the quick-start compositions with
/// the submission's full name substituted in.
pub async fn templates<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Value>>, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let submission = state
    .store
    .get(id)
    .await
    .map_err(store_err)?
    .filter(|s| s.deleted_at.is_none())
    .ok_or_else(|| ApiError::NotFound(format!("submission {id} not found")))?;

  let name = submission.full_name();
  let templates = timeline::QUICK_TEMPLATES
    .iter()
    .map(|t| {
      json!({
        "label": t.label,
        "note_type": t.note_type,
        "note_text": t.instantiate(&name),
      })
    })
    .collect();

  Ok(Json(templates))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub note_text: String,
  pub note_type: NoteType,
}

/// `POST /submissions/:id/notes`
pub async fn create<S>(
  Authenticated(username): Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let text = body.note_text.trim();
  if text.is_empty() {
    return Err(ApiError::BadRequest("note text is required".to_owned()));
  }

  let note = state
    .store
    .add_note(NewNote {
      submission_id: id,
      note_type:     body.note_type,
      note_text:     text.to_owned(),
      created_by:    username,
    })
    .await
    .map_err(store_err)?;

  Ok((StatusCode::CREATED, Json(note)))
}
