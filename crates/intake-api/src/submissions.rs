//! Admin handlers for `/submissions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/submissions` | Optional `?bucket=all\|revisit\|<status>` |
//! | `GET`    | `/submissions/:id` | 404 for unknown or soft-deleted |
//! | `DELETE` | `/submissions/:id` | Soft delete; idempotent |
//! | `PUT`    | `/submissions/:id/status` | Applies the auto-resurface policy |
//! | `PUT`    | `/submissions/:id/resurface` | Body `{"date": ... \| null}` |
//! | `POST`   | `/submissions/:id/tags` | Body `{"tag": "..."}`; idempotent |
//! | `DELETE` | `/submissions/:id/tags/:tag` | No-op if absent |
//! | `DELETE` | `/submissions/:id/tags` | Clear all |
//! | `POST`   | `/submissions/:id/assist` | Snapshot for the suggestion generator |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use intake_core::{
  assist::{SuggestionSnapshot, gather_snapshot},
  lifecycle::{self, BucketFilter},
  store::SubmissionStore,
  submission::{Status, Submission},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  ApiState,
  auth::Authenticated,
  error::{ApiError, store_err},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub bucket: Option<String>,
}

/// `GET /submissions[?bucket=<filter>]` — active submissions, due-for-revisit
/// ones surfaced first.
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Submission>>, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let filter = params
    .bucket
    .as_deref()
    .map(str::parse::<BucketFilter>)
    .transpose()
    .map_err(ApiError::from)?;

  let now = Utc::now();
  let mut submissions = state.store.list_active().await.map_err(store_err)?;

  if let Some(filter) = filter {
    submissions.retain(|s| lifecycle::matches_filter(s, filter, now));
  }
  lifecycle::sort_for_listing(&mut submissions, now);

  Ok(Json(submissions))
}

// ─── Get one / delete ─────────────────────────────────────────────────────────

/// `GET /submissions/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Submission>, ApiError>
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
  Ok(Json(submission))
}

/// `DELETE /submissions/:id` — soft delete; deleting twice is still 204.
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  state.store.soft_delete(id).await.map_err(store_err)?;
  tracing::info!(%id, "submission soft-deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Status ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Status,
}

/// `PUT /submissions/:id/status` — the response reports the resurface date
/// when the configured policy scheduled one.
pub async fn update_status<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let resurface_date =
    lifecycle::transition_status(&*state.store, state.policy, id, body.status)
      .await
      .map_err(ApiError::from)?;

  Ok(Json(json!({
    "status": body.status,
    "resurface_date": resurface_date,
  })))
}

// ─── Resurface date ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResurfaceBody {
  pub date: Option<DateTime<Utc>>,
}

/// `PUT /submissions/:id/resurface`
pub async fn update_resurface<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ResurfaceBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  state
    .store
    .update_resurface_date(id, body.date)
    .await
    .map_err(store_err)?;
  Ok(Json(json!({ "resurface_date": body.date })))
}

// ─── Tags ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TagBody {
  pub tag: String,
}

/// `POST /submissions/:id/tags` — idempotent add.
pub async fn add_tag<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<TagBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let tag = body.tag.trim();
  if tag.is_empty() {
    return Err(ApiError::BadRequest("tag must not be empty".to_owned()));
  }

  let tags = lifecycle::add_tag(&*state.store, id, tag)
    .await
    .map_err(ApiError::from)?;
  Ok(Json(json!({ "tags": tags })))
}

/// `DELETE /submissions/:id/tags/:tag` — no-op if absent.
pub async fn remove_tag<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path((id, tag)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let tags = lifecycle::remove_tag(&*state.store, id, &tag)
    .await
    .map_err(ApiError::from)?;
  Ok(Json(json!({ "tags": tags })))
}

/// `DELETE /submissions/:id/tags` — clear all.
pub async fn clear_tags<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let tags = lifecycle::clear_tags(&*state.store, id)
    .await
    .map_err(ApiError::from)?;
  Ok(Json(json!({ "tags": tags })))
}

// ─── Assist snapshot ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AssistBody {
  pub further_context: Option<String>,
}

/// `POST /submissions/:id/assist` — the read-only bundle handed to the
/// external suggestion generator.
pub async fn assist<S>(
  _auth: Authenticated,
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AssistBody>,
) -> Result<Json<SuggestionSnapshot>, ApiError>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  let snapshot = gather_snapshot(&*state.store, id, body.further_context)
    .await
    .map_err(ApiError::from)?;
  Ok(Json(snapshot))
}
