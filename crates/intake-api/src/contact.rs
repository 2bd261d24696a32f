//! The public contact-form endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/contact` | Validated insert; rate-limited per client IP |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::IntoResponse,
};
use chrono::{TimeDelta, Utc};
use intake_core::{store::SubmissionStore, submission::NewSubmission};
use serde_json::json;

use crate::{
  ApiState,
  error::{ApiError, store_err},
};

/// Best-effort client address for rate limiting: first hop of
/// `x-forwarded-for`, then `x-real-ip`, else a shared "unknown" bucket.
fn client_ip(headers: &HeaderMap) -> String {
  headers
    .get("x-forwarded-for")
    .or_else(|| headers.get("x-real-ip"))
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.split(',').next())
    .map(|v| v.trim().to_owned())
    .unwrap_or_else(|| "unknown".to_owned())
}

/// `POST /contact` — create a submission with `status = new` and no tags.
pub async fn submit<S>(
  State(state): State<ApiState<S>>,
  headers: HeaderMap,
  Json(body): Json<NewSubmission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SubmissionStore,
  S::Error: Into<intake_core::Error>,
{
  let ip = client_ip(&headers);

  let since = Utc::now() - TimeDelta::hours(1);
  let recent = state
    .store
    .recent_submissions_from(&ip, since)
    .await
    .map_err(store_err)?;
  if recent >= u64::from(state.rate_limit.max_per_hour) {
    tracing::warn!(%ip, "contact submission rate limit hit");
    return Err(ApiError::RateLimited);
  }

  let mut input = body.validated().map_err(ApiError::from)?;
  input.ip_address = Some(ip);
  input.user_agent = headers
    .get(header::USER_AGENT)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);

  let submission = state.store.create(input).await.map_err(store_err)?;
  tracing::info!(id = %submission.id, "contact submission received");

  Ok((StatusCode::CREATED, Json(json!({ "id": submission.id }))))
}
