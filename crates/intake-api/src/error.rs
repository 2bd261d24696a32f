//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. The status mapping keeps the failure
/// classes distinct: an operator can always tell "not found / deleted" from
/// "temporarily unavailable, retry" from "invalid input".
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("rate limit exceeded")]
  RateLimited,

  #[error("store unavailable: {0}")]
  Unavailable(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "unauthorized".to_owned())
      }
      ApiError::RateLimited => (
        StatusCode::TOO_MANY_REQUESTS,
        "rate limit exceeded, try again later".to_owned(),
      ),
      ApiError::Unavailable(m) => (
        StatusCode::SERVICE_UNAVAILABLE,
        format!("store temporarily unavailable, retry: {m}"),
      ),
    };

    let mut response =
      (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"intake\""),
      );
    }
    response
  }
}

impl From<intake_core::Error> for ApiError {
  fn from(e: intake_core::Error) -> Self {
    match e {
      intake_core::Error::NotFound(id) => {
        Self::NotFound(format!("submission {id} not found"))
      }
      intake_core::Error::Validation(msg) => Self::BadRequest(msg),
      intake_core::Error::StoreUnavailable(msg) => Self::Unavailable(msg),
      intake_core::Error::Unauthorized => Self::Unauthorized,
    }
  }
}

/// Lift a backend error through the core taxonomy.
pub fn store_err<E>(e: E) -> ApiError
where
  E: Into<intake_core::Error>,
{
  ApiError::from(e.into())
}
