//! JSON REST API for the intake lead pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`intake_core::store::SubmissionStore`]. The public contact-form endpoint
//! is open (validated and rate-limited); everything else sits behind HTTP
//! Basic auth. TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", intake_api::api_router(state))
//! ```

pub mod auth;
pub mod contact;
pub mod error;
pub mod notes;
pub mod submissions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use intake_core::{lifecycle::AutoResurfacePolicy, store::SubmissionStore};
use serde::Deserialize;

pub use auth::AuthConfig;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Budget for the public contact form, counted per client IP over a rolling
/// hour.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContactRateLimit {
  pub max_per_hour: u32,
}

impl Default for ContactRateLimit {
  fn default() -> Self { Self { max_per_hour: 5 } }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:      Arc<S>,
  pub auth:       Arc<AuthConfig>,
  pub policy:     AutoResurfacePolicy,
  pub rate_limit: ContactRateLimit,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: SubmissionStore + Clone + Send + Sync + 'static,
  S::Error: Into<intake_core::Error>,
{
  Router::new()
    // Public contact form
    .route("/contact", post(contact::submit::<S>))
    // Submissions
    .route("/submissions", get(submissions::list::<S>))
    .route(
      "/submissions/{id}",
      get(submissions::get_one::<S>).delete(submissions::delete_one::<S>),
    )
    .route("/submissions/{id}/status", put(submissions::update_status::<S>))
    .route(
      "/submissions/{id}/resurface",
      put(submissions::update_resurface::<S>),
    )
    // Tags
    .route(
      "/submissions/{id}/tags",
      post(submissions::add_tag::<S>).delete(submissions::clear_tags::<S>),
    )
    .route(
      "/submissions/{id}/tags/{tag}",
      delete(submissions::remove_tag::<S>),
    )
    // Notes
    .route(
      "/submissions/{id}/notes",
      get(notes::list::<S>).post(notes::create::<S>),
    )
    .route(
      "/submissions/{id}/notes/templates",
      get(notes::templates::<S>),
    )
    // Assist snapshot
    .route("/submissions/{id}/assist", post(submissions::assist::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
