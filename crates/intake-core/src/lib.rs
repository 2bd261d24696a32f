//! Core types and trait definitions for the intake lead-pipeline store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod assist;
pub mod error;
pub mod lifecycle;
pub mod note;
pub mod store;
pub mod submission;
pub mod taxonomy;
pub mod timeline;

pub use error::{Error, Result};
