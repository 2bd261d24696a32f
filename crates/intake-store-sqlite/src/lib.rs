//! SQLite backend for the intake submission store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every operation is bounded by a
//! per-call timeout; expiry surfaces as an error that maps onto the core's
//! `StoreUnavailable`.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
