//! In-memory store for the quote demonstration API.
//!
//! Provides the author/quote domain model, CRUD operations with
//! uniqueness and pagination rules, and optional JSON snapshots.

pub mod config;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use store::{Page, Store};
