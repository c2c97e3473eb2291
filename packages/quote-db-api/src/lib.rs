//! REST API server for the quote demonstration store.
//!
//! Provides HTTP endpoints for author and quote CRUD, pagination,
//! health probes, and a generated OpenAPI document.

pub mod handlers;
pub mod router;
pub mod server;
