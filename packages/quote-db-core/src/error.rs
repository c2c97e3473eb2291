//! Store error types.

use thiserror::Error;

/// Store operation errors.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Author not found
    #[error("Author {id} not found")]
    AuthorNotFound { id: u64 },

    /// Quote not found
    #[error("Quote {id} not found")]
    QuoteNotFound { id: u64 },

    /// Author name already taken
    #[error("Author '{name}' already exists")]
    AuthorAlreadyExists { name: String },

    /// Duplicate quote content for the same author
    #[error("That quote already exists for author '{author}'")]
    QuoteAlreadyExists { author: String },

    /// Attempt to create or rename an author through a quote update
    #[error(
        "Authors cannot be created or edited while updating a quote; \
         use the authors endpoints for that"
    )]
    AuthorEditViaQuote,

    /// Payload failed validation
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Listing offset is past the end of the collection
    #[error("No data on that page (offset {offset}, total {total})")]
    PageOutOfRange { offset: usize, total: usize },

    /// Snapshot I/O or decode failure
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
