//! Store and API configuration.

use std::path::PathBuf;

/// Configuration shared by the store and the HTTP layer.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Page size used when a listing request omits `limit`
    pub default_page_size: usize,
    /// Hard cap applied to client-supplied `limit` values
    pub max_page_size: usize,
    /// Snapshot directory (None disables snapshots)
    pub data_dir: Option<PathBuf>,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Handler timeout in milliseconds, applied once the body has
    /// been read
    pub response_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 50,
            data_dir: None,
            request_timeout_ms: 5000, // 5 seconds default
            response_timeout_ms: 5000,
        }
    }
}
