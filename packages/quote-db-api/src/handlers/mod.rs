//! HTTP endpoint implementations for authors, quotes, and service
//! metadata.

pub mod author_handlers;
pub mod meta_handlers;
pub mod quote_handlers;
pub mod request_utils;
pub mod response;
pub mod views;

pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};
