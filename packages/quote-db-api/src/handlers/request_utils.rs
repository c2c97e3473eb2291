//! Request utilities for HTTP endpoints.

use hyper::{body::Bytes, Response};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::response::success_response;
use crate::router::RouterError;
use quote_db_core::{Page, StoreConfig};

/// Parsed pagination parameters.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    /// Maximum number of items to return
    pub limit: usize,
    /// Number of items to skip
    pub offset: usize,
}

/// Parses `limit` and `offset` from a URL query string.
///
/// Missing values fall back to the configured defaults; `limit` is
/// clamped to the configured maximum. Other query keys are ignored.
pub fn parse_page_params(
    query: Option<&str>,
    config: &StoreConfig,
) -> Result<PageParams, RouterError> {
    let mut limit = config.default_page_size;
    let mut offset = 0usize;

    if let Some(query_str) = query {
        for pair in query_str.split('&') {
            let mut parts = pair.splitn(2, '=');
            let (key, encoded_value) = match (parts.next(), parts.next()) {
                (Some(k), Some(v)) => (k, v),
                _ => continue,
            };
            let decoded_value = percent_decode_str(encoded_value).decode_utf8_lossy();

            match key {
                "limit" => {
                    limit = decoded_value.parse().map_err(|e| {
                        RouterError::BadRequest(format!(
                            "Invalid limit value '{}': {}",
                            decoded_value, e
                        ))
                    })?;
                }
                "offset" => {
                    offset = decoded_value.parse().map_err(|e| {
                        RouterError::BadRequest(format!(
                            "Invalid offset value '{}': {}",
                            decoded_value, e
                        ))
                    })?;
                }
                _ => {}
            }
        }
    }

    if limit > config.max_page_size {
        limit = config.max_page_size;
    }

    Ok(PageParams { limit, offset })
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Relative URL of the next page, null on the last page
    pub next_page: Option<String>,
    pub limit: usize,
    pub offset: usize,
    pub total: usize,
}

/// Wraps a store page in the listing envelope, computing the
/// next-page link against `base_path`.
pub fn page_envelope<T: Serialize>(
    base_path: &str,
    page: Page<T>,
    params: &PageParams,
) -> PageEnvelope<T> {
    let next_page = if params.offset + params.limit >= page.total {
        None
    } else {
        Some(format!(
            "{}?limit={}&offset={}",
            base_path,
            params.limit,
            params.offset + params.limit
        ))
    };
    PageEnvelope {
        items: page.items,
        next_page,
        limit: params.limit,
        offset: params.offset,
        total: page.total,
    }
}

/// Deserializes a JSON request body.
///
/// An empty body is reported as `NoData` (400) rather than a parse
/// failure.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, RouterError> {
    if body.is_empty() {
        return Err(RouterError::NoData);
    }
    serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Failed to parse request: {}", e)))
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Helper to build empty HTTP response (for 204 No Content)
pub fn build_empty_response(status: u16) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .body(Bytes::new())
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `data` inside the success envelope and builds the
/// response.
pub fn build_json<T: Serialize>(status: u16, data: &T) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(&success_response(data))
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_default_and_clamp() {
        let config = StoreConfig::default();
        let params = parse_page_params(None, &config).unwrap();
        assert_eq!(params.limit, 50);
        assert_eq!(params.offset, 0);

        let params = parse_page_params(Some("limit=1000&offset=10"), &config).unwrap();
        assert_eq!(params.limit, 50);
        assert_eq!(params.offset, 10);

        let params = parse_page_params(Some("limit=5"), &config).unwrap();
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn page_params_reject_garbage() {
        let config = StoreConfig::default();
        assert!(parse_page_params(Some("limit=abc"), &config).is_err());
        assert!(parse_page_params(Some("offset=-1"), &config).is_err());
    }

    #[test]
    fn page_params_ignore_unknown_keys() {
        let config = StoreConfig::default();
        let params = parse_page_params(Some("foo=bar&offset=3"), &config).unwrap();
        assert_eq!(params.offset, 3);
    }

    #[test]
    fn next_page_link_math() {
        let params = PageParams {
            limit: 10,
            offset: 0,
        };
        let envelope = page_envelope(
            "/authors",
            Page {
                items: vec![1, 2, 3],
                total: 25,
            },
            &params,
        );
        assert_eq!(
            envelope.next_page.as_deref(),
            Some("/authors?limit=10&offset=10")
        );

        let last = PageParams {
            limit: 10,
            offset: 20,
        };
        let envelope = page_envelope(
            "/authors",
            Page {
                items: vec![1],
                total: 25,
            },
            &last,
        );
        assert!(envelope.next_page.is_none());
    }
}
