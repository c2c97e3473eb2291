//! Matchit routing configuration.

use std::sync::Arc;

use http_body_util::BodyExt;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;
use tokio::time;

use crate::handlers::{self, author_handlers, meta_handlers, quote_handlers};
use quote_db_core::{Store, StoreConfig, StoreError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Store instance
    pub store: Arc<Store>,
    /// API configuration
    pub config: Arc<StoreConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a new router with the API's route table.
    pub fn new(store: Arc<Store>, config: Arc<StoreConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/", RouteHandler::Root)
            .expect("Failed to insert / route");

        // Author endpoints
        router
            .insert("/authors", RouteHandler::Authors)
            .expect("Failed to insert /authors route");
        router
            .insert("/authors/{id}", RouteHandler::Author)
            .expect("Failed to insert /authors/{id} route");
        router
            .insert("/authors/{id}/quotes", RouteHandler::AuthorQuotes)
            .expect("Failed to insert /authors/{id}/quotes route");

        // Quote endpoints
        router
            .insert("/quotes", RouteHandler::Quotes)
            .expect("Failed to insert /quotes route");
        router
            .insert("/quotes/{id}", RouteHandler::Quote)
            .expect("Failed to insert /quotes/{id} route");

        // Service metadata
        router
            .insert("/-/alive", RouteHandler::Alive)
            .expect("Failed to insert /-/alive route");
        router
            .insert("/-/healthy", RouteHandler::Healthy)
            .expect("Failed to insert /-/healthy route");
        router
            .insert("/docs", RouteHandler::Docs)
            .expect("Failed to insert /docs route");
        router
            .insert("/spec", RouteHandler::Spec)
            .expect("Failed to insert /spec route");

        Self {
            inner: router,
            state: AppState { store, config },
        }
    }

    /// Routes an incoming request to the appropriate handler.
    ///
    /// The body read is bounded by `request_timeout_ms` and the
    /// handler by `response_timeout_ms`; either expiring yields 408.
    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
    ) -> Result<Response<Bytes>, RouterError> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let query = req.uri().query().map(str::to_string);

        let body_timeout = time::Duration::from_millis(self.state.config.request_timeout_ms);
        let body = bounded(body_timeout, async {
            req.collect().await.map_err(|e| {
                RouterError::InternalError(format!("Failed to read request body: {}", e))
            })
        })
        .await?
        .to_bytes();

        let handler_timeout = time::Duration::from_millis(self.state.config.response_timeout_ms);
        bounded(
            handler_timeout,
            self.dispatch(&method, &path, query.as_deref(), body),
        )
        .await
    }

    /// Dispatches an already-read request.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - URL path
    /// * `query` - raw query string, if any
    /// * `body` - request body bytes (empty for bodyless requests)
    pub async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: Bytes,
    ) -> Result<Response<Bytes>, RouterError> {
        match self.inner.at(path) {
            Ok(matched) => {
                let handler = matched.value;
                handler
                    .handle(method, &matched.params, query, body, &self.state)
                    .await
            }
            Err(_) => {
                // Return 404 for unmatched routes
                let error_response = handlers::error_response(
                    "NotFound",
                    format!("No route found for {}", path),
                    None,
                );
                let body = serde_json::to_vec(&error_response).map_err(|e| {
                    RouterError::InternalError(format!("Failed to serialize error response: {}", e))
                })?;
                Response::builder()
                    .status(404)
                    .header("Content-Type", "application/json")
                    .body(Bytes::from(body))
                    .map_err(|e| {
                        RouterError::InternalError(format!("Failed to build response: {}", e))
                    })
            }
        }
    }
}

/// Runs a fallible future against a deadline; expiry becomes a 408.
async fn bounded<T>(
    timeout: time::Duration,
    fut: impl std::future::Future<Output = Result<T, RouterError>>,
) -> Result<T, RouterError> {
    time::timeout(timeout, fut)
        .await
        .map_err(|_| RouterError::Timeout)?
}

/// Route handler selector.
enum RouteHandler {
    Root,
    Authors,
    Author,
    AuthorQuotes,
    Quotes,
    Quote,
    Alive,
    Healthy,
    Docs,
    Spec,
}

fn parse_id(params: &matchit::Params<'_, '_>) -> Result<u64, RouterError> {
    let raw = params
        .get("id")
        .ok_or_else(|| RouterError::InternalError("Missing id parameter".to_string()))?;
    raw.parse()
        .map_err(|e| RouterError::BadRequest(format!("Invalid id '{}': {}", raw, e)))
}

impl RouteHandler {
    async fn handle(
        &self,
        method: &Method,
        params: &matchit::Params<'_, '_>,
        query: Option<&str>,
        body: Bytes,
        state: &AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::Root => {
                if method == Method::GET {
                    meta_handlers::root()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Authors => {
                if method == Method::GET {
                    author_handlers::list_authors(query, state)
                } else if method == Method::POST {
                    author_handlers::create_author(body, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Author => {
                let id = parse_id(params)?;
                if method == Method::GET {
                    author_handlers::read_author(id, state)
                } else if method == Method::PUT {
                    author_handlers::update_author(id, body, state)
                } else if method == Method::PATCH {
                    author_handlers::patch_author(id, body, state)
                } else if method == Method::DELETE {
                    author_handlers::delete_author(id, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::AuthorQuotes => {
                let id = parse_id(params)?;
                if method == Method::GET {
                    author_handlers::list_author_quotes(id, query, state)
                } else if method == Method::POST {
                    author_handlers::create_author_quote(id, body, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Quotes => {
                if method == Method::GET {
                    quote_handlers::list_quotes(query, state)
                } else if method == Method::POST {
                    quote_handlers::create_quote(body, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Quote => {
                let id = parse_id(params)?;
                if method == Method::GET {
                    quote_handlers::read_quote(id, state)
                } else if method == Method::PUT {
                    quote_handlers::update_quote(id, body, state)
                } else if method == Method::PATCH {
                    quote_handlers::patch_quote(id, body, state)
                } else if method == Method::DELETE {
                    quote_handlers::delete_quote(id, state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Alive => {
                if method == Method::GET {
                    meta_handlers::alive()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Healthy => {
                if method == Method::GET {
                    meta_handlers::healthy(state)
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Docs => {
                if method == Method::GET {
                    meta_handlers::docs()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Spec => {
                if method == Method::GET {
                    meta_handlers::spec()
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    Timeout,
    /// Request required a JSON body and none was submitted
    NoData,
    BadRequest(String),
    InternalError(String),
    /// Domain error from the store
    Store(StoreError),
}

impl From<StoreError> for RouterError {
    fn from(err: StoreError) -> Self {
        RouterError::Store(err)
    }
}

impl RouterError {
    /// HTTP status, error code name, and message for this error.
    ///
    /// Code names preserve the API's documented error taxonomy
    /// (e.g. `PageNotFound`, `AuthorAlreadyExists`).
    fn parts(&self) -> (u16, &'static str, String) {
        match self {
            RouterError::MethodNotAllowed => {
                (405, "MethodNotAllowed", "Method Not Allowed".to_string())
            }
            RouterError::Timeout => (408, "Timeout", "Request Timeout".to_string()),
            RouterError::NoData => (
                400,
                "NoData",
                "You didn't submit any JSON data!".to_string(),
            ),
            RouterError::BadRequest(msg) => (400, "BadRequest", msg.clone()),
            RouterError::InternalError(msg) => (500, "InternalError", msg.clone()),
            RouterError::Store(err) => match err {
                StoreError::AuthorNotFound { .. } | StoreError::QuoteNotFound { .. } => {
                    (404, "EntityDoesNotExist", err.to_string())
                }
                StoreError::PageOutOfRange { .. } => {
                    (404, "PageNotFound", "No data on that page!".to_string())
                }
                StoreError::AuthorAlreadyExists { .. } => {
                    (400, "AuthorAlreadyExists", err.to_string())
                }
                StoreError::QuoteAlreadyExists { .. } => {
                    (400, "QuoteAlreadyExists", err.to_string())
                }
                StoreError::AuthorEditViaQuote => (
                    400,
                    "CanNotCreateOrEditAuthorsFromQuoteUpdate",
                    err.to_string(),
                ),
                StoreError::Validation { .. } => (422, "SchemaValidation", err.to_string()),
                StoreError::Snapshot(_) => (500, "InternalError", err.to_string()),
            },
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (status, code, message) = self.parts();
        write!(f, "{} {}: {}", status, code, message)
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let (status, code, message) = err.parts();
        let error_response = handlers::error_response(code, message, None);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"error\":{{\"code\":\"InternalError\",\"message\":\"Failed to serialize error: {}\",\"details\":null}}}}",
                e
            )
            .into_bytes()
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Bytes::from("Internal Server Error"))
                    .expect("Failed to build fallback error response")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_handler_times_out_as_408() {
        let err = bounded(time::Duration::from_millis(5), async {
            time::sleep(time::Duration::from_secs(5)).await;
            Ok(Bytes::new())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, RouterError::Timeout));
        let response = Response::from(err);
        assert_eq!(response.status().as_u16(), 408);
    }

    #[tokio::test]
    async fn fast_work_is_not_cut_short() {
        let value = bounded(time::Duration::from_secs(5), async {
            Ok(Bytes::from_static(b"ok"))
        })
        .await
        .unwrap();
        assert_eq!(value, Bytes::from_static(b"ok"));
    }
}
