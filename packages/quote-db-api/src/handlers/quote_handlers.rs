//! Quote collection and instance handlers.

use hyper::{body::Bytes, Response};

use crate::router::{AppState, RouterError};
use quote_db_core::model::{QuoteInput, QuotePatch};

use super::request_utils::{
    build_empty_response, build_json, page_envelope, parse_body, parse_page_params,
};
use super::views::{MiniQuoteView, QuoteView};

/// Lists quotes with pagination.
///
/// # Endpoint
/// `GET /quotes`
///
/// # Query Parameters
/// - `limit`: Maximum number of quotes to return (capped at 50)
/// - `offset`: Number of quotes to skip
///
/// Items are slim entries of `id`, `content`, and `url`.
///
/// # Errors
/// - **404 Not Found**: No data on the requested page
pub fn list_quotes(query: Option<&str>, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let params = parse_page_params(query, &state.config)?;
    let page = state
        .store
        .list_quotes(params.limit, params.offset)?
        .map(MiniQuoteView::from);
    build_json(200, &page_envelope("/quotes", page, &params))
}

/// Creates a quote.
///
/// # Endpoint
/// `POST /quotes`
///
/// # Request Body
/// ```json
/// {
///   "author": {"name": "Ada Lovelace"},
///   "content": "That brain of mine is something more than merely mortal."
/// }
/// ```
///
/// When no author with the given name exists, one is created from the
/// embedded author fields.
///
/// # Response
/// - **201 Created**: Returns the new quote entry
///
/// # Errors
/// - **400 Bad Request**: Missing body, malformed JSON, or the quote
///   already exists for that author
/// - **422 Unprocessable Entity**: Blank content or author name
pub fn create_quote(body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let input: QuoteInput = parse_body(&body)?;
    let quote = state.store.create_quote(input)?;
    let author = state.store.read_author(quote.author_id)?;
    build_json(201, &QuoteView::new(quote, author))
}

/// Returns a single quote.
///
/// # Endpoint
/// `GET /quotes/{id}`
pub fn read_quote(id: u64, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let quote = state.store.read_quote(id)?;
    let author = state.store.read_author(quote.author_id)?;
    build_json(200, &QuoteView::new(quote, author))
}

/// Fully updates a quote.
///
/// # Endpoint
/// `PUT /quotes/{id}`
///
/// The payload must name the quote's current author; authors are
/// managed through the authors endpoints.
///
/// # Errors
/// - **400 Bad Request**: Attempted to create or edit an author via
///   the quote payload
/// - **404 Not Found**: Unknown quote
pub fn update_quote(id: u64, body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let input: QuoteInput = parse_body(&body)?;
    let quote = state.store.update_quote(id, input)?;
    let author = state.store.read_author(quote.author_id)?;
    build_json(200, &QuoteView::new(quote, author))
}

/// Partially updates a quote.
///
/// # Endpoint
/// `PATCH /quotes/{id}`
///
/// Only fields present in the payload are changed.
pub fn patch_quote(id: u64, body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let patch: QuotePatch = parse_body(&body)?;
    let quote = state.store.patch_quote(id, patch)?;
    let author = state.store.read_author(quote.author_id)?;
    build_json(200, &QuoteView::new(quote, author))
}

/// Deletes a quote.
///
/// # Endpoint
/// `DELETE /quotes/{id}`
///
/// # Response
/// - **204 No Content**
pub fn delete_quote(id: u64, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    state.store.delete_quote(id)?;
    build_empty_response(204)
}
