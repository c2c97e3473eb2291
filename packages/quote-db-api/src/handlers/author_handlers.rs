//! Author collection and instance handlers.

use hyper::{body::Bytes, Response};

use crate::router::{AppState, RouterError};
use quote_db_core::model::{AuthorInput, AuthorPatch, ImpliedAuthorQuoteInput};

use super::request_utils::{
    build_empty_response, build_json, page_envelope, parse_body, parse_page_params,
};
use super::views::{AuthorView, MiniAuthorView, MiniQuoteView, QuoteView};

/// Lists authors with pagination.
///
/// # Endpoint
/// `GET /authors`
///
/// # Query Parameters
/// - `limit`: Maximum number of authors to return (capped at 50)
/// - `offset`: Number of authors to skip
///
/// # Response
/// - **200 OK**: Paginated envelope with `items`, `next_page`,
///   `limit`, `offset`, and `total`; items are slim entries of
///   `id`, `name`, and `url`
///
/// # Errors
/// - **404 Not Found**: No data on the requested page
///
/// # Example
/// ```bash
/// curl "http://localhost:8080/authors?limit=10&offset=10"
/// ```
pub fn list_authors(
    query: Option<&str>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let params = parse_page_params(query, &state.config)?;
    let page = state
        .store
        .list_authors(params.limit, params.offset)?
        .map(MiniAuthorView::from);
    build_json(200, &page_envelope("/authors", page, &params))
}

/// Creates a new author.
///
/// # Endpoint
/// `POST /authors`
///
/// # Request Body
/// ```json
/// {
///   "name": "Ada Lovelace",
///   "date_of_birth": "1815-12-10"
/// }
/// ```
///
/// # Response
/// - **201 Created**: Returns the new author entry
///
/// # Errors
/// - **400 Bad Request**: Missing body, malformed JSON, or the author
///   already exists
/// - **422 Unprocessable Entity**: Blank name
pub fn create_author(body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let input: AuthorInput = parse_body(&body)?;
    let author = state.store.create_author(input)?;
    build_json(201, &AuthorView::from(author))
}

/// Returns a single author.
///
/// # Endpoint
/// `GET /authors/{id}`
pub fn read_author(id: u64, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let author = state.store.read_author(id)?;
    build_json(200, &AuthorView::from(author))
}

/// Fully updates an author.
///
/// # Endpoint
/// `PUT /authors/{id}`
///
/// The name is required; optional fields absent from the payload
/// keep their stored values.
pub fn update_author(
    id: u64,
    body: Bytes,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input: AuthorInput = parse_body(&body)?;
    let author = state.store.update_author(id, input)?;
    build_json(200, &AuthorView::from(author))
}

/// Partially updates an author.
///
/// # Endpoint
/// `PATCH /authors/{id}`
///
/// Only fields present in the payload are changed.
pub fn patch_author(id: u64, body: Bytes, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    let patch: AuthorPatch = parse_body(&body)?;
    let author = state.store.patch_author(id, patch)?;
    build_json(200, &AuthorView::from(author))
}

/// Deletes an author and every quote attributed to them.
///
/// # Endpoint
/// `DELETE /authors/{id}`
///
/// # Response
/// - **204 No Content**
pub fn delete_author(id: u64, state: &AppState) -> Result<Response<Bytes>, RouterError> {
    state.store.delete_author(id)?;
    build_empty_response(204)
}

/// Lists one author's quotes with pagination.
///
/// # Endpoint
/// `GET /authors/{id}/quotes`
///
/// # Errors
/// - **404 Not Found**: Unknown author, or no data on the requested
///   page
pub fn list_author_quotes(
    id: u64,
    query: Option<&str>,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let params = parse_page_params(query, &state.config)?;
    let page = state
        .store
        .list_author_quotes(id, params.limit, params.offset)?
        .map(MiniQuoteView::from);
    let base_path = format!("/authors/{}/quotes", id);
    build_json(200, &page_envelope(&base_path, page, &params))
}

/// Creates a quote attributed to the author in the path.
///
/// # Endpoint
/// `POST /authors/{id}/quotes`
///
/// # Request Body
/// ```json
/// {
///   "content": "That brain of mine is something more than merely mortal.",
///   "context": "In a letter"
/// }
/// ```
///
/// # Response
/// - **201 Created**: Returns the new quote entry
///
/// # Errors
/// - **400 Bad Request**: Missing body, or the quote already exists
///   for this author
/// - **404 Not Found**: Unknown author
/// - **422 Unprocessable Entity**: Blank content
pub fn create_author_quote(
    id: u64,
    body: Bytes,
    state: &AppState,
) -> Result<Response<Bytes>, RouterError> {
    let input: ImpliedAuthorQuoteInput = parse_body(&body)?;
    let quote = state.store.create_author_quote(id, input)?;
    let author = state.store.read_author(quote.author_id)?;
    build_json(201, &QuoteView::new(quote, author))
}
