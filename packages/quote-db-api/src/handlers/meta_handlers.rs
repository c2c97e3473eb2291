//! Service metadata handlers: API layout, health probes, docs, and
//! the OpenAPI document.

use hyper::{body::Bytes, Response};
use serde_json::json;

use crate::router::{AppState, RouterError};

use super::request_utils::{build_empty_response, build_json, build_response};

/// Returns the layout of the API.
///
/// # Endpoint
/// `GET /`
pub fn root() -> Result<Response<Bytes>, RouterError> {
    build_json(
        200,
        &json!({
            "authors": "/authors{/id}",
            "quotes": "/quotes{/id}",
        }),
    )
}

/// Liveness probe.
///
/// # Endpoint
/// `GET /-/alive`
///
/// # Response
/// - **204 No Content**: The process is up
pub fn alive() -> Result<Response<Bytes>, RouterError> {
    build_empty_response(204)
}

/// Health probe.
///
/// # Endpoint
/// `GET /-/healthy`
///
/// # Response
/// - **204 No Content**: The store is reachable
pub fn healthy(state: &AppState) -> Result<Response<Bytes>, RouterError> {
    // A read through the lock is the whole health check for an
    // in-memory store.
    let _ = state.store.count_authors();
    build_empty_response(204)
}

/// Renders the API documentation page.
///
/// # Endpoint
/// `GET /docs`
///
/// Serves a Redoc shell pointed at [`spec`].
pub fn docs() -> Result<Response<Bytes>, RouterError> {
    let html = "<!DOCTYPE html>\n\
        <html>\n\
        <head>\n\
        <title>quote-db API docs</title>\n\
        <meta charset=\"utf-8\"/>\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
        <style>body { margin: 0; padding: 0; }</style>\n\
        </head>\n\
        <body>\n\
        <redoc spec-url=\"/spec\"></redoc>\n\
        <script src=\"https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js\"></script>\n\
        </body>\n\
        </html>\n";
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Bytes::from(html))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Returns the OpenAPI 3.0 document for the API.
///
/// # Endpoint
/// `GET /spec`
pub fn spec() -> Result<Response<Bytes>, RouterError> {
    let doc = openapi_document();
    let json = serde_json::to_vec(&doc)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize spec: {}", e)))?;
    build_response(200, json)
}

fn page_parameters() -> serde_json::Value {
    json!([
        {
            "in": "query",
            "name": "limit",
            "schema": {"type": "integer"},
            "description": "The maximum number of items to return (capped at 50)."
        },
        {
            "in": "query",
            "name": "offset",
            "schema": {"type": "integer"},
            "description": "The number of items to skip before collecting the result set."
        }
    ])
}

fn id_parameter(description: &str) -> serde_json::Value {
    json!([
        {
            "in": "path",
            "name": "id",
            "required": true,
            "schema": {"type": "integer"},
            "description": description
        }
    ])
}

/// Assembles the OpenAPI document describing the route table.
fn openapi_document() -> serde_json::Value {
    json!({
        "openapi": "3.0.2",
        "info": {
            "title": "quote-db",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Demonstration REST API for authors and quotes."
        },
        "paths": {
            "/authors": {
                "get": {
                    "summary": "List authors",
                    "parameters": page_parameters(),
                    "responses": {
                        "200": {"description": "The list of authors was retrieved."},
                        "404": {"description": "There is no content on the specified page."}
                    }
                },
                "post": {
                    "summary": "Create an author",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/AuthorInput"}}}
                    },
                    "responses": {
                        "201": {"description": "The author was created."},
                        "400": {"description": "That author already exists."},
                        "422": {"description": "Schema validation error."}
                    }
                }
            },
            "/authors/{id}": {
                "get": {
                    "summary": "Get an author",
                    "parameters": id_parameter("The id of the author."),
                    "responses": {
                        "200": {"description": "The author was found."},
                        "404": {"description": "An author with that id wasn't found."}
                    }
                },
                "put": {
                    "summary": "Update an author",
                    "parameters": id_parameter("The id of the author."),
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/AuthorInput"}}}
                    },
                    "responses": {
                        "200": {"description": "The author was updated."},
                        "404": {"description": "An author with that id wasn't found."},
                        "422": {"description": "Schema validation error."}
                    }
                },
                "patch": {
                    "summary": "Partially update an author",
                    "parameters": id_parameter("The id of the author."),
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/AuthorInput"}}}
                    },
                    "responses": {
                        "200": {"description": "The author was updated."},
                        "404": {"description": "An author with that id wasn't found."},
                        "422": {"description": "Schema validation error."}
                    }
                },
                "delete": {
                    "summary": "Delete an author",
                    "parameters": id_parameter("The id of the author."),
                    "responses": {
                        "204": {"description": "The author has been deleted."},
                        "404": {"description": "An author with that id wasn't found."}
                    }
                }
            },
            "/authors/{id}/quotes": {
                "get": {
                    "summary": "List an author's quotes",
                    "parameters": page_parameters(),
                    "responses": {
                        "200": {"description": "The quote list was retrieved."},
                        "404": {"description": "Unknown author, or no data on the specified page."}
                    }
                },
                "post": {
                    "summary": "Create a quote by this author",
                    "parameters": id_parameter("The id of the author."),
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ImpliedAuthorQuoteInput"}}}
                    },
                    "responses": {
                        "201": {"description": "The quote was created."},
                        "404": {"description": "An author with that id wasn't found."},
                        "422": {"description": "Schema validation error."}
                    }
                }
            },
            "/quotes": {
                "get": {
                    "summary": "List quotes",
                    "parameters": page_parameters(),
                    "responses": {
                        "200": {"description": "The quote listing was retrieved."},
                        "404": {"description": "There is no content on the specified page."}
                    }
                },
                "post": {
                    "summary": "Create a quote",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/QuoteInput"}}}
                    },
                    "responses": {
                        "201": {"description": "The quote was created."},
                        "400": {"description": "That quote already exists."},
                        "422": {"description": "Schema validation error."}
                    }
                }
            },
            "/quotes/{id}": {
                "get": {
                    "summary": "Get a quote",
                    "parameters": id_parameter("The id of the quote."),
                    "responses": {
                        "200": {"description": "The quote was retrieved."},
                        "404": {"description": "A quote with that id wasn't found."}
                    }
                },
                "put": {
                    "summary": "Update a quote",
                    "parameters": id_parameter("The id of the quote."),
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/QuoteInput"}}}
                    },
                    "responses": {
                        "200": {"description": "The quote was updated."},
                        "400": {"description": "Authors cannot be edited through a quote update."},
                        "404": {"description": "A quote with that id wasn't found."},
                        "422": {"description": "Schema validation error."}
                    }
                },
                "patch": {
                    "summary": "Partially update a quote",
                    "parameters": id_parameter("The id of the quote."),
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/QuoteInput"}}}
                    },
                    "responses": {
                        "200": {"description": "The quote was updated."},
                        "404": {"description": "A quote with that id wasn't found."},
                        "422": {"description": "Schema validation error."}
                    }
                },
                "delete": {
                    "summary": "Delete a quote",
                    "parameters": id_parameter("The id of the quote."),
                    "responses": {
                        "204": {"description": "The quote is deleted."},
                        "404": {"description": "A quote with that id wasn't found."}
                    }
                }
            },
            "/-/alive": {
                "get": {
                    "summary": "Liveness check",
                    "responses": {"204": {"description": "The application is alive."}}
                }
            },
            "/-/healthy": {
                "get": {
                    "summary": "Health check",
                    "responses": {"204": {"description": "The application is healthy."}}
                }
            }
        },
        "components": {
            "schemas": {
                "Author": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "readOnly": true},
                        "name": {"type": "string"},
                        "url": {"type": "string", "readOnly": true},
                        "quotes": {"type": "string", "readOnly": true},
                        "date_of_birth": {"type": "string", "format": "date"},
                        "date_of_death": {"type": "string", "format": "date"},
                        "posted_at": {"type": "string", "format": "date-time", "readOnly": true},
                        "updated_at": {"type": "string", "format": "date-time", "readOnly": true}
                    },
                    "required": ["id", "name", "url", "quotes", "posted_at"]
                },
                "MiniAuthor": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "readOnly": true},
                        "name": {"type": "string"},
                        "url": {"type": "string", "readOnly": true}
                    },
                    "required": ["id", "name", "url"]
                },
                "Quote": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "readOnly": true},
                        "author": {"$ref": "#/components/schemas/MiniAuthor"},
                        "content": {"type": "string"},
                        "context": {"type": "string"},
                        "url": {"type": "string", "readOnly": true},
                        "posted_at": {"type": "string", "format": "date-time", "readOnly": true},
                        "updated_at": {"type": "string", "format": "date-time", "readOnly": true}
                    },
                    "required": ["id", "author", "content", "url", "posted_at"]
                },
                "MiniQuote": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "readOnly": true},
                        "content": {"type": "string"},
                        "url": {"type": "string", "readOnly": true}
                    },
                    "required": ["id", "content", "url"]
                },
                "AuthorInput": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "date_of_birth": {"type": "string", "format": "date"},
                        "date_of_death": {"type": "string", "format": "date"}
                    },
                    "required": ["name"]
                },
                "QuoteInput": {
                    "type": "object",
                    "properties": {
                        "author": {"$ref": "#/components/schemas/AuthorInput"},
                        "content": {"type": "string"},
                        "context": {"type": "string"}
                    },
                    "required": ["author", "content"]
                },
                "ImpliedAuthorQuoteInput": {
                    "type": "object",
                    "properties": {
                        "content": {"type": "string"},
                        "context": {"type": "string"}
                    },
                    "required": ["content"]
                }
            }
        }
    })
}
