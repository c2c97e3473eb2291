//! Response representations.
//!
//! Storage records carry raw ids; the representations served to
//! clients add relative hypermedia links and embed a slim author
//! entry in each quote. Listings use the slim forms.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use quote_db_core::model::{Author, Quote};

fn author_url(id: u64) -> String {
    format!("/authors/{}", id)
}

fn author_quotes_url(id: u64) -> String {
    format!("/authors/{}/quotes", id)
}

fn quote_url(id: u64) -> String {
    format!("/quotes/{}", id)
}

/// Full author representation.
#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub id: u64,
    pub name: String,
    /// Relative URL of this author
    pub url: String,
    /// Relative URL of this author's quote listing
    pub quotes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,
    pub posted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            url: author_url(author.id),
            quotes: author_quotes_url(author.id),
            id: author.id,
            name: author.name,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            posted_at: author.posted_at,
            updated_at: author.updated_at,
        }
    }
}

/// Slim author form, used in listings and embedded in quotes.
#[derive(Debug, Serialize)]
pub struct MiniAuthorView {
    pub id: u64,
    pub name: String,
    pub url: String,
}

impl From<Author> for MiniAuthorView {
    fn from(author: Author) -> Self {
        Self {
            url: author_url(author.id),
            id: author.id,
            name: author.name,
        }
    }
}

/// Full quote representation with its author embedded.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub id: u64,
    pub author: MiniAuthorView,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Relative URL of this quote
    pub url: String,
    pub posted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuoteView {
    /// Builds the representation; `author` must be the quote's owner.
    pub fn new(quote: Quote, author: Author) -> Self {
        Self {
            url: quote_url(quote.id),
            id: quote.id,
            author: MiniAuthorView::from(author),
            content: quote.content,
            context: quote.context,
            posted_at: quote.posted_at,
            updated_at: quote.updated_at,
        }
    }
}

/// Slim quote form, used in listings.
#[derive(Debug, Serialize)]
pub struct MiniQuoteView {
    pub id: u64,
    pub content: String,
    pub url: String,
}

impl From<Quote> for MiniQuoteView {
    fn from(quote: Quote) -> Self {
        Self {
            url: quote_url(quote.id),
            id: quote.id,
            content: quote.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_author() -> Author {
        Author {
            id: 7,
            name: "Ada".to_string(),
            date_of_birth: None,
            date_of_death: None,
            posted_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn author_links_derive_from_id() {
        let view = AuthorView::from(sample_author());
        assert_eq!(view.url, "/authors/7");
        assert_eq!(view.quotes, "/authors/7/quotes");
    }

    #[test]
    fn quote_view_embeds_mini_author() {
        let quote = Quote {
            id: 3,
            author_id: 7,
            content: "Hello".to_string(),
            context: None,
            posted_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(QuoteView::new(quote, sample_author())).unwrap();
        assert_eq!(value["url"], "/quotes/3");
        assert_eq!(
            value["author"],
            json!({"id": 7, "name": "Ada", "url": "/authors/7"})
        );
        // Absent optional fields stay out of the payload
        assert!(value.get("context").is_none());
    }

    #[test]
    fn mini_quote_is_id_content_url() {
        let quote = Quote {
            id: 3,
            author_id: 7,
            content: "Hello".to_string(),
            context: Some("In a letter".to_string()),
            posted_at: Utc::now(),
            updated_at: None,
        };
        let value = serde_json::to_value(MiniQuoteView::from(quote)).unwrap();
        assert_eq!(
            value,
            json!({"id": 3, "content": "Hello", "url": "/quotes/3"})
        );
    }
}
