//! Domain records and request payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An author entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Assigned on creation, never reused
    pub id: u64,
    /// Unique across the store
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,
    /// Set when the entry is created
    pub posted_at: DateTime<Utc>,
    /// Set on every update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A quote entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Assigned on creation, never reused
    pub id: u64,
    /// Owning author
    pub author_id: u64,
    /// Unique per author
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub posted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload to create or fully update an author.
///
/// Unknown keys are ignored on deserialization. On update, absent
/// optional fields keep their stored values.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Partial author update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Author reference embedded in a quote payload.
///
/// Names the author; when no author with that name exists one is
/// created from these fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorRef {
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Payload to create or fully update a quote. On update, an absent
/// `context` keeps the stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteInput {
    pub author: AuthorRef,
    pub content: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Quote payload with the author implied by the request path.
#[derive(Debug, Clone, Deserialize)]
pub struct ImpliedAuthorQuoteInput {
    pub content: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Partial quote update; absent fields are left unchanged.
///
/// An `author` entry is only accepted when it names the quote's
/// current author.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotePatch {
    #[serde(default)]
    pub author: Option<AuthorRef>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}
