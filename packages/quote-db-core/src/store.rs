//! In-memory CRUD store for authors and quotes.

use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::model::{
    Author, AuthorInput, AuthorPatch, AuthorRef, ImpliedAuthorQuoteInput, Quote, QuoteInput,
    QuotePatch,
};

/// One page of a listing, along with the collection total.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Records on this page, in ascending id order
    pub items: Vec<T>,
    /// Total number of records in the collection
    pub total: usize,
}

impl<T> Page<T> {
    /// Maps the page items into another representation, keeping the
    /// collection total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Shared in-memory store.
///
/// Interior mutability via `RwLock`; share as `Arc<Store>`.
pub struct Store {
    inner: RwLock<Inner>,
}

struct Inner {
    authors: BTreeMap<u64, Author>,
    quotes: BTreeMap<u64, Quote>,
    next_author_id: u64,
    next_quote_id: u64,
}

impl Inner {
    fn author_by_name(&self, name: &str) -> Option<&Author> {
        self.authors.values().find(|a| a.name == name)
    }

    fn quote_exists(&self, author_id: u64, content: &str) -> bool {
        self.quotes
            .values()
            .any(|q| q.author_id == author_id && q.content == content)
    }

    fn insert_author(&mut self, author_ref: &AuthorRef) -> Author {
        let id = self.next_author_id;
        self.next_author_id += 1;
        let author = Author {
            id,
            name: author_ref.name.clone(),
            date_of_birth: author_ref.date_of_birth,
            date_of_death: author_ref.date_of_death,
            posted_at: Utc::now(),
            updated_at: None,
        };
        self.authors.insert(id, author.clone());
        author
    }
}

fn validate_non_blank(field: &'static str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation {
            field,
            message: "Data not provided.".to_string(),
        });
    }
    Ok(())
}

fn page_of<T>(items: Vec<T>, offset: usize, total: usize) -> Result<Page<T>, StoreError> {
    if total <= offset {
        return Err(StoreError::PageOutOfRange { offset, total });
    }
    Ok(Page { items, total })
}

impl Store {
    /// Creates an empty store. IDs start at 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                authors: BTreeMap::new(),
                quotes: BTreeMap::new(),
                next_author_id: 1,
                next_quote_id: 1,
            }),
        }
    }

    // --- Authors ---

    /// Creates a new author. The name must be non-blank and unique.
    pub fn create_author(&self, input: AuthorInput) -> Result<Author, StoreError> {
        validate_non_blank("name", &input.name)?;
        let mut inner = self.inner.write();
        if inner.author_by_name(&input.name).is_some() {
            return Err(StoreError::AuthorAlreadyExists { name: input.name });
        }
        let author = inner.insert_author(&AuthorRef {
            name: input.name,
            date_of_birth: input.date_of_birth,
            date_of_death: input.date_of_death,
        });
        debug!(id = author.id, "created author");
        Ok(author)
    }

    pub fn read_author(&self, id: u64) -> Result<Author, StoreError> {
        self.inner
            .read()
            .authors
            .get(&id)
            .cloned()
            .ok_or(StoreError::AuthorNotFound { id })
    }

    pub fn count_authors(&self) -> usize {
        self.inner.read().authors.len()
    }

    /// Lists authors in ascending id order.
    ///
    /// An offset at or past the end of the collection is an error,
    /// including offset 0 on an empty collection.
    pub fn list_authors(&self, limit: usize, offset: usize) -> Result<Page<Author>, StoreError> {
        let inner = self.inner.read();
        let total = inner.authors.len();
        let items = inner
            .authors
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        page_of(items, offset, total)
    }

    /// Updates an author from a full payload and stamps `updated_at`.
    ///
    /// Optional fields absent from the payload keep their stored
    /// values.
    pub fn update_author(&self, id: u64, input: AuthorInput) -> Result<Author, StoreError> {
        validate_non_blank("name", &input.name)?;
        let mut inner = self.inner.write();
        if let Some(other) = inner.author_by_name(&input.name) {
            if other.id != id {
                return Err(StoreError::AuthorAlreadyExists { name: input.name });
            }
        }
        let author = inner
            .authors
            .get_mut(&id)
            .ok_or(StoreError::AuthorNotFound { id })?;
        author.name = input.name;
        if let Some(dob) = input.date_of_birth {
            author.date_of_birth = Some(dob);
        }
        if let Some(dod) = input.date_of_death {
            author.date_of_death = Some(dod);
        }
        author.updated_at = Some(Utc::now());
        Ok(author.clone())
    }

    /// Applies the present fields of a patch and stamps `updated_at`.
    pub fn patch_author(&self, id: u64, patch: AuthorPatch) -> Result<Author, StoreError> {
        if let Some(name) = &patch.name {
            validate_non_blank("name", name)?;
        }
        let mut inner = self.inner.write();
        if let Some(name) = &patch.name {
            if let Some(other) = inner.author_by_name(name) {
                if other.id != id {
                    return Err(StoreError::AuthorAlreadyExists { name: name.clone() });
                }
            }
        }
        let author = inner
            .authors
            .get_mut(&id)
            .ok_or(StoreError::AuthorNotFound { id })?;
        if let Some(name) = patch.name {
            author.name = name;
        }
        if let Some(dob) = patch.date_of_birth {
            author.date_of_birth = Some(dob);
        }
        if let Some(dod) = patch.date_of_death {
            author.date_of_death = Some(dod);
        }
        author.updated_at = Some(Utc::now());
        Ok(author.clone())
    }

    /// Deletes an author and every quote attributed to them.
    pub fn delete_author(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.authors.remove(&id).is_none() {
            return Err(StoreError::AuthorNotFound { id });
        }
        let before = inner.quotes.len();
        inner.quotes.retain(|_, q| q.author_id != id);
        debug!(
            id,
            cascaded = before - inner.quotes.len(),
            "deleted author"
        );
        Ok(())
    }

    // --- Quotes ---

    /// Creates a quote, creating its author on the fly when the named
    /// author does not exist yet.
    pub fn create_quote(&self, input: QuoteInput) -> Result<Quote, StoreError> {
        validate_non_blank("content", &input.content)?;
        validate_non_blank("name", &input.author.name)?;
        let mut inner = self.inner.write();
        let author_id = match inner.author_by_name(&input.author.name) {
            Some(author) => {
                let (author_id, author_name) = (author.id, author.name.clone());
                if inner.quote_exists(author_id, &input.content) {
                    return Err(StoreError::QuoteAlreadyExists {
                        author: author_name,
                    });
                }
                author_id
            }
            None => inner.insert_author(&input.author).id,
        };
        let id = inner.next_quote_id;
        inner.next_quote_id += 1;
        let quote = Quote {
            id,
            author_id,
            content: input.content,
            context: input.context,
            posted_at: Utc::now(),
            updated_at: None,
        };
        inner.quotes.insert(id, quote.clone());
        debug!(id, author_id, "created quote");
        Ok(quote)
    }

    pub fn read_quote(&self, id: u64) -> Result<Quote, StoreError> {
        self.inner
            .read()
            .quotes
            .get(&id)
            .cloned()
            .ok_or(StoreError::QuoteNotFound { id })
    }

    pub fn count_quotes(&self) -> usize {
        self.inner.read().quotes.len()
    }

    /// Lists quotes in ascending id order. Same offset rules as
    /// [`Store::list_authors`].
    pub fn list_quotes(&self, limit: usize, offset: usize) -> Result<Page<Quote>, StoreError> {
        let inner = self.inner.read();
        let total = inner.quotes.len();
        let items = inner
            .quotes
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        page_of(items, offset, total)
    }

    /// Updates a quote's content and context from a full payload.
    ///
    /// The payload must name the quote's current author; changing
    /// authorship through a quote update is rejected. An absent
    /// `context` keeps the stored value.
    pub fn update_quote(&self, id: u64, input: QuoteInput) -> Result<Quote, StoreError> {
        validate_non_blank("content", &input.content)?;
        let mut inner = self.inner.write();
        let author_id = inner
            .quotes
            .get(&id)
            .ok_or(StoreError::QuoteNotFound { id })?
            .author_id;
        let current_name = inner
            .authors
            .get(&author_id)
            .map(|a| a.name.clone())
            .unwrap_or_default();
        if input.author.name != current_name {
            return Err(StoreError::AuthorEditViaQuote);
        }
        let quote = inner
            .quotes
            .get_mut(&id)
            .ok_or(StoreError::QuoteNotFound { id })?;
        quote.content = input.content;
        if let Some(context) = input.context {
            quote.context = Some(context);
        }
        quote.updated_at = Some(Utc::now());
        Ok(quote.clone())
    }

    /// Applies the present fields of a patch. An `author` entry must
    /// name the current author.
    pub fn patch_quote(&self, id: u64, patch: QuotePatch) -> Result<Quote, StoreError> {
        if let Some(content) = &patch.content {
            validate_non_blank("content", content)?;
        }
        let mut inner = self.inner.write();
        let author_id = inner
            .quotes
            .get(&id)
            .ok_or(StoreError::QuoteNotFound { id })?
            .author_id;
        if let Some(author_ref) = &patch.author {
            let current_name = inner
                .authors
                .get(&author_id)
                .map(|a| a.name.clone())
                .unwrap_or_default();
            if author_ref.name != current_name {
                return Err(StoreError::AuthorEditViaQuote);
            }
        }
        let quote = inner
            .quotes
            .get_mut(&id)
            .ok_or(StoreError::QuoteNotFound { id })?;
        if let Some(content) = patch.content {
            quote.content = content;
        }
        if let Some(context) = patch.context {
            quote.context = Some(context);
        }
        quote.updated_at = Some(Utc::now());
        Ok(quote.clone())
    }

    pub fn delete_quote(&self, id: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner
            .quotes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::QuoteNotFound { id })
    }

    // --- Quotes scoped to an author ---

    /// Creates a quote whose author is given by id rather than by name.
    pub fn create_author_quote(
        &self,
        author_id: u64,
        input: ImpliedAuthorQuoteInput,
    ) -> Result<Quote, StoreError> {
        validate_non_blank("content", &input.content)?;
        let mut inner = self.inner.write();
        let author_name = inner
            .authors
            .get(&author_id)
            .map(|a| a.name.clone())
            .ok_or(StoreError::AuthorNotFound { id: author_id })?;
        if inner.quote_exists(author_id, &input.content) {
            return Err(StoreError::QuoteAlreadyExists {
                author: author_name,
            });
        }
        let id = inner.next_quote_id;
        inner.next_quote_id += 1;
        let quote = Quote {
            id,
            author_id,
            content: input.content,
            context: input.context,
            posted_at: Utc::now(),
            updated_at: None,
        };
        inner.quotes.insert(id, quote.clone());
        Ok(quote)
    }

    pub fn count_author_quotes(&self, author_id: u64) -> Result<usize, StoreError> {
        let inner = self.inner.read();
        if !inner.authors.contains_key(&author_id) {
            return Err(StoreError::AuthorNotFound { id: author_id });
        }
        Ok(inner
            .quotes
            .values()
            .filter(|q| q.author_id == author_id)
            .count())
    }

    /// Lists one author's quotes in ascending id order.
    pub fn list_author_quotes(
        &self,
        author_id: u64,
        limit: usize,
        offset: usize,
    ) -> Result<Page<Quote>, StoreError> {
        let inner = self.inner.read();
        if !inner.authors.contains_key(&author_id) {
            return Err(StoreError::AuthorNotFound { id: author_id });
        }
        let total = inner
            .quotes
            .values()
            .filter(|q| q.author_id == author_id)
            .count();
        let items = inner
            .quotes
            .values()
            .filter(|q| q.author_id == author_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        page_of(items, offset, total)
    }

    // --- Snapshot support ---

    pub(crate) fn export(&self) -> (Vec<Author>, Vec<Quote>, u64, u64) {
        let inner = self.inner.read();
        (
            inner.authors.values().cloned().collect(),
            inner.quotes.values().cloned().collect(),
            inner.next_author_id,
            inner.next_quote_id,
        )
    }

    pub(crate) fn import(
        &self,
        authors: Vec<Author>,
        quotes: Vec<Quote>,
        next_author_id: u64,
        next_quote_id: u64,
    ) {
        let mut inner = self.inner.write();
        inner.authors = authors.into_iter().map(|a| (a.id, a)).collect();
        inner.quotes = quotes.into_iter().map(|q| (q.id, q)).collect();
        inner.next_author_id = next_author_id;
        inner.next_quote_id = next_quote_id;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author_input(name: &str) -> AuthorInput {
        AuthorInput {
            name: name.to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    fn quote_input(author: &str, content: &str) -> QuoteInput {
        QuoteInput {
            author: AuthorRef {
                name: author.to_string(),
                date_of_birth: None,
                date_of_death: None,
            },
            content: content.to_string(),
            context: None,
        }
    }

    #[test]
    fn create_and_read_author() {
        let store = Store::new();
        let created = store.create_author(author_input("Ada Lovelace")).unwrap();
        assert_eq!(created.id, 1);
        assert!(created.updated_at.is_none());
        let read = store.read_author(created.id).unwrap();
        assert_eq!(created, read);
    }

    #[test]
    fn duplicate_author_name_rejected() {
        let store = Store::new();
        store.create_author(author_input("Ada")).unwrap();
        let err = store.create_author(author_input("Ada")).unwrap_err();
        assert!(matches!(err, StoreError::AuthorAlreadyExists { .. }));
    }

    #[test]
    fn blank_author_name_rejected() {
        let store = Store::new();
        let err = store.create_author(author_input("   ")).unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "name", .. }));
    }

    #[test]
    fn update_author_stamps_updated_at() {
        let store = Store::new();
        let author = store.create_author(author_input("Ada")).unwrap();
        let updated = store
            .update_author(author.id, author_input("Ada Lovelace"))
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_author_keeps_absent_optional_fields() {
        let store = Store::new();
        let dob = chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
        let author = store
            .create_author(AuthorInput {
                name: "Ada".to_string(),
                date_of_birth: Some(dob),
                date_of_death: None,
            })
            .unwrap();
        // A name-only payload, as deserialized from {"name": "Ada Lovelace"}
        let updated = store
            .update_author(author.id, author_input("Ada Lovelace"))
            .unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.date_of_birth, Some(dob));
    }

    #[test]
    fn update_author_to_taken_name_rejected() {
        let store = Store::new();
        store.create_author(author_input("Ada")).unwrap();
        let other = store.create_author(author_input("Grace")).unwrap();
        let err = store
            .update_author(other.id, author_input("Ada"))
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthorAlreadyExists { .. }));
    }

    #[test]
    fn patch_author_keeps_absent_fields() {
        let store = Store::new();
        let dob = chrono::NaiveDate::from_ymd_opt(1815, 12, 10).unwrap();
        let author = store
            .create_author(AuthorInput {
                name: "Ada".to_string(),
                date_of_birth: Some(dob),
                date_of_death: None,
            })
            .unwrap();
        let patched = store
            .patch_author(
                author.id,
                AuthorPatch {
                    name: Some("Ada Lovelace".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(patched.name, "Ada Lovelace");
        assert_eq!(patched.date_of_birth, Some(dob));
    }

    #[test]
    fn delete_author_cascades_to_quotes() {
        let store = Store::new();
        let quote = store.create_quote(quote_input("Ada", "First quote")).unwrap();
        store.create_quote(quote_input("Grace", "Other quote")).unwrap();
        store.delete_author(quote.author_id).unwrap();
        assert!(matches!(
            store.read_quote(quote.id),
            Err(StoreError::QuoteNotFound { .. })
        ));
        assert_eq!(store.count_quotes(), 1);
    }

    #[test]
    fn create_quote_auto_creates_author() {
        let store = Store::new();
        assert_eq!(store.count_authors(), 0);
        let quote = store.create_quote(quote_input("Ada", "Hello")).unwrap();
        assert_eq!(store.count_authors(), 1);
        let author = store.read_author(quote.author_id).unwrap();
        assert_eq!(author.name, "Ada");
    }

    #[test]
    fn duplicate_quote_per_author_rejected() {
        let store = Store::new();
        store.create_quote(quote_input("Ada", "Hello")).unwrap();
        let err = store.create_quote(quote_input("Ada", "Hello")).unwrap_err();
        assert!(matches!(err, StoreError::QuoteAlreadyExists { .. }));
        // Same content under a different author is fine
        store.create_quote(quote_input("Grace", "Hello")).unwrap();
    }

    #[test]
    fn quote_update_cannot_change_author() {
        let store = Store::new();
        let quote = store.create_quote(quote_input("Ada", "Hello")).unwrap();
        let err = store
            .update_quote(quote.id, quote_input("Grace", "Hello again"))
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthorEditViaQuote));
        // Naming the current author is allowed
        let updated = store
            .update_quote(quote.id, quote_input("Ada", "Hello again"))
            .unwrap();
        assert_eq!(updated.content, "Hello again");
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_quote_keeps_absent_context() {
        let store = Store::new();
        let quote = store
            .create_quote(QuoteInput {
                context: Some("In a letter".to_string()),
                ..quote_input("Ada", "Hello")
            })
            .unwrap();
        let updated = store
            .update_quote(quote.id, quote_input("Ada", "Hello again"))
            .unwrap();
        assert_eq!(updated.content, "Hello again");
        assert_eq!(updated.context.as_deref(), Some("In a letter"));
    }

    #[test]
    fn patch_quote_partial_update() {
        let store = Store::new();
        let quote = store.create_quote(quote_input("Ada", "Hello")).unwrap();
        let patched = store
            .patch_quote(
                quote.id,
                QuotePatch {
                    context: Some("In a letter".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(patched.content, "Hello");
        assert_eq!(patched.context.as_deref(), Some("In a letter"));
    }

    #[test]
    fn implied_author_quote_requires_existing_author() {
        let store = Store::new();
        let input = ImpliedAuthorQuoteInput {
            content: "Hello".to_string(),
            context: None,
        };
        let err = store.create_author_quote(42, input.clone()).unwrap_err();
        assert!(matches!(err, StoreError::AuthorNotFound { id: 42 }));
        let author = store.create_author(author_input("Ada")).unwrap();
        let quote = store.create_author_quote(author.id, input).unwrap();
        assert_eq!(quote.author_id, author.id);
    }

    #[test]
    fn listing_empty_collection_is_out_of_range() {
        let store = Store::new();
        let err = store.list_authors(50, 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::PageOutOfRange {
                offset: 0,
                total: 0
            }
        ));
    }

    #[test]
    fn listing_pages_in_id_order() {
        let store = Store::new();
        for i in 0..5 {
            store.create_author(author_input(&format!("Author {i}"))).unwrap();
        }
        let page = store.list_authors(2, 2).unwrap();
        assert_eq!(page.total, 5);
        let ids: Vec<u64> = page.items.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(store.list_authors(2, 5).is_err());
    }

    #[test]
    fn author_quote_listing_scoped_and_ordered() {
        let store = Store::new();
        let ada = store.create_quote(quote_input("Ada", "One")).unwrap();
        store.create_quote(quote_input("Grace", "Two")).unwrap();
        store.create_quote(quote_input("Ada", "Three")).unwrap();
        let page = store
            .list_author_quotes(ada.author_id, 50, 0)
            .unwrap();
        assert_eq!(page.total, 2);
        let contents: Vec<&str> = page.items.iter().map(|q| q.content.as_str()).collect();
        assert_eq!(contents, vec!["One", "Three"]);
    }

    #[test]
    fn ids_not_reused_after_delete() {
        let store = Store::new();
        let a = store.create_author(author_input("Ada")).unwrap();
        store.delete_author(a.id).unwrap();
        let b = store.create_author(author_input("Grace")).unwrap();
        assert!(b.id > a.id);
    }
}
