//! JSON snapshot persistence for the store.
//!
//! One `snapshot.json` per data directory, written via a temporary
//! file and an atomic rename.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::model::{Author, Quote};
use crate::store::Store;

const SNAPSHOT_FILE: &str = "snapshot.json";

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    authors: Vec<Author>,
    quotes: Vec<Quote>,
    next_author_id: u64,
    next_quote_id: u64,
}

/// Writes the store's current contents to `dir`.
pub fn save(store: &Store, dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir)
        .map_err(|e| StoreError::Snapshot(format!("Failed to create {}: {}", dir.display(), e)))?;

    let (authors, quotes, next_author_id, next_quote_id) = store.export();
    let snapshot = SnapshotFile {
        authors,
        quotes,
        next_author_id,
        next_quote_id,
    };
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| StoreError::Snapshot(format!("Failed to serialize snapshot: {}", e)))?;

    let temp_path = dir.join("snapshot.json.tmp");
    let final_path = dir.join(SNAPSHOT_FILE);
    fs::write(&temp_path, json)
        .map_err(|e| StoreError::Snapshot(format!("Failed to write snapshot: {}", e)))?;
    fs::rename(&temp_path, &final_path)
        .map_err(|e| StoreError::Snapshot(format!("Failed to finalize snapshot: {}", e)))?;

    info!(
        path = %final_path.display(),
        authors = snapshot.authors.len(),
        quotes = snapshot.quotes.len(),
        "saved snapshot"
    );
    Ok(())
}

/// Loads a snapshot from `dir` into the store, replacing its contents.
///
/// A missing snapshot file is not an error and leaves the store
/// untouched; returns whether a snapshot was loaded.
pub fn load(store: &Store, dir: &Path) -> Result<bool, StoreError> {
    let path = dir.join(SNAPSHOT_FILE);
    if !path.exists() {
        return Ok(false);
    }
    let raw = fs::read_to_string(&path)
        .map_err(|e| StoreError::Snapshot(format!("Failed to read {}: {}", path.display(), e)))?;
    let snapshot: SnapshotFile = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Snapshot(format!("Corrupt snapshot {}: {}", path.display(), e)))?;

    info!(
        path = %path.display(),
        authors = snapshot.authors.len(),
        quotes = snapshot.quotes.len(),
        "loaded snapshot"
    );
    store.import(
        snapshot.authors,
        snapshot.quotes,
        snapshot.next_author_id,
        snapshot.next_quote_id,
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuthorRef, QuoteInput};

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
    fn round_trip_preserves_records_and_counters() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new();
        let quote = store.create_quote(quote_input("Ada", "Hello")).unwrap();
        store.create_quote(quote_input("Grace", "World")).unwrap();
        store.delete_quote(quote.id).unwrap();
        save(&store, dir.path()).unwrap();

        let restored = Store::new();
        assert!(load(&restored, dir.path()).unwrap());
        assert_eq!(restored.count_authors(), 2);
        assert_eq!(restored.count_quotes(), 1);
        // Counters survive, so deleted ids are not reused after a restart
        let next = restored.create_quote(quote_input("Ada", "Again")).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn missing_snapshot_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new();
        assert!(!load(&store, dir.path()).unwrap());
        assert_eq!(store.count_authors(), 0);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_FILE), "not json").unwrap();
        let store = Store::new();
        let err = load(&store, dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Snapshot(_)));
    }
}
