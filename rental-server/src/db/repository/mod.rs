//! Repository Module
//!
//! CRUD operations over the embedded document store, one repository per
//! collection.

// People and accounts
pub mod account;
pub mod customer;

// Inventory
pub mod master_item;
pub mod sub_item;

// Billing
pub mod financial;
pub mod invoice;

// Re-exports
pub use account::AccountRepository;
pub use customer::CustomerRepository;
pub use financial::FinancialRepository;
pub use invoice::InvoiceRepository;
pub use master_item::MasterItemRepository;
pub use sub_item::SubItemRepository;

use surrealdb::{RecordId, Surreal, engine::local::Db};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        // Unique index violations surface as generic database errors;
        // classify them by message so callers can map to a conflict.
        if lower.contains("already contains") || lower.contains("unique") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API boundary
// =============================================================================
//
// Handlers receive ids as strings, with or without the table prefix.
// Repositories normalize them with `to_record_id` before touching the
// store; embedded references are stored in the same "table:id" string
// form the serde helpers produce.

/// Normalize an id string (`"abc"` or `"table:abc"`) into a RecordId
pub fn to_record_id(table: &str, id: &str) -> RecordId {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(tb, key),
        _ => RecordId::from_table_key(table, id),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_prefixed_and_bare_ids() {
        let bare = to_record_id("customer", "abc");
        let prefixed = to_record_id("customer", "customer:abc");
        assert_eq!(bare, prefixed);
        assert_eq!(bare.to_string(), "customer:abc");
    }

    #[test]
    fn foreign_prefix_is_treated_as_a_key() {
        // An id carrying a different table prefix is not silently
        // retargeted at that table.
        let id = to_record_id("customer", "account:abc");
        assert_eq!(id.table(), "customer");
    }
}
