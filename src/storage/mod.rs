//! Car storage: the repository contract and its backends.
//!
//! `PgCarRepository` is the production backend. `MemoryCarStore` keeps the same
//! semantics in process memory so the HTTP layer can run without a database.

use crate::domain::{Car, CarDraft};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;
pub mod schema;

pub use memory::MemoryCarStore;
pub use postgres::PgCarRepository;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("'{0}' is not a valid SQL identifier")]
    InvalidIdentifier(String),
}

/// Result of an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub rows_affected: u64,
}

impl WriteOutcome {
    /// True when the target id did not exist.
    pub fn is_noop(&self) -> bool {
        self.rows_affected == 0
    }
}

/// Operations the request handler needs from storage.
///
/// Listings are ordered by id ascending. A search term matches brand or model
/// as a case-insensitive literal substring; the empty term matches every row.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Inserts a row and returns the id storage assigned to it.
    async fn insert(&self, draft: &CarDraft) -> Result<i32, StoreError>;

    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError>;

    async fn search(&self, term: &str, limit: u32, offset: u64) -> Result<Vec<Car>, StoreError>;

    async fn update(&self, id: i32, draft: &CarDraft) -> Result<WriteOutcome, StoreError>;

    async fn delete(&self, id: i32) -> Result<WriteOutcome, StoreError>;

    /// Total rows, ignoring any filter.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Rows matched by `search(term, ..)`.
    async fn count_matching(&self, term: &str) -> Result<u64, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Car>, StoreError>;

    /// Cheap reachability check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
