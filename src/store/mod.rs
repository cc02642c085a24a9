//! Document store boundary
//!
//! The reporting core only needs three operations from the hosted document
//! database: create a record, run an ordered and limited query with an
//! optional equality filter, and apply a partial update.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use memory::InMemoryDocumentStore;
pub use mongo::{display_host, MongoDocumentStore};

/// A stored document. Reads carry the document ID under `"id"`.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Equality filter on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Ordered, limited query
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedQuery {
    pub filter: Option<FieldFilter>,
    pub order_by: String,
    pub direction: SortDirection,
    pub limit: usize,
}

impl OrderedQuery {
    /// Newest first by `field`
    pub fn newest_first(field: impl Into<String>, limit: usize) -> Self {
        Self {
            filter: None,
            order_by: field.into(),
            direction: SortDirection::Descending,
            limit,
        }
    }

    pub fn with_filter(mut self, filter: FieldFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Hosted document database operations consumed by the reporting core
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record and return its new ID
    async fn create(&self, collection: &str, record: Record) -> Result<String>;

    async fn query_ordered(&self, collection: &str, query: OrderedQuery) -> Result<Vec<Record>>;

    /// Merge `changes` into the record with the given ID
    async fn update(&self, collection: &str, id: &str, changes: Record) -> Result<()>;
}
