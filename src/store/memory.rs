//! In-memory document store
//!
//! Used by tests and local runs. Supports switching into a failing mode to
//! exercise persistence error paths.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, OrderedQuery, Record, SortDirection};
use crate::error::{ReportError, Result};

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    /// Documents per collection, in insertion order
    collections: RwLock<HashMap<String, Vec<(String, Record)>>>,
    failing: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a persistence error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, AtomicOrdering::SeqCst);
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Fetch one document by ID (with `"id"` filled in)
    pub async fn get(&self, collection: &str, id: &str) -> Option<Record> {
        let collections = self.collections.read().await;
        collections
            .get(collection)?
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(doc_id, record)| with_id(doc_id, record))
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(AtomicOrdering::SeqCst) {
            return Err(ReportError::Persistence("Document store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, mut record: Record) -> Result<String> {
        self.check_available()?;

        let id = Uuid::new_v4().simple().to_string();
        record.remove("id");
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record));

        debug!(collection, id = %id, "Created document");
        Ok(id)
    }

    async fn query_ordered(&self, collection: &str, query: OrderedQuery) -> Result<Vec<Record>> {
        self.check_available()?;

        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Record> = docs
            .iter()
            .filter(|(_, record)| match &query.filter {
                Some(filter) => record.get(&filter.field) == Some(&filter.value),
                None => true,
            })
            .map(|(id, record)| with_id(id, record))
            .collect();

        matched.sort_by(|a, b| {
            let ord = compare_values(a.get(&query.order_by), b.get(&query.order_by));
            match query.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        matched.truncate(query.limit);

        Ok(matched)
    }

    async fn update(&self, collection: &str, id: &str, changes: Record) -> Result<()> {
        self.check_available()?;

        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, record)| record)
            .ok_or_else(|| ReportError::Persistence(format!("No document {} in {}", id, collection)))?;

        for (key, value) in changes {
            if key != "id" {
                record.insert(key, value);
            }
        }

        debug!(collection, id, "Updated document");
        Ok(())
    }
}

fn with_id(id: &str, record: &Record) -> Record {
    let mut out = record.clone();
    out.insert("id".to_string(), Value::String(id.to_string()));
    out
}

/// Missing fields sort first; numbers and strings compare naturally
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
