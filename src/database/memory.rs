use super::{bson_to_json, DocumentStore};
use crate::models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Test double for MongoDB. Filters are plain field equality, which is all
/// the handlers ever send.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Document>>>,
    operations: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a document without counting it as an operation.
    pub fn seed(&self, collection: Collection, mut document: Document) -> ObjectId {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            _ => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        self.collections
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push(document);
        id
    }

    pub fn documents(&self, collection: Collection) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of store calls made through `DocumentStore`.
    pub fn operations(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Makes every later `ping` fail, as an unreachable server would.
    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    fn touch(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| document.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>, AppError> {
        self.touch();
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|d| matches(d, &filter))
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<Option<Document>, AppError> {
        self.touch();
        Ok(self
            .documents(collection)
            .into_iter()
            .find(|d| matches(d, &filter)))
    }

    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOutcome, AppError> {
        self.touch();
        let id = document
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        document.insert("_id", id.clone());

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|d| d.get("_id") == Some(&id)) {
            return Err(AppError::DatabaseError("E11000 duplicate key error".to_string()));
        }
        docs.push(document);

        Ok(InsertOutcome {
            acknowledged: true,
            inserted_id: bson_to_json(id),
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: Document,
        changes: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, AppError> {
        self.touch();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection).or_default();

        if let Some(existing) = docs.iter_mut().find(|d| matches(d, &filter)) {
            let mut modified = false;
            for (key, value) in changes {
                if existing.get(&key) != Some(&value) {
                    existing.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: serde_json::Value::Null,
            });
        }

        if !upsert {
            return Ok(UpdateOutcome {
                acknowledged: true,
                matched_count: 0,
                modified_count: 0,
                upserted_count: 0,
                upserted_id: serde_json::Value::Null,
            });
        }

        let id = ObjectId::new();
        let mut created = Document::new();
        created.insert("_id", id);
        for (key, value) in filter.into_iter().chain(changes) {
            created.insert(key, value);
        }
        docs.push(created);

        Ok(UpdateOutcome {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: serde_json::Value::String(id.to_hex()),
        })
    }

    async fn delete_one(
        &self,
        collection: Collection,
        filter: Document,
    ) -> Result<DeleteOutcome, AppError> {
        self.touch();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection).or_default();

        let deleted_count = match docs.iter().position(|d| matches(d, &filter)) {
            Some(index) => {
                docs.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteOutcome {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.touch();
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("server selection timeout".to_string()));
        }
        Ok(())
    }
}
