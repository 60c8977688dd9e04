use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;

use crate::error::Error;
use crate::error::Result;
use crate::store::Store;

/// Keeps inserted documents in process memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .lock()
            .map_err(|err| Error::Internal(err.to_string()))?;

        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    pub fn len(&self, collection: &str) -> Result<usize> {
        let collections = self
            .collections
            .lock()
            .map_err(|err| Error::Internal(err.to_string()))?;

        Ok(collections.get(collection).map(Vec::len).unwrap_or(0))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<ObjectId>> {
        let mut collections = self
            .collections
            .lock()
            .map_err(|err| Error::Internal(err.to_string()))?;
        let stored = collections.entry(collection.to_string()).or_default();

        let mut ids = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let id = ObjectId::new();
            doc.insert("_id", id);
            stored.push(doc);
            ids.push(id);
        }

        Ok(ids)
    }
}
