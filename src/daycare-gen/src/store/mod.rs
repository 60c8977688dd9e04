use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::Document;
use serde::Serialize;

use crate::error::Result;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::Connection;
pub use mongo::Credentials;
pub use mongo::MongoStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Persists `docs` as one bulk operation. The returned identities have the
    /// same length and order as `docs`.
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<ObjectId>>;
}

pub async fn insert_records<T: Serialize>(
    store: &dyn Store,
    collection: &str,
    records: &[T],
) -> Result<Vec<ObjectId>> {
    let docs = records
        .iter()
        .map(bson::to_document)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    store.insert_many(collection, docs).await
}
