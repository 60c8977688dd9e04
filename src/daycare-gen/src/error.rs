use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("MongoError: {0:?}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BsonSerialization: {0:?}")]
    BsonSerialization(#[from] bson::ser::Error),
    #[error("InvalidWindow: from {from} is not before to {to}")]
    InvalidWindow {
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
    },
    #[error("InvalidBatchSize: batch size must be positive")]
    InvalidBatchSize,
    #[error("NoStaff: events need at least one staff identity")]
    NoStaff,
    #[error("MissingIdentity: no identity for record #{0} in {1:?}")]
    MissingIdentity(usize, String),
}
