pub mod batch;
pub mod builder;
pub mod error;
pub mod loader;
pub mod records;
pub mod store;

pub use error::Error;
pub use error::Result;

pub const COLLECTION_CHILDREN: &str = "children";
pub const COLLECTION_STAFF: &str = "staff";
pub const COLLECTION_EVENTS: &str = "dailyEvents";
