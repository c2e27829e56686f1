// Service exports
pub mod cache;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, RecordCache};
pub use postgres::{MatchAssignment, PostgresClient, PostgresError};
pub use store::{DocumentStore, StoreCollections, StoreError};
