pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryRecordStore;
pub use models::readings::{
    RawLogReading, Reading, ReadingKind, StructuredReading,
};
pub use store::{DynamoRecordStore, RecordStore};
