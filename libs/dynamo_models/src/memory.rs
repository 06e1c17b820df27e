use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::models::readings::{Reading, ReadingKind};
use crate::store::RecordStore;

/// Process-local store used for `STORE_BACKEND=memory` and in tests.
///
/// Keys are UUID v7 ids, so iteration order is ingestion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<RwLock<BTreeMap<String, Reading>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, reading: &Reading) -> Result<(), StoreError> {
        self.inner
            .write()
            .insert(reading.id().to_string(), reading.clone());
        Ok(())
    }

    async fn scan_by_type(
        &self,
        kind: ReadingKind,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        let store = self.inner.read();
        Ok(store
            .values()
            .filter(|r| r.kind() == kind)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::readings::StructuredReading;
    use serde_json::json;

    #[tokio::test]
    async fn test_scan_filters_by_kind_and_limit() {
        let store = InMemoryRecordStore::new();
        for i in 0..5 {
            let reading =
                Reading::Structured(StructuredReading::new(json!(i), json!(i)));
            store.put(&reading).await.unwrap();
        }

        let structured =
            store.scan_by_type(ReadingKind::Structured, 3).await.unwrap();
        assert_eq!(structured.len(), 3);
        assert!(structured.iter().all(|r| r.kind() == ReadingKind::Structured));

        let raw = store.scan_by_type(ReadingKind::Raw, 20).await.unwrap();
        assert!(raw.is_empty());
    }

    #[tokio::test]
    async fn test_put_overwrites_same_id() {
        let store = InMemoryRecordStore::new();
        let mut reading = StructuredReading::new(json!(1), json!(2));
        store
            .put(&Reading::Structured(reading.clone()))
            .await
            .unwrap();
        reading.co2 = json!(3);
        store.put(&Reading::Structured(reading)).await.unwrap();

        assert_eq!(store.len(), 1);
        let stored =
            store.scan_by_type(ReadingKind::Structured, 20).await.unwrap();
        match &stored[0] {
            Reading::Structured(r) => assert_eq!(r.co2, json!(3)),
            other => panic!("unexpected reading {other:?}"),
        }
    }
}
