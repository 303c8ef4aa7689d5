//! The record store contract.

use futures::future::BoxFuture;
use tbm_core::{BookId, BookRecord, SearchFilters, StoreError};

/// Future resolving to an ordered list of records.
pub type BooksFuture = BoxFuture<'static, Result<Vec<BookRecord>, StoreError>>;

/// Remote table of book records.
///
/// Methods return `'static` futures so the caller can spawn them however it
/// wants. List operations return records ordered by `created_at` descending.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait RecordStore: Send + Sync {
    /// Every record.
    fn fetch_all(&self) -> BooksFuture;

    /// Records whose location equals `location` exactly.
    fn fetch_by_location(&self, location: &str) -> BooksFuture;

    /// A single record. `Ok(None)` when no record has this id.
    fn fetch_by_id(&self, id: &BookId)
        -> BoxFuture<'static, Result<Option<BookRecord>, StoreError>>;

    /// Text search combined with exact-match filters.
    ///
    /// A non-empty `term` matches case-insensitively as a substring of title,
    /// author, genre, type, or location. Supplied filters are ANDed with it;
    /// an unfiltered location is ignored.
    fn search(&self, term: &str, filters: &SearchFilters) -> BooksFuture;

    /// Total number of records, ignoring any filter.
    fn count(&self) -> BoxFuture<'static, Result<u64, StoreError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mock_store_behind_trait_object() {
        let mut mock = MockRecordStore::new();
        mock.expect_count()
            .times(1)
            .returning(|| Box::pin(async { Ok::<u64, StoreError>(3) }));
        mock.expect_fetch_by_id()
            .withf(|id| id.as_text() == "missing-id")
            .returning(|_| Box::pin(async { Ok::<Option<BookRecord>, StoreError>(None) }));

        let store: Arc<dyn RecordStore> = Arc::new(mock);
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store
            .fetch_by_id(&BookId::from("missing-id"))
            .await
            .unwrap()
            .is_none());
    }
}
