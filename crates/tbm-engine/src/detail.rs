//! Resolving a single book for the detail page.

use std::sync::Arc;
use std::time::Duration;

use tbm_core::{BookId, BookRecord, StoreError};
use tbm_store::RecordStore;

/// What the detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Loading,
    Found(BookRecord),
    /// The store answered and has no such book. Not retryable.
    NotFound,
    /// The store could not be reached. Retryable.
    Error(String),
}

impl DetailStatus {
    pub fn is_retryable(&self) -> bool {
        matches!(self, DetailStatus::Error(_))
    }

    pub fn book(&self) -> Option<&BookRecord> {
        match self {
            DetailStatus::Found(book) => Some(book),
            _ => None,
        }
    }
}

/// A navigation to the detail page.
#[derive(Debug, Clone)]
pub struct DetailRequest {
    pub id: BookId,
    /// Record already fetched by the list page, if navigation carried one.
    pub carried: Option<BookRecord>,
}

impl DetailRequest {
    pub fn by_id(id: impl Into<BookId>) -> Self {
        Self {
            id: id.into(),
            carried: None,
        }
    }

    pub fn with_record(book: BookRecord) -> Self {
        Self {
            id: book.id.clone(),
            carried: Some(book),
        }
    }
}

/// Detail page lookups against a record store.
pub struct DetailLookup {
    store: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl DetailLookup {
    pub fn new(store: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Resolve `request`, preferring a carried record over a fetch.
    pub async fn resolve(&self, request: DetailRequest) -> DetailStatus {
        if let Some(book) = request.carried.filter(|book| book.id == request.id) {
            tracing::debug!("Using carried record for {}", request.id);
            return DetailStatus::Found(book);
        }

        let fetch = self.store.fetch_by_id(&request.id);
        let outcome = tokio::time::timeout(self.timeout, fetch)
            .await
            .unwrap_or(Err(StoreError::Timeout {
                duration: self.timeout,
            }));

        match outcome {
            Ok(Some(book)) => DetailStatus::Found(book),
            Ok(None) => {
                tracing::info!("Book {} not found", request.id);
                DetailStatus::NotFound
            }
            Err(e) => {
                tracing::warn!("Failed to fetch book {}: {}", request.id, e);
                DetailStatus::Error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbm_store::{MemoryStore, MockRecordStore};

    fn bumi() -> BookRecord {
        BookRecord::new(2, "Bumi Manusia", "Pramoedya Ananta Toer", "TBM RW 02")
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let mut mock = MockRecordStore::new();
        mock.expect_fetch_by_id()
            .withf(|id| id.as_text() == "missing-id")
            .times(1)
            .returning(|_| Box::pin(async { Ok::<Option<BookRecord>, StoreError>(None) }));

        let lookup = DetailLookup::new(Arc::new(mock), Duration::from_secs(1));
        let status = lookup.resolve(DetailRequest::by_id("missing-id")).await;
        assert_eq!(status, DetailStatus::NotFound);
        assert!(!status.is_retryable());
    }

    #[tokio::test]
    async fn test_carried_record_skips_fetch() {
        let mock = MockRecordStore::new();
        let lookup = DetailLookup::new(Arc::new(mock), Duration::from_secs(1));

        let status = lookup.resolve(DetailRequest::with_record(bumi())).await;
        assert_eq!(status.book().map(|b| b.title.as_str()), Some("Bumi Manusia"));
    }

    #[tokio::test]
    async fn test_carried_record_for_other_id_is_refetched() {
        let mut mock = MockRecordStore::new();
        mock.expect_fetch_by_id()
            .withf(|id| id.as_text() == "5")
            .times(1)
            .returning(|_| {
                let book = BookRecord::new(5, "Si Kancil", "Anonim", "TBM RW 05");
                Box::pin(async move { Ok::<_, StoreError>(Some(book)) })
            });

        let lookup = DetailLookup::new(Arc::new(mock), Duration::from_secs(1));
        let request = DetailRequest {
            id: BookId::from(5),
            carried: Some(bumi()),
        };
        let status = lookup.resolve(request).await;
        assert_eq!(status.book().map(|b| b.title.as_str()), Some("Si Kancil"));
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let store = MemoryStore::new(vec![bumi()]);
        let lookup = DetailLookup::new(Arc::new(store), Duration::from_secs(1));

        let status = lookup.resolve(DetailRequest::by_id(2)).await;
        assert_eq!(status, DetailStatus::Found(bumi()));
    }

    #[tokio::test]
    async fn test_store_failure_is_retryable_error() {
        let store = MemoryStore::new(vec![bumi()]);
        store.fail_with(StoreError::Transport("dns failure".to_string()));
        let lookup = DetailLookup::new(Arc::new(store), Duration::from_secs(1));

        let status = lookup.resolve(DetailRequest::by_id(2)).await;
        assert!(status.is_retryable());
        assert_ne!(status, DetailStatus::NotFound);
    }
}
