//! In-process record store.
//!
//! Holds a fixed snapshot of records and answers the same contract as the
//! remote table. Used when no remote store is configured and in tests, where
//! per-call delays and injected failures stand in for network behaviour.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tbm_core::{matches, BookId, BookRecord, SearchFilters, StoreError};

use crate::store::{BooksFuture, RecordStore};

/// In-memory implementation of [`RecordStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<Vec<BookRecord>>,
    /// Applied to calls with no scripted delay.
    delay: Duration,
    /// Consumed one per call, in call order.
    scripted_delays: Arc<Mutex<VecDeque<Duration>>>,
    failure: Arc<Mutex<Option<StoreError>>>,
}

impl MemoryStore {
    /// Create a store over `records`, ordered newest first.
    pub fn new(mut records: Vec<BookRecord>) -> Self {
        // Stable: records without a timestamp keep their relative order, last.
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            records: Arc::new(records),
            ..Self::default()
        }
    }

    /// Parse a JSON array of table rows.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let records: Vec<BookRecord> =
            serde_json::from_str(text).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(Self::new(records))
    }

    /// Delay every call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a delay for the next call that has none scripted yet.
    pub fn push_delay(&self, delay: Duration) {
        self.scripted_delays.lock().push_back(delay);
    }

    /// Make every call fail with `error` until [`MemoryStore::recover`].
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run `select` over the records after the call's delay.
    fn respond<T, F>(&self, select: F) -> BoxFuture<'static, Result<T, StoreError>>
    where
        T: Send + 'static,
        F: FnOnce(&[BookRecord]) -> T + Send + 'static,
    {
        let records = self.records.clone();
        let failure = self.failure.lock().clone();
        let delay = self
            .scripted_delays
            .lock()
            .pop_front()
            .unwrap_or(self.delay);

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match failure {
                Some(error) => Err(error),
                None => Ok(select(&records)),
            }
        })
    }
}

impl RecordStore for MemoryStore {
    fn fetch_all(&self) -> BooksFuture {
        self.respond(|records| records.to_vec())
    }

    fn fetch_by_location(&self, location: &str) -> BooksFuture {
        let location = location.to_string();
        self.respond(move |records| {
            records
                .iter()
                .filter(|book| book.location == location)
                .cloned()
                .collect()
        })
    }

    fn fetch_by_id(
        &self,
        id: &BookId,
    ) -> BoxFuture<'static, Result<Option<BookRecord>, StoreError>> {
        let id = id.clone();
        self.respond(move |records| records.iter().find(|book| book.id == id).cloned())
    }

    fn search(&self, term: &str, filters: &SearchFilters) -> BooksFuture {
        let term = term.to_string();
        let filters = filters.clone();
        self.respond(move |records| {
            records
                .iter()
                .filter(|book| matches(book, &term, &filters))
                .cloned()
                .collect()
        })
    }

    fn count(&self) -> BoxFuture<'static, Result<u64, StoreError>> {
        self.respond(|records| records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tbm_core::LocationFilter;

    fn catalog() -> Vec<BookRecord> {
        let day = |d| Utc.with_ymd_and_hms(2024, 5, d, 9, 0, 0).unwrap();
        vec![
            BookRecord::new(1, "Laskar Pelangi", "Andrea Hirata", "TBM RW 01")
                .with_genre("Fiksi")
                .with_created_at(day(1)),
            BookRecord::new(2, "Bumi Manusia", "Pramoedya Ananta Toer", "TBM RW 01")
                .with_genre("Fiksi")
                .with_created_at(day(3)),
            BookRecord::new(3, "Animal Farm", "George Orwell", "TBM RW 02")
                .with_genre("Fiksi")
                .with_created_at(day(2)),
            BookRecord::new(4, "Ensiklopedia Hewan", "Tim Redaksi", "TBM Kantor Kelurahan")
                .with_genre("Nonfiksi")
                .with_kind("Buku Anak-Anak"),
        ]
    }

    fn ids(books: &[BookRecord]) -> Vec<String> {
        books.iter().map(|b| b.id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_all_orders_newest_first() {
        let store = MemoryStore::new(catalog());
        let books = store.fetch_all().await.unwrap();
        assert_eq!(ids(&books), vec!["2", "3", "1", "4"]);
    }

    #[tokio::test]
    async fn test_fetch_by_location_is_exact() {
        let store = MemoryStore::new(catalog());
        let books = store.fetch_by_location("TBM RW 01").await.unwrap();
        assert_eq!(ids(&books), vec!["2", "1"]);

        let none = store.fetch_by_location("TBM RW").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let store = MemoryStore::new(catalog());
        let found = store.fetch_by_id(&BookId::from("3")).await.unwrap();
        assert_eq!(found.unwrap().title, "Animal Farm");

        let missing = store.fetch_by_id(&BookId::from("missing-id")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_search_with_filters() {
        let store = MemoryStore::new(catalog());

        let books = store.search("bumi", &SearchFilters::default()).await.unwrap();
        assert_eq!(ids(&books), vec!["2"]);

        let filters = SearchFilters {
            genre: Some("Nonfiksi".to_string()),
            ..SearchFilters::default()
        };
        let books = store.search("", &filters).await.unwrap();
        assert_eq!(ids(&books), vec!["4"]);

        let filters = SearchFilters {
            location: LocationFilter::parse("TBM RW 02"),
            ..SearchFilters::default()
        };
        let books = store.search("fiksi", &filters).await.unwrap();
        assert_eq!(ids(&books), vec!["3"]);
    }

    #[tokio::test]
    async fn test_count_and_failure() {
        let store = MemoryStore::new(catalog());
        assert_eq!(store.count().await.unwrap(), 4);

        store.fail_with(StoreError::Transport("offline".to_string()));
        assert!(store.count().await.is_err());
        assert!(store.fetch_all().await.is_err());

        store.recover();
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_from_json_rows() {
        let store = MemoryStore::from_json(
            r#"[
                {"id": 1, "judul_buku": "Si Kancil", "penulis_buku": "Anonim",
                 "aliran_buku": "Fiksi", "jenis_buku": "Buku Anak-Anak",
                 "lokasi_buku": "TBM RW 05"}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);

        assert!(matches!(
            MemoryStore::from_json("{not json"),
            Err(StoreError::Decode(_))
        ));
    }
}
