//! Record store clients for the TBM catalog.
//!
//! This crate provides:
//! - The `RecordStore` trait every catalog consumer talks to
//! - `PostgrestStore`, the Supabase REST client for the `buku` table
//! - `MemoryStore`, an in-process store for offline use and tests

mod memory;
mod postgrest;
mod store;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use store::{BooksFuture, RecordStore};

#[cfg(any(test, feature = "mock"))]
pub use store::MockRecordStore;

pub use tbm_core::{BookId, BookRecord, SearchFilters, StoreError};
