//! Core types for the TBM reading-room catalog.
//!
//! This crate contains shared data structures that are used across all TBM crates:
//! - Book records and identifiers
//! - Query state (search, filters, sort)
//! - The search predicate over the fixed searchable fields
//! - Configuration types
//! - Error types

mod book;
mod config;
mod error;
mod filter;
mod query;

pub use book::{BookId, BookRecord};
pub use config::{
    config_dir, config_path, CatalogConfig, CatalogSection, FilterPolicy, StoreSection,
    DEFAULT_FALLBACK_COUNT, ENV_ANON_KEY, ENV_STORE_URL,
};
pub use error::{ConfigError, EngineError, StoreError};
pub use filter::{matches, matches_filters, matches_search, SearchField, SearchFilters};
pub use query::{LocationFilter, QueryState, SortDirection, SortKey};
