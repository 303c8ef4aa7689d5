//! List query engine for the TBM catalog.
//!
//! This crate turns search text, category filters, a location scope, and a
//! sort order into a displayed list of books, reconciled against the
//! asynchronous record store:
//! - `ListQueryEngine` owns the query state and the fetch lifecycle
//! - `FetchPlan` picks the store call for a query
//! - `view` derives the sorted, display-ready list
//! - `DetailLookup` resolves a single book
//! - `load_landing_stats` produces the landing-page book count
//!
//! ## Reactive State
//!
//! Every committed transition is broadcast as an `EngineSnapshot` via
//! `tokio::sync::watch`. Only the most recently dispatched fetch is ever
//! committed; older responses are dropped.

mod detail;
mod engine;
mod plan;
mod stats;
pub mod view;

pub use detail::{DetailLookup, DetailRequest, DetailStatus};
pub use engine::{EngineOptions, EngineSnapshot, FetchStatus, ListQueryEngine};
pub use plan::FetchPlan;
pub use stats::{load_landing_stats, CountSource, LandingStats};

pub use tbm_core::{
    BookId, BookRecord, EngineError, FilterPolicy, LocationFilter, QueryState, SortDirection,
    SortKey,
};
