//! Choosing the store call for a query.

use tbm_core::{FilterPolicy, QueryState, SearchFilters};
use tbm_store::{BooksFuture, RecordStore};

/// The single store call issued for a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Text search and/or category filters, scoped by location.
    Search { term: String, filters: SearchFilters },
    /// Whole table.
    All,
    /// One reading room.
    ByLocation(String),
}

impl FetchPlan {
    /// Plan for `query`.
    ///
    /// Under the local policy the whole table is loaded and filtering happens
    /// in memory, so the plan is always `All`.
    pub fn for_query(query: &QueryState, policy: FilterPolicy) -> Self {
        if policy == FilterPolicy::Local {
            return FetchPlan::All;
        }
        if query.has_search_criteria() {
            FetchPlan::Search {
                term: query.search_term.clone(),
                filters: SearchFilters::from_query(query),
            }
        } else {
            match query.location_filter.site() {
                None => FetchPlan::All,
                Some(site) => FetchPlan::ByLocation(site.to_string()),
            }
        }
    }

    /// Start the call.
    pub fn issue(&self, store: &dyn RecordStore) -> BooksFuture {
        match self {
            FetchPlan::Search { term, filters } => store.search(term, filters),
            FetchPlan::All => store.fetch_all(),
            FetchPlan::ByLocation(site) => store.fetch_by_location(site),
        }
    }
}
