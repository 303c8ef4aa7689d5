//! The list query engine.
//!
//! One engine instance backs one list page. It owns the query state, the
//! working set returned by the last committed fetch, and the derived view.
//!
//! ## Fetch ordering
//!
//! Each dispatched fetch is tagged with a generation number. A response is
//! committed only if its generation is still the latest; the task awaiting a
//! superseded fetch is also aborted. Sort changes never touch the store.
//!
//! ## Lifecycle
//!
//! `initialize` runs once and issues the first fetch. `dispose` (also run on
//! drop) cancels every pending continuation; a disposed engine applies no
//! further transitions.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use tbm_core::{
    BookRecord, CatalogConfig, EngineError, FilterPolicy, LocationFilter, QueryState,
    SortDirection, SortKey, StoreError,
};
use tbm_store::{BooksFuture, RecordStore};

use crate::plan::FetchPlan;
use crate::view::{derive_view, distinct_values};

// =============================================================================
// Status and Snapshots
// =============================================================================

/// Outcome of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Ready,
    Error(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Committed engine state broadcast to subscribers.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub query: QueryState,
    pub view: Arc<Vec<BookRecord>>,
    pub status: FetchStatus,
    /// Generation of the latest dispatched fetch.
    pub generation: u64,
}

// =============================================================================
// Options
// =============================================================================

/// Engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub policy: FilterPolicy,
    /// Upper bound for one store call.
    pub timeout: Duration,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::Remote,
            timeout: Duration::from_secs(10),
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            policy: config.catalog.filter_policy,
            timeout: config.store.timeout(),
            sort_key: config.catalog.sort_key,
            sort_direction: config.catalog.sort_direction,
        }
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Internal State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Active,
    Disposed,
}

struct EngineState {
    lifecycle: Lifecycle,
    query: QueryState,
    /// Latest committed fetch result. Replaced wholesale, never edited.
    working_set: Vec<BookRecord>,
    view: Arc<Vec<BookRecord>>,
    status: FetchStatus,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl EngineState {
    fn rederive(&mut self, policy: FilterPolicy) {
        self.view = Arc::new(derive_view(&self.working_set, &self.query, policy));
    }

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            query: self.query.clone(),
            view: self.view.clone(),
            status: self.status.clone(),
            generation: self.generation,
        }
    }
}

/// State shared with fetch tasks.
struct Shared {
    state: RwLock<EngineState>,
    tx: watch::Sender<EngineSnapshot>,
    cancel: CancellationToken,
    options: EngineOptions,
}

impl Shared {
    /// Broadcast while the caller still holds the lock, so snapshots go out
    /// in the order transitions happened.
    fn publish(&self, state: &EngineState) {
        self.tx.send_replace(state.snapshot());
    }

    /// Apply a fetch result if it is still the latest.
    fn commit(&self, generation: u64, outcome: Result<Vec<BookRecord>, StoreError>) {
        let mut state = self.state.write();
        if state.lifecycle == Lifecycle::Disposed {
            tracing::debug!(generation, "Engine disposed; dropping fetch result");
            return;
        }
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "Discarding stale fetch result"
            );
            return;
        }

        state.in_flight = None;
        match outcome {
            Ok(records) => {
                tracing::debug!(generation, count = records.len(), "Fetch committed");
                state.working_set = records;
                state.status = FetchStatus::Ready;
            }
            Err(e) => {
                tracing::warn!(generation, "Fetch failed: {}", e);
                state.status = FetchStatus::Error(e.to_string());
            }
        }
        state.rederive(self.options.policy);
        self.publish(&state);
    }
}

async fn run_fetch(shared: Arc<Shared>, generation: u64, request: BooksFuture) {
    let timeout = shared.options.timeout;
    let outcome = tokio::select! {
        _ = shared.cancel.cancelled() => {
            tracing::debug!(generation, "Fetch cancelled");
            return;
        }
        result = tokio::time::timeout(timeout, request) => {
            result.unwrap_or(Err(StoreError::Timeout { duration: timeout }))
        }
    };
    shared.commit(generation, outcome);
}

// =============================================================================
// ListQueryEngine
// =============================================================================

/// Query state, fetch orchestration, and the derived book list for one page.
///
/// Methods that fetch spawn onto the current tokio runtime and return
/// immediately. Read the outcome with [`ListQueryEngine::snapshot`], wait for
/// it with [`ListQueryEngine::settled`], or watch it via
/// [`ListQueryEngine::subscribe`].
///
/// # Panics
///
/// `initialize`, the selection setters and `refetch` spawn the fetch with
/// `tokio::spawn` and panic when called outside a tokio runtime.
pub struct ListQueryEngine {
    store: Arc<dyn RecordStore>,
    shared: Arc<Shared>,
    rx: watch::Receiver<EngineSnapshot>,
}

impl ListQueryEngine {
    /// Create an engine. No fetch happens until [`ListQueryEngine::initialize`].
    pub fn new(store: Arc<dyn RecordStore>, options: EngineOptions) -> Self {
        let query = QueryState {
            sort_key: options.sort_key,
            sort_direction: options.sort_direction,
            ..QueryState::default()
        };
        let state = EngineState {
            lifecycle: Lifecycle::Created,
            query,
            working_set: Vec::new(),
            view: Arc::new(Vec::new()),
            status: FetchStatus::Loading,
            generation: 0,
            in_flight: None,
        };
        let (tx, rx) = watch::channel(state.snapshot());

        Self {
            store,
            shared: Arc::new(Shared {
                state: RwLock::new(state),
                tx,
                cancel: CancellationToken::new(),
                options,
            }),
            rx,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Set the location from the route and issue the first fetch.
    pub fn initialize(&self, location: LocationFilter) -> Result<(), EngineError> {
        let mut state = self.shared.state.write();
        match state.lifecycle {
            Lifecycle::Active => return Err(EngineError::AlreadyInitialized),
            Lifecycle::Disposed => return Err(EngineError::Disposed),
            Lifecycle::Created => {}
        }
        tracing::info!("Initializing list engine for location {}", location);
        state.lifecycle = Lifecycle::Active;
        state.query.location_filter = location;
        self.dispatch(&mut state);
        Ok(())
    }

    /// Stop applying results. Idempotent.
    pub fn dispose(&self) {
        let mut state = self.shared.state.write();
        if state.lifecycle == Lifecycle::Disposed {
            return;
        }
        tracing::debug!("Disposing list engine");
        state.lifecycle = Lifecycle::Disposed;
        self.shared.cancel.cancel();
        if let Some(task) = state.in_flight.take() {
            task.abort();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.state.read().lifecycle == Lifecycle::Disposed
    }

    // =========================================================================
    // Query Mutations
    // =========================================================================

    pub fn set_search_term(&self, text: impl Into<String>) {
        let text = text.into();
        self.update_selection(move |query| query.search_term = text);
    }

    /// `None` clears the filter.
    pub fn set_genre_filter(&self, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.update_selection(move |query| query.genre_filter = value);
    }

    /// `None` clears the filter.
    pub fn set_type_filter(&self, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.update_selection(move |query| query.type_filter = value);
    }

    pub fn set_location_filter(&self, value: LocationFilter) {
        self.update_selection(move |query| query.location_filter = value);
    }

    /// Switch location and clear search text and category filters, as one
    /// state change.
    pub fn navigate_location(&self, value: LocationFilter) {
        self.update_selection(move |query| {
            query.location_filter = value;
            query.search_term.clear();
            query.genre_filter = None;
            query.type_filter = None;
        });
    }

    /// Change the sort order. Re-derives from the working set only.
    pub fn set_sort(&self, key: SortKey, direction: SortDirection) {
        let mut state = self.shared.state.write();
        if state.lifecycle == Lifecycle::Disposed {
            return;
        }
        state.query.sort_key = key;
        state.query.sort_direction = direction;
        state.rederive(self.shared.options.policy);
        self.shared.publish(&state);
    }

    /// Column-header behaviour: the active key flips direction, any other key
    /// becomes active ascending.
    pub fn toggle_sort(&self, key: SortKey) {
        let (key, direction) = {
            let state = self.shared.state.read();
            if state.query.sort_key == key {
                (key, state.query.sort_direction.toggled())
            } else {
                (key, SortDirection::Asc)
            }
        };
        self.set_sort(key, direction);
    }

    /// Re-issue the fetch for the current query.
    pub fn refetch(&self) {
        let mut state = self.shared.state.write();
        if state.lifecycle != Lifecycle::Active {
            tracing::debug!("Ignoring refetch on inactive engine");
            return;
        }
        self.dispatch(&mut state);
    }

    fn update_selection<F>(&self, apply: F)
    where
        F: FnOnce(&mut QueryState),
    {
        let mut state = self.shared.state.write();
        if state.lifecycle == Lifecycle::Disposed {
            return;
        }

        let before = state.query.clone();
        apply(&mut state.query);
        if state.query == before {
            return;
        }

        match (state.lifecycle, self.shared.options.policy) {
            (Lifecycle::Active, FilterPolicy::Remote) => self.dispatch(&mut state),
            (Lifecycle::Active, FilterPolicy::Local) => {
                state.rederive(FilterPolicy::Local);
                self.shared.publish(&state);
            }
            // Recorded for the first fetch.
            _ => self.shared.publish(&state),
        }
    }

    /// Issue exactly one store call for the current query.
    fn dispatch(&self, state: &mut EngineState) {
        state.generation += 1;
        let generation = state.generation;
        state.status = FetchStatus::Loading;

        let plan = FetchPlan::for_query(&state.query, self.shared.options.policy);
        tracing::debug!(generation, ?plan, "Dispatching fetch");
        let request = plan.issue(self.store.as_ref());

        let task = tokio::spawn(run_fetch(self.shared.clone(), generation, request));
        if let Some(previous) = state.in_flight.replace(task) {
            previous.abort();
        }
        self.shared.publish(state);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The current derived view.
    pub fn derived_view(&self) -> Arc<Vec<BookRecord>> {
        self.shared.state.read().view.clone()
    }

    pub fn status(&self) -> FetchStatus {
        self.shared.state.read().status.clone()
    }

    pub fn query(&self) -> QueryState {
        self.shared.state.read().query.clone()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.shared.state.read().snapshot()
    }

    /// Genres present in the working set, for the genre selector.
    pub fn available_genres(&self) -> Vec<String> {
        let state = self.shared.state.read();
        distinct_values(&state.working_set, |b| b.genre.as_str())
    }

    /// Types present in the working set, for the type selector.
    pub fn available_types(&self) -> Vec<String> {
        let state = self.shared.state.read();
        distinct_values(&state.working_set, |b| b.kind.as_str())
    }

    /// Subscribe to committed transitions.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.rx.clone()
    }

    /// Wait until no fetch is outstanding and return that state.
    pub async fn settled(&self) -> EngineSnapshot {
        let mut rx = self.rx.clone();
        let settled = match rx.wait_for(|snapshot| !snapshot.status.is_loading()).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        };
        settled
    }
}

impl Drop for ListQueryEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// Tests
// =============================================================================
