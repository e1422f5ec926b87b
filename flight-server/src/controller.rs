//! The query/result state machine.
//!
//! `QueryController` owns the single source of truth for "what is being
//! searched for and what came back". Partial changes merge into the
//! committed query through [`QueryDelta`]; the merged candidate is only
//! committed once the backend answers successfully, so a failed search
//! leaves the last good result on screen and the same delta can simply
//! be retried.
//!
//! Filter field edits are staged locally and never trigger a search on
//! their own; sort toggles, page steps, and reset search immediately.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{FlightQuery, FlightRow, Patch, QueryDelta, SearchResult, SortKey};

/// Error surfaced to the user when a search cannot be completed.
///
/// Backends keep their own taxonomies; by the time a failure reaches the
/// controller it is a single recoverable kind carried as display text.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct SearchFailed {
    message: String,
}

impl SearchFailed {
    /// Create a failure with the given display message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The search capability the controller runs against.
///
/// Implemented by the HTTP client (remote service), the CSV-backed
/// store (in-process), and the caching wrapper.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute the query and return one page of results.
    async fn search(&self, query: &FlightQuery) -> Result<SearchResult, SearchFailed>;
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for Arc<B> {
    async fn search(&self, query: &FlightQuery) -> Result<SearchResult, SearchFailed> {
        (**self).search(query).await
    }
}

/// Mutable controller state, guarded by one lock.
struct ControllerState {
    /// The committed query: the one whose results are displayed.
    query: FlightQuery,

    /// Staged filter edits, not yet submitted.
    staged: QueryDelta,

    /// Rows of the committed result set.
    rows: Arc<Vec<FlightRow>>,

    /// Total matching rows server-side.
    total: u64,

    /// True while a search is in flight.
    loading: bool,

    /// Display message of the last failed search, if any.
    error: Option<String>,

    /// Sequence number of the most recently issued search.
    issued: u64,
}

/// Owns the canonical search query and result set.
///
/// Operations take `&self`; state lives behind a mutex that is released
/// across the network await, so observers stay responsive while a
/// search is in flight. If several searches overlap, responses that are
/// not the latest issued are discarded wholesale: they commit nothing,
/// surface no error, and do not clear the loading flag.
pub struct QueryController<B> {
    backend: B,
    state: Mutex<ControllerState>,
}

impl<B: SearchBackend> QueryController<B> {
    /// Create a controller with the default query and an empty result
    /// set. Call [`initial_load`](Self::initial_load) once to populate
    /// the first page.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(ControllerState {
                query: FlightQuery::default(),
                staged: QueryDelta::default(),
                rows: Arc::new(Vec::new()),
                total: 0,
                loading: false,
                error: None,
                issued: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a search for `candidate` and commit it on success.
    ///
    /// Returns true if this search's response was committed. The lock is
    /// not held across the backend call.
    async fn run_search(&self, candidate: FlightQuery) -> bool {
        let seq = {
            let mut st = self.state();
            st.issued += 1;
            st.loading = true;
            st.error = None;
            st.issued
        };

        let result = self.backend.search(&candidate).await;

        let mut st = self.state();
        if seq != st.issued {
            // A newer search was issued while this one was in flight.
            debug!(seq, latest = st.issued, "discarding stale search response");
            return false;
        }
        st.loading = false;

        match result {
            Ok(page) => {
                debug!(total = page.total, rows = page.rows.len(), "search committed");
                st.total = page.total;
                st.rows = Arc::new(page.rows);
                st.query = candidate;
                st.error = None;
                true
            }
            Err(e) => {
                // Keep the last good rows/total/query on screen; the
                // candidate is not committed, so the same delta can be
                // retried.
                warn!(error = %e, "search failed");
                st.error = Some(e.to_string());
                false
            }
        }
    }

    /// Merge `delta` over the committed query and search.
    ///
    /// On success the merged query and the response's rows/total are
    /// committed; on failure everything stays at its pre-call value and
    /// an error message is surfaced. The loading flag is cleared on
    /// every exit path.
    pub async fn apply_delta(&self, delta: QueryDelta) {
        let candidate = self.state().query.merge(&delta);
        self.run_search(candidate).await;
    }

    /// Populate the first page using the default query. Call once at
    /// startup.
    pub async fn initial_load(&self) {
        self.apply_delta(QueryDelta::default()).await;
    }

    /// Sort by `key`: clicking the current column flips the direction,
    /// a new column enters ascending. Searches immediately.
    pub async fn toggle_sort(&self, key: SortKey) {
        let (sort_by, order) = self.state().query.toggled(key);
        self.apply_delta(QueryDelta::sort(sort_by, order)).await;
    }

    /// Advance one page. A strict no-op (no search, no state change)
    /// when the current page already reaches the total.
    pub async fn next_page(&self) {
        let next = {
            let st = self.state();
            st.query.next_offset(st.total)
        };
        if let Some(offset) = next {
            self.apply_delta(QueryDelta::page(offset)).await;
        }
    }

    /// Step back one page. A strict no-op on the first page; never
    /// produces a negative offset.
    pub async fn prev_page(&self) {
        let prev = self.state().query.prev_offset();
        if let Some(offset) = prev {
            self.apply_delta(QueryDelta::page(offset)).await;
        }
    }

    /// Replace the query with the default query wholesale (not a delta
    /// merge), drop staged edits, and search.
    pub async fn reset(&self) {
        self.state().staged = QueryDelta::default();
        self.run_search(FlightQuery::default()).await;
    }

    /// Stage an origin filter edit. Uppercased; blank input clears the
    /// constraint. Does not search.
    pub fn edit_origin(&self, input: &str) {
        self.state().staged.origin = Patch::from_input(&input.to_ascii_uppercase());
    }

    /// Stage a destination filter edit. Uppercased; blank clears.
    pub fn edit_destination(&self, input: &str) {
        self.state().staged.destination = Patch::from_input(&input.to_ascii_uppercase());
    }

    /// Stage a start-date edit (`YYYY-MM-DD`); blank clears.
    pub fn edit_start_date(&self, input: &str) {
        self.state().staged.start_date = Patch::from_input(input);
    }

    /// Stage an end-date edit (`YYYY-MM-DD`); blank clears.
    pub fn edit_end_date(&self, input: &str) {
        self.state().staged.end_date = Patch::from_input(input);
    }

    /// Stage a minimum-price edit; blank clears.
    pub fn edit_min_price(&self, input: &str) {
        self.state().staged.min_price = Patch::from_input(input);
    }

    /// Stage a maximum-price edit; blank clears.
    pub fn edit_max_price(&self, input: &str) {
        self.state().staged.max_price = Patch::from_input(input);
    }

    /// Flush staged filter edits: search with the staged delta plus
    /// `offset = 0` (a new search always returns to the first page).
    /// Staged edits are cleared only after a successful search, so a
    /// failed submit can be retried unchanged.
    pub async fn submit(&self) {
        let (candidate, flushed) = {
            let st = self.state();
            let mut delta = st.staged.clone();
            delta.offset = Some(0);
            (st.query.merge(&delta), st.staged.clone())
        };

        if self.run_search(candidate).await {
            let mut st = self.state();
            // Edits made while the search was in flight stay staged.
            if st.staged == flushed {
                st.staged = QueryDelta::default();
            }
        }
    }

    /// The committed query.
    pub fn query(&self) -> FlightQuery {
        self.state().query.clone()
    }

    /// Staged filter edits awaiting submit.
    pub fn staged(&self) -> QueryDelta {
        self.state().staged.clone()
    }

    /// Rows of the committed result set.
    pub fn rows(&self) -> Arc<Vec<FlightRow>> {
        Arc::clone(&self.state().rows)
    }

    /// Total matching rows server-side.
    pub fn total(&self) -> u64 {
        self.state().total
    }

    /// True while a search is in flight.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Display message of the last failed search, if any.
    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    /// Range label for the committed page, e.g. `"101-200 of 237"`.
    pub fn range_label(&self) -> String {
        let st = self.state();
        range_label(st.query.offset, st.query.limit, st.total)
    }
}

/// Derive the "first-last of total" range label for a result page.
///
/// An empty result set reads `"0-0 of 0"`.
pub fn range_label(offset: u32, limit: u32, total: u64) -> String {
    if total == 0 {
        return "0-0 of 0".to_string();
    }
    let first = u64::from(offset) + 1;
    let last = (u64::from(offset) + u64::from(limit)).min(total);
    format!("{first}-{last} of {total}")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The label's bounds stay within the result set.
        #[test]
        fn range_label_in_bounds(
            offset in 0u32..10_000,
            limit in 1u32..500,
            total in 0u64..1_000_000,
        ) {
            let label = range_label(offset, limit, total);
            if total == 0 {
                prop_assert_eq!(label, "0-0 of 0");
            } else {
                let last: u64 = label
                    .split(['-', ' '])
                    .nth(1)
                    .unwrap()
                    .parse()
                    .unwrap();
                prop_assert!(last <= total);
            }
        }
    }
}
