//! Catalog fetch coordination.
//!
//! [`CatalogController`] owns the filter state and the result list. It never
//! performs I/O itself: every state change that needs data returns a
//! [`FetchTicket`], the caller runs the query, and hands the outcome back to
//! [`CatalogController::apply`]. Each ticket carries the query generation it
//! was issued for; responses for an older generation are dropped.

use crate::catalog::Product;
use crate::search::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::search::query::normalize_term;
use crate::search::{CatalogApi, CatalogQuery, CatalogTab, FilterChange, PageSize, Pagination, SearchPage};
use crate::CommerceError;
use serde::Serialize;
use std::time::{Duration, Instant};

/// How a page is merged into the result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// The page becomes the whole list.
    Replace,
    /// The page is concatenated onto the list.
    Append,
}

/// A fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a ticket does nothing until its query is run and applied"]
pub struct FetchTicket {
    generation: u64,
    mode: FetchMode,
    query: CatalogQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }
}

/// What [`CatalogController::apply`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The list was replaced with `count` products.
    Replaced { count: usize },
    /// `added` products were appended.
    Appended { added: usize },
    /// The response belonged to a superseded query and was ignored.
    Stale,
    /// The fetch failed; the list is unchanged.
    Failed,
}

/// Filter and result state of the catalog view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogState {
    /// Effective (debounced) search term.
    pub search_term: Option<String>,
    pub tab: CatalogTab,
    pub category: Option<String>,
    pub page_size: PageSize,
    /// Offset of the last requested page for the current filters.
    pub offset: u32,
    pub results: Vec<Product>,
    /// Server-reported match count for the current filters.
    pub total: u64,
}

impl CatalogState {
    fn new(tab: CatalogTab, page_size: PageSize) -> Self {
        Self {
            search_term: None,
            tab,
            category: None,
            page_size,
            offset: 0,
            results: Vec::new(),
            total: 0,
        }
    }

    fn query(&self, offset: u32) -> CatalogQuery {
        CatalogQuery {
            search_term: self.search_term.clone(),
            tab: self.tab,
            category: self.category.clone(),
            limit: self.page_size.limit(),
            offset,
        }
    }
}

/// Coordinates search, tab, category and pagination into catalog fetches.
#[derive(Debug)]
pub struct CatalogController {
    state: CatalogState,
    default_tab: CatalogTab,
    default_page_size: PageSize,
    raw_term: String,
    debouncer: Debouncer<String>,
    generation: u64,
    in_flight: Option<u64>,
    needs_refresh: bool,
    exhausted: bool,
    last_error: Option<String>,
}

impl CatalogController {
    /// Controller on the machines tab with the default page size.
    pub fn new() -> Self {
        Self::with_defaults(CatalogTab::default(), PageSize::default())
    }

    /// Controller whose [`reset`](Self::reset) returns to `tab` and `page_size`.
    pub fn with_defaults(tab: CatalogTab, page_size: PageSize) -> Self {
        Self {
            state: CatalogState::new(tab, page_size),
            default_tab: tab,
            default_page_size: page_size,
            raw_term: String::new(),
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            generation: 0,
            in_flight: None,
            needs_refresh: false,
            exhausted: false,
            last_error: None,
        }
    }

    /// Set the search debounce delay.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    /// Return to the default filters and fetch the first page.
    pub fn reset(&mut self) -> FetchTicket {
        self.state = CatalogState::new(self.default_tab, self.default_page_size);
        self.raw_term.clear();
        self.debouncer.cancel();
        self.last_error = None;
        self.replace()
    }

    /// Change one or more filters and fetch the first page.
    ///
    /// Always restarts from offset 0, even if nothing actually changed.
    pub fn set_filter(&mut self, change: FilterChange) -> FetchTicket {
        if let Some(term) = change.search_term {
            self.state.search_term = normalize_term(&term);
            self.raw_term = term;
            self.debouncer.cancel();
        }
        if let Some(tab) = change.tab {
            self.state.tab = tab;
        }
        if let Some(category) = change.category {
            self.state.category = category.and_then(|c| normalize_term(&c));
        }
        self.replace()
    }

    /// Change the page size and fetch the first page.
    pub fn set_page_size(&mut self, page_size: PageSize) -> FetchTicket {
        self.state.page_size = page_size;
        self.replace()
    }

    /// Record a keystroke in the search box.
    ///
    /// Nothing is fetched until [`poll_debounce`](Self::poll_debounce) sees
    /// the input quiet for the debounce delay. This path serves front ends
    /// that see every keystroke; line-oriented input, such as the CLI
    /// browser, submits whole terms through [`submit_search`](Self::submit_search).
    pub fn type_search(&mut self, term: impl Into<String>, now: Instant) {
        let term = term.into();
        self.raw_term.clone_from(&term);
        self.debouncer.push(term, now);
    }

    /// When the debounced term is due, if one is pending.
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Emit a fetch once the typed term has settled.
    ///
    /// Returns `None` while the debounce window is open, or when the settled
    /// term matches the one already in effect.
    pub fn poll_debounce(&mut self, now: Instant) -> Option<FetchTicket> {
        let term = self.debouncer.ready(now)?;
        if normalize_term(&term) == self.state.search_term {
            return None;
        }
        Some(self.set_filter(FilterChange::search(term)))
    }

    /// Search immediately with the current raw term, skipping the debounce.
    pub fn submit_search(&mut self) -> FetchTicket {
        let term = self.raw_term.clone();
        self.set_filter(FilterChange::search(term))
    }

    /// Fetch the next page.
    ///
    /// Returns `None` while a fetch for the current query is still running,
    /// when every result has been loaded, when the backend returned a short
    /// page, or when the last first-page fetch failed (use
    /// [`refresh`](Self::refresh) instead).
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() || self.needs_refresh || !self.has_more() {
            return None;
        }
        let offset = self.state.offset.saturating_add(self.state.page_size.limit());
        Some(self.issue(FetchMode::Append, offset))
    }

    /// Re-fetch the first page for the current filters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.replace()
    }

    /// Merge a fetch outcome into the state.
    ///
    /// Responses for a superseded generation are ignored. A failed fetch
    /// leaves the results untouched and ends the loading state.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<SearchPage, CommerceError>,
    ) -> ApplyOutcome {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping stale catalog response"
            );
            return ApplyOutcome::Stale;
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    generation = ticket.generation,
                    offset = ticket.query.offset,
                    error = %e,
                    "catalog fetch failed"
                );
                if ticket.mode == FetchMode::Replace {
                    self.needs_refresh = true;
                }
                self.last_error = Some(e.to_string());
                return ApplyOutcome::Failed;
            }
        };

        self.last_error = None;
        self.state.total = page.total;
        tracing::info!(
            generation = ticket.generation,
            offset = ticket.query.offset,
            returned = page.results.len(),
            total = page.total,
            "catalog page applied"
        );
        match ticket.mode {
            FetchMode::Replace => {
                self.needs_refresh = false;
                self.state.offset = 0;
                self.state.results = page.results;
                ApplyOutcome::Replaced {
                    count: self.state.results.len(),
                }
            }
            FetchMode::Append => {
                let added = page.results.len();
                if added < ticket.query.limit as usize {
                    self.exhausted = true;
                }
                self.state.offset = ticket.query.offset;
                self.state.results.extend(page.results);
                ApplyOutcome::Appended { added }
            }
        }
    }

    /// Run a ticket against `api` and apply the outcome.
    pub async fn execute<A>(&mut self, api: &A, ticket: FetchTicket) -> ApplyOutcome
    where
        A: CatalogApi + ?Sized,
    {
        let result = api.search(ticket.query()).await;
        self.apply(ticket, result)
    }

    /// Whether a fetch for the current query is pending.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether "load more" should be offered.
    ///
    /// A page shorter than the limit ends the listing even when the reported
    /// total says otherwise.
    pub fn has_more(&self) -> bool {
        !self.exhausted && (self.state.results.len() as u64) < self.state.total
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn results(&self) -> &[Product] {
        &self.state.results
    }

    pub fn total(&self) -> u64 {
        self.state.total
    }

    pub fn offset(&self) -> u32 {
        self.state.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The search box contents, including keystrokes not yet debounced.
    pub fn raw_term(&self) -> &str {
        &self.raw_term
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.state.offset,
            self.state.page_size.limit(),
            self.state.results.len() as u64,
            self.state.total,
        )
    }

    /// Message of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn replace(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state.offset = 0;
        self.exhausted = false;
        self.issue(FetchMode::Replace, 0)
    }

    fn issue(&mut self, mode: FetchMode, offset: u32) -> FetchTicket {
        self.in_flight = Some(self.generation);
        let query = self.state.query(offset);
        tracing::debug!(
            generation = self.generation,
            ?mode,
            tab = %query.tab,
            offset = query.offset,
            limit = query.limit,
            "issuing catalog fetch"
        );
        FetchTicket {
            generation: self.generation,
            mode,
            query,
        }
    }
}

impl Default for CatalogController {
    fn default() -> Self {
        Self::new()
    }
}
