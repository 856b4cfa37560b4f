//! Search session controller for the game list screen.
//!
//! Keystrokes are debounced on a 500 ms trailing edge; only the last query
//! submitted within the window reaches the catalog. `load_default` and
//! `refresh` fetch immediately. Every fetch takes a fresh [`Generation`], and
//! a result is committed only while its generation is still current.
//!
//! Clearing the query while a default-listing fetch is still outstanding does
//! not issue a second one: the outstanding fetch is moved onto the new
//! generation and its reply is committed when it arrives.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use catalog_client::CatalogClient;
use shared::domain::GameSummary;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::lifecycle::{FetchFailure, FetchKind, Generation, InFlight, LoadState, StatePublisher};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

pub type ListState = LoadState<Vec<GameSummary>>;

/// What the user currently wants to see.
#[derive(Debug, Default)]
pub struct SearchSession {
    pub query_text: String,
    pub pending_timer: Option<JoinHandle<()>>,
    pub generation: Generation,
}

impl SearchSession {
    fn supersede(&mut self) -> Generation {
        self.generation = self.generation.next();
        if let Some(timer) = self.pending_timer.take() {
            timer.abort();
        }
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListRequest {
    Default,
    Search(String),
}

impl ListRequest {
    fn for_query(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Self::Default
        } else {
            Self::Search(text.to_string())
        }
    }

    fn kind(&self) -> FetchKind {
        match self {
            Self::Default => FetchKind::DefaultListing,
            Self::Search(_) => FetchKind::Search,
        }
    }
}

/// A default-listing fetch still awaiting its reply. `serves` starts equal to
/// `issued` and moves forward when a cleared query adopts the fetch.
#[derive(Debug, Clone, Copy)]
struct PendingDefault {
    issued: Generation,
    serves: Generation,
}

#[derive(Default)]
struct ListInner {
    session: SearchSession,
    in_flight: InFlight,
    pending_default: Option<PendingDefault>,
    disposed: bool,
}

struct ListShared {
    catalog: Arc<dyn CatalogClient>,
    state: StatePublisher<Vec<GameSummary>>,
    inner: Mutex<ListInner>,
}

/// Drives the list screen. Must be used from within a tokio runtime.
///
/// Dropping the controller tears it down.
pub struct GameListController {
    shared: Arc<ListShared>,
}

impl GameListController {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self {
            shared: Arc::new(ListShared {
                catalog,
                state: StatePublisher::new(),
                inner: Mutex::new(ListInner::default()),
            }),
        }
    }

    /// Creates the controller and performs the initial default-listing load.
    pub fn start(catalog: Arc<dyn CatalogClient>) -> Self {
        let controller = Self::new(catalog);
        controller.load_default();
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> ListState {
        self.shared.state.snapshot()
    }

    pub fn query(&self) -> String {
        self.shared.lock().session.query_text.clone()
    }

    pub fn generation(&self) -> Generation {
        self.shared.lock().session.generation
    }

    pub fn submit_query(&self, text: impl Into<String>) {
        self.shared.submit_query(text.into());
    }

    pub fn load_default(&self) {
        self.shared.fetch_now("load_default");
    }

    pub fn refresh(&self) {
        self.shared.fetch_now("refresh");
    }

    /// Cancels the pending timer and in-flight fetches. Idempotent.
    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl Drop for GameListController {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl ListShared {
    fn lock(&self) -> MutexGuard<'_, ListInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn submit_query(self: &Arc<Self>, text: String) {
        let mut inner = self.lock();
        if inner.disposed {
            debug!(query = %text, "ignoring query submitted after teardown");
            return;
        }

        let generation = inner.session.supersede();
        inner.session.query_text = text.clone();
        debug!(%generation, query = %text, "scheduled debounced query");

        let shared = Arc::clone(self);
        inner.session.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE_WINDOW).await;
            shared.on_timer_fire(generation, text);
        }));
    }

    fn on_timer_fire(self: &Arc<Self>, generation: Generation, text: String) {
        let mut inner = self.lock();
        if inner.disposed || inner.session.generation != generation {
            debug!(%generation, "debounce timer superseded");
            return;
        }
        // The firing task is this timer; dropping the handle only detaches it.
        inner.session.pending_timer = None;

        let request = ListRequest::for_query(&text);
        if request == ListRequest::Default {
            if let Some(pending) = inner.pending_default.as_mut() {
                debug!(
                    %generation,
                    issued = %pending.issued,
                    "cleared query reuses in-flight default listing"
                );
                pending.serves = generation;
                self.state.begin_loading();
                return;
            }
        }
        self.start_fetch(&mut inner, generation, request);
    }

    fn fetch_now(self: &Arc<Self>, reason: &'static str) {
        let mut inner = self.lock();
        if inner.disposed {
            debug!(reason, "ignoring fetch requested after teardown");
            return;
        }
        let generation = inner.session.supersede();
        info!(%generation, reason, "loading default listing");
        self.start_fetch(&mut inner, generation, ListRequest::Default);
    }

    fn start_fetch(
        self: &Arc<Self>,
        inner: &mut ListInner,
        generation: Generation,
        request: ListRequest,
    ) {
        self.state.begin_loading();
        if request == ListRequest::Default {
            inner.pending_default = Some(PendingDefault {
                issued: generation,
                serves: generation,
            });
        }

        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            let kind = request.kind();
            let result = match &request {
                ListRequest::Default => shared.catalog.fetch_default_listing().await,
                ListRequest::Search(query) => {
                    info!(%generation, %query, "searching catalog");
                    shared.catalog.search_listing(query).await
                }
            };
            shared.on_result_arrived(generation, kind, result);
        });
        inner.in_flight.track(task);
    }

    fn on_result_arrived(
        &self,
        generation: Generation,
        kind: FetchKind,
        result: anyhow::Result<Vec<GameSummary>>,
    ) {
        let mut inner = self.lock();
        let mut generation = generation;
        if kind == FetchKind::DefaultListing {
            if let Some(pending) = inner.pending_default.filter(|p| p.issued == generation) {
                inner.pending_default = None;
                generation = pending.serves;
            }
        }
        if inner.disposed || inner.session.generation != generation {
            debug!(
                %generation,
                current = %inner.session.generation,
                kind = kind.as_str(),
                "discarding stale listing result"
            );
            return;
        }

        match result {
            Ok(games) => {
                info!(%generation, kind = kind.as_str(), count = games.len(), "listing loaded");
                self.state.commit(LoadState::Loaded(games));
            }
            Err(err) => {
                let failure = FetchFailure::new(kind, &err);
                warn!(
                    %generation,
                    kind = kind.as_str(),
                    error = %failure.detail,
                    "listing fetch failed"
                );
                self.state.commit(LoadState::Failed(failure));
            }
        }
    }

    fn dispose(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.session.supersede();
        inner.session.query_text.clear();
        inner.pending_default = None;
        inner.in_flight.abort_all();
        debug!("list controller disposed");
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
