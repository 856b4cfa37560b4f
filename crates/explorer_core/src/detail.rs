//! Controller for the game detail screen.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use catalog_client::CatalogClient;
use shared::domain::{GameDetail, GameId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    lifecycle::{FetchFailure, FetchKind, Generation, InFlight, LoadState, StatePublisher},
    navigation::detail_title,
};

pub type DetailState = LoadState<GameDetail>;

#[derive(Default)]
struct DetailInner {
    generation: Generation,
    in_flight: InFlight,
    disposed: bool,
}

struct DetailShared {
    catalog: Arc<dyn CatalogClient>,
    game_id: GameId,
    state: StatePublisher<GameDetail>,
    inner: Mutex<DetailInner>,
}

pub struct DetailController {
    name: String,
    shared: Arc<DetailShared>,
}

impl DetailController {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        game_id: GameId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            shared: Arc::new(DetailShared {
                catalog,
                game_id,
                state: StatePublisher::new(),
                inner: Mutex::new(DetailInner::default()),
            }),
        }
    }

    /// Creates the controller and issues the detail fetch right away.
    pub fn start(
        catalog: Arc<dyn CatalogClient>,
        game_id: GameId,
        name: impl Into<String>,
    ) -> Self {
        let controller = Self::new(catalog, game_id, name);
        controller.load();
        controller
    }

    pub fn game_id(&self) -> GameId {
        self.shared.game_id
    }

    pub fn title(&self) -> &str {
        detail_title(&self.name)
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.shared.state.snapshot()
    }

    pub fn load(&self) {
        self.shared.fetch("load");
    }

    pub fn retry(&self) {
        self.shared.fetch("retry");
    }

    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl Drop for DetailController {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl DetailShared {
    fn lock(&self) -> MutexGuard<'_, DetailInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetch(self: &Arc<Self>, reason: &'static str) {
        let mut inner = self.lock();
        if inner.disposed {
            debug!(game_id = %self.game_id, reason, "ignoring detail fetch after teardown");
            return;
        }
        inner.generation = inner.generation.next();
        let generation = inner.generation;
        info!(game_id = %self.game_id, %generation, reason, "loading game details");
        self.state.begin_loading();

        let shared = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = shared.catalog.fetch_detail(shared.game_id).await;
            shared.on_result_arrived(generation, result);
        });
        inner.in_flight.track(task);
    }

    fn on_result_arrived(&self, generation: Generation, result: anyhow::Result<GameDetail>) {
        let inner = self.lock();
        if inner.disposed || inner.generation != generation {
            debug!(game_id = %self.game_id, %generation, "discarding stale detail result");
            return;
        }

        match result {
            Ok(detail) => {
                self.state.commit(LoadState::Loaded(detail));
            }
            Err(err) => {
                let failure = FetchFailure::new(FetchKind::Detail, &err);
                warn!(game_id = %self.game_id, error = %failure.detail, "detail fetch failed");
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
        inner.generation = inner.generation.next();
        inner.in_flight.abort_all();
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
