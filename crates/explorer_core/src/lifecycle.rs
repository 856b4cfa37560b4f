//! Request lifecycle primitives shared by the list and detail screens.
//!
//! Every fetch is tagged with the [`Generation`] that was current when it
//! started. A result only commits to the published [`LoadState`] if that tag is
//! still current when it arrives, so a slow superseded response can never
//! overwrite a newer one.

use std::fmt;

use tokio::{sync::watch, task::JoinHandle};

/// Monotonic tag identifying the request the screen currently cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    DefaultListing,
    Search,
    Detail,
}

impl FetchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DefaultListing => "default_listing",
            Self::Search => "search",
            Self::Detail => "detail",
        }
    }
}

/// Why a fetch failed. `detail` is the collaborator's message and is not
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FetchKind,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(kind: FetchKind, err: &anyhow::Error) -> Self {
        Self {
            kind,
            detail: format!("{err:#}"),
        }
    }

    /// Message shown to the user in place of the content.
    pub fn message(&self) -> &'static str {
        match self.kind {
            FetchKind::DefaultListing => "Failed to load games. Please try again.",
            FetchKind::Search => "Search failed. Please try again.",
            FetchKind::Detail => "Failed to load game details. Please try again.",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.detail)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(FetchFailure),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Owns the watch channel a screen renders from.
pub(crate) struct StatePublisher<T> {
    tx: watch::Sender<LoadState<T>>,
}

impl<T> StatePublisher<T> {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadState::Idle);
        Self { tx }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.tx.subscribe()
    }

    /// `Loading -> Loading` does not notify subscribers.
    pub(crate) fn begin_loading(&self) {
        self.tx.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = LoadState::Loading;
                true
            }
        });
    }

    pub(crate) fn commit(&self, next: LoadState<T>) {
        self.tx.send_replace(next);
    }
}

impl<T: Clone> StatePublisher<T> {
    pub(crate) fn snapshot(&self) -> LoadState<T> {
        self.tx.borrow().clone()
    }
}

/// Fetch tasks that may still complete; aborted on teardown.
#[derive(Default)]
pub(crate) struct InFlight {
    tasks: Vec<JoinHandle<()>>,
}

impl InFlight {
    pub(crate) fn track(&mut self, task: JoinHandle<()>) {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(task);
    }

    pub(crate) fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.abort_all();
    }
}
