//! Screen controllers for browsing the game catalog.
//!
//! [`list::GameListController`] owns the debounced search session of the list
//! screen; [`detail::DetailController`] loads a single game. Both publish a
//! [`lifecycle::LoadState`] over a watch channel and discard results from
//! superseded requests.

pub mod detail;
pub mod lifecycle;
pub mod list;
pub mod navigation;
pub mod view;

pub use detail::{DetailController, DetailState};
pub use lifecycle::{FetchFailure, FetchKind, Generation, LoadState};
pub use list::{GameListController, ListState, SearchSession, DEBOUNCE_WINDOW};
pub use navigation::{Navigator, Route};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
