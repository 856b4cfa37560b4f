//! Routes between the list and detail screens.

use shared::domain::{GameId, GameSummary};

pub const LIST_TITLE: &str = "Game Explorer";
pub const DETAIL_FALLBACK_TITLE: &str = "Game Details";

static ROOT: Route = Route::GameList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    GameList,
    GameDetail { id: GameId, name: String },
}

impl Route {
    pub fn title(&self) -> &str {
        match self {
            Self::GameList => LIST_TITLE,
            Self::GameDetail { name, .. } => detail_title(name),
        }
    }
}

impl From<&GameSummary> for Route {
    fn from(game: &GameSummary) -> Self {
        Self::GameDetail {
            id: game.id,
            name: game.name.clone(),
        }
    }
}

pub fn detail_title(name: &str) -> &str {
    if name.trim().is_empty() {
        DETAIL_FALLBACK_TITLE
    } else {
        name
    }
}

/// Back stack rooted at the list screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            stack: vec![Route::GameList],
        }
    }
}

impl Navigator {
    pub fn current(&self) -> &Route {
        self.stack.last().unwrap_or(&ROOT)
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Pops back toward the list. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }
}
