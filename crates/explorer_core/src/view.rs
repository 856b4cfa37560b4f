//! Display-ready view models computed from controller state.
//!
//! Nothing here touches the catalog; these are pure mappings the front-end
//! renders without further formatting.

use shared::domain::{GameDetail, GameId, GameSummary, NamedRef};

use crate::{detail::DetailState, lifecycle::LoadState, list::ListState};

pub const CARD_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";
pub const BANNER_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400";
pub const EMPTY_LIST_MESSAGE: &str = "No games found. Try a different search.";
pub const RETRY_LABEL: &str = "Try Again";
pub const LIST_LOADING_MESSAGE: &str = "Loading games...";
pub const DETAIL_LOADING_MESSAGE: &str = "Loading details...";

/// One row of the game list.
#[derive(Debug, Clone, PartialEq)]
pub struct GameCard {
    pub id: GameId,
    pub title: String,
    pub image_url: String,
    pub rating_label: String,
    pub released_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Idle,
    Loading { message: &'static str },
    Empty { message: &'static str },
    Games(Vec<GameCard>),
    Failed {
        message: &'static str,
        retry_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub banner_url: String,
    pub rating_label: String,
    pub ratings_count_label: String,
    pub released_label: String,
    pub developers: Option<String>,
    pub publishers: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailScreen {
    Idle,
    Loading { message: &'static str },
    Loaded(Box<DetailView>),
    Failed {
        message: &'static str,
        retry_label: &'static str,
    },
}

pub fn rating_label(rating: f64) -> String {
    format!("⭐ {rating}/5")
}

pub fn game_card(game: &GameSummary) -> GameCard {
    GameCard {
        id: game.id,
        title: game.name.clone(),
        image_url: game
            .background_image
            .clone()
            .unwrap_or_else(|| CARD_PLACEHOLDER_IMAGE.to_string()),
        rating_label: rating_label(game.rating),
        released_label: format!("Released: {}", game.released.as_deref().unwrap_or("N/A")),
    }
}

pub fn list_view(state: &ListState) -> ListView {
    match state {
        LoadState::Idle => ListView::Idle,
        LoadState::Loading => ListView::Loading {
            message: LIST_LOADING_MESSAGE,
        },
        LoadState::Loaded(games) if games.is_empty() => ListView::Empty {
            message: EMPTY_LIST_MESSAGE,
        },
        LoadState::Loaded(games) => ListView::Games(games.iter().map(game_card).collect()),
        LoadState::Failed(failure) => ListView::Failed {
            message: failure.message(),
            retry_label: RETRY_LABEL,
        },
    }
}

fn joined_names(refs: &[NamedRef]) -> Option<String> {
    if refs.is_empty() {
        return None;
    }
    Some(
        refs.iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

pub fn detail_view(game: &GameDetail) -> DetailView {
    DetailView {
        title: game.name.clone(),
        banner_url: game
            .background_image
            .clone()
            .unwrap_or_else(|| BANNER_PLACEHOLDER_IMAGE.to_string()),
        rating_label: rating_label(game.rating),
        ratings_count_label: format!("({} ratings)", game.ratings_count),
        released_label: game
            .released
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        developers: joined_names(&game.developers),
        publishers: joined_names(&game.publishers),
        genres: game.genres.iter().map(|g| g.name.clone()).collect(),
        platforms: game
            .platforms
            .iter()
            .map(|p| p.platform.name.clone())
            .collect(),
        description: game.description_raw.clone(),
        website: game.website.clone(),
    }
}

pub fn detail_screen(state: &DetailState) -> DetailScreen {
    match state {
        LoadState::Idle => DetailScreen::Idle,
        LoadState::Loading => DetailScreen::Loading {
            message: DETAIL_LOADING_MESSAGE,
        },
        LoadState::Loaded(game) => DetailScreen::Loaded(Box::new(detail_view(game))),
        LoadState::Failed(failure) => DetailScreen::Failed {
            message: failure.message(),
            retry_label: RETRY_LABEL,
        },
    }
}
