//! Plain-text rendering of the view models to stdout.

use explorer_core::view::{DetailScreen, DetailView, GameCard, ListView};

pub const ONE_SHOT_RETRY_HINT: &str = "run the command again";
pub const BROWSE_RETRY_HINT: &str = "type :retry, or :back for the list";

pub fn title(title: &str) {
    println!("\n== {title} ==");
}

pub fn notice(message: &str) {
    println!("-- {message}");
}

pub fn browse_help() {
    println!("Type to search (results follow after a short pause).");
    println!("  :open <n>   show details for entry n");
    println!("  :refresh    reload the default listing");
    println!("  :retry      reload a failed detail view");
    println!("  :back       return from a detail view to the list");
    println!("  :quit       exit");
}

fn card(index: usize, card: &GameCard) {
    println!(
        "{:>3}. {}  {}  {}",
        index + 1,
        card.title,
        card.rating_label,
        card.released_label
    );
}

pub fn list(view: &ListView) {
    match view {
        ListView::Idle => {}
        ListView::Loading { message } => notice(message),
        ListView::Empty { message } => notice(message),
        ListView::Games(cards) => {
            for (index, c) in cards.iter().enumerate() {
                card(index, c);
            }
        }
        ListView::Failed {
            message,
            retry_label,
        } => {
            println!("!! {message}");
            println!("   [{retry_label}] type :refresh or edit the search");
        }
    }
}

fn loaded(view: &DetailView) {
    println!("{}", view.title);
    println!("{} {}", view.rating_label, view.ratings_count_label);
    println!("Released: {}", view.released_label);
    if let Some(developers) = &view.developers {
        println!("Developer: {developers}");
    }
    if let Some(publishers) = &view.publishers {
        println!("Publisher: {publishers}");
    }
    if !view.genres.is_empty() {
        println!("Genres: {}", view.genres.join(" | "));
    }
    if !view.platforms.is_empty() {
        println!("Platforms: {}", view.platforms.join(" | "));
    }
    if let Some(description) = &view.description {
        println!("\n{description}\n");
    }
    if let Some(website) = &view.website {
        println!("Official site: {website}");
    }
    println!("Image: {}", view.banner_url);
}

pub fn detail(screen: &DetailScreen, retry_hint: &str) {
    match screen {
        DetailScreen::Idle => {}
        DetailScreen::Loading { message } => notice(message),
        DetailScreen::Loaded(view) => loaded(view),
        DetailScreen::Failed {
            message,
            retry_label,
        } => {
            println!("!! {message}");
            println!("   [{retry_label}] {retry_hint}");
        }
    }
}
