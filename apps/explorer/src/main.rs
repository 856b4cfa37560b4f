use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use catalog_client::{load_settings, CatalogClient, RawgClient, Settings};
use clap::{Parser, Subcommand};
use explorer_core::{
    view::{detail_screen, list_view},
    DetailController, DetailState, GameListController, LoadState, Navigator, Route,
};
use shared::domain::GameId;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "explorer", about = "Browse the RAWG video game catalog")]
struct Args {
    /// Catalog base url, overriding explorer.toml and APP__BASE_URL.
    #[arg(long)]
    base_url: Option<String>,
    /// API key, overriding explorer.toml, RAWG_API_KEY and APP__API_KEY.
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default listing.
    List,
    /// Print search results for a query.
    Search { query: String },
    /// Print one game's details.
    Detail {
        id: i64,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Interactive search-as-you-type session (default).
    Browse,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    Help,
    Refresh,
    Retry,
    Back,
    Open(usize),
    Query(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            ":q" | ":quit" => Self::Quit,
            ":h" | ":help" => Self::Help,
            ":r" | ":refresh" => Self::Refresh,
            ":retry" => Self::Retry,
            ":b" | ":back" => Self::Back,
            _ => match trimmed.strip_prefix(":open ") {
                Some(n) => n
                    .trim()
                    .parse::<usize>()
                    .map(Self::Open)
                    .unwrap_or_else(|_| Self::Query(line.to_string())),
                None => Self::Query(line.to_string()),
            },
        }
    }
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings().context("failed to load settings")?;
    if let Some(v) = &args.base_url {
        settings.base_url = v.clone();
    }
    if let Some(v) = &args.api_key {
        settings.api_key = Some(v.clone());
    }
    if let Some(v) = args.page_size {
        if v == 0 {
            bail!("--page-size must be positive");
        }
        settings.page_size = v;
    }
    Ok(settings)
}

async fn settled<T: Clone>(rx: &mut watch::Receiver<LoadState<T>>) -> Result<LoadState<T>> {
    let state = rx
        .wait_for(|state| !matches!(state, LoadState::Idle | LoadState::Loading))
        .await
        .context("controller shut down before the fetch finished")?;
    Ok(state.clone())
}

fn ensure_loaded<T>(state: &LoadState<T>) -> Result<()> {
    match state.failure() {
        Some(failure) => Err(anyhow!("{}", failure.detail)),
        None => Ok(()),
    }
}

async fn run_list(catalog: Arc<dyn CatalogClient>, query: Option<String>) -> Result<()> {
    let controller = match query {
        Some(query) => {
            let controller = GameListController::new(catalog);
            controller.submit_query(query);
            controller
        }
        None => GameListController::start(catalog),
    };
    let mut rx = controller.subscribe();
    let state = settled(&mut rx).await?;
    render::list(&list_view(&state));
    ensure_loaded(&state)
}

async fn run_detail(catalog: Arc<dyn CatalogClient>, route: &Route) -> Result<()> {
    let Route::GameDetail { id, name } = route else {
        bail!("not a detail route");
    };
    let controller = DetailController::start(catalog, *id, name.clone());
    let mut rx = controller.subscribe();
    let state = settled(&mut rx).await?;
    render::title(controller.title());
    render::detail(&detail_screen(&state), render::ONE_SHOT_RETRY_HINT);
    ensure_loaded(&state)
}

/// The detail screen pushed over the list while browsing.
struct OpenDetail {
    controller: DetailController,
    states: watch::Receiver<DetailState>,
}

impl OpenDetail {
    fn open(catalog: Arc<dyn CatalogClient>, route: &Route) -> Option<Self> {
        let Route::GameDetail { id, name } = route else {
            return None;
        };
        let controller = DetailController::start(catalog, *id, name.clone());
        let states = controller.subscribe();
        Some(Self { controller, states })
    }
}

/// Resolves when the open detail screen publishes a new state. Never resolves
/// while no detail screen is open.
async fn detail_changed(detail: &mut Option<OpenDetail>) -> bool {
    match detail {
        Some(open) => open.states.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}

async fn browse(catalog: Arc<dyn CatalogClient>) -> Result<()> {
    let list = GameListController::start(Arc::clone(&catalog));
    let mut states = list.subscribe();
    let mut navigator = Navigator::default();
    let mut detail: Option<OpenDetail> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render::title(navigator.current().title());
    render::browse_help();

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                if detail.is_none() {
                    render::list(&list_view(&state));
                }
            }
            alive = detail_changed(&mut detail) => {
                if !alive {
                    detail = None;
                    continue;
                }
                let Some(open) = detail.as_mut() else {
                    continue;
                };
                let state = open.states.borrow_and_update().clone();
                render::detail(&detail_screen(&state), render::BROWSE_RETRY_HINT);
                if let Some(failure) = state.failure() {
                    warn!(
                        game_id = %open.controller.game_id(),
                        error = %failure.detail,
                        "detail view failed"
                    );
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Help => render::browse_help(),
                    Input::Refresh => list.refresh(),
                    Input::Retry => match &detail {
                        Some(open) if open.controller.state().failure().is_some() => {
                            open.controller.retry();
                        }
                        _ => render::notice("nothing to retry"),
                    },
                    Input::Back => {
                        if detail.take().is_none() || !navigator.back() {
                            render::notice("already at the game list");
                            continue;
                        }
                        render::title(navigator.current().title());
                        render::list(&list_view(&list.state()));
                    }
                    Input::Query(text) => list.submit_query(text),
                    Input::Open(n) => {
                        let selected = list
                            .state()
                            .loaded()
                            .and_then(|games| games.get(n.wrapping_sub(1)))
                            .map(Route::from);
                        let Some(route) = selected else {
                            render::notice(&format!("no game #{n} in the current list"));
                            continue;
                        };
                        if detail.take().is_some() {
                            navigator.back();
                        }
                        detail = OpenDetail::open(Arc::clone(&catalog), &route);
                        render::title(route.title());
                        navigator.push(route);
                    }
                }
            }
        }
    }

    if let Some(open) = detail.take() {
        open.controller.dispose();
    }
    list.dispose();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    if settings.api_key.is_none() {
        warn!("no API key configured; set RAWG_API_KEY or pass --api-key");
    }
    let client = RawgClient::new(&settings)?;
    info!(base_url = %client.base_url(), page_size = settings.page_size, "catalog client ready");
    let catalog: Arc<dyn CatalogClient> = Arc::new(client);

    match args.command.unwrap_or(Command::Browse) {
        Command::List => run_list(catalog, None).await,
        Command::Search { query } => run_list(catalog, Some(query)).await,
        Command::Detail { id, name } => {
            run_detail(catalog, &Route::GameDetail { id: GameId(id), name }).await
        }
        Command::Browse => browse(catalog).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browse_commands() {
        assert_eq!(Input::parse(":quit"), Input::Quit);
        assert_eq!(Input::parse(" :r "), Input::Refresh);
        assert_eq!(Input::parse(":open 3"), Input::Open(3));
        assert_eq!(Input::parse(":retry"), Input::Retry);
        assert_eq!(Input::parse(":back"), Input::Back);
        assert_eq!(Input::parse(":open x"), Input::Query(":open x".to_string()));
        assert_eq!(Input::parse(""), Input::Query(String::new()));
        assert_eq!(Input::parse("zelda "), Input::Query("zelda ".to_string()));
    }

    #[test]
    fn cli_defaults_to_browse() {
        let args = Args::try_parse_from(["explorer"]).expect("args");
        assert!(args.command.is_none());

        let args = Args::try_parse_from(["explorer", "detail", "3498", "--name", "GTA V"])
            .expect("args");
        assert!(matches!(
            args.command,
            Some(Command::Detail { id: 3498, ref name }) if name == "GTA V"
        ));
    }

    #[test]
    fn only_detail_routes_open_a_detail_view() {
        let client = RawgClient::new(&Settings::default()).expect("client");
        let catalog: Arc<dyn CatalogClient> = Arc::new(client);
        assert!(OpenDetail::open(catalog, &Route::GameList).is_none());
    }

    #[tokio::test]
    async fn closed_detail_never_blocks_other_input() {
        let mut detail = None;
        let signalled = tokio::select! {
            biased;
            _ = detail_changed(&mut detail) => true,
            _ = std::future::ready(()) => false,
        };
        assert!(!signalled);
    }
}
