use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use catalog_client::CatalogClient;
use shared::domain::{GameDetail, GameId, GameSummary};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogCall {
    DefaultListing,
    Search(String),
    Detail(GameId),
}

pub(crate) enum Reply {
    Listing(Vec<GameSummary>),
    Detail(Box<GameDetail>),
}

/// A catalog request held open until the test answers it.
pub(crate) struct PendingCall {
    pub(crate) call: CatalogCall,
    reply: oneshot::Sender<Result<Reply>>,
}

impl PendingCall {
    pub(crate) fn respond_listing(self, games: Vec<GameSummary>) {
        let _ = self.reply.send(Ok(Reply::Listing(games)));
    }

    pub(crate) fn respond_detail(self, detail: GameDetail) {
        let _ = self.reply.send(Ok(Reply::Detail(Box::new(detail))));
    }

    pub(crate) fn fail(self, message: &str) {
        let _ = self.reply.send(Err(anyhow!(message.to_string())));
    }
}

/// Catalog whose every call blocks until the test responds through the
/// paired receiver.
pub(crate) struct GatedCatalog {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl GatedCatalog {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls: tx }), rx)
    }

    async fn await_reply(&self, call: CatalogCall) -> Result<Reply> {
        let (tx, rx) = oneshot::channel();
        self.calls
            .send(PendingCall { call, reply: tx })
            .map_err(|_| anyhow!("test harness dropped"))?;
        rx.await.map_err(|_| anyhow!("request abandoned"))?
    }
}

#[async_trait]
impl CatalogClient for GatedCatalog {
    async fn fetch_default_listing(&self) -> Result<Vec<GameSummary>> {
        match self.await_reply(CatalogCall::DefaultListing).await? {
            Reply::Listing(games) => Ok(games),
            Reply::Detail(_) => Err(anyhow!("detail reply to listing call")),
        }
    }

    async fn search_listing(&self, query: &str) -> Result<Vec<GameSummary>> {
        match self
            .await_reply(CatalogCall::Search(query.to_string()))
            .await?
        {
            Reply::Listing(games) => Ok(games),
            Reply::Detail(_) => Err(anyhow!("detail reply to search call")),
        }
    }

    async fn fetch_detail(&self, id: GameId) -> Result<GameDetail> {
        match self.await_reply(CatalogCall::Detail(id)).await? {
            Reply::Detail(detail) => Ok(*detail),
            Reply::Listing(_) => Err(anyhow!("listing reply to detail call")),
        }
    }
}

pub(crate) fn game(id: i64, name: &str) -> GameSummary {
    GameSummary {
        id: GameId(id),
        name: name.to_string(),
        background_image: None,
        rating: 4.5,
        released: Some("2017-03-03".to_string()),
    }
}

pub(crate) fn detail(id: i64, name: &str) -> GameDetail {
    GameDetail {
        id: GameId(id),
        name: name.to_string(),
        background_image: None,
        rating: 4.5,
        released: None,
        developers: Vec::new(),
        publishers: Vec::new(),
        genres: Vec::new(),
        platforms: Vec::new(),
        description_raw: Some("An adventure.".to_string()),
        website: None,
        ratings_count: 10,
    }
}

/// Lets every ready task run and every due timer fire. Requires a paused
/// clock.
pub(crate) async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub(crate) async fn next_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>) -> PendingCall {
    settle().await;
    calls.try_recv().expect("expected a catalog call")
}

pub(crate) async fn assert_no_calls(calls: &mut mpsc::UnboundedReceiver<PendingCall>) {
    settle().await;
    if let Ok(pending) = calls.try_recv() {
        panic!("unexpected catalog call: {:?}", pending.call);
    }
}
