//! In-process request/response channel between the launcher and the
//! platform side.
//!
//! [`HostClient`] is what the source adapters talk to; it implements
//! [`BrowserApi`]. [`HostServer`] owns the [`RequestHandler`] and answers
//! each request on its own task, so a slow history lookup never holds up a
//! tab lookup.

use std::sync::Arc;

use async_trait::async_trait;
use quicklaunch_search::{BookmarkItem, BrowserApi, HistoryItem, SearchError, TabItem};
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, oneshot};

use crate::config::HostConfig;
use crate::error::{LauncherError, Result};
use crate::host::contract::{HostRequest, SearchItems};
use crate::host::handler::{PlatformHandler, RequestHandler};

struct HostCall {
    request: HostRequest,
    response_tx: oneshot::Sender<Result<serde_json::Value>>,
}

/// Launcher-side handle to the host channel. Cheap to clone.
#[derive(Clone)]
pub struct HostClient {
    request_tx: mpsc::Sender<HostCall>,
}

impl HostClient {
    /// Send a request and wait for its payload.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Channel`] if the server is gone, or the
    /// handler's error for a failed action.
    pub async fn send(&self, request: HostRequest) -> Result<serde_json::Value> {
        let kind = request.kind();
        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(HostCall {
                request,
                response_tx,
            })
            .await
            .map_err(|e| LauncherError::Channel(format!("failed to send {kind} request: {e}")))?;

        response_rx
            .await
            .map_err(|e| LauncherError::Channel(format!("{kind} response dropped: {e}")))?
    }

    pub async fn search_tabs(&self, query: &str) -> Result<Vec<TabItem>> {
        self.search_items(HostRequest::search_tabs(query)).await
    }

    pub async fn search_history(&self, query: &str) -> Result<Vec<HistoryItem>> {
        self.search_items(HostRequest::search_history(query)).await
    }

    pub async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkItem>> {
        self.search_items(HostRequest::search_bookmarks(query))
            .await
    }

    pub async fn open_tab(&self, url: &str) -> Result<()> {
        self.send(HostRequest::open_tab(url)).await.map(|_| ())
    }

    pub async fn switch_to_tab(&self, tab_id: i64) -> Result<()> {
        self.send(HostRequest::switch_to_tab(tab_id))
            .await
            .map(|_| ())
    }

    async fn search_items<T: DeserializeOwned>(&self, request: HostRequest) -> Result<Vec<T>> {
        let kind = request.kind();
        let payload = self.send(request).await?;
        let items: SearchItems<T> = serde_json::from_value(payload).map_err(|e| {
            LauncherError::Protocol(format!("malformed {kind} response: {e}"))
        })?;
        Ok(items.items)
    }
}

#[async_trait]
impl BrowserApi for HostClient {
    async fn lookup_tabs(&self, query: &str) -> quicklaunch_search::Result<Vec<TabItem>> {
        self.search_tabs(query).await.map_err(lookup_error)
    }

    async fn lookup_history(&self, query: &str) -> quicklaunch_search::Result<Vec<HistoryItem>> {
        self.search_history(query).await.map_err(lookup_error)
    }

    async fn lookup_bookmarks(&self, query: &str) -> quicklaunch_search::Result<Vec<BookmarkItem>> {
        self.search_bookmarks(query).await.map_err(lookup_error)
    }

    async fn open_url(&self, url: &str) -> quicklaunch_search::Result<()> {
        self.open_tab(url).await.map_err(action_error)
    }

    async fn activate_tab(&self, tab_id: i64) -> quicklaunch_search::Result<()> {
        self.switch_to_tab(tab_id).await.map_err(action_error)
    }
}

fn lookup_error(e: LauncherError) -> SearchError {
    SearchError::Lookup(e.to_string())
}

fn action_error(e: LauncherError) -> SearchError {
    SearchError::Action(e.to_string())
}

/// Platform-side end of the host channel.
pub struct HostServer<P: PlatformHandler> {
    request_rx: mpsc::Receiver<HostCall>,
    handler: Arc<RequestHandler<P>>,
}

/// Create a connected client/server pair over `platform`.
#[must_use]
pub fn host_channel<P: PlatformHandler>(
    platform: Arc<P>,
    config: &HostConfig,
) -> (HostClient, HostServer<P>) {
    let (request_tx, request_rx) = mpsc::channel(config.request_capacity.max(1));
    (
        HostClient { request_tx },
        HostServer {
            request_rx,
            handler: Arc::new(RequestHandler::new(platform, config)),
        },
    )
}

impl<P: PlatformHandler> HostServer<P> {
    /// Serve requests until every [`HostClient`] has been dropped.
    pub async fn run(mut self) {
        while let Some(call) = self.request_rx.recv().await {
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                let response = handler.handle(&call.request).await;
                if let Err(e) = &response {
                    tracing::warn!(kind = %call.request.kind(), error = %e, "host request failed");
                }
                let _ = call.response_tx.send(response);
            });
        }
        tracing::debug!("host channel closed");
    }
}
