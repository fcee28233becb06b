//! Push channel manager for live task notifications.

use std::sync::{Mutex as StdMutex, PoisonError};
use std::time::Duration;

use futures::stream::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use tasksync_core::notify::model::{EventKind, EventPayload, PushEvent};

use crate::error::ClientResult;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_CAPACITY: usize = 100;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Owned manager for the notification WebSocket.
///
/// One instance per signed-in session. `connect` authenticates during the
/// handshake and keeps the connection alive with exponential backoff;
/// delivery is at-most-once, so a dropped connection may lose events and
/// never replays them. Decoded events fan out to every subscriber.
pub struct PushChannel {
    url: String,
    events: broadcast::Sender<PushEvent>,
    conn: Mutex<Option<JoinHandle<()>>>,
    handlers: StdMutex<Vec<AbortHandle>>,
}

impl PushChannel {
    pub fn new(url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            url: url.into(),
            events,
            conn: Mutex::new(None),
            handlers: StdMutex::new(Vec::new()),
        }
    }

    /// Open the connection, authenticating with `token` at the handshake.
    ///
    /// Calling while already connected is a no-op. After the first
    /// successful handshake, lost connections are retried in the background;
    /// a rejected handshake here surfaces as an error instead.
    pub async fn connect(&self, token: &str) -> ClientResult<()> {
        let mut conn = self.conn.lock().await;
        if let Some(task) = conn.as_ref() {
            if !task.is_finished() {
                debug!("push channel already connected");
                return Ok(());
            }
        }

        let stream = handshake(&self.url, token).await?;
        info!(url = %self.url, "push channel connected");

        let url = self.url.clone();
        let token = token.to_string();
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let mut ws = stream;
            loop {
                pump(ws, &events).await;
                warn!("push channel connection lost");
                let mut delay = INITIAL_BACKOFF;
                ws = loop {
                    tokio::time::sleep(delay).await;
                    match handshake(&url, &token).await {
                        Ok(ws) => break ws,
                        Err(e) => {
                            debug!(error = %e, delay_secs = delay.as_secs(), "push channel reconnect failed");
                            delay = (delay * 2).min(MAX_BACKOFF);
                        }
                    }
                };
                info!("push channel reconnected");
            }
        });
        *conn = Some(task);
        Ok(())
    }

    /// Whether a connection task is currently running.
    pub async fn is_connected(&self) -> bool {
        match self.conn.lock().await.as_ref() {
            Some(task) => !task.is_finished(),
            None => false,
        }
    }

    /// Release the connection and unregister every handler. Called on
    /// logout; safe to call when not connected.
    pub async fn disconnect(&self) {
        if let Some(task) = self.conn.lock().await.take() {
            task.abort();
            info!("push channel disconnected");
        }
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in handlers.drain(..) {
            handle.abort();
        }
    }

    /// Raw stream of every decoded push event.
    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.events.subscribe()
    }

    /// Register a handler for one event kind.
    ///
    /// The handler runs until the returned subscription is dropped or the
    /// channel is disconnected.
    pub fn on<F>(&self, kind: EventKind, mut handler: F) -> Subscription
    where
        F: FnMut(EventPayload) + Send + 'static,
    {
        let mut rx = self.events.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.kind() == kind => handler(event.payload().clone()),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "push event handler lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        let handle = task.abort_handle();
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        handlers.retain(|h| !h.is_finished());
        handlers.push(handle.clone());
        debug!(kind = %kind.as_str(), "push handler registered");
        Subscription { handle }
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        if let Ok(mut conn) = self.conn.try_lock() {
            if let Some(task) = conn.take() {
                task.abort();
            }
        }
        let mut handlers = self.handlers.lock().unwrap_or_else(PoisonError::into_inner);
        for handle in handlers.drain(..) {
            handle.abort();
        }
    }
}

/// Handle for a registered handler. Dropping it unregisters the handler.
#[must_use = "dropping a subscription unregisters its handler"]
pub struct Subscription {
    handle: AbortHandle,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Open the WebSocket with the bearer token on the upgrade request.
async fn handshake(url: &str, token: &str) -> ClientResult<WsStream> {
    let mut request = url.into_client_request()?;
    request.headers_mut().insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| tungstenite::Error::HttpFormat(e.into()))?,
    );
    let (stream, _) = connect_async(request).await?;
    Ok(stream)
}

/// Read frames until the connection drops, fanning decoded events out.
async fn pump(mut ws: WsStream, events: &broadcast::Sender<PushEvent>) {
    while let Some(frame) = ws.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<PushEvent>(text.as_str()) {
                Ok(event) => {
                    debug!(kind = %event.kind().as_str(), "push event received");
                    let _ = events.send(event);
                }
                Err(e) => {
                    debug!(error = %e, "ignoring undecodable push frame");
                }
            },
            Ok(Message::Close(_)) => {
                debug!("push server sent close frame");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "push socket error");
                break;
            }
        }
    }
}
