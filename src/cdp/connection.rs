//! CDP WebSocket connection implementation
//!
//! The socket is split once connected: a writer task drains an outgoing
//! queue and a reader task routes responses to their waiters and events to
//! subscribers. Neither side ever holds a lock across a socket await.

use super::traits::{CdpConnection, CdpError as CdpErrorResponse, CdpEvent, CdpResponse};
use super::types::*;
use crate::Error;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, PendingCommand>>>;
type Subscribers = Arc<Mutex<Vec<mpsc::UnboundedSender<CdpEvent>>>>;

/// CDP timeout configuration
#[derive(Debug, Clone)]
struct CdpTimeoutConfig {
    /// Default timeout for most commands (seconds)
    default_timeout_secs: u64,
    /// Timeout for screenshot commands (seconds)
    screenshot_timeout_secs: u64,
    /// Timeout for page navigation commands (seconds)
    navigation_timeout_secs: u64,
}

impl Default for CdpTimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            screenshot_timeout_secs: 90,
            navigation_timeout_secs: 60,
        }
    }
}

impl CdpTimeoutConfig {
    /// Get timeout duration for a specific command method
    fn get_timeout_for_command(&self, method: &str) -> tokio::time::Duration {
        let secs = match method {
            "Page.captureScreenshot" => self.screenshot_timeout_secs,
            "Page.navigate" | "Page.reload" | "Page.navigateToHistoryEntry" => {
                self.navigation_timeout_secs
            }
            _ => self.default_timeout_secs,
        };
        tokio::time::Duration::from_secs(secs)
    }
}

/// Pending command response
#[derive(Debug)]
struct PendingCommand {
    /// Response channel sender
    sender: oneshot::Sender<CdpResponse>,
    /// Command method (for logging)
    method: String,
}

/// CDP WebSocket connection implementation
#[derive(Debug)]
pub struct CdpWebSocketConnection {
    /// WebSocket URL
    url: String,
    /// Outgoing frames, drained by the writer task
    outgoing: mpsc::UnboundedSender<Message>,
    /// Next command ID
    next_id: AtomicU64,
    /// Pending commands (ID -> response sender)
    pending_commands: PendingMap,
    /// Event subscribers
    event_subscribers: Subscribers,
    /// Is connection active
    is_active: Arc<AtomicBool>,
    /// Timeout configuration
    timeout_config: CdpTimeoutConfig,
}

impl CdpWebSocketConnection {
    /// Connect to a target WebSocket URL
    ///
    /// # Arguments
    /// * `url` - WebSocket URL (e.g., "ws://localhost:9222/devtools/page/ABC123")
    pub async fn connect<S: Into<String>>(url: S) -> Result<Arc<Self>, Error> {
        let url = url.into();
        info!("Connecting to CDP target {}", url);

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::websocket(format!("Failed to connect to {}: {}", url, e)))?;

        let (sink, stream) = ws_stream.split();
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();

        let connection = Arc::new(Self {
            url,
            outgoing,
            next_id: AtomicU64::new(1),
            pending_commands: Arc::new(Mutex::new(HashMap::new())),
            event_subscribers: Arc::new(Mutex::new(Vec::new())),
            is_active: Arc::new(AtomicBool::new(true)),
            timeout_config: CdpTimeoutConfig::default(),
        });

        tokio::spawn(Self::write_loop(sink, outgoing_rx, Arc::clone(&connection.is_active)));
        tokio::spawn(Self::read_loop(
            stream,
            Arc::clone(&connection.pending_commands),
            Arc::clone(&connection.event_subscribers),
            Arc::clone(&connection.is_active),
        ));

        info!("CDP connection established");
        Ok(connection)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn write_loop(
        mut sink: SplitSink<WsStream, Message>,
        mut outgoing: mpsc::UnboundedReceiver<Message>,
        is_active: Arc<AtomicBool>,
    ) {
        while let Some(message) = outgoing.recv().await {
            let closing = matches!(message, Message::Close(_));
            if let Err(e) = sink.send(message).await {
                error!("Failed to send WebSocket frame: {}", e);
                is_active.store(false, Ordering::SeqCst);
                break;
            }
            if closing {
                break;
            }
        }
        debug!("CDP writer task exited");
    }

    async fn read_loop(
        mut stream: SplitStream<WsStream>,
        pending_commands: PendingMap,
        event_subscribers: Subscribers,
        is_active: Arc<AtomicBool>,
    ) {
        while let Some(frame) = stream.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    Self::handle_message(&text, &pending_commands, &event_subscribers).await;
                }
                Ok(Message::Close(_)) => {
                    info!("WebSocket close frame received");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket read error: {}", e);
                    break;
                }
            }
        }

        is_active.store(false, Ordering::SeqCst);
        // Dropping the senders wakes every waiter with a closed-channel error
        pending_commands.lock().await.clear();
        debug!("CDP reader task exited");
    }

    /// Route one incoming text frame
    async fn handle_message(text: &str, pending_commands: &PendingMap, event_subscribers: &Subscribers) {
        let incoming: CdpIncoming = match serde_json::from_str(text) {
            Ok(incoming) => incoming,
            Err(e) => {
                warn!("Unparseable CDP message ({}): {}", e, text);
                return;
            }
        };

        if let Some(id) = incoming.id {
            let pending = pending_commands.lock().await.remove(&id);
            match pending {
                Some(pending_cmd) => {
                    debug!("Response for command {}: {}", id, pending_cmd.method);
                    let response = CdpResponse {
                        id,
                        result: Some(incoming.result),
                        error: incoming.error.map(|e| CdpErrorResponse {
                            code: e.code,
                            message: e.message,
                            data: e.data,
                        }),
                    };
                    let _ = pending_cmd.sender.send(response);
                }
                None => warn!("Received response for unknown command ID: {}", id),
            }
            return;
        }

        if let Some(method) = incoming.method {
            let event = CdpEvent {
                method,
                params: incoming.params,
            };
            let mut subscribers = event_subscribers.lock().await;
            subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        }
    }
}

#[async_trait]
impl CdpConnection for CdpWebSocketConnection {
    /// Send a CDP command and wait for response
    async fn send_command(&self, method: &str, params: serde_json::Value) -> Result<CdpResponse, Error> {
        if !self.is_active.load(Ordering::SeqCst) {
            return Err(Error::websocket("Connection is not active"));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: if params.is_null() { None } else { Some(params) },
        };
        let json = serde_json::to_string(&request)?;
        debug!("Sending CDP command {}: {}", id, method);

        let (sender, receiver) = oneshot::channel();
        self.pending_commands.lock().await.insert(
            id,
            PendingCommand {
                sender,
                method: method.to_string(),
            },
        );

        if self.outgoing.send(Message::Text(json)).is_err() {
            self.pending_commands.lock().await.remove(&id);
            return Err(Error::websocket("Writer task is gone"));
        }

        let timeout_duration = self.timeout_config.get_timeout_for_command(method);
        match tokio::time::timeout(timeout_duration, receiver).await {
            Ok(Ok(response)) => {
                if let Some(error) = &response.error {
                    return Err(Error::cdp(format!(
                        "{} failed: {} (code: {})",
                        method, error.message, error.code
                    )));
                }
                Ok(response)
            }
            Ok(Err(_)) => Err(Error::websocket(format!(
                "Connection closed while waiting for {} ({})",
                method, id
            ))),
            Err(_) => {
                self.pending_commands.lock().await.remove(&id);
                Err(Error::timeout(format!(
                    "CDP command {} ({}) timed out after {:?}",
                    method, id, timeout_duration
                )))
            }
        }
    }

    /// Subscribe to CDP events
    async fn listen_events(&self) -> Result<mpsc::Receiver<CdpEvent>, Error> {
        let (sender, receiver) = mpsc::channel(256);
        let (unbounded_sender, mut unbounded_receiver) = mpsc::unbounded_channel();

        self.event_subscribers.lock().await.push(unbounded_sender);

        // Forward events to bounded channel
        tokio::spawn(async move {
            while let Some(event) = unbounded_receiver.recv().await {
                if sender.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok(receiver)
    }

    /// Close the connection
    async fn close(&self) -> Result<(), Error> {
        info!("Closing CDP WebSocket connection to {}", self.url);
        if self.is_active.swap(false, Ordering::SeqCst) {
            let _ = self.outgoing.send(Message::Close(None));
        }
        Ok(())
    }

    /// Check if connection is active
    fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }
}
