//! WebSocket transport: session lifecycle and the outbound delivery hub.
//!
//! Each socket gets a server-generated session id and an mpsc channel that a
//! dedicated task drains into the sink. The hub is the concrete
//! [`Messenger`]: broadcasts fan out to every registered channel, unicasts
//! hit one.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, trace};

use crate::signaling::{CallMessage, EventMessage, Messenger, SignalRouter};

/// One outbound channel per live socket, keyed by session id.
#[derive(Default)]
pub struct SessionHub {
    sessions: RwLock<HashMap<String, mpsc::Sender<String>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    async fn subscribe(&self, session_id: &str, tx: mpsc::Sender<String>) {
        self.sessions.write().await.insert(session_id.to_owned(), tx);
    }

    async fn unsubscribe(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl Messenger for SessionHub {
    async fn broadcast(&self, event: EventMessage) {
        let Ok(json) = serde_json::to_string(&event) else {
            return;
        };
        // snapshot the senders so no lock is held across channel sends
        let senders: Vec<mpsc::Sender<String>> =
            self.sessions.read().await.values().cloned().collect();
        for tx in senders {
            let _ = tx.send(json.clone()).await;
        }
    }

    async fn unicast(&self, session_id: &str, event: EventMessage) {
        let tx = self.sessions.read().await.get(session_id).cloned();
        if let Some(tx) = tx {
            if let Ok(json) = serde_json::to_string(&event) {
                let _ = tx.send(json).await;
            }
        }
    }
}

/// Shared state for the signaling endpoint
#[derive(Clone)]
pub struct SignalState {
    pub hub: Arc<SessionHub>,
    pub router: Arc<SignalRouter>,
}

/// Transport-assigned session identifier; clients never pick their own.
fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    (0..16)
        .map(|_| char::from_digit(rng.gen_range(0..36), 36).unwrap())
        .collect()
}

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SignalState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_socket(socket: WebSocket, state: SignalState) {
    let session_id = generate_session_id();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(100);

    // Spawn task to forward events to the client
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    state.hub.subscribe(&session_id, tx).await;
    info!(session = %session_id, "new signaling session");

    // Messages from one session are processed in arrival order; sessions
    // interleave freely with each other.
    while let Some(result) = receiver.next().await {
        let msg = match result {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(session = %session_id, "websocket error: {}", e);
                break;
            }
        };

        trace!(session = %session_id, "received: {}", msg);

        match serde_json::from_str::<CallMessage>(&msg) {
            Ok(call) => state.router.handle_call(&session_id, call).await,
            // fail-silent policy: bad frames are dropped, never answered
            Err(e) => debug!(session = %session_id, "dropping unparseable frame: {}", e),
        }
    }

    state.hub.unsubscribe(&session_id).await;
    state.router.disconnect(&session_id).await;
    info!(session = %session_id, "signaling session closed");
    send_task.abort();
}
