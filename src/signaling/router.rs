//! Per-message signaling policy: resolve the target by display name, then
//! unicast or drop. Best-effort throughout; no handler surfaces an error to
//! the calling client.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::messages::{CallMessage, EventMessage, SignalPayload};
use crate::registry::{ConnectionRegistry, UserConnection};
use crate::snapshot;
use crate::useragent;

/// Outbound messaging boundary. Broadcasts reach every subscribed session,
/// unicasts exactly one. Delivery is fire-and-forget.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn broadcast(&self, event: EventMessage);
    async fn unicast(&self, session_id: &str, event: EventMessage);
}

pub struct SignalRouter {
    registry: Arc<ConnectionRegistry>,
    messenger: Arc<dyn Messenger>,
}

impl SignalRouter {
    pub fn new(registry: Arc<ConnectionRegistry>, messenger: Arc<dyn Messenger>) -> Self {
        Self { registry, messenger }
    }

    /// Dispatch one inbound call message for `session_id`.
    pub async fn handle_call(&self, session_id: &str, call: CallMessage) {
        match call {
            CallMessage::ReadConnectedUsers => self.read_connected_users(session_id).await,
            CallMessage::Connect { user } => self.connect(session_id, user).await,
            CallMessage::Hangup { connected_with } => self.hangup(&connected_with).await,
            CallMessage::SendSdp(payload) => self.send_sdp(payload).await,
            CallMessage::SendIceCandidate(payload) => self.send_ice_candidate(payload).await,
            CallMessage::Snapshot { image } => self.snapshot(session_id, image).await,
        }
    }

    /// Register the session's profile and announce it to everyone, the
    /// caller included. Never fails; an unrecognizable browser string is
    /// kept as-is.
    pub async fn connect(&self, session_id: &str, mut user: UserConnection) {
        if let Some(label) = useragent::normalize(&user.browser) {
            user.browser = label;
        }
        user.session_id = session_id.to_owned();

        self.registry.put(session_id, user.clone()).await;
        debug!(session = %session_id, username = %user.username, "user connected");
        self.messenger.broadcast(EventMessage::Connected { user }).await;
    }

    /// Transport-close transition. Idempotent: a second call for the same
    /// session finds no entry and emits nothing.
    pub async fn disconnect(&self, session_id: &str) {
        if let Some(user) = self.registry.remove(session_id).await {
            debug!(session = %session_id, username = %user.username, "user disconnected");
            self.messenger.broadcast(EventMessage::Disconnected { user }).await;
        }
    }

    /// Notify the named user that the caller hung up. Offline target: no-op.
    pub async fn hangup(&self, connected_with: &str) {
        if let Some(target) = self.registry.find_session_by_username(connected_with).await {
            self.messenger.unicast(&target, EventMessage::Hangup).await;
        }
    }

    pub async fn send_sdp(&self, payload: SignalPayload) {
        self.relay(payload, EventMessage::ReceiveSdp).await;
    }

    pub async fn send_ice_candidate(&self, payload: SignalPayload) {
        self.relay(payload, EventMessage::ReceiveIceCandidate).await;
    }

    async fn relay(&self, payload: SignalPayload, wrap: fn(SignalPayload) -> EventMessage) {
        if let Ok(json) = serde_json::to_string(&payload) {
            debug!(to = %payload.to_username, "relaying signal: {}", json);
        }

        match self.registry.find_session_by_username(&payload.to_username).await {
            Some(target) => self.messenger.unicast(&target, wrap(payload)).await,
            None => debug!(to = %payload.to_username, "dropping signal for offline user"),
        }
    }

    /// Update the caller's profile thumbnail and announce it. Every failure
    /// mode (unknown session, bad payload, transform error) degrades to a
    /// no-op with a diagnostic.
    pub async fn snapshot(&self, session_id: &str, image: String) {
        let Some(mut user) = self.registry.get(session_id).await else {
            return;
        };
        if !image.starts_with(snapshot::DATA_IMAGE_PREFIX) {
            debug!(session = %session_id, "snapshot payload missing image prefix");
            return;
        }

        // Resize off the async executor; the registry lock is not held here.
        let resized = tokio::task::spawn_blocking(move || snapshot::resize_data_url(&image)).await;
        let data_url = match resized {
            Ok(Ok(data_url)) => data_url,
            Ok(Err(e)) => {
                debug!(session = %session_id, "snapshot transform failed: {}", e);
                return;
            }
            Err(e) => {
                warn!(session = %session_id, "snapshot task failed: {}", e);
                return;
            }
        };

        user.image = Some(data_url);
        self.registry.put(session_id, user.clone()).await;
        self.messenger.broadcast(EventMessage::Snapshot { user }).await;
    }

    /// Request/response: the current profile list goes to the caller only.
    pub async fn read_connected_users(&self, session_id: &str) {
        let users = self.registry.all().await;
        self.messenger
            .unicast(session_id, EventMessage::ConnectedUsers { users })
            .await;
    }
}
