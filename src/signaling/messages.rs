//! Wire types for the signaling protocol.
//!
//! Frames are JSON objects: inbound messages are tagged on `"call"`,
//! outbound on `"event"`, field names in camelCase to match the browser
//! clients.

use crate::registry::UserConnection;
use serde::{Deserialize, Serialize};

/// Relayed handshake payload. Only `toUsername` is interpreted; every other
/// field (SDP body, ICE candidate attributes, ...) is forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload {
    #[serde(rename = "toUsername")]
    pub to_username: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Inbound call messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum CallMessage {
    ReadConnectedUsers,
    Connect {
        user: UserConnection,
    },
    Hangup {
        #[serde(rename = "connectedWith")]
        connected_with: String,
    },
    SendSdp(SignalPayload),
    SendIceCandidate(SignalPayload),
    Snapshot {
        image: String,
    },
}

/// Outbound events, broadcast to every subscriber or unicast to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EventMessage {
    Connected { user: UserConnection },
    Disconnected { user: UserConnection },
    Hangup,
    ReceiveSdp(SignalPayload),
    ReceiveIceCandidate(SignalPayload),
    Snapshot { user: UserConnection },
    ConnectedUsers { users: Vec<UserConnection> },
}

impl EventMessage {
    pub fn name(&self) -> &'static str {
        match self {
            EventMessage::Connected { .. } => "connected",
            EventMessage::Disconnected { .. } => "disconnected",
            EventMessage::Hangup => "hangup",
            EventMessage::ReceiveSdp(_) => "receiveSdp",
            EventMessage::ReceiveIceCandidate(_) => "receiveIceCandidate",
            EventMessage::Snapshot { .. } => "snapshot",
            EventMessage::ConnectedUsers { .. } => "connectedUsers",
        }
    }
}
