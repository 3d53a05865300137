//! Signaling core: typed call messages in, presence/relay events out.
//!
//! The router holds no per-message state; everything it knows about a peer
//! lives in the [`crate::registry::ConnectionRegistry`].

pub mod messages;
pub mod router;


pub use messages::{CallMessage, EventMessage, SignalPayload};
pub use router::{Messenger, SignalRouter};
