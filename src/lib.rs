pub mod catalog;
pub mod config;
pub mod registry;
pub mod server;
pub mod signaling;
pub mod snapshot;
pub mod useragent;

pub use catalog::{Book, BookCatalog};
pub use config::Config;
pub use registry::{ConnectionRegistry, UserConnection};
pub use server::SignalServer;
pub use signaling::{CallMessage, EventMessage, Messenger, SignalRouter};
