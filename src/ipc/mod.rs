//! Event-based IPC with the webview frontend.

pub mod bridge;
pub mod events;
pub mod payload;

pub use bridge::{register, EventSink};
pub use events::{Inbound, Outbound};
pub use payload::PayloadError;
