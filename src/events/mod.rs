//! # Events Module
//!
//! Event-driven progress reporting. The engine emits events through a
//! cloneable sender; any front end (CLI progress bar, future GUI) consumes
//! them from the receiving side. Senders never block the pipeline: if
//! nobody listens, events are dropped.

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::{BatchEvent, Event};
