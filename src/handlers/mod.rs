//! Inbound message handling

pub mod message_handler;

pub use message_handler::{DialogEngine, Outcome};
