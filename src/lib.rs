//! Helpdesk dialog domain
//!
//! A webhook-driven conversational responder: inbound chat messages are
//! normalized, classified, and run through a per-user dialogue state machine
//! that decides the next stage and the reply to send. It provides:
//! - Text normalization for reliable keyword matching
//! - Intent classification over keyword sets kept as data
//! - A session store with per-user write serialization
//! - A pure transition function owning all stage policy
//! - Canned reply resolution for the numbered topic menu
//!
//! Transport (webhook receipt, verification handshake) and outbound delivery
//! are collaborators behind the webhook and gateway modules; the core never
//! performs network I/O itself.

pub mod classifier;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod handlers;
pub mod normalizer;
pub mod queries;
pub mod replies;
pub mod session;
pub mod webhook;

// Re-export main types
pub use classifier::{classify, Intent};
pub use config::Config;
pub use dialog::{advance, SessionAction, Transition};
pub use errors::{DialogError, DialogResult};
pub use events::{
    DialogEvent, DomainEvent, HandoffRequested, MenuShown, ProfileCaptured, SessionReset,
    SessionStarted, TopicSelected,
};
pub use gateway::{DisabledGateway, MessageGateway, OutboundReply, WhatsAppGateway};
pub use handlers::{DialogEngine, Outcome};
pub use normalizer::{digits_only, normalize};
pub use queries::{SessionQuery, SessionQueryHandler, SessionQueryResult, SessionStatistics};
pub use session::{Session, SessionStore, Stage, TopicCode};
pub use webhook::{extract, InboundMessage, VerifyParams, WebhookPayload};
