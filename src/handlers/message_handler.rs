//! Dialog engine: orchestrates one inbound turn
//!
//! The engine is the only writer to the session store. It serializes
//! processing per user id, runs the pure state machine, commits the result,
//! and only then hands the reply to the gateway. Delivery failure is logged
//! and never rolls back the committed transition.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::classifier::classify;
use crate::dialog::{advance, SessionAction, Transition};
use crate::errors::DialogResult;
use crate::events::DialogEvent;
use crate::gateway::{MessageGateway, OutboundReply};
use crate::normalizer::normalize;
use crate::session::{Session, SessionStore};
use crate::webhook::InboundMessage;

/// What one inbound turn produced, for callers and tests
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Reply that was handed to the gateway, if any
    pub reply: Option<OutboundReply>,
    /// Session state after the turn, if one exists
    pub session: Option<Session>,
    /// Events the transition emitted
    pub events: Vec<DialogEvent>,
    /// True when the message was silently ignored (group context)
    pub ignored: bool,
}

impl Outcome {
    fn ignored() -> Self {
        Self {
            reply: None,
            session: None,
            events: Vec::new(),
            ignored: true,
        }
    }
}

/// Orchestrator for inbound messages
pub struct DialogEngine {
    store: Arc<SessionStore>,
    gateway: Arc<dyn MessageGateway>,
}

impl DialogEngine {
    pub fn new(store: Arc<SessionStore>, gateway: Arc<dyn MessageGateway>) -> Self {
        Self { store, gateway }
    }

    /// Process one inbound message end to end
    pub async fn handle(&self, message: InboundMessage) -> DialogResult<Outcome> {
        if message.group_context {
            debug!(user = %message.user_id, "ignoring group/channel message");
            return Ok(Outcome::ignored());
        }

        // Serialize read-modify-write per user id; concurrent deliveries for
        // other users proceed independently
        let guard = self.store.user_guard(&message.user_id).await;
        let _locked = guard.lock().await;

        let current = self.store.get(&message.user_id).await;
        let normalized = normalize(&message.raw_text);
        let intent = classify(&normalized);

        let transition = advance(
            current.as_ref(),
            &message.user_id,
            intent,
            &message.raw_text,
            &normalized,
        )?;

        let session = self.commit(&message.user_id, &transition, current).await;

        for event in &transition.events {
            info!(
                user = %event.user_id(),
                subject = %event.subject(),
                "dialog event"
            );
        }

        // Fire-and-forget: the transition is already committed, a delivery
        // failure must not corrupt it
        let reply = transition
            .reply
            .map(|body| OutboundReply::new(&message.user_id, body));
        if let Some(reply) = &reply {
            if let Err(err) = self.gateway.deliver(reply).await {
                error!(user = %reply.user_id, error = %err, "outbound delivery failed");
            }
        }

        Ok(Outcome {
            reply,
            session,
            events: transition.events,
            ignored: false,
        })
    }

    async fn commit(
        &self,
        user_id: &str,
        transition: &Transition,
        current: Option<Session>,
    ) -> Option<Session> {
        match &transition.action {
            SessionAction::Create(session) | SessionAction::Update(session) => {
                self.store.upsert(session.clone()).await;
                Some(session.clone())
            }
            SessionAction::Delete => {
                self.store.delete(user_id).await;
                None
            }
            SessionAction::Keep => current,
        }
    }
}
