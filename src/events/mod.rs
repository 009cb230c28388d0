//! Dialog domain events
//!
//! Emitted by the state machine alongside each transition and logged by the
//! engine. Subjects are versioned so downstream consumers can evolve
//! independently of the structs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{Stage, TopicCode};

/// Common surface of every dialog event
pub trait DomainEvent: std::fmt::Debug + Send + Sync {
    fn subject(&self) -> String;

    fn event_type(&self) -> &'static str;

    fn user_id(&self) -> &str;
}

/// A session was created for a first-contact user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: Uuid,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
}

impl SessionStarted {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            started_at: Utc::now(),
        }
    }
}

impl DomainEvent for SessionStarted {
    fn subject(&self) -> String {
        "session.started.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "SessionStarted"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// The user's self-identification was captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCaptured {
    pub event_id: Uuid,
    pub user_id: String,
    pub profile: String,
    pub captured_at: DateTime<Utc>,
}

impl ProfileCaptured {
    pub fn new(user_id: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            profile: profile.into(),
            captured_at: Utc::now(),
        }
    }
}

impl DomainEvent for ProfileCaptured {
    fn subject(&self) -> String {
        "session.profile.captured.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "ProfileCaptured"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// A topic was selected from the menu or via keyword shortcut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSelected {
    pub event_id: Uuid,
    pub user_id: String,
    pub topic: TopicCode,
    pub selected_at: DateTime<Utc>,
}

impl TopicSelected {
    pub fn new(user_id: impl Into<String>, topic: TopicCode) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            topic,
            selected_at: Utc::now(),
        }
    }
}

impl DomainEvent for TopicSelected {
    fn subject(&self) -> String {
        "session.topic.selected.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "TopicSelected"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// The numbered menu was (re)sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuShown {
    pub event_id: Uuid,
    pub user_id: String,
    pub shown_at: DateTime<Utc>,
}

impl MenuShown {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            shown_at: Utc::now(),
        }
    }
}

impl DomainEvent for MenuShown {
    fn subject(&self) -> String {
        "session.menu.shown.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "MenuShown"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// The user escalated to a live operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffRequested {
    pub event_id: Uuid,
    pub user_id: String,
    pub from_stage: Stage,
    pub requested_at: DateTime<Utc>,
}

impl HandoffRequested {
    pub fn new(user_id: impl Into<String>, from_stage: Stage) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            from_stage,
            requested_at: Utc::now(),
        }
    }
}

impl DomainEvent for HandoffRequested {
    fn subject(&self) -> String {
        "session.handoff.requested.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "HandoffRequested"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// The user explicitly reset their session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReset {
    pub event_id: Uuid,
    pub user_id: String,
    pub reset_at: DateTime<Utc>,
}

impl SessionReset {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user_id: user_id.into(),
            reset_at: Utc::now(),
        }
    }
}

impl DomainEvent for SessionReset {
    fn subject(&self) -> String {
        "session.reset.v1".to_string()
    }

    fn event_type(&self) -> &'static str {
        "SessionReset"
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Closed set of events a transition can produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DialogEvent {
    SessionStarted(SessionStarted),
    ProfileCaptured(ProfileCaptured),
    TopicSelected(TopicSelected),
    MenuShown(MenuShown),
    HandoffRequested(HandoffRequested),
    SessionReset(SessionReset),
}

impl DialogEvent {
    fn inner(&self) -> &dyn DomainEvent {
        match self {
            DialogEvent::SessionStarted(e) => e,
            DialogEvent::ProfileCaptured(e) => e,
            DialogEvent::TopicSelected(e) => e,
            DialogEvent::MenuShown(e) => e,
            DialogEvent::HandoffRequested(e) => e,
            DialogEvent::SessionReset(e) => e,
        }
    }

    pub fn subject(&self) -> String {
        self.inner().subject()
    }

    pub fn event_type(&self) -> &'static str {
        self.inner().event_type()
    }

    pub fn user_id(&self) -> &str {
        self.inner().user_id()
    }
}
