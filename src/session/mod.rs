//! Session aggregate and session store
//!
//! A session is the per-user dialogue position: the stage the user is at,
//! the identification text they supplied, and the topic they selected. It is
//! the only mutable shared state in the core. Stage transitions are checked
//! against the defined graph so no stage is reachable except via a defined
//! transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{DialogError, DialogResult};

/// Position of a user within the scripted dialogue flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// First contact, before the welcome prompt has been sent
    Welcome,
    /// Waiting for the user's self-identification
    AwaitProfile,
    /// Waiting for a numbered topic selection
    AwaitTopic,
    /// A topic is selected and being discussed
    InTopic,
    /// Escalated to a live operator; automation only acknowledges
    Human,
}

impl Stage {
    /// Whether `next` is reachable from this stage along the defined graph
    pub fn can_advance_to(self, next: Stage) -> bool {
        match (self, next) {
            // Escalation is reachable from everywhere except Human itself
            (Stage::Human, _) => false,
            (_, Stage::Human) => true,
            (Stage::Welcome, Stage::AwaitProfile) => true,
            (Stage::AwaitProfile, Stage::AwaitTopic) => true,
            (Stage::AwaitTopic, Stage::InTopic) => true,
            (Stage::AwaitTopic, Stage::AwaitTopic) => true,
            (Stage::InTopic, Stage::AwaitTopic) => true,
            (Stage::InTopic, Stage::InTopic) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Welcome => "welcome",
            Stage::AwaitProfile => "await_profile",
            Stage::AwaitTopic => "await_topic",
            Stage::InTopic => "in_topic",
            Stage::Human => "human",
        };
        f.write_str(name)
    }
}

/// A digit 1-7 selecting a canned subject-matter response
///
/// Parsing is the only constructor, so an out-of-range code is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicCode(char);

impl TopicCode {
    /// Menu entry for rules / scoring / criteria questions
    pub const RULES: TopicCode = TopicCode('3');

    /// Menu entry for system access problems
    pub const ACCESS: TopicCode = TopicCode('4');

    /// Menu entry reserved for "other subject" / operator escalation
    pub const OTHER: TopicCode = TopicCode('7');

    /// Parse a single digit 1-7
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(digit @ '1'..='7'), None) => Some(Self(digit)),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for TopicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user dialogue state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier (phone number or account id)
    pub user_id: String,

    /// Current dialogue stage
    pub stage: Stage,

    /// Free-text self-identification captured during AwaitProfile
    pub profile: Option<String>,

    /// Selected topic, present once InTopic is reached
    pub topic: Option<TopicCode>,

    /// Number of state-mutating turns processed
    pub turn_count: u32,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// Last mutation time, reserved for future expiry
    pub last_updated: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session at the initial stage
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            stage: Stage::Welcome,
            profile: None,
            topic: None,
            turn_count: 0,
            created_at: now,
            last_updated: now,
        }
    }

    fn touch(&mut self) {
        self.turn_count += 1;
        self.last_updated = Utc::now();
    }

    /// Move to `next`, rejecting transitions outside the defined graph
    pub fn advance_to(&mut self, next: Stage) -> DialogResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(DialogError::InvalidStageTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        self.stage = next;
        self.touch();
        Ok(())
    }

    /// Store the user's identification and advance to topic selection
    pub fn capture_profile(&mut self, text: impl Into<String>) -> DialogResult<()> {
        if self.stage != Stage::AwaitProfile {
            return Err(DialogError::Validation(format!(
                "profile can only be captured in await_profile, not {}",
                self.stage
            )));
        }
        let text = text.into();
        if text.is_empty() {
            return Err(DialogError::Validation(
                "profile text must not be empty".to_string(),
            ));
        }
        self.profile = Some(text);
        self.advance_to(Stage::AwaitTopic)
    }

    /// Select a topic, entering (or staying in) InTopic
    pub fn select_topic(&mut self, code: TopicCode) -> DialogResult<()> {
        self.topic = Some(code);
        self.advance_to(Stage::InTopic)
    }
}

/// Keyed mapping from user identifier to session
///
/// The per-user guard returned by [`SessionStore::user_guard`] serializes
/// read-modify-write cycles for one user id; cross-user access needs no
/// coordination.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    guards: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a session snapshot by user id
    pub async fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.read().await.get(user_id).cloned()
    }

    /// Insert or replace the session for its user id
    pub async fn upsert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.user_id.clone(), session);
    }

    /// Remove a session; returns whether one existed
    pub async fn delete(&self, user_id: &str) -> bool {
        self.sessions.write().await.remove(user_id).is_some()
    }

    /// Lock handle serializing processing for a single user id
    pub async fn user_guard(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut guards = self.guards.lock().await;
        guards
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Snapshot of every live session
    pub async fn snapshot(&self) -> Vec<Session> {
        self.sessions.read().await.values().cloned().collect()
    }
}
