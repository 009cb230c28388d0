//! Operator-facing session queries
//!
//! Read-side access over the session store for the operator routes and for
//! diagnostics. Nothing here mutates a session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::session::{Session, SessionStore, Stage};

/// Query types over live sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionQuery {
    /// Get a specific session by user id
    GetSessionByUser { user_id: String },

    /// Sessions waiting on a live operator, oldest escalation first
    GetPendingHandoffs,

    /// Aggregate counts over all live sessions
    GetSessionStatistics,
}

/// Result of a session query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionQueryResult {
    Session(Option<Session>),
    Sessions(Vec<Session>),
    Statistics(SessionStatistics),
}

/// Aggregate session counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatistics {
    pub total_sessions: usize,
    pub pending_handoffs: usize,
    pub sessions_by_stage: Vec<(Stage, usize)>,
    pub average_turn_count: f64,
}

/// Session query handler
pub struct SessionQueryHandler {
    store: Arc<SessionStore>,
}

impl SessionQueryHandler {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Execute a query
    pub async fn execute(&self, query: SessionQuery) -> SessionQueryResult {
        match query {
            SessionQuery::GetSessionByUser { user_id } => {
                SessionQueryResult::Session(self.store.get(&user_id).await)
            }
            SessionQuery::GetPendingHandoffs => {
                SessionQueryResult::Sessions(self.pending_handoffs().await)
            }
            SessionQuery::GetSessionStatistics => {
                SessionQueryResult::Statistics(self.statistics().await)
            }
        }
    }

    async fn pending_handoffs(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .store
            .snapshot()
            .await
            .into_iter()
            .filter(|s| s.stage == Stage::Human)
            .collect();
        sessions.sort_by_key(|s| s.last_updated);
        sessions
    }

    async fn statistics(&self) -> SessionStatistics {
        let sessions = self.store.snapshot().await;
        let total_sessions = sessions.len();

        let stages = [
            Stage::Welcome,
            Stage::AwaitProfile,
            Stage::AwaitTopic,
            Stage::InTopic,
            Stage::Human,
        ];
        let sessions_by_stage = stages
            .iter()
            .map(|stage| {
                let count = sessions.iter().filter(|s| s.stage == *stage).count();
                (*stage, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let pending_handoffs = sessions.iter().filter(|s| s.stage == Stage::Human).count();

        let average_turn_count = if total_sessions == 0 {
            0.0
        } else {
            sessions.iter().map(|s| f64::from(s.turn_count)).sum::<f64>()
                / total_sessions as f64
        };

        SessionStatistics {
            total_sessions,
            pending_handoffs,
            sessions_by_stage,
            average_turn_count,
        }
    }
}
