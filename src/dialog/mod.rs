//! Dialogue state machine
//!
//! [`advance`] computes (next state, reply, events) from a session snapshot
//! and a classified intent. It is pure: no I/O, no clock beyond event
//! timestamps, no access to the store. The engine applies the returned
//! [`SessionAction`] and delivers the reply.
//!
//! Ordering rules:
//! - the reset literal wins in every stage, including Human
//! - the human-request shortcut wins in every stage except Human, so a user
//!   can always escape to an operator
//! - stage-specific handling runs last

use crate::classifier::Intent;
use crate::errors::DialogResult;
use crate::events::{
    DialogEvent, HandoffRequested, MenuShown, ProfileCaptured, SessionReset, SessionStarted,
    TopicSelected,
};
use crate::replies;
use crate::session::{Session, Stage, TopicCode};

/// What the engine should do to the session store
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Store a session for a previously-unseen user
    Create(Session),
    /// Replace the user's session with this snapshot
    Update(Session),
    /// Remove the user's session
    Delete,
    /// Leave the store untouched
    Keep,
}

/// Outcome of one inbound turn
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub action: SessionAction,
    pub reply: Option<String>,
    pub events: Vec<DialogEvent>,
}

impl Transition {
    fn reply_only(body: impl Into<String>) -> Self {
        Self {
            action: SessionAction::Keep,
            reply: Some(body.into()),
            events: Vec::new(),
        }
    }
}

/// Compute the transition for one classified inbound message
///
/// `raw_text` is the pre-normalization text; it is what gets stored as the
/// profile so the operator sees the user's own casing and accents.
pub fn advance(
    current: Option<&Session>,
    user_id: &str,
    intent: Intent,
    raw_text: &str,
    normalized: &str,
) -> DialogResult<Transition> {
    // Non-text or empty payload: acknowledge without touching any state
    if normalized.is_empty() {
        return Ok(Transition::reply_only(replies::TEXT_ONLY_NOTICE));
    }

    if intent == Intent::ResetCommand {
        if current.is_some() {
            return Ok(Transition {
                action: SessionAction::Delete,
                reply: Some(replies::reset_reply()),
                events: vec![DialogEvent::SessionReset(SessionReset::new(user_id))],
            });
        }
        // Nothing to reset: fall through to first contact
    }

    let Some(session) = current else {
        return first_contact(user_id);
    };

    // Escape hatch to an operator wins over stage logic everywhere but in
    // Human itself
    if session.stage != Stage::Human && intent == Intent::HumanRequest {
        return escalate(session);
    }

    match session.stage {
        // Terminal for automation: only acknowledgments, and only the reset
        // literal (handled above) leaves it
        Stage::Human => Ok(Transition::reply_only(replies::HUMAN_STAGE_ACK)),
        Stage::Welcome => {
            // Sessions normally auto-advance past Welcome at creation; a
            // stored Welcome session still gets the same first prompt
            let mut next = session.clone();
            next.advance_to(Stage::AwaitProfile)?;
            Ok(Transition {
                action: SessionAction::Update(next),
                reply: Some(replies::WELCOME.to_string()),
                events: Vec::new(),
            })
        }
        Stage::AwaitProfile => {
            let mut next = session.clone();
            next.capture_profile(raw_text.trim())?;
            Ok(Transition {
                action: SessionAction::Update(next),
                reply: Some(replies::profile_received_menu()),
                events: vec![
                    DialogEvent::ProfileCaptured(ProfileCaptured::new(user_id, raw_text.trim())),
                    DialogEvent::MenuShown(MenuShown::new(user_id)),
                ],
            })
        }
        Stage::AwaitTopic => match intent {
            Intent::MenuCommand => Ok(menu_transition(user_id)),
            Intent::Numeric(code) if code == TopicCode::OTHER => escalate(session),
            Intent::Numeric(code) => select_topic(session, code),
            Intent::Support => select_topic(session, TopicCode::ACCESS),
            Intent::Rules => select_topic(session, TopicCode::RULES),
            _ => Ok(Transition::reply_only(replies::REPROMPT)),
        },
        Stage::InTopic => match intent {
            Intent::MenuCommand => {
                let mut next = session.clone();
                next.advance_to(Stage::AwaitTopic)?;
                Ok(Transition {
                    action: SessionAction::Update(next),
                    reply: Some(replies::MENU.to_string()),
                    events: vec![DialogEvent::MenuShown(MenuShown::new(user_id))],
                })
            }
            Intent::Numeric(code) if code == TopicCode::OTHER => escalate(session),
            Intent::Numeric(code) => select_topic(session, code),
            Intent::Support => select_topic(session, TopicCode::ACCESS),
            Intent::Rules => select_topic(session, TopicCode::RULES),
            // Free text re-answers using the stored topic, which stays put
            _ => Ok(Transition::reply_only(replies::in_topic_reply(
                session.topic,
            ))),
        },
    }
}

// First inbound message from an unseen user: create the session and
// auto-advance past Welcome so the next message is the identification.
fn first_contact(user_id: &str) -> DialogResult<Transition> {
    let mut session = Session::new(user_id);
    session.advance_to(Stage::AwaitProfile)?;
    Ok(Transition {
        action: SessionAction::Create(session),
        reply: Some(replies::WELCOME.to_string()),
        events: vec![DialogEvent::SessionStarted(SessionStarted::new(user_id))],
    })
}

fn escalate(session: &Session) -> DialogResult<Transition> {
    let from_stage = session.stage;
    let mut next = session.clone();
    next.advance_to(Stage::Human)?;
    Ok(Transition {
        action: SessionAction::Update(next),
        reply: Some(replies::HANDOFF_ACK.to_string()),
        events: vec![DialogEvent::HandoffRequested(HandoffRequested::new(
            &session.user_id,
            from_stage,
        ))],
    })
}

fn select_topic(session: &Session, code: TopicCode) -> DialogResult<Transition> {
    let mut next = session.clone();
    next.select_topic(code)?;
    Ok(Transition {
        action: SessionAction::Update(next),
        reply: Some(replies::topic_reply(code)),
        events: vec![DialogEvent::TopicSelected(TopicSelected::new(
            &session.user_id,
            code,
        ))],
    })
}

fn menu_transition(user_id: &str) -> Transition {
    Transition {
        action: SessionAction::Keep,
        reply: Some(replies::MENU.to_string()),
        events: vec![DialogEvent::MenuShown(MenuShown::new(user_id))],
    }
}
