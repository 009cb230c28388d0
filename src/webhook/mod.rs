//! Webhook payload types and event extraction
//!
//! Deserializes the WhatsApp Cloud API envelope
//! (`entry[0].changes[0].value.messages[0]`) into the boundary contract the
//! core consumes, plus the GET verification handshake parameters.

use serde::Deserialize;

/// Boundary contract consumed by the dialog engine
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Stable sender identifier (phone number)
    pub user_id: String,
    /// Message text; empty for non-text message types
    pub raw_text: String,
    /// True when the message came from a group/channel context
    pub group_context: bool,
}

impl InboundMessage {
    pub fn new(user_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            raw_text: raw_text.into(),
            group_context: false,
        }
    }

    pub fn group(mut self) -> Self {
        self.group_context = true;
        self
    }
}

/// Top-level webhook envelope
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

/// One message as delivered by the platform
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub from: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: String,
}

// Suffix carried by group JIDs; the platform payload has no explicit flag.
const GROUP_JID_SUFFIX: &str = "@g.us";

/// Pull the first message out of the envelope
///
/// Returns `None` when the delivery carries no message (status updates and
/// the like). Non-text messages yield an empty `raw_text`, which the state
/// machine answers with the text-only notice.
pub fn extract(payload: WebhookPayload) -> Option<InboundMessage> {
    let message = payload
        .entry
        .into_iter()
        .next()?
        .changes
        .into_iter()
        .next()?
        .value
        .messages
        .into_iter()
        .next()?;

    let group_context = message.from.ends_with(GROUP_JID_SUFFIX);
    let raw_text = match message.kind.as_deref() {
        Some("text") | None => message.text.map(|t| t.body).unwrap_or_default(),
        _ => String::new(),
    };

    Some(InboundMessage {
        user_id: message.from,
        raw_text,
        group_context,
    })
}

/// Query parameters of the GET verification handshake
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl VerifyParams {
    /// Echo the challenge when the handshake matches the configured token
    pub fn check(&self, expected_token: Option<&str>) -> Option<&str> {
        let expected = expected_token?;
        if self.mode.as_deref() == Some("subscribe")
            && self.verify_token.as_deref() == Some(expected)
        {
            self.challenge.as_deref()
        } else {
            None
        }
    }
}
