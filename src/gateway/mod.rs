//! Messaging gateway seam
//!
//! The state machine never constructs a wire request; it hands an
//! [`OutboundReply`] to a [`MessageGateway`]. The production implementation
//! talks to the WhatsApp Cloud API; when credentials are missing the service
//! runs with [`DisabledGateway`], which logs and drops.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::errors::{DialogError, DialogResult};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Reply handed to the delivery collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundReply {
    pub user_id: String,
    pub body: String,
}

impl OutboundReply {
    pub fn new(user_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            body: body.into(),
        }
    }
}

/// One-way delivery interface to the messaging platform
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn deliver(&self, reply: &OutboundReply) -> DialogResult<()>;
}

/// WhatsApp Cloud API delivery
pub struct WhatsAppGateway {
    client: reqwest::Client,
    token: String,
    phone_number_id: String,
    api_base: String,
}

impl WhatsAppGateway {
    pub fn new(token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            phone_number_id: phone_number_id.into(),
            api_base: GRAPH_API_BASE.to_string(),
        }
    }

}

#[async_trait]
impl MessageGateway for WhatsAppGateway {
    async fn deliver(&self, reply: &OutboundReply) -> DialogResult<()> {
        let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": reply.user_id,
            "type": "text",
            "text": { "body": reply.body },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DialogError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DialogError::Delivery(format!(
                "gateway returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// No-op delivery used when gateway credentials are not configured
pub struct DisabledGateway;

#[async_trait]
impl MessageGateway for DisabledGateway {
    async fn deliver(&self, reply: &OutboundReply) -> DialogResult<()> {
        warn!(
            user = %reply.user_id,
            "gateway credentials missing, dropping outbound reply"
        );
        Ok(())
    }
}

/// Pick the gateway implementation the configuration allows
pub fn for_config(config: &Config) -> std::sync::Arc<dyn MessageGateway> {
    match (&config.whatsapp_token, &config.phone_number_id) {
        (Some(token), Some(phone_number_id)) => {
            std::sync::Arc::new(WhatsAppGateway::new(token, phone_number_id))
        }
        _ => std::sync::Arc::new(DisabledGateway),
    }
}
