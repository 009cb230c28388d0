//! Process configuration sourced from environment variables
//!
//! Gateway credentials are optional: when absent, outbound delivery degrades
//! to a logging no-op instead of failing the core's state computation.

/// Runtime settings for the webhook service
#[derive(Debug, Clone)]
pub struct Config {
    /// WhatsApp Cloud API bearer token
    pub whatsapp_token: Option<String>,
    /// WhatsApp Cloud API phone number id
    pub phone_number_id: Option<String>,
    /// Shared secret echoed during the webhook verification handshake
    pub verify_token: Option<String>,
    /// TCP port for the webhook listener
    pub port: u16,
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self {
            whatsapp_token: non_empty_var("WHATSAPP_TOKEN"),
            phone_number_id: non_empty_var("PHONE_NUMBER_ID"),
            verify_token: non_empty_var("VERIFY_TOKEN"),
            port: non_empty_var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        }
    }

    /// Whether outbound delivery has the credentials it needs
    pub fn gateway_configured(&self) -> bool {
        self.whatsapp_token.is_some() && self.phone_number_id.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            whatsapp_token: None,
            phone_number_id: None,
            verify_token: None,
            port: 3000,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
