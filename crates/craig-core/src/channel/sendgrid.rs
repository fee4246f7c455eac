//! SendGrid v3 mail client.

use super::{EmailChannel, EmailMessage, HTTP_TIMEOUT};
use crate::config::EmailConfig;
use crate::error::{CraigError, Result};
use reqwest::blocking::Client;

pub const API_KEY_ENV: &str = "SENDGRID_API_KEY";

const CHANNEL: &str = "sendgrid";

pub struct SendGridClient {
    http: Client,
    api_base: String,
    api_key: String,
    from_address: String,
    from_name: String,
}

impl SendGridClient {
    pub fn new(config: &EmailConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| CraigError::delivery(CHANNEL, e.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        })
    }

    /// Build from config, reading the key from `SENDGRID_API_KEY`.
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CraigError::MissingCredential(API_KEY_ENV))?;
        Self::new(config, key)
    }

    fn payload(&self, message: &EmailMessage) -> serde_json::Value {
        let mut personalization = serde_json::json!({
            "to": [{ "email": message.to }],
        });
        if !message.cc.is_empty() {
            personalization["cc"] = message
                .cc
                .iter()
                .map(|cc| serde_json::json!({ "email": cc }))
                .collect();
        }
        serde_json::json!({
            "personalizations": [personalization],
            "from": { "email": self.from_address, "name": self.from_name },
            "subject": message.subject,
            "content": [{ "type": "text/html", "value": message.html_body }],
        })
    }
}

impl EmailChannel for SendGridClient {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&self.payload(message))
            .send()
            .map_err(|e| CraigError::delivery(CHANNEL, format!("to {}: {e}", message.to)))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(to = %message.to, status = status.as_u16(), "sent email");
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(CraigError::delivery(
            CHANNEL,
            format!("to {}: HTTP {status} {}", message.to, body.trim()),
        ))
    }

    fn probe(&self) -> Result<String> {
        let response = self
            .http
            .get(format!("{}/v3/scopes", self.api_base))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| CraigError::delivery(CHANNEL, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CraigError::delivery(
                CHANNEL,
                format!("API key rejected: HTTP {status}"),
            ));
        }
        Ok(format!("sending as {}", self.from_address))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
