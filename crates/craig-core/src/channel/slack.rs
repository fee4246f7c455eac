//! Slack Web API client: DMs by email lookup and channel posts.

use super::{preview, ChatChannel, HTTP_TIMEOUT};
use crate::config::SlackConfig;
use crate::error::{CraigError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;

pub const TOKEN_ENV: &str = "SLACK_BOT_TOKEN";

const CHANNEL: &str = "slack";

#[derive(Debug, Deserialize)]
struct SlackReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<serde_json::Value>,
    #[serde(default)]
    team: Option<String>,
}

pub struct SlackClient {
    http: Client,
    api_base: String,
    token: String,
}

impl SlackClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| CraigError::delivery(CHANNEL, e.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Build from config, reading the bot token from `SLACK_BOT_TOKEN`.
    pub fn from_config(config: &SlackConfig) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(CraigError::MissingCredential(TOKEN_ENV))?;
        Self::new(&config.api_base, token)
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    fn call(&self, method: &str, request: RequestBuilder) -> Result<SlackReply> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| CraigError::delivery(CHANNEL, format!("{method}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CraigError::delivery(
                CHANNEL,
                format!("{method}: HTTP {status}"),
            ));
        }
        let reply: SlackReply = response
            .json()
            .map_err(|e| CraigError::delivery(CHANNEL, format!("{method}: {e}")))?;
        if !reply.ok {
            let code = reply.error.as_deref().unwrap_or("unknown_error");
            return Err(CraigError::delivery(
                CHANNEL,
                format!("{method}: {code}{}", hint(code)),
            ));
        }
        tracing::debug!(method, "slack call ok");
        Ok(reply)
    }

    fn lookup_user_id(&self, email: &str) -> Result<String> {
        let request = self
            .http
            .get(self.url("users.lookupByEmail"))
            .query(&[("email", email)]);
        let reply = self.call("users.lookupByEmail", request)?;
        reply
            .user
            .as_ref()
            .and_then(|u| u.get("id"))
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                CraigError::delivery(CHANNEL, format!("no user id returned for {email}"))
            })
    }

    fn post_message(&self, channel: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "channel": channel,
            "text": text,
            "unfurl_links": false,
            "unfurl_media": false,
        });
        let request = self.http.post(self.url("chat.postMessage")).json(&body);
        self.call("chat.postMessage", request)?;
        Ok(())
    }
}

fn hint(code: &str) -> &'static str {
    match code {
        "users_not_found" => " (user is not in the Slack workspace)",
        "channel_not_found" => " (channel missing or bot not invited)",
        "not_authed" | "invalid_auth" => " (check SLACK_BOT_TOKEN)",
        _ => "",
    }
}

impl ChatChannel for SlackClient {
    fn send_direct(&self, recipient: &str, text: &str) -> Result<()> {
        let user_id = self.lookup_user_id(recipient)?;
        self.post_message(&user_id, text)?;
        tracing::debug!(recipient, preview = %preview(text), "sent slack DM");
        Ok(())
    }

    fn post_to_channel(&self, channel: &str, text: &str) -> Result<()> {
        self.post_message(channel, text)?;
        tracing::debug!(channel, "posted to slack channel");
        Ok(())
    }

    fn probe(&self) -> Result<String> {
        let reply = self.call("auth.test", self.http.post(self.url("auth.test")))?;
        let bot = reply
            .user
            .as_ref()
            .and_then(|u| u.as_str())
            .unwrap_or("unknown bot");
        Ok(match reply.team {
            Some(team) => format!("connected as {bot} ({team})"),
            None => format!("connected as {bot}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
