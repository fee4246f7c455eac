//! JSON compliance feed over HTTP.
//!
//! Endpoints, relative to `base_url`:
//!
//! - `GET /outstanding-tasks` → array of outstanding-task records
//! - `GET /weekly-digest` → digest snapshot; `404` means no data this week
//!
//! When `COMPLIANCE_API_TOKEN` is set it is sent as a bearer token.

use super::ComplianceSource;
use crate::channel::HTTP_TIMEOUT;
use crate::error::{CraigError, Result};
use crate::task::{OutstandingTask, WeeklyDigestInput};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;

pub const TOKEN_ENV: &str = "COMPLIANCE_API_TOKEN";

pub struct HttpSource {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| CraigError::Source(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_env(base_url: &str) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::new(base_url, token)
    }

    fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .map_err(|e| CraigError::Source(format!("GET {url}: {e}")))?;
        tracing::debug!(url = %url, status = response.status().as_u16(), "compliance source response");
        Ok(response)
    }
}

fn require_success(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CraigError::Source(format!("GET /{path}: HTTP {status}")))
    }
}

impl ComplianceSource for HttpSource {
    fn outstanding_tasks(&self) -> Result<Vec<OutstandingTask>> {
        let response = require_success("outstanding-tasks", self.get("outstanding-tasks")?)?;
        response
            .json()
            .map_err(|e| CraigError::Source(format!("outstanding-tasks: {e}")))
    }

    fn weekly_digest(&self) -> Result<Option<WeeklyDigestInput>> {
        let response = self.get("weekly-digest")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = require_success("weekly-digest", response)?;
        response
            .json()
            .map(Some)
            .map_err(|e| CraigError::Source(format!("weekly-digest: {e}")))
    }

    fn describe(&self) -> String {
        format!("http feed {}", self.base_url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
