use crate::error::{CraigError, Result};
use crate::paths;
use crate::task::Thresholds;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// CompanyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_name")]
    pub name: String,
    #[serde(default = "default_frameworks")]
    pub frameworks: Vec<String>,
}

fn default_company_name() -> String {
    "Your Company".to_string()
}

fn default_frameworks() -> Vec<String> {
    vec!["SOC 2".to_string()]
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            frameworks: default_frameworks(),
        }
    }
}

impl CompanyConfig {
    /// Framework names joined for message bodies, e.g. "SOC 2, ISO 27001".
    pub fn framework_label(&self) -> String {
        if self.frameworks.is_empty() {
            return "compliance".to_string();
        }
        self.frameworks
            .iter()
            .map(|f| f.trim())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// EscalationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_first_email_days")]
    pub first_email_days: u32,
    #[serde(default = "default_manager_cc_days")]
    pub manager_cc_days: u32,
}

fn default_first_email_days() -> u32 {
    8
}

fn default_manager_cc_days() -> u32 {
    15
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            first_email_days: default_first_email_days(),
            manager_cc_days: default_manager_cc_days(),
        }
    }
}

impl EscalationConfig {
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.first_email_days, self.manager_cc_days)
    }
}

// ---------------------------------------------------------------------------
// SlackConfig / EmailConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default = "default_slack_channel")]
    pub channel: String,
    #[serde(default = "default_slack_api_base")]
    pub api_base: String,
}

fn default_slack_channel() -> String {
    "#compliance-updates".to_string()
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".to_string()
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            channel: default_slack_channel(),
            api_base: default_slack_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_sendgrid_api_base")]
    pub api_base: String,
}

fn default_from_address() -> String {
    "craig@company.com".to_string()
}

fn default_from_name() -> String {
    "Craig (Compliance Manager)".to_string()
}

fn default_sendgrid_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            from_name: default_from_name(),
            api_base: default_sendgrid_api_base(),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceSettings / MemorySettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceSettings {
    /// JSON feed of outstanding tasks and digest metrics behind a bearer token.
    Http { base_url: String },
    /// Static YAML file; used for demos and tests.
    Fixture { path: PathBuf },
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings::Http {
            base_url: "http://localhost:8790".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemorySettings {
    #[default]
    Volatile,
    Durable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub company: CompanyConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub memory: MemorySettings,
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CraigError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write the default config unless one already exists. Returns true if written.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Config::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Err(e) = self.escalation.thresholds() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: e.to_string(),
            });
        }

        if !channel_re().is_match(&self.slack.channel) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "slack.channel '{}' does not look like a channel name or ID",
                    self.slack.channel
                ),
            });
        }

        if !email_re().is_match(&self.email.from_address) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "email.from_address '{}' is not a valid address",
                    self.email.from_address
                ),
            });
        }

        if self.company.frameworks.iter().all(|f| f.trim().is_empty()) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "company.frameworks is empty; reminders will say \"compliance\""
                    .to_string(),
            });
        }

        if let SourceSettings::Http { base_url } = &self.source {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("source.base_url '{base_url}' must be an http(s) URL"),
                });
            }
        }

        warnings
    }
}

static CHANNEL_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn channel_re() -> &'static Regex {
    CHANNEL_RE.get_or_init(|| Regex::new(r"^(#[a-z0-9][a-z0-9._-]*|[CGD][A-Z0-9]{6,})$").unwrap())
}

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
