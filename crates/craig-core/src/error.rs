use thiserror::Error;

#[derive(Debug, Error)]
pub enum CraigError {
    #[error("not initialized: run 'craig init'")]
    NotInitialized,

    #[error(
        "invalid escalation thresholds: first_email_days ({first}) must be less than manager_cc_days ({manager})"
    )]
    InvalidThresholds { first: u32, manager: u32 },

    #[error("compliance source unavailable: {0}")]
    Source(String),

    #[error("{channel}: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("reminder store error: {0}")]
    Memory(String),

    #[error("reminder store {0} is held by another craig run")]
    MemoryLocked(String),

    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CraigError {
    pub fn delivery(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        CraigError::Delivery {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CraigError>;
