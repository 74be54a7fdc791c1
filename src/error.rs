use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckerError {
    #[error("GitLab API request failed with status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckerError {
    pub fn decode(what: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Short category used when logging and reporting skipped repositories.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiError { .. } | Self::Network(_) => "transport",
            Self::Decode { .. } => "decode",
            Self::Config(_) | Self::Prompt(_) => "config",
            Self::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;
