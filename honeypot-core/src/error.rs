use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoneypotError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Input rejected before any network interaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a message")]
    EmptyMessage,
}

/// Failures talking to the analysis or telemetry service.
///
/// Transport errors, non-success statuses and bodies that break the
/// contract are all reported through this one type; nothing is retried.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ProtocolError {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProtocolError::Http(e) => e.status().map(|s| s.as_u16()),
            ProtocolError::Status { code, .. } => Some(*code),
            ProtocolError::Malformed(_) => None,
        }
    }
}

/// Outcome of a rejected turn submission.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error processing message: {0}")]
    Network(#[from] ProtocolError),
}
