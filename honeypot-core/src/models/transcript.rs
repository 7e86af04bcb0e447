use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The scam message sent to the service.
    Inbound,
    /// The counter-message returned by the agent.
    Outbound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub text: String,
    pub speaker: Speaker,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            speaker,
            timestamp: Utc::now(),
        }
    }

    pub fn inbound(text: impl Into<String>) -> Self {
        Self::new(Speaker::Inbound, text)
    }

    pub fn outbound(text: impl Into<String>) -> Self {
        Self::new(Speaker::Outbound, text)
    }
}
