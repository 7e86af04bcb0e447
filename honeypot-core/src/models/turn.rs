use serde::{Deserialize, Serialize};

use super::ConversationId;

/// Body of `POST /api/v1/message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

/// Successful analysis of one turn.
///
/// Every field without a `#[serde(default)]` is required; a body missing
/// any of them fails to deserialize and is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurnResponse {
    pub conversation_id: ConversationId,
    #[serde(default)]
    pub response_message: Option<String>,
    pub scam_detected: bool,
    pub agent_activated: bool,
    pub extracted_intelligence: ExtractedIntelligence,
    pub engagement_metrics: EngagementMetrics,
}

impl TurnResponse {
    /// The agent's reply, treating an empty string as no reply.
    pub fn reply(&self) -> Option<&str> {
        self.response_message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Entities the backend extracted from the conversation so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIntelligence {
    #[serde(rename = "bank_accounts")]
    pub financial_accounts: Vec<String>,
    #[serde(rename = "upi_ids")]
    pub payment_handles: Vec<String>,
    #[serde(rename = "phishing_urls")]
    pub suspicious_links: Vec<String>,
}

impl ExtractedIntelligence {
    /// Entity count across all three categories, duplicates included.
    pub fn entity_count(&self) -> usize {
        self.financial_accounts.len() + self.payment_handles.len() + self.suspicious_links.len()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngagementMetrics {
    #[serde(default)]
    pub conversation_duration_seconds: Option<f64>,
    pub turn_count: u32,
}
