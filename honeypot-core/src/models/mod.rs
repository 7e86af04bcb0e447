pub mod conversation;
pub mod metrics;
pub mod transcript;
pub mod turn;

pub use conversation::ConversationId;
pub use metrics::MetricsSnapshot;
pub use transcript::{Speaker, TranscriptEntry};
pub use turn::{EngagementMetrics, ExtractedIntelligence, TurnRequest, TurnResponse};
