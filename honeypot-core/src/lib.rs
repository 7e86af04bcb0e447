pub mod config;
pub mod error;
pub mod examples;
pub mod intelligence;
pub mod models;
pub mod protocol;
pub mod session;
pub mod stats;
pub mod telemetry;

pub use config::HoneypotConfig;
pub use error::{HoneypotError, ProtocolError, TurnError, ValidationError};
pub use examples::{Draft, EXAMPLE_MESSAGES};
pub use intelligence::{Category, EntitySet, IntelligenceStore};
pub use models::{ConversationId, MetricsSnapshot, Speaker, TranscriptEntry};
pub use protocol::{AnalysisBackend, HealthStatus, HttpApiClient, TelemetrySource};
pub use session::{ConversationSession, InFlight, TurnOutcome};
pub use stats::StatsAccumulator;
pub use telemetry::{PollerState, TelemetryHandle, TelemetryPoller};
