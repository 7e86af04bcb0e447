use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last successfully polled backend performance counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub avg_response_time_ms: f64,
    pub avg_agent_time_ms: f64,
    pub uptime_seconds: f64,
    pub total_requests: Option<u64>,
    pub error_rate: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}
