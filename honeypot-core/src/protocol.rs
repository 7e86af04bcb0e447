//! Wire contract with the honeypot backend.
//!
//! Two independent seams:
//! - **`AnalysisBackend`**: one turn, `POST /api/v1/message`
//! - **`TelemetrySource`**: performance counters, `GET /api/v1/metrics`
//!
//! `HttpApiClient` implements both over reqwest. Every failure surfaces as a
//! `ProtocolError`; nothing here retries.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ServiceConfig;
use crate::error::ProtocolError;
use crate::models::{MetricsSnapshot, TurnRequest, TurnResponse};

/// Header carrying the static API credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

const MESSAGE_PATH: &str = "/api/v1/message";
const METRICS_PATH: &str = "/api/v1/metrics";
const HEALTH_PATH: &str = "/api/health";

// ============================================================================
// Traits
// ============================================================================

/// Sends one conversation turn to the analysis service.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, ProtocolError>;
}

/// Reads the backend's performance counters.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, ProtocolError>;
}

// ============================================================================
// Wire structs (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MetricsEnvelope {
    performance: PerformanceWire,
}

/// Times are reported in seconds.
#[derive(Debug, Deserialize)]
struct PerformanceWire {
    avg_response_time: f64,
    avg_agent_time: f64,
    uptime_seconds: f64,
    #[serde(default)]
    total_requests: Option<u64>,
    #[serde(default)]
    error_rate: Option<f64>,
}

impl From<PerformanceWire> for MetricsSnapshot {
    fn from(p: PerformanceWire) -> Self {
        Self {
            avg_response_time_ms: p.avg_response_time * 1000.0,
            avg_agent_time_ms: p.avg_agent_time * 1000.0,
            uptime_seconds: p.uptime_seconds,
            total_requests: p.total_requests,
            error_rate: p.error_rate,
            fetched_at: Utc::now(),
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

// ============================================================================
// HttpApiClient
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpApiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Create a client against an arbitrary base URL (tests, local servers).
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let config = ServiceConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..ServiceConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<HealthStatus, ProtocolError> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl AnalysisBackend for HttpApiClient {
    async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse, ProtocolError> {
        let url = format!("{}{}", self.base_url, MESSAGE_PATH);
        tracing::debug!(
            url = %url,
            conversation_id = ?request.conversation_id,
            "Submitting turn"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let turn: TurnResponse = read_json(response).await?;
        validate_turn(&turn)?;
        Ok(turn)
    }
}

#[async_trait]
impl TelemetrySource for HttpApiClient {
    async fn fetch_metrics(&self) -> Result<MetricsSnapshot, ProtocolError> {
        let url = format!("{}{}", self.base_url, METRICS_PATH);
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let envelope: MetricsEnvelope = read_json(response).await?;
        Ok(envelope.performance.into())
    }
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

/// Check the status, then decode the body. Decode failures are contract
/// violations, not transport errors.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProtocolError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!(code = status.as_u16(), body = %body, "Backend returned an error status");
        return Err(ProtocolError::Status {
            code: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

fn validate_turn(turn: &TurnResponse) -> Result<(), ProtocolError> {
    if turn.conversation_id.as_str().is_empty() {
        return Err(ProtocolError::Malformed(
            "conversation_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
