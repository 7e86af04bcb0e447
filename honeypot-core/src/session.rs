//! Conversation session: identity, transcript and per-turn orchestration.
//!
//! A turn is all-or-nothing. The session only changes after the backend
//! returns a valid response, and then the transcript, intelligence store and
//! stats are updated together under `&mut self`.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{TurnError, ValidationError};
use crate::intelligence::IntelligenceStore;
use crate::models::{ConversationId, TranscriptEntry, TurnRequest, TurnResponse};
use crate::protocol::AnalysisBackend;
use crate::stats::{StatsAccumulator, TurnRecord};

/// Shared "turn in flight" flag, readable from other tasks.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn raise(&self) -> InFlightGuard {
        self.0.store(true, Ordering::Release);
        InFlightGuard(self.clone())
    }
}

/// Lowers the flag when dropped, whatever the turn's outcome.
struct InFlightGuard(InFlight);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        (self.0).0.store(false, Ordering::Release);
    }
}

/// Summary of the last completed turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub conversation_id: ConversationId,
    pub reply: Option<String>,
    pub scam_detected: bool,
    pub agent_activated: bool,
    /// Turn count as reported by the backend.
    pub turn_count: u32,
    /// Entities extracted this turn, before deduplication.
    pub entity_count: usize,
    /// Entities this turn added to the store.
    pub new_entities: usize,
}

#[derive(Debug, Default)]
pub struct ConversationSession {
    id: Option<ConversationId>,
    transcript: Vec<TranscriptEntry>,
    intelligence: IntelligenceStore,
    stats: StatsAccumulator,
    last_turn: Option<TurnOutcome>,
    in_flight: InFlight,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `text` as the next turn and fold the result into the session.
    ///
    /// Whitespace-only input is rejected without contacting the backend.
    /// On any error the session is left exactly as it was.
    pub async fn submit_turn(
        &mut self,
        backend: &dyn AnalysisBackend,
        text: &str,
    ) -> Result<TurnOutcome, TurnError> {
        let message = text.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let request = TurnRequest {
            message: message.to_string(),
            conversation_id: self.id.clone(),
        };

        let result = {
            let _guard = self.in_flight.raise();
            backend.send_turn(&request).await
        };

        match result {
            Ok(response) => Ok(self.apply(request.message, response)),
            Err(e) => {
                tracing::warn!(
                    conversation_id = ?self.id,
                    error = %e,
                    "Turn failed, session unchanged"
                );
                Err(e.into())
            }
        }
    }

    fn apply(&mut self, message: String, response: TurnResponse) -> TurnOutcome {
        let conversation_id = match &self.id {
            Some(existing) => {
                if *existing != response.conversation_id {
                    tracing::warn!(
                        established = %existing,
                        received = %response.conversation_id,
                        "Backend returned a different conversation id, keeping the established one"
                    );
                }
                existing.clone()
            }
            None => {
                tracing::info!(conversation_id = %response.conversation_id, "Conversation established");
                self.id = Some(response.conversation_id.clone());
                response.conversation_id.clone()
            }
        };

        self.transcript.push(TranscriptEntry::inbound(message));
        let reply = response.reply().map(str::to_string);
        if let Some(reply) = &reply {
            self.transcript.push(TranscriptEntry::outbound(reply.clone()));
        }

        let new_entities = self.intelligence.merge(&response.extracted_intelligence);
        let record = TurnRecord::from(&response);
        self.stats.record(&record);

        let outcome = TurnOutcome {
            conversation_id,
            reply,
            scam_detected: response.scam_detected,
            agent_activated: response.agent_activated,
            turn_count: response.engagement_metrics.turn_count,
            entity_count: record.entity_count,
            new_entities,
        };

        tracing::info!(
            conversation_id = %outcome.conversation_id,
            scam_detected = outcome.scam_detected,
            turn_count = outcome.turn_count,
            new_entities = outcome.new_entities,
            "Turn complete"
        );

        self.last_turn = Some(outcome.clone());
        outcome
    }

    /// Forget the conversation: id, transcript, intelligence, stats.
    pub fn reset(&mut self) {
        let in_flight = self.in_flight.clone();
        *self = Self {
            in_flight,
            ..Self::default()
        };
        tracing::info!("Conversation cleared");
    }

    pub fn id(&self) -> Option<&ConversationId> {
        self.id.as_ref()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn intelligence(&self) -> &IntelligenceStore {
        &self.intelligence
    }

    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    pub fn last_turn(&self) -> Option<&TurnOutcome> {
        self.last_turn.as_ref()
    }

    /// Handle to the in-flight flag for readers outside the session.
    pub fn in_flight(&self) -> InFlight {
        self.in_flight.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_set()
    }
}
