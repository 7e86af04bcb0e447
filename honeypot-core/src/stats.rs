//! Running statistics over completed turns.

use serde::Serialize;

use crate::models::TurnResponse;

/// What a single completed turn contributes to the counters.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub detected: bool,
    pub entity_count: usize,
    pub engagement_seconds: Option<f64>,
}

impl From<&TurnResponse> for TurnRecord {
    fn from(response: &TurnResponse) -> Self {
        Self {
            detected: response.scam_detected,
            entity_count: response.extracted_intelligence.entity_count(),
            engagement_seconds: response.engagement_metrics.conversation_duration_seconds,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsAccumulator {
    total_turns: u64,
    detected_turns: u64,
    /// Per-turn entity counts summed before deduplication, so this can
    /// exceed the intelligence store's distinct count.
    intelligence_entities_total: u64,
    engagement_seconds_sum: f64,
    engagement_samples: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: &TurnRecord) {
        self.total_turns += 1;
        if turn.detected {
            self.detected_turns += 1;
        }
        self.intelligence_entities_total += turn.entity_count as u64;

        // Absent, zero and non-finite durations are not samples.
        if let Some(seconds) = turn.engagement_seconds.filter(|s| s.is_finite() && *s > 0.0) {
            self.engagement_seconds_sum += seconds;
            self.engagement_samples += 1;
        }
    }

    pub fn total_turns(&self) -> u64 {
        self.total_turns
    }

    pub fn detected_turns(&self) -> u64 {
        self.detected_turns
    }

    pub fn intelligence_entities_total(&self) -> u64 {
        self.intelligence_entities_total
    }

    pub fn engagement_samples(&self) -> u64 {
        self.engagement_samples
    }

    /// Fraction of turns flagged as scams, `None` before the first turn.
    pub fn detection_rate(&self) -> Option<f64> {
        if self.total_turns == 0 {
            return None;
        }
        Some(self.detected_turns as f64 / self.total_turns as f64)
    }

    /// Mean reported engagement duration, `None` until one is reported.
    pub fn avg_engagement_seconds(&self) -> Option<f64> {
        if self.engagement_samples == 0 {
            return None;
        }
        Some(self.engagement_seconds_sum / self.engagement_samples as f64)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(detected: bool, entity_count: usize, engagement_seconds: Option<f64>) -> TurnRecord {
        TurnRecord {
            detected,
            entity_count,
            engagement_seconds,
        }
    }

    #[test]
    fn test_derived_values_are_placeholders_when_empty() {
        let stats = StatsAccumulator::new();
        assert_eq!(stats.total_turns(), 0);
        assert!(stats.detection_rate().is_none());
        assert!(stats.avg_engagement_seconds().is_none());
    }

    #[test]
    fn test_record_counts_turns_and_detections() {
        let mut stats = StatsAccumulator::new();
        stats.record(&turn(true, 2, Some(4.0)));
        stats.record(&turn(false, 0, None));
        stats.record(&turn(true, 1, Some(8.0)));

        assert_eq!(stats.total_turns(), 3);
        assert_eq!(stats.detected_turns(), 2);
        assert_eq!(stats.intelligence_entities_total(), 3);
        assert_eq!(stats.detection_rate(), Some(2.0 / 3.0));
        assert_eq!(stats.avg_engagement_seconds(), Some(6.0));
    }

    #[test]
    fn test_zero_and_invalid_engagement_are_not_samples() {
        let mut stats = StatsAccumulator::new();
        stats.record(&turn(false, 0, Some(0.0)));
        stats.record(&turn(false, 0, Some(f64::NAN)));
        stats.record(&turn(false, 0, Some(-3.0)));
        assert_eq!(stats.engagement_samples(), 0);
        assert!(stats.avg_engagement_seconds().is_none());

        stats.record(&turn(false, 0, Some(2.5)));
        assert_eq!(stats.avg_engagement_seconds(), Some(2.5));
    }

    #[test]
    fn test_detected_never_exceeds_total() {
        let mut stats = StatsAccumulator::new();
        for i in 0..20 {
            stats.record(&turn(i % 3 != 0, i, None));
            assert!(stats.detected_turns() <= stats.total_turns());
        }
        assert_eq!(stats.total_turns(), 20);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut stats = StatsAccumulator::new();
        stats.record(&turn(true, 5, Some(10.0)));
        stats.reset();
        assert_eq!(stats, StatsAccumulator::default());
        assert!(stats.detection_rate().is_none());
    }
}
