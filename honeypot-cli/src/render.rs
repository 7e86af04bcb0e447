//! Plain-text rendering of the session state.
//!
//! Pure functions only: everything here takes state and returns strings, so
//! the chat loop stays a thin shell around `honeypot_core`.

use chrono::Local;
use honeypot_core::{
    Category, IntelligenceStore, MetricsSnapshot, Speaker, StatsAccumulator, TranscriptEntry,
    TurnOutcome,
};
use std::fmt::Write;

pub const PLACEHOLDER: &str = "-";

pub fn detection_rate(stats: &StatsAccumulator) -> String {
    match stats.detection_rate() {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn avg_engagement(stats: &StatsAccumulator) -> String {
    match stats.avg_engagement_seconds() {
        Some(avg) => format!("{:.1}s", avg),
        None => "0s".to_string(),
    }
}

pub fn millis(ms: f64) -> String {
    format!("{:.0}ms", ms)
}

/// `3725.0` -> `"1h 2m"`.
pub fn uptime(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}h {}m", total / 3600, (total % 3600) / 60)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

pub fn speaker_label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Inbound => "Scammer",
        Speaker::Outbound => "AI Agent",
    }
}

pub fn transcript_line(entry: &TranscriptEntry) -> String {
    format!(
        "[{} • {}] {}",
        speaker_label(entry.speaker),
        entry.timestamp.with_timezone(&Local).format("%H:%M:%S"),
        entry.text
    )
}

pub fn turn_card(outcome: &TurnOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Response:        {}",
        outcome.reply.as_deref().unwrap_or("No response generated")
    );
    let _ = writeln!(out, "Scam detected:   {}", yes_no(outcome.scam_detected));
    let _ = writeln!(out, "Agent activated: {}", yes_no(outcome.agent_activated));
    let _ = write!(out, "Turn count:      {}", outcome.turn_count);
    out
}

pub fn stats_panel(stats: &StatsAccumulator, store: &IntelligenceStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Messages:        {}", stats.total_turns());
    let _ = writeln!(out, "Scams detected:  {}", stats.detected_turns());
    let _ = writeln!(out, "Detection rate:  {}", detection_rate(stats));
    let _ = writeln!(out, "Intel found:     {}", stats.intelligence_entities_total());
    let _ = writeln!(out, "Avg engagement:  {}", avg_engagement(stats));
    let counts: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", c.label(), store.category(*c).len()))
        .collect();
    let _ = write!(out, "Intelligence:    {}", counts.join(" | "));
    out
}

fn empty_label(category: Category) -> &'static str {
    match category {
        Category::FinancialAccounts => "No bank accounts found yet",
        Category::PaymentHandles => "No UPI IDs found yet",
        Category::SuspiciousLinks => "No phishing URLs found yet",
    }
}

/// Full listing per category, or `None` when there is nothing to show.
pub fn intelligence_details(store: &IntelligenceStore) -> Option<String> {
    if !store.has_details() {
        return None;
    }

    let mut out = String::new();
    for category in Category::ALL {
        let _ = writeln!(out, "{}:", category.label());
        let set = store.category(category);
        if set.is_empty() {
            let _ = writeln!(out, "  ({})", empty_label(category));
        }
        for item in set.iter() {
            let _ = writeln!(out, "  {}", item);
        }
    }
    Some(out.trim_end().to_string())
}

pub fn metrics_panel(snapshot: Option<&MetricsSnapshot>, stats: &StatsAccumulator) -> String {
    let (response, agent, up) = match snapshot {
        Some(s) => (
            millis(s.avg_response_time_ms),
            millis(s.avg_agent_time_ms),
            uptime(s.uptime_seconds),
        ),
        None => (
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Avg response time:  {}", response);
    let _ = writeln!(out, "Agent response:     {}", agent);
    let _ = writeln!(out, "Detection accuracy: {}", detection_rate(stats));
    let _ = write!(out, "System uptime:      {}", up);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use honeypot_core::models::ExtractedIntelligence;
    use honeypot_core::stats::TurnRecord;
    use honeypot_core::ConversationId;

    #[test]
    fn test_placeholders_before_any_turn() {
        let stats = StatsAccumulator::new();
        assert_eq!(detection_rate(&stats), "-");
        assert_eq!(avg_engagement(&stats), "0s");

        let panel = metrics_panel(None, &stats);
        assert!(panel.contains("Avg response time:  -"));
        assert!(panel.contains("System uptime:      -"));
    }

    #[test]
    fn test_rates_after_recorded_turns() {
        let mut stats = StatsAccumulator::new();
        stats.record(&TurnRecord {
            detected: true,
            entity_count: 1,
            engagement_seconds: Some(2.0),
        });
        assert_eq!(detection_rate(&stats), "100.0%");
        assert_eq!(avg_engagement(&stats), "2.0s");

        stats.record(&TurnRecord {
            detected: false,
            entity_count: 0,
            engagement_seconds: None,
        });
        assert_eq!(detection_rate(&stats), "50.0%");
        assert_eq!(avg_engagement(&stats), "2.0s");
    }

    #[test]
    fn test_uptime_formats_hours_and_minutes() {
        assert_eq!(uptime(0.0), "0h 0m");
        assert_eq!(uptime(120.0), "0h 2m");
        assert_eq!(uptime(3725.9), "1h 2m");
        assert_eq!(uptime(-5.0), "0h 0m");
    }

    #[test]
    fn test_millis_rounds() {
        assert_eq!(millis(249.6), "250ms");
        assert_eq!(millis(0.0), "0ms");
    }

    #[test]
    fn test_metrics_panel_uses_snapshot() {
        let snapshot = MetricsSnapshot {
            avg_response_time_ms: 312.4,
            avg_agent_time_ms: 1500.0,
            uptime_seconds: 7260.0,
            total_requests: None,
            error_rate: None,
            fetched_at: Utc::now(),
        };
        let panel = metrics_panel(Some(&snapshot), &StatsAccumulator::new());
        assert!(panel.contains("312ms"));
        assert!(panel.contains("1500ms"));
        assert!(panel.contains("2h 1m"));
    }

    #[test]
    fn test_turn_card_without_reply() {
        let outcome = TurnOutcome {
            conversation_id: ConversationId::new("abc1"),
            reply: None,
            scam_detected: false,
            agent_activated: false,
            turn_count: 3,
            entity_count: 0,
            new_entities: 0,
        };
        let card = turn_card(&outcome);
        assert!(card.contains("No response generated"));
        assert!(card.contains("Scam detected:   No"));
        assert!(card.ends_with("Turn count:      3"));
    }

    #[test]
    fn test_intelligence_details_hidden_when_empty() {
        assert!(intelligence_details(&IntelligenceStore::new()).is_none());
    }

    #[test]
    fn test_intelligence_details_lists_items_and_empty_categories() {
        let mut store = IntelligenceStore::new();
        store.merge(&ExtractedIntelligence {
            payment_handles: vec!["scam@upi".to_string()],
            ..ExtractedIntelligence::default()
        });

        let details = intelligence_details(&store).unwrap();
        assert!(details.contains("UPI IDs:\n  scam@upi"));
        assert!(details.contains("(No bank accounts found yet)"));
        assert!(details.contains("(No phishing URLs found yet)"));

        let panel = stats_panel(&StatsAccumulator::new(), &store);
        assert!(panel.ends_with("Bank Accounts 0 | UPI IDs 1 | Phishing URLs 0"));
    }

    #[test]
    fn test_transcript_line_labels_speaker() {
        let line = transcript_line(&TranscriptEntry::outbound("Which bank is it?"));
        assert!(line.starts_with("[AI Agent • "));
        assert!(line.ends_with("] Which bank is it?"));
    }
}
