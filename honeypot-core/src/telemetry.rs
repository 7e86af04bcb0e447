//! Telemetry poller
//!
//! Fetches backend performance counters once at start and then on a fixed
//! period. The latest good snapshot is published on a `watch` channel; a
//! failed poll is logged and leaves the previous snapshot in place.
//!
//! Polls are awaited inside the loop and missed ticks are skipped, so two
//! polls never run at the same time. Stopping cancels the schedule but lets
//! a poll that is already running finish.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::ProtocolError;
use crate::models::MetricsSnapshot;
use crate::protocol::TelemetrySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
}

pub struct TelemetryPoller {
    source: Arc<dyn TelemetrySource>,
    snapshot: watch::Sender<Option<MetricsSnapshot>>,
    state: watch::Sender<PollerState>,
}

impl TelemetryPoller {
    pub fn new(source: Arc<dyn TelemetrySource>) -> Self {
        let (snapshot, _) = watch::channel(None);
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            source,
            snapshot,
            state,
        }
    }

    /// Latest successfully polled snapshot, `None` before the first success.
    pub fn snapshot(&self) -> Option<MetricsSnapshot> {
        (*self.snapshot.borrow()).clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MetricsSnapshot>> {
        self.snapshot.subscribe()
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Run a single poll cycle.
    ///
    /// The error is returned for callers driving cycles by hand; the
    /// recurring loop only logs it.
    pub async fn poll_once(&self) -> Result<MetricsSnapshot, ProtocolError> {
        self.state.send_replace(PollerState::Polling);
        let result = self.source.fetch_metrics().await;
        self.state.send_replace(PollerState::Idle);

        match result {
            Ok(snapshot) => {
                tracing::debug!(
                    avg_response_time_ms = snapshot.avg_response_time_ms,
                    uptime_seconds = snapshot.uptime_seconds,
                    "Telemetry snapshot updated"
                );
                self.snapshot.send_replace(Some(snapshot.clone()));
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error loading performance metrics");
                Err(e)
            }
        }
    }

    /// Start polling every `period`, beginning immediately.
    pub fn spawn(self, period: Duration) -> TelemetryHandle {
        let poller = Arc::new(self);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_polling_loop(
            Arc::clone(&poller),
            period.max(Duration::from_millis(1)),
            cancel.clone(),
        ));

        TelemetryHandle {
            poller,
            cancel,
            task,
        }
    }
}

/// Owner of a running poller. Dropping it without `stop` leaves the task
/// running until the runtime shuts down.
pub struct TelemetryHandle {
    poller: Arc<TelemetryPoller>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TelemetryHandle {
    pub fn snapshot(&self) -> Option<MetricsSnapshot> {
        self.poller.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<MetricsSnapshot>> {
        self.poller.subscribe()
    }

    pub fn state(&self) -> PollerState {
        self.poller.state()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the schedule and wait for the loop to exit.
    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Telemetry poller task failed");
        }
    }
}

async fn run_polling_loop(poller: Arc<TelemetryPoller>, period: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_ms = period.as_millis() as u64, "Telemetry poller started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Failures are already logged and the schedule carries on.
                let _ = poller.poll_once().await;
            }
            _ = cancel.cancelled() => {
                tracing::info!("Telemetry poller shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedSource {
        replies: Mutex<VecDeque<Result<MetricsSnapshot, ProtocolError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<MetricsSnapshot, ProtocolError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TelemetrySource for ScriptedSource {
        async fn fetch_metrics(&self) -> Result<MetricsSnapshot, ProtocolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProtocolError::Malformed("script exhausted".to_string())))
        }
    }

    fn snapshot(uptime_seconds: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            avg_response_time_ms: 120.0,
            avg_agent_time_ms: 800.0,
            uptime_seconds,
            total_requests: None,
            error_rate: None,
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_poll_once_overwrites_snapshot() {
        let source = ScriptedSource::new(vec![Ok(snapshot(60.0)), Ok(snapshot(120.0))]);
        let poller = TelemetryPoller::new(source.clone());
        assert!(poller.snapshot().is_none());

        poller.poll_once().await.unwrap();
        assert_eq!(poller.snapshot().unwrap().uptime_seconds, 60.0);
        poller.poll_once().await.unwrap();
        assert_eq!(poller.snapshot().unwrap().uptime_seconds, 120.0);
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_snapshot() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot(120.0)),
            Err(ProtocolError::Status {
                code: 503,
                body: "unavailable".to_string(),
            }),
        ]);
        let poller = TelemetryPoller::new(source);

        poller.poll_once().await.unwrap();
        assert!(poller.poll_once().await.is_err());

        assert_eq!(poller.snapshot().unwrap().uptime_seconds, 120.0);
        assert_eq!(poller.state(), PollerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_polls_immediately_then_on_period() {
        let source = ScriptedSource::new(vec![Ok(snapshot(1.0)), Ok(snapshot(2.0)), Ok(snapshot(3.0))]);
        let handle = TelemetryPoller::new(source.clone()).spawn(Duration::from_secs(10));
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        assert_eq!(handle.snapshot().unwrap().uptime_seconds, 1.0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        updates.changed().await.unwrap();
        assert_eq!(handle.snapshot().unwrap().uptime_seconds, 2.0);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_survives_failures() {
        let source = ScriptedSource::new(vec![
            Err(ProtocolError::Malformed("bad".to_string())),
            Err(ProtocolError::Malformed("bad".to_string())),
            Ok(snapshot(30.0)),
        ]);
        let handle = TelemetryPoller::new(source.clone()).spawn(Duration::from_secs(10));
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        assert_eq!(handle.snapshot().unwrap().uptime_seconds, 30.0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_the_loop() {
        let source = ScriptedSource::new(vec![]);
        let handle = TelemetryPoller::new(source.clone()).spawn(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(25)).await;
        let calls = source.calls.load(Ordering::SeqCst);
        assert_eq!(calls, 3);

        handle.stop().await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), calls);
    }
}
