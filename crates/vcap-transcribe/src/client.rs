//! Submit-and-poll transcription driver.

use std::future::Future;
use std::sync::Arc;

use metrics::{counter, histogram};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use vcap_models::{TranscriptStatus, TranscriptionResult};

use crate::clock::{Clock, TokioClock};
use crate::error::{TranscribeResult, TranscriptionError};
use crate::schedule::{PollPolicy, PollSchedule};
use crate::service::TranscriptionService;

/// Drives a transcription from submission to a terminal status.
#[derive(Clone)]
pub struct Transcriber {
    service: Arc<dyn TranscriptionService>,
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
}

impl Transcriber {
    pub fn new(service: Arc<dyn TranscriptionService>, policy: PollPolicy) -> Self {
        Self {
            service,
            clock: Arc::new(TokioClock),
            policy,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Transcribe a fetchable media URL.
    pub async fn transcribe(&self, media_url: &str) -> TranscribeResult<TranscriptionResult> {
        self.transcribe_with_cancel(media_url, &CancellationToken::new())
            .await
    }

    /// Transcribe a media URL, aborting as soon as `cancel` fires.
    ///
    /// Cancellation interrupts both poll waits and in-flight requests.
    pub async fn transcribe_with_cancel(
        &self,
        media_url: &str,
        cancel: &CancellationToken,
    ) -> TranscribeResult<TranscriptionResult> {
        let started = self.clock.now();
        let result = self.run(media_url, cancel).await;
        let elapsed = self.clock.now().saturating_duration_since(started);

        let outcome = match &result {
            Ok(_) => "completed",
            Err(e) => e.reason(),
        };
        counter!("vcap_transcriptions_total", "outcome" => outcome).increment(1);
        histogram!("vcap_transcription_duration_seconds").record(elapsed.as_secs_f64());

        match &result {
            Ok(transcript) => info!(
                transcript_id = %transcript.id,
                words = transcript.words.len(),
                elapsed_secs = elapsed.as_secs_f64(),
                "Transcription completed"
            ),
            Err(e) => warn!(error = %e, reason = e.reason(), "Transcription did not complete"),
        }

        result
    }

    async fn run(
        &self,
        media_url: &str,
        cancel: &CancellationToken,
    ) -> TranscribeResult<TranscriptionResult> {
        let transcript_id = cancellable(cancel, self.service.submit(media_url)).await?;
        info!(transcript_id = %transcript_id, "Transcription submitted, polling");

        let mut schedule = PollSchedule::new(self.policy.clone(), self.clock.clone());

        while let Some(attempt) = schedule.next() {
            if !attempt.wait.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                    _ = self.clock.sleep(attempt.wait) => {}
                }
            }

            // A poll in flight at the deadline is abandoned.
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TranscriptionError::Cancelled),
                result = self.service.fetch(&transcript_id) => result?,
                _ = self.clock.sleep(schedule.remaining()) => break,
            };
            debug!(
                transcript_id = %transcript_id,
                attempt = attempt.number,
                status = %snapshot.status,
                "Polled transcript"
            );

            match snapshot.status {
                TranscriptStatus::Completed => return Ok(snapshot),
                TranscriptStatus::Error => {
                    return Err(TranscriptionError::failed(transcript_id, snapshot.error))
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {}
            }
        }

        Err(TranscriptionError::Timeout {
            attempts: schedule.attempts(),
            elapsed: schedule.elapsed(),
        })
    }
}

async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> TranscribeResult<T>
where
    F: Future<Output = TranscribeResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TranscriptionError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use vcap_models::Word;

    /// Replays scripted statuses; repeats the last one forever.
    struct ScriptedService {
        statuses: Mutex<VecDeque<TranscriptStatus>>,
        last: Mutex<TranscriptStatus>,
        fetches: AtomicU32,
    }

    impl ScriptedService {
        fn new(statuses: Vec<TranscriptStatus>) -> Arc<Self> {
            Arc::new(Self {
                statuses: Mutex::new(statuses.into()),
                last: Mutex::new(TranscriptStatus::Queued),
                fetches: AtomicU32::new(0),
            })
        }

        fn fetches(&self) -> u32 {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranscriptionService for ScriptedService {
        async fn submit(&self, _media_url: &str) -> TranscribeResult<String> {
            Ok("t-1".to_string())
        }

        async fn fetch(&self, transcript_id: &str) -> TranscribeResult<TranscriptionResult> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let status = {
                let mut last = self.last.lock().unwrap();
                if let Some(next) = self.statuses.lock().unwrap().pop_front() {
                    *last = next;
                }
                *last
            };

            Ok(match status {
                TranscriptStatus::Completed => TranscriptionResult::completed(
                    transcript_id,
                    vec![Word::new("Hello", 0, 500), Word::new("world", 500, 1000)],
                ),
                TranscriptStatus::Error => TranscriptionResult {
                    error: Some("audio too short".to_string()),
                    ..TranscriptionResult::pending(transcript_id, status)
                },
                other => TranscriptionResult::pending(transcript_id, other),
            })
        }
    }

    /// Submit succeeds, every poll fails at the transport level.
    struct BrokenPolls;

    #[async_trait]
    impl TranscriptionService for BrokenPolls {
        async fn submit(&self, _media_url: &str) -> TranscribeResult<String> {
            Ok("t-1".to_string())
        }

        async fn fetch(&self, _transcript_id: &str) -> TranscribeResult<TranscriptionResult> {
            Err(TranscriptionError::request_failed("connection reset"))
        }
    }

    /// A submit that never resolves.
    struct Hanging;

    #[async_trait]
    impl TranscriptionService for Hanging {
        async fn submit(&self, _media_url: &str) -> TranscribeResult<String> {
            std::future::pending().await
        }

        async fn fetch(&self, _transcript_id: &str) -> TranscribeResult<TranscriptionResult> {
            std::future::pending().await
        }
    }

    fn transcriber(service: Arc<dyn TranscriptionService>, clock: Arc<ManualClock>) -> Transcriber {
        Transcriber::new(service, PollPolicy::default()).with_clock(clock)
    }

    #[tokio::test]
    async fn test_completes_after_backoff() {
        let clock = Arc::new(ManualClock::new());
        let service = ScriptedService::new(vec![
            TranscriptStatus::Queued,
            TranscriptStatus::Processing,
            TranscriptStatus::Processing,
            TranscriptStatus::Completed,
        ]);

        let result = transcriber(service.clone(), clock.clone())
            .transcribe("https://media/a.mp4")
            .await
            .unwrap();

        assert_eq!(result.status, TranscriptStatus::Completed);
        assert_eq!(result.words.len(), 2);
        assert_eq!(service.fetches(), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn test_error_status_fails() {
        let clock = Arc::new(ManualClock::new());
        let service = ScriptedService::new(vec![TranscriptStatus::Processing, TranscriptStatus::Error]);

        let err = transcriber(service, clock)
            .transcribe("https://media/a.mp4")
            .await
            .unwrap_err();

        assert_eq!(err.reason(), "transcription failed");
        match err {
            TranscriptionError::Failed { detail, .. } => {
                assert_eq!(detail.as_deref(), Some("audio too short"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_never_terminal_times_out_within_budget() {
        let clock = Arc::new(ManualClock::new());
        let service = ScriptedService::new(vec![]);

        let err = transcriber(service.clone(), clock.clone())
            .transcribe("https://media/a.mp4")
            .await
            .unwrap_err();

        assert_eq!(err.reason(), "timeout");
        assert!(service.fetches() <= 40);
        assert!(clock.elapsed() <= Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_attempt_budget_times_out() {
        let clock = Arc::new(ManualClock::new());
        let service = ScriptedService::new(vec![]);
        let transcriber = Transcriber::new(service.clone(), PollPolicy::default().with_max_attempts(3))
            .with_clock(clock);

        let err = transcriber.transcribe("https://media/a.mp4").await.unwrap_err();
        assert!(matches!(err, TranscriptionError::Timeout { attempts: 3, .. }));
        assert_eq!(service.fetches(), 3);
    }

    #[tokio::test]
    async fn test_request_failure_is_fatal() {
        let clock = Arc::new(ManualClock::new());
        let err = transcriber(Arc::new(BrokenPolls), clock.clone())
            .transcribe("https://media/a.mp4")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::RequestFailed(_)));
        assert!(clock.sleeps().is_empty());
    }

    /// Every status request takes 29 seconds and never reaches a terminal status.
    struct SlowPolls;

    #[async_trait]
    impl TranscriptionService for SlowPolls {
        async fn submit(&self, _media_url: &str) -> TranscribeResult<String> {
            Ok("t-1".to_string())
        }

        async fn fetch(&self, transcript_id: &str) -> TranscribeResult<TranscriptionResult> {
            tokio::time::sleep(Duration::from_secs(29)).await;
            Ok(TranscriptionResult::pending(
                transcript_id,
                TranscriptStatus::Processing,
            ))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_polls_stop_at_wall_clock_budget() {
        let transcriber = Transcriber::new(Arc::new(SlowPolls), PollPolicy::default());

        let started = tokio::time::Instant::now();
        let err = transcriber
            .transcribe("https://media/a.mp4")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::Timeout { .. }));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(599));
        assert!(elapsed < Duration::from_secs(601), "overran budget: {elapsed:?}");
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let clock = Arc::new(ManualClock::new());
        let service = ScriptedService::new(vec![TranscriptStatus::Completed]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = transcriber(service.clone(), clock)
            .transcribe_with_cancel("https://media/a.mp4", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::Cancelled));
        assert_eq!(service.fetches(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_real_poll_wait() {
        let service = ScriptedService::new(vec![]);
        let transcriber = Transcriber::new(service.clone(), PollPolicy::default());
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            trigger.cancel();
        });

        let started = tokio::time::Instant::now();
        let err = transcriber
            .transcribe_with_cancel("https://media/a.mp4", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::Cancelled));
        // Second wait (2s) was interrupted part-way.
        assert_eq!(service.fetches(), 2);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_cancel_aborts_in_flight_request() {
        let cancel = CancellationToken::new();
        let transcriber = Transcriber::new(Arc::new(Hanging), PollPolicy::default());

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = tokio::time::timeout(
            Duration::from_secs(5),
            transcriber.transcribe_with_cancel("https://media/a.mp4", &cancel),
        )
        .await
        .expect("cancellation should not hang")
        .unwrap_err();

        assert!(matches!(err, TranscriptionError::Cancelled));
    }
}
