//! Structured render-job logging.

use std::time::Instant;

use tracing::{error, info, warn, Span};
use vcap_models::JobId;

/// Logs render job lifecycle events with the job id attached to every line.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    started: Instant,
}

impl JobLogger {
    pub fn new(job_id: &JobId) -> Self {
        Self {
            job_id: job_id.to_string(),
            started: Instant::now(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn log_start(&self, message: &str) {
        info!(job_id = %self.job_id, "Render started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(job_id = %self.job_id, elapsed_ms = self.elapsed_ms(), "Render progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(job_id = %self.job_id, "Render warning: {}", message);
    }

    pub fn log_error(&self, message: &str) {
        error!(job_id = %self.job_id, elapsed_ms = self.elapsed_ms(), "Render failed: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(job_id = %self.job_id, elapsed_ms = self.elapsed_ms(), "Render completed: {}", message);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Span attached to the orchestration future.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("render_job", job_id = %self.job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger_carries_id() {
        let job_id = JobId::from_string("job-42");
        let logger = JobLogger::new(&job_id);

        assert_eq!(logger.job_id(), "job-42");
        logger.log_start("test");
        logger.log_progress("test");
        logger.log_warning("test");
        logger.log_error("test");
        logger.log_completion("test");
    }
}
