//! Pipeline configuration.

use std::time::Duration;

use vcap_models::DEFAULT_MAX_WORDS_PER_CAPTION;

/// Timing and segmentation settings shared by the orchestrator and service.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Lifetime of presigned source-video URLs handed to external services.
    pub input_url_ttl: Duration,
    /// Lifetime of presigned output URLs recorded on completed jobs.
    pub output_url_ttl: Duration,
    /// Upper bound on a single render-worker call.
    pub render_timeout: Duration,
    /// Caption segment size.
    pub max_words_per_caption: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_url_ttl: Duration::from_secs(3600),
            output_url_ttl: Duration::from_secs(24 * 3600),
            render_timeout: Duration::from_secs(600),
            max_words_per_caption: DEFAULT_MAX_WORDS_PER_CAPTION,
        }
    }
}

impl PipelineConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secs = |name: &str| {
            std::env::var(name)
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        Self {
            input_url_ttl: secs("INPUT_URL_TTL_SECS").unwrap_or(defaults.input_url_ttl),
            output_url_ttl: secs("OUTPUT_URL_TTL_SECS").unwrap_or(defaults.output_url_ttl),
            render_timeout: secs("RENDER_TIMEOUT_SECS").unwrap_or(defaults.render_timeout),
            max_words_per_caption: std::env::var("MAX_WORDS_PER_CAPTION")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_words_per_caption),
        }
    }

    pub fn with_render_timeout(mut self, render_timeout: Duration) -> Self {
        self.render_timeout = render_timeout;
        self
    }
}
