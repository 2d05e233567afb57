//! Transcription client.
//!
//! Submits a media URL to a speech-to-text service and polls until the
//! transcript is ready. Polling follows a capped exponential backoff within
//! a fixed attempt and wall-clock budget, and can be cancelled at any
//! suspension point.

pub mod assemblyai;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod schedule;
pub mod service;

pub use assemblyai::AssemblyAiService;
pub use client::Transcriber;
pub use clock::{Clock, ManualClock, TokioClock};
pub use config::TranscriptionConfig;
pub use error::{TranscribeResult, TranscriptionError};
pub use schedule::{PollAttempt, PollPolicy, PollSchedule};
pub use service::TranscriptionService;
