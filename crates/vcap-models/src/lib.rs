//! Shared data models for the captioning backend.
//!
//! This crate provides Serde-serializable types for:
//! - Captions and transcript words
//! - Transcription status snapshots
//! - Render jobs, their status machine and caption styles
//!
//! It also holds the two pure transformations the pipeline is built on:
//! word-to-caption segmentation and the SRT subtitle codec.

pub mod caption;
pub mod error;
pub mod job;
pub mod segment;
pub mod srt;
pub mod style;
pub mod transcript;

// Re-export common types
pub use caption::{validate_captions, Caption, Word};
pub use error::{TransitionError, ValidationError};
pub use job::{JobId, RenderJob, RenderStatus, VideoReference};
pub use segment::{segment_words, CaptionSegmenter, DEFAULT_MAX_WORDS_PER_CAPTION};
pub use srt::{decode_srt, encode_srt, format_timecode, parse_timecode};
pub use style::{CaptionStyle, StyleParseError};
pub use transcript::{TranscriptStatus, TranscriptionResult};
