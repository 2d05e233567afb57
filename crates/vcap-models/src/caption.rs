//! Caption and transcript word types.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A timed text segment, offsets in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
    /// Caption text (single line)
    pub text: String,
}

impl Caption {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check the caption invariants.
    ///
    /// `index` is the 1-based position used in the error message.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ValidationError::invalid_caption(
                index,
                "timestamps must be finite",
            ));
        }
        if self.start < 0.0 || self.end < 0.0 {
            return Err(ValidationError::invalid_caption(
                index,
                format!("negative timestamp ({} --> {})", self.start, self.end),
            ));
        }
        if self.end < self.start {
            return Err(ValidationError::invalid_caption(
                index,
                format!("end {} is before start {}", self.end, self.start),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(ValidationError::invalid_caption(index, "text is empty"));
        }
        Ok(())
    }
}

/// Validate a caption list, reporting the first offending caption.
pub fn validate_captions(captions: &[Caption]) -> Result<(), ValidationError> {
    captions
        .iter()
        .enumerate()
        .try_for_each(|(i, caption)| caption.validate(i + 1))
}

/// A single transcribed word with millisecond timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Word {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
        }
    }

    /// Start offset in seconds.
    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// End offset in seconds.
    pub fn end_secs(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_caption() {
        assert!(Caption::new(0.0, 2.5, "Hello world").validate(1).is_ok());
        // Zero-length captions are allowed
        assert!(Caption::new(1.0, 1.0, "Hi").validate(1).is_ok());
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let err = Caption::new(-1.0, 2.0, "oops").validate(3).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCaption { index: 3, .. }));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert!(Caption::new(5.0, 2.0, "backwards").validate(1).is_err());
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(Caption::new(0.0, 1.0, "   ").validate(1).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Caption::new(f64::NAN, 1.0, "x").validate(1).is_err());
    }

    #[test]
    fn test_validate_captions_reports_first_bad_index() {
        let captions = vec![
            Caption::new(0.0, 1.0, "ok"),
            Caption::new(1.0, 2.0, "ok"),
            Caption::new(3.0, 2.0, "bad"),
        ];
        let err = validate_captions(&captions).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCaption { index: 3, .. }));
    }

    #[test]
    fn test_word_seconds() {
        let word = Word::new("hello", 1500, 2250);
        assert_eq!(word.start_secs(), 1.5);
        assert_eq!(word.end_secs(), 2.25);
    }
}
