//! Word-to-caption segmentation.
//!
//! Groups transcript words into fixed-size caption segments. The caption's
//! start comes from its first word and its end from its last word; texts are
//! joined with single spaces.

use std::num::NonZeroUsize;

use crate::caption::{Caption, Word};

/// Default number of words per caption segment.
pub const DEFAULT_MAX_WORDS_PER_CAPTION: usize = 8;

/// Configurable caption segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionSegmenter {
    max_words_per_caption: NonZeroUsize,
}

impl CaptionSegmenter {
    pub fn new(max_words_per_caption: NonZeroUsize) -> Self {
        Self {
            max_words_per_caption,
        }
    }

    /// Build a segmenter from a raw count, falling back to the default for zero.
    pub fn with_max_words(max_words_per_caption: usize) -> Self {
        NonZeroUsize::new(max_words_per_caption)
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn max_words_per_caption(&self) -> usize {
        self.max_words_per_caption.get()
    }

    /// Segment an ordered word sequence into captions.
    pub fn segment(&self, words: &[Word]) -> Vec<Caption> {
        segment_words(words, self.max_words_per_caption)
    }
}

impl Default for CaptionSegmenter {
    fn default() -> Self {
        Self::with_max_words(DEFAULT_MAX_WORDS_PER_CAPTION)
    }
}

/// In-progress caption being filled with words.
struct CaptionBuffer {
    start_ms: u64,
    end_ms: u64,
    text: String,
    words: usize,
}

impl CaptionBuffer {
    fn open(word: &Word, text: &str) -> Self {
        Self {
            start_ms: word.start_ms,
            end_ms: word.end_ms,
            text: text.to_string(),
            words: 1,
        }
    }

    fn push(&mut self, word: &Word, text: &str) {
        self.text.push(' ');
        self.text.push_str(text);
        self.end_ms = word.end_ms;
        self.words += 1;
    }

    fn finish(self) -> Caption {
        Caption {
            start: self.start_ms as f64 / 1000.0,
            end: self.end_ms as f64 / 1000.0,
            text: self.text,
        }
    }
}

/// Segment words into captions of at most `max_words_per_caption` words.
///
/// Words with blank text are skipped. Timestamps are passed through without
/// validation, including zero-length words.
pub fn segment_words(words: &[Word], max_words_per_caption: NonZeroUsize) -> Vec<Caption> {
    let max = max_words_per_caption.get();
    let mut captions = Vec::with_capacity(words.len().div_ceil(max));
    let mut buffer: Option<CaptionBuffer> = None;

    for word in words {
        let text = word.text.trim();
        if text.is_empty() {
            continue;
        }

        match buffer.as_mut() {
            Some(current) => current.push(word, text),
            None => buffer = Some(CaptionBuffer::open(word, text)),
        }

        if buffer.as_ref().is_some_and(|b| b.words >= max) {
            if let Some(full) = buffer.take() {
                captions.push(full.finish());
            }
        }
    }

    if let Some(partial) = buffer {
        captions.push(partial.finish());
    }

    captions
}
