//! SRT subtitle codec.
//!
//! Output format, per caption at 1-based index `i`:
//!
//! ```text
//! i
//! HH:MM:SS,mmm --> HH:MM:SS,mmm
//! text
//! <blank line>
//! ```
//!
//! Hours are not wrapped at 24. Encoding is byte-for-byte deterministic.

use std::fmt::Write as _;

use crate::caption::{validate_captions, Caption};
use crate::error::ValidationError;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Format seconds as an SRT timecode (`HH:MM:SS,mmm`).
///
/// The value is rounded to the nearest millisecond before being split into
/// fields, so a fraction that rounds up carries into the seconds field.
/// Negative and non-finite inputs clamp to zero.
///
/// # Examples
/// ```
/// use vcap_models::srt::format_timecode;
/// assert_eq!(format_timecode(65.123), "00:01:05,123");
/// assert_eq!(format_timecode(3661.456), "01:01:01,456");
/// ```
pub fn format_timecode(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timecode (`HH:MM:SS,mmm`) into seconds.
///
/// A `.` millisecond separator is accepted as well.
pub fn parse_timecode(timecode: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError::InvalidTimecode(timecode.to_string());
    let tc = timecode.trim();

    let (clock, millis) = tc.split_once([',', '.']).ok_or_else(invalid)?;
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 || millis.len() != 3 {
        return Err(invalid());
    }

    let field = |s: &str| -> Result<u64, ValidationError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u64>().map_err(|_| invalid())
    };

    let hours = field(parts[0])?;
    let minutes = field(parts[1])?;
    let secs = field(parts[2])?;
    let millis = field(millis)?;
    if minutes >= 60 || secs >= 60 {
        return Err(invalid());
    }

    let total_ms = hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + secs * MS_PER_SECOND + millis))
        .ok_or_else(invalid)?;
    Ok(total_ms as f64 / 1000.0)
}

/// Encode captions as SRT text.
///
/// Every caption is validated first; an empty list encodes to an empty string.
pub fn encode_srt(captions: &[Caption]) -> Result<String, ValidationError> {
    validate_captions(captions)?;

    let mut srt = String::new();
    for (i, caption) in captions.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            srt,
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_timecode(caption.start),
            format_timecode(caption.end),
            caption.text
        );
    }
    Ok(srt)
}

/// Decode SRT text into captions.
///
/// Blocks are separated by blank lines. The index line is checked for being
/// numeric but not for sequence; multi-line text is joined with `\n`.
pub fn decode_srt(content: &str) -> Result<Vec<Caption>, ValidationError> {
    let normalized = content.replace("\r\n", "\n");
    let mut captions = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_no = 0usize;

    let lines = normalized.lines().chain(std::iter::once(""));
    for line in lines {
        if line.trim().is_empty() {
            if !block.is_empty() {
                block_no += 1;
                captions.push(decode_block(&block, block_no)?);
                block.clear();
            }
            continue;
        }
        block.push(line);
    }

    Ok(captions)
}

fn decode_block(lines: &[&str], block_no: usize) -> Result<Caption, ValidationError> {
    if lines.len() < 3 {
        return Err(ValidationError::malformed_block(
            block_no,
            "expected index, timing and text lines",
        ));
    }

    let index = lines[0].trim().trim_start_matches('\u{feff}');
    if index.parse::<u64>().is_err() {
        return Err(ValidationError::malformed_block(
            block_no,
            format!("invalid index line '{}'", index),
        ));
    }

    let (start, end) = lines[1].split_once("-->").ok_or_else(|| {
        ValidationError::malformed_block(block_no, format!("invalid timing line '{}'", lines[1]))
    })?;
    let start = parse_timecode(start)?;
    let end = parse_timecode(end)?;

    let caption = Caption::new(start, end, lines[2..].join("\n"));
    caption.validate(block_no)?;
    Ok(caption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timecode() {
        assert_eq!(format_timecode(0.0), "00:00:00,000");
        assert_eq!(format_timecode(1.5), "00:00:01,500");
        assert_eq!(format_timecode(65.123), "00:01:05,123");
        assert_eq!(format_timecode(3661.456), "01:01:01,456");
    }

    #[test]
    fn test_format_timecode_hours_do_not_wrap() {
        assert_eq!(format_timecode(90000.0), "25:00:00,000");
        assert_eq!(format_timecode(360000.25), "100:00:00,250");
    }

    #[test]
    fn test_format_timecode_rounding_carries() {
        assert_eq!(format_timecode(1.9996), "00:00:02,000");
        assert_eq!(format_timecode(59.9999), "00:01:00,000");
    }

    #[test]
    fn test_format_timecode_clamps_invalid() {
        assert_eq!(format_timecode(-3.0), "00:00:00,000");
        assert_eq!(format_timecode(f64::NAN), "00:00:00,000");
    }

    #[test]
    fn test_encode_reference_output() {
        let captions = vec![
            Caption::new(0.0, 2.5, "Hello world"),
            Caption::new(2.5, 5.0, "This is a test"),
        ];
        let expected = "1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n\
                        2\n00:00:02,500 --> 00:00:05,000\nThis is a test\n\n";
        assert_eq!(encode_srt(&captions).unwrap(), expected);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_srt(&[]).unwrap(), "");
    }

    #[test]
    fn test_encode_rejects_negative_timestamp() {
        let captions = vec![
            Caption::new(0.0, 1.0, "fine"),
            Caption::new(-0.5, 1.0, "broken"),
        ];
        let err = encode_srt(&captions).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCaption { index: 2, .. }));
    }

    #[test]
    fn test_parse_timecode() {
        assert_eq!(parse_timecode("01:01:01,456").unwrap(), 3661.456);
        assert_eq!(parse_timecode("00:00:02.500").unwrap(), 2.5);
        assert!(parse_timecode("00:61:00,000").is_err());
        assert!(parse_timecode("1:2").is_err());
        assert!(parse_timecode("00:00:01,5").is_err());
    }

    #[test]
    fn test_parse_timecode_rejects_overflowing_hours() {
        let err = parse_timecode("99999999999999:00:00,000").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimecode(_)));

        let srt = "1\n99999999999999:00:00,000 --> 99999999999999:00:01,000\nHi\n\n";
        assert!(decode_srt(srt).is_err());
    }

    #[test]
    fn test_decode_reference_output() {
        let srt = "1\n00:00:00,000 --> 00:00:02,500\nHello world\n\n\
                   2\n00:00:02,500 --> 00:00:05,000\nThis is a test\n\n";
        let captions = decode_srt(srt).unwrap();
        assert_eq!(
            captions,
            vec![
                Caption::new(0.0, 2.5, "Hello world"),
                Caption::new(2.5, 5.0, "This is a test"),
            ]
        );
    }

    #[test]
    fn test_decode_crlf_and_multiline_text() {
        let srt = "\r\n1\r\n00:00:01,000 --> 00:00:02,000\r\nfirst line\r\nsecond line\r\n";
        let captions = decode_srt(srt).unwrap();
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0].text, "first line\nsecond line");
    }

    #[test]
    fn test_decode_rejects_missing_timing() {
        let err = decode_srt("1\nHello\n\n").unwrap_err();
        assert!(matches!(err, ValidationError::MalformedBlock { block: 1, .. }));
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_srt("").unwrap().is_empty());
        assert!(decode_srt("\n\n").unwrap().is_empty());
    }
}
