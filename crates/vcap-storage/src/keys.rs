//! Object key layout.

use chrono::{DateTime, Utc};

pub const VIDEO_MP4: &str = "video/mp4";
pub const TEXT_PLAIN: &str = "text/plain";

/// Key for an uploaded source video.
///
/// `extension` includes the leading dot; `.mp4` is used when it is empty.
pub fn upload_key(file_id: &str, extension: &str) -> String {
    let ext = if extension.is_empty() { ".mp4" } else { extension };
    format!("uploads/{}{}", file_id, ext)
}

/// Key for a generated SRT file.
pub fn caption_key(at: DateTime<Utc>) -> String {
    format!("captions/{}.srt", at.timestamp())
}

/// Key for a rendered output video.
pub fn output_key(job_id: &str) -> String {
    format!("output/video_{}.mp4", job_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_layout() {
        assert_eq!(upload_key("abc", ".mov"), "uploads/abc.mov");
        assert_eq!(upload_key("abc", ""), "uploads/abc.mp4");
        assert_eq!(output_key("job-1"), "output/video_job-1.mp4");

        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(caption_key(at), "captions/1700000000.srt");
    }
}
