use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

pub use youtube::YoutubeTranscriptApi;

/// Individual caption segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Why no transcript could be retrieved for a video
#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("YouTube request failed for video {video_id}: {detail}")]
    RequestFailed { video_id: String, detail: String },

    #[error("Too many requests, YouTube is blocking requests from this IP for {0}")]
    IpBlocked(String),

    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Video {0} is no longer available")]
    VideoUnavailable(String),

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("Video {0} is age restricted")]
    AgeRestricted(String),

    #[error("Invalid video ID: {0}")]
    InvalidVideoId(String),

    #[error("Could not parse YouTube data for video {video_id}: {detail}")]
    Unparsable { video_id: String, detail: String },

    #[error("Could not retrieve a transcript for video {video_id}: {detail}")]
    Other { video_id: String, detail: String },
}

/// Retrieval of caption segments for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the first available transcript among `languages`, most preferred first
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// Join segment texts with single spaces, preserving order
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration: 1.5,
        }
    }

    #[test]
    fn test_join_segments() {
        let segments = vec![
            segment("good evening", 0.0),
            segment("and welcome", 1.5),
            segment("to the meeting", 3.0),
        ];
        assert_eq!(join_segments(&segments), "good evening and welcome to the meeting");
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join_segments(&[]), "");
    }
}
