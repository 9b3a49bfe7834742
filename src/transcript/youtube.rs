use async_trait::async_trait;
use yt_transcript_rs::errors::CouldNotRetrieveTranscriptReason;
use yt_transcript_rs::{CouldNotRetrieveTranscript, FetchedTranscriptSnippet, YouTubeTranscriptApi};

use super::{TranscriptError, TranscriptSegment, TranscriptSource};
use crate::DocsError;

/// Captions fetched through YouTube's own player data via `yt-transcript-rs`
pub struct YoutubeTranscriptApi {
    api: YouTubeTranscriptApi,
}

impl YoutubeTranscriptApi {
    pub fn new() -> Result<Self, DocsError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| DocsError::TranscriptClient(e.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptApi {
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let codes: Vec<&str> = languages.iter().map(String::as_str).collect();

        let fetched = self
            .api
            .fetch_transcript(video_id, &codes, false)
            .await
            .map_err(|e| transcript_error(video_id, languages, e))?;

        tracing::debug!(
            video_id,
            language = %fetched.language_code,
            generated = fetched.is_generated,
            snippets = fetched.snippets.len(),
            "Fetched transcript"
        );

        Ok(segments(fetched.snippets))
    }
}

fn segments(snippets: Vec<FetchedTranscriptSnippet>) -> Vec<TranscriptSegment> {
    snippets
        .into_iter()
        .map(|snippet| TranscriptSegment {
            text: snippet.text,
            start: snippet.start,
            duration: snippet.duration,
        })
        .collect()
}

/// Translate a retrieval failure into this crate's error
fn transcript_error(
    video_id: &str,
    languages: &[String],
    error: CouldNotRetrieveTranscript,
) -> TranscriptError {
    let video_id = video_id.to_string();

    let Some(reason) = error.reason else {
        return TranscriptError::Other {
            video_id,
            detail: "no reason given".to_string(),
        };
    };

    match reason {
        CouldNotRetrieveTranscriptReason::TranscriptsDisabled => {
            TranscriptError::TranscriptsDisabled(video_id)
        }
        CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. } => {
            TranscriptError::NoTranscriptFound {
                video_id,
                languages: languages.to_vec(),
            }
        }
        CouldNotRetrieveTranscriptReason::VideoUnavailable => {
            TranscriptError::VideoUnavailable(video_id)
        }
        CouldNotRetrieveTranscriptReason::VideoUnplayable { reason, sub_reasons } => {
            let mut reason = reason.unwrap_or_else(|| "no reason given".to_string());
            if !sub_reasons.is_empty() {
                reason = format!("{} ({})", reason, sub_reasons.join("; "));
            }
            TranscriptError::VideoUnplayable { video_id, reason }
        }
        CouldNotRetrieveTranscriptReason::IpBlocked(_)
        | CouldNotRetrieveTranscriptReason::RequestBlocked(_) => {
            TranscriptError::IpBlocked(video_id)
        }
        CouldNotRetrieveTranscriptReason::AgeRestricted => TranscriptError::AgeRestricted(video_id),
        CouldNotRetrieveTranscriptReason::InvalidVideoId => TranscriptError::InvalidVideoId(video_id),
        CouldNotRetrieveTranscriptReason::YouTubeRequestFailed(detail) => {
            TranscriptError::RequestFailed { video_id, detail }
        }
        CouldNotRetrieveTranscriptReason::YouTubeDataUnparsable(detail) => {
            TranscriptError::Unparsable { video_id, detail }
        }
        CouldNotRetrieveTranscriptReason::TranslationUnavailable(detail)
        | CouldNotRetrieveTranscriptReason::TranslationLanguageUnavailable(detail) => {
            TranscriptError::Other { video_id, detail }
        }
        CouldNotRetrieveTranscriptReason::FailedToCreateConsentCookie => TranscriptError::Other {
            video_id,
            detail: "could not accept YouTube's cookie consent".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use yt_transcript_rs::TranscriptList;

    fn languages() -> Vec<String> {
        vec!["en".to_string(), "en-US".to_string()]
    }

    fn failure(reason: CouldNotRetrieveTranscriptReason) -> CouldNotRetrieveTranscript {
        CouldNotRetrieveTranscript {
            video_id: "KuPc06JgI_A".to_string(),
            reason: Some(reason),
        }
    }

    #[test]
    fn test_snippets_become_segments_in_order() {
        let snippets = vec![
            FetchedTranscriptSnippet {
                text: "good evening".to_string(),
                start: 0.0,
                duration: 1.54,
            },
            FetchedTranscriptSnippet {
                text: "and welcome".to_string(),
                start: 1.54,
                duration: 2.0,
            },
        ];

        let segments = segments(snippets);
        assert_eq!(
            segments,
            vec![
                TranscriptSegment {
                    text: "good evening".to_string(),
                    start: 0.0,
                    duration: 1.54,
                },
                TranscriptSegment {
                    text: "and welcome".to_string(),
                    start: 1.54,
                    duration: 2.0,
                },
            ]
        );
        assert_eq!(crate::transcript::join_segments(&segments), "good evening and welcome");
    }

    #[test]
    fn test_disabled_and_blocked_videos() {
        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::TranscriptsDisabled),
        );
        assert!(matches!(err, TranscriptError::TranscriptsDisabled(id) if id == "KuPc06JgI_A"));

        for reason in [
            CouldNotRetrieveTranscriptReason::IpBlocked(None),
            CouldNotRetrieveTranscriptReason::RequestBlocked(None),
        ] {
            let err = transcript_error("KuPc06JgI_A", &languages(), failure(reason));
            assert!(matches!(err, TranscriptError::IpBlocked(_)), "{err}");
        }
    }

    #[test]
    fn test_missing_languages_are_reported() {
        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::NoTranscriptFound {
                requested_language_codes: vec!["en".to_string(), "en-US".to_string()],
                transcript_data: TranscriptList {
                    video_id: "KuPc06JgI_A".to_string(),
                    manually_created_transcripts: HashMap::new(),
                    generated_transcripts: HashMap::new(),
                    translation_languages: vec![],
                },
            }),
        );
        assert_eq!(
            err.to_string(),
            r#"No transcript found for video KuPc06JgI_A in languages ["en", "en-US"]"#
        );
    }

    #[test]
    fn test_unplayable_reason_keeps_details() {
        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::VideoUnplayable {
                reason: Some("Video unavailable".to_string()),
                sub_reasons: vec!["This video is private".to_string()],
            }),
        );
        assert_eq!(
            err.to_string(),
            "Video KuPc06JgI_A is unplayable: Video unavailable (This video is private)"
        );
    }

    #[test]
    fn test_request_and_parse_failures() {
        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::YouTubeRequestFailed(
                "HTTP 503".to_string(),
            )),
        );
        assert!(matches!(err, TranscriptError::RequestFailed { ref detail, .. } if detail == "HTTP 503"));

        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::YouTubeDataUnparsable(
                "no captions json".to_string(),
            )),
        );
        assert!(matches!(err, TranscriptError::Unparsable { .. }));

        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            CouldNotRetrieveTranscript {
                video_id: "KuPc06JgI_A".to_string(),
                reason: None,
            },
        );
        assert!(matches!(err, TranscriptError::Other { .. }));
    }

    #[test]
    fn test_age_restricted_and_invalid_ids() {
        let err = transcript_error(
            "KuPc06JgI_A",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::AgeRestricted),
        );
        assert!(matches!(err, TranscriptError::AgeRestricted(_)));

        let err = transcript_error(
            "nope",
            &languages(),
            failure(CouldNotRetrieveTranscriptReason::InvalidVideoId),
        );
        assert!(matches!(err, TranscriptError::InvalidVideoId(id) if id == "nope"));
    }
}
