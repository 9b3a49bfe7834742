use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CatalogError, PlaylistPage, VideoCatalog, VideoMetadata, PLAYLIST_PAGE_SIZE};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube Data API v3 client authenticated with an API key
pub struct YoutubeDataApi {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    snippet: Snippet,
    content_details: VideoContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelResource {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemResource {
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

impl From<VideoResource> for VideoMetadata {
    fn from(video: VideoResource) -> Self {
        Self {
            title: video.snippet.title,
            description: video.snippet.description,
            published_at: video.snippet.published_at,
            channel_title: video.snippet.channel_title,
            tags: video.snippet.tags,
            iso_duration: video.content_details.duration,
        }
    }
}

impl YoutubeDataApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<ListResponse<T>, CatalogError> {
        tracing::debug!(resource, ?params, "YouTube Data API request");

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, resource))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl VideoCatalog for YoutubeDataApi {
    async fn video_metadata(&self, video_id: &str) -> Result<Option<VideoMetadata>, CatalogError> {
        let response: ListResponse<VideoResource> = self
            .list("videos", &[("part", "snippet,contentDetails"), ("id", video_id)])
            .await?;

        Ok(response.items.into_iter().next().map(VideoMetadata::from))
    }

    async fn uploads_playlist(&self, handle: &str) -> Result<Option<String>, CatalogError> {
        let response: ListResponse<ChannelResource> = self
            .list("channels", &[("part", "contentDetails"), ("forHandle", handle)])
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .map(|channel| channel.content_details.related_playlists.uploads))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage, CatalogError> {
        let max_results = PLAYLIST_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItemResource> =
            self.list("playlistItems", &params).await?;

        Ok(PlaylistPage {
            video_ids: response
                .items
                .into_iter()
                .map(|item| item.content_details.video_id)
                .collect(),
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_resource() {
        let json = r#"{
            "items": [{
                "snippet": {
                    "title": "Board Meeting",
                    "description": "Monthly meeting",
                    "publishedAt": "2025-01-15T18:00:00Z",
                    "channelTitle": "County Government",
                    "tags": ["meeting", "budget"]
                },
                "contentDetails": { "duration": "PT1H5M" }
            }]
        }"#;

        let response: ListResponse<VideoResource> = serde_json::from_str(json).unwrap();
        let metadata: VideoMetadata = response.items.into_iter().next().unwrap().into();

        assert_eq!(metadata.title, "Board Meeting");
        assert_eq!(metadata.published_at, "2025-01-15T18:00:00Z");
        assert_eq!(metadata.channel_title, "County Government");
        assert_eq!(metadata.joined_tags(), "meeting, budget");
        assert_eq!(metadata.display_duration(), "1:05:00");
    }

    #[test]
    fn test_parse_video_without_tags() {
        let json = r#"{"items": [{"snippet": {"title": "t"}, "contentDetails": {"duration": "PT5S"}}]}"#;
        let response: ListResponse<VideoResource> = serde_json::from_str(json).unwrap();
        let metadata: VideoMetadata = response.items.into_iter().next().unwrap().into();
        assert!(metadata.tags.is_empty());
        assert_eq!(metadata.description, "");
    }

    #[test]
    fn test_parse_empty_list() {
        let response: ListResponse<VideoResource> =
            serde_json::from_str(r#"{"kind": "youtube#videoListResponse"}"#).unwrap();
        assert!(response.items.is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn test_parse_channel_uploads() {
        let json = r#"{"items": [{"contentDetails": {"relatedPlaylists": {"likes": "", "uploads": "UUabc123"}}}]}"#;
        let response: ListResponse<ChannelResource> = serde_json::from_str(json).unwrap();
        assert_eq!(response.items[0].content_details.related_playlists.uploads, "UUabc123");
    }

    #[test]
    fn test_parse_playlist_page() {
        let json = r#"{
            "nextPageToken": "CDIQAA",
            "items": [
                {"contentDetails": {"videoId": "aaaaaaaaaaa"}},
                {"contentDetails": {"videoId": "bbbbbbbbbbb"}}
            ]
        }"#;
        let response: ListResponse<PlaylistItemResource> = serde_json::from_str(json).unwrap();
        assert_eq!(response.next_page_token.as_deref(), Some("CDIQAA"));
        let ids: Vec<_> = response
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect();
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
    }
}
