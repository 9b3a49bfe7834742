use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

pub use youtube::YoutubeDataApi;

use crate::utils;

/// Maximum page size accepted by the playlistItems endpoint
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Catalog details for a single video
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,

    /// RFC 3339 timestamp exactly as returned by the catalog
    pub published_at: String,

    pub channel_title: String,
    pub tags: Vec<String>,

    /// ISO-8601 duration (`PT12M5S`)
    pub iso_duration: String,
}

impl VideoMetadata {
    /// Tags joined for a single table cell
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }

    /// Human readable duration (`0:12:05`)
    pub fn display_duration(&self) -> String {
        utils::display_duration(&self.iso_duration)
    }
}

/// One page of a playlist's items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistPage {
    pub video_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Video catalog lookups used to expand identifiers and describe videos
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Snippet and content details of a video, `None` when the catalog has no such video
    async fn video_metadata(&self, video_id: &str) -> Result<Option<VideoMetadata>, CatalogError>;

    /// ID of the uploads playlist of the channel owning `handle`
    async fn uploads_playlist(&self, handle: &str) -> Result<Option<String>, CatalogError>;

    /// One page of playlist items, starting at `page_token` when given
    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
    ) -> Result<PlaylistPage, CatalogError>;
}
