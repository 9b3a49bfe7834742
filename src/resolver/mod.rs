//! Expansion of a user supplied identifier into an ordered list of video IDs.

use crate::catalog::VideoCatalog;
use crate::DocsError;

/// Length of a canonical YouTube video ID
pub const VIDEO_ID_LEN: usize = 11;

/// Prefixes of regular (`PL`) and channel uploads (`UU`) playlists
pub const PLAYLIST_PREFIXES: [&str; 2] = ["PL", "UU"];

/// The shapes of identifier accepted on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoIdentifier {
    /// One 11 character video ID
    Single(String),
    /// Comma separated video IDs, kept in order
    List(Vec<String>),
    /// A playlist ID
    Playlist(String),
    /// A channel handle including its leading `@`
    ChannelHandle(String),
}

impl VideoIdentifier {
    /// Classify an identifier by prefix and length only
    pub fn classify(input: &str) -> Result<Self, DocsError> {
        if input.starts_with('@') {
            return Ok(Self::ChannelHandle(input.to_string()));
        }

        if input.len() == VIDEO_ID_LEN && !input.contains(',') {
            return Ok(Self::Single(input.to_string()));
        }

        if input.contains(',') {
            return Ok(Self::List(input.split(',').map(str::to_string).collect()));
        }

        if PLAYLIST_PREFIXES.iter().any(|prefix| input.starts_with(prefix)) {
            return Ok(Self::Playlist(input.to_string()));
        }

        Err(DocsError::InvalidIdentifier(input.to_string()))
    }

    /// Whether expanding this identifier needs catalog access
    pub fn needs_catalog(&self) -> bool {
        matches!(self, Self::Playlist(_) | Self::ChannelHandle(_))
    }
}

/// Resolve an identifier into video IDs
///
/// Channel handles are turned into their uploads playlist first. Playlists are
/// paged through until the catalog reports no further page.
pub async fn resolve(
    identifier: &str,
    catalog: Option<&dyn VideoCatalog>,
) -> Result<Vec<String>, DocsError> {
    let mut current = VideoIdentifier::classify(identifier)?;

    if let VideoIdentifier::ChannelHandle(handle) = &current {
        let catalog = catalog.ok_or(DocsError::CatalogUnavailable("resolve channel handles"))?;

        tracing::info!("Resolving channel handle: {}", handle);
        let uploads = catalog
            .uploads_playlist(handle)
            .await?
            .ok_or_else(|| DocsError::ChannelNotFound(handle.clone()))?;
        tracing::info!("Found uploads playlist: {}", uploads);

        current = VideoIdentifier::classify(&uploads)?;
    }

    match current {
        VideoIdentifier::Single(id) => Ok(vec![id]),
        VideoIdentifier::List(ids) => Ok(ids),
        VideoIdentifier::Playlist(playlist_id) => {
            let catalog = catalog.ok_or(DocsError::CatalogUnavailable("expand playlists"))?;
            expand_playlist(catalog, &playlist_id).await
        }
        VideoIdentifier::ChannelHandle(handle) => Err(DocsError::InvalidIdentifier(handle)),
    }
}

/// Collect every video ID of a playlist in page order
pub async fn expand_playlist(
    catalog: &dyn VideoCatalog,
    playlist_id: &str,
) -> Result<Vec<String>, DocsError> {
    let mut video_ids = Vec::new();
    let mut page_token = None;
    let mut pages = 0usize;

    loop {
        let page = catalog.playlist_page(playlist_id, page_token).await?;
        pages += 1;
        video_ids.extend(page.video_ids);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    tracing::debug!(playlist_id, pages, videos = video_ids.len(), "Expanded playlist");
    Ok(video_ids)
}
