//! youtube-to-docs - Turn YouTube videos, playlists and channels into documents
//!
//! This library resolves a YouTube identifier into a list of videos, pulls each
//! video's metadata and transcript, optionally summarizes the transcript with one
//! of several LLM providers, and writes everything to a CSV index plus one text
//! file per transcript and one markdown file per summary.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod summarize;
pub mod transcript;
pub mod utils;

pub use catalog::{VideoCatalog, VideoMetadata};
pub use cli::Cli;
pub use config::{Credentials, Settings};
pub use output::{DocsTable, OutputLayout, VideoRecord};
pub use pipeline::{DocsPipeline, RunReport};
pub use resolver::VideoIdentifier;
pub use summarize::{ModelSpec, Provider, ProviderError, SummaryDispatcher, SummaryOutcome};
pub use transcript::{TranscriptSegment, TranscriptSource};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Fatal errors: anything that stops the run before or after the per-video loop
#[derive(thiserror::Error, Debug)]
pub enum DocsError {
    #[error("{var} environment variable required for {purpose}")]
    MissingCredential {
        var: &'static str,
        purpose: &'static str,
    },

    #[error("Unknown model provider in '{0}' (expected one of: gemini, vertex, bedrock, foundry)")]
    UnknownProvider(String),

    #[error("Unsupported model for {provider}: {model}")]
    UnsupportedModel { provider: &'static str, model: String },

    #[error("Could not set up the transcript client: {0}")]
    TranscriptClient(String),

    #[error("Google credentials error: {0}")]
    GoogleCredentials(String),

    #[error("Unrecognized video identifier: '{0}' (expected an 11 character video ID, a comma separated list, a PL/UU playlist ID or an @handle)")]
    InvalidIdentifier(String),

    #[error("No channel found for handle {0}")]
    ChannelNotFound(String),

    #[error("YOUTUBE_DATA_API_KEY is required to {0}")]
    CatalogUnavailable(&'static str),

    #[error("YouTube Data API request failed: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
