use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{VideoCatalog, VideoMetadata, YoutubeDataApi};
use crate::config::{Credentials, Settings};
use crate::output::{path_cell, DocsTable, OutputLayout, VideoRecord};
use crate::resolver;
use crate::summarize::{ProviderContext, ProviderRegistry, SummaryDispatcher};
use crate::transcript::{join_segments, TranscriptSource, YoutubeTranscriptApi};
use crate::utils;
use crate::DocsError;

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Videos the identifier resolved to
    pub requested: usize,

    /// Rows written to the table
    pub written: usize,

    /// Where the table was written
    pub table_path: PathBuf,
}

impl RunReport {
    pub fn skipped(&self) -> usize {
        self.requested - self.written
    }
}

/// Main documentation pipeline
pub struct DocsPipeline {
    settings: Settings,
    catalog: Option<Box<dyn VideoCatalog>>,
    transcripts: Box<dyn TranscriptSource>,
    summarizer: Option<SummaryDispatcher>,
    show_progress: bool,
}

impl DocsPipeline {
    /// Create a pipeline from settings and the environment's credentials
    ///
    /// The summary provider is built here so that missing credentials or an
    /// unknown model fail before any video is touched.
    pub fn new(
        settings: Settings,
        credentials: &Credentials,
        model: Option<&str>,
        show_progress: bool,
    ) -> Result<Self, DocsError> {
        let summarizer = match model {
            Some(model) => {
                let registry = ProviderRegistry::new();
                let ctx = ProviderContext::new(credentials, &settings.providers);
                Some(SummaryDispatcher::from_registry(&registry, model, &ctx)?)
            }
            None => None,
        };

        let catalog = match credentials.youtube_api_key.as_deref() {
            Some(api_key) => Some(Box::new(YoutubeDataApi::new(api_key)) as Box<dyn VideoCatalog>),
            None => {
                tracing::warn!(
                    "YOUTUBE_DATA_API_KEY is not set; video metadata will be left empty"
                );
                None
            }
        };

        let mut pipeline = Self::from_parts(
            settings,
            catalog,
            Box::new(YoutubeTranscriptApi::new()?),
            summarizer,
        );
        pipeline.show_progress = show_progress;
        Ok(pipeline)
    }

    /// Assemble a pipeline from already constructed collaborators
    pub fn from_parts(
        settings: Settings,
        catalog: Option<Box<dyn VideoCatalog>>,
        transcripts: Box<dyn TranscriptSource>,
        summarizer: Option<SummaryDispatcher>,
    ) -> Self {
        Self {
            settings,
            catalog,
            transcripts,
            summarizer,
            show_progress: false,
        }
    }

    /// Resolve `identifier`, process every video in order and write the table
    pub async fn run(&self, identifier: &str, outfile: &Path) -> Result<RunReport> {
        let video_ids = resolver::resolve(identifier, self.catalog.as_deref()).await?;
        tracing::info!("Found {} video(s) to process", video_ids.len());

        let layout = OutputLayout::prepare(outfile, &self.settings.output)?;
        let model = self.summarizer.as_ref().map(|s| s.model_spec().as_str());
        let mut table = DocsTable::new(model);

        let progress = self.progress_bar(video_ids.len() as u64);
        let pause = Duration::from_secs(self.settings.pipeline.pause_secs);

        for video_id in &video_ids {
            progress.set_message(video_id.clone());

            if let Some(record) = self.process_video(video_id, &layout).await {
                table.push(record);
                if !pause.is_zero() {
                    tokio::time::sleep(pause).await;
                }
            }

            progress.inc(1);
        }
        progress.finish_and_clear();

        table
            .write_csv(layout.table_path())
            .with_context(|| format!("Failed to write {}", layout.table_path().display()))?;
        tracing::info!("Saved table with {} row(s) to {}", table.len(), outfile.display());

        Ok(RunReport {
            requested: video_ids.len(),
            written: table.len(),
            table_path: layout.table_path().to_path_buf(),
        })
    }

    /// Build the record for one video; `None` means the video was skipped
    async fn process_video(&self, video_id: &str, layout: &OutputLayout) -> Option<VideoRecord> {
        let url = utils::watch_url(video_id);
        tracing::info!("Processing video: {}", url);

        let metadata = self.fetch_metadata(video_id).await?;

        let segments = match self
            .transcripts
            .fetch(video_id, &self.settings.transcript.languages)
            .await
        {
            Ok(segments) => segments,
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Skipping video: no transcript");
                return None;
            }
        };
        let transcript = join_segments(&segments);

        let safe_title = utils::sanitize_title(&metadata.title);
        let transcript_file = layout.write_transcript(video_id, &safe_title, &transcript);

        let mut summary_text = String::new();
        let mut summary_file = None;
        if let Some(summarizer) = &self.summarizer {
            tracing::info!("Summarizing with {}", summarizer.model_spec());
            summary_text = summarizer
                .summarize(&transcript, &metadata.title, &url)
                .await
                .into_text();

            if !summary_text.is_empty() {
                summary_file = layout.write_summary(
                    summarizer.model_spec().as_str(),
                    video_id,
                    &safe_title,
                    &summary_text,
                );
            }
        }

        Some(VideoRecord {
            transcript_characters: transcript.chars().count(),
            tags: metadata.joined_tags(),
            duration: metadata.display_duration(),
            url,
            title: metadata.title,
            description: metadata.description,
            published_at: metadata.published_at,
            channel_title: metadata.channel_title,
            transcript_file: path_cell(transcript_file.as_deref()),
            summary_file: path_cell(summary_file.as_deref()),
            summary_text,
        })
    }

    /// Catalog details, empty without a catalog; `None` skips the video
    async fn fetch_metadata(&self, video_id: &str) -> Option<VideoMetadata> {
        let Some(catalog) = &self.catalog else {
            return Some(VideoMetadata::default());
        };

        match catalog.video_metadata(video_id).await {
            Ok(Some(metadata)) => Some(metadata),
            Ok(None) => {
                tracing::warn!(video_id, "Skipping video: not found in the catalog");
                None
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Skipping video: metadata lookup failed");
                None
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);
        progress
    }
}
