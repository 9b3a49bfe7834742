use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::DocsError;

pub const YOUTUBE_DATA_API_KEY: &str = "YOUTUBE_DATA_API_KEY";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const PROJECT_ID: &str = "PROJECT_ID";
pub const AWS_BEARER_TOKEN_BEDROCK: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const AZURE_FOUNDRY_ENDPOINT: &str = "AZURE_FOUNDRY_ENDPOINT";
pub const AZURE_FOUNDRY_API_KEY: &str = "AZURE_FOUNDRY_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Transcript retrieval settings
    pub transcript: TranscriptSettings,

    /// Per-video loop settings
    pub pipeline: PipelineSettings,

    /// LLM provider settings
    pub providers: ProviderSettings,

    /// Output file layout
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Caption languages, most preferred first
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Pause after each processed video, in seconds
    pub pause_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// `max_tokens` sent to providers that require one
    pub max_tokens: u32,

    /// Region hosting the Vertex AI Anthropic publisher models
    pub vertex_region: String,

    /// Region of the Bedrock runtime endpoint
    pub bedrock_region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory (next to the CSV) receiving transcript text files
    pub transcript_dir: String,

    /// Directory (next to the CSV) receiving summary markdown files
    pub summary_dir: String,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string(), "en-US".to_string()],
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { pause_secs: 1 }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            max_tokens: 64_000,
            vertex_region: "us-east5".to_string(),
            bedrock_region: "us-east-1".to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            transcript_dir: "transcript-files".to_string(),
            summary_dir: "summary-files".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, the first config file found, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        let settings = match path {
            Some(path) => {
                tracing::debug!("Loading settings from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Parse a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// First existing config file: `./config.yaml`, then the user config directory
    fn discover() -> Option<PathBuf> {
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("youtube-to-docs").join("config.yaml"))
            .filter(|path| path.exists())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocsError> {
        if self.transcript.languages.is_empty() {
            return Err(DocsError::Config(
                "transcript.languages must list at least one language".to_string(),
            ));
        }

        if self.providers.max_tokens == 0 {
            return Err(DocsError::Config(
                "providers.max_tokens must be greater than zero".to_string(),
            ));
        }

        if self.output.transcript_dir.is_empty() || self.output.summary_dir.is_empty() {
            return Err(DocsError::Config(
                "output directories must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Secrets and identifiers read once from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub youtube_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub vertex_project_id: Option<String>,
    pub bedrock_bearer_token: Option<String>,
    pub foundry_endpoint: Option<String>,
    pub foundry_api_key: Option<String>,
}

impl Credentials {
    /// Read every known variable from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build credentials from any variable lookup; empty values count as missing
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        Self {
            youtube_api_key: read(YOUTUBE_DATA_API_KEY),
            gemini_api_key: read(GEMINI_API_KEY),
            vertex_project_id: read(PROJECT_ID),
            bedrock_bearer_token: read(AWS_BEARER_TOKEN_BEDROCK),
            foundry_endpoint: read(AZURE_FOUNDRY_ENDPOINT),
            foundry_api_key: read(AZURE_FOUNDRY_API_KEY),
        }
    }

    /// Borrow a credential or fail with the variable that should have provided it
    pub fn require<'a>(
        value: &'a Option<String>,
        var: &'static str,
        purpose: &'static str,
    ) -> Result<&'a str, DocsError> {
        value
            .as_deref()
            .ok_or(DocsError::MissingCredential { var, purpose })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("vertex_project_id", &self.vertex_project_id)
            .field("bedrock_bearer_token", &redact(&self.bedrock_bearer_token))
            .field("foundry_endpoint", &self.foundry_endpoint)
            .field("foundry_api_key", &redact(&self.foundry_api_key))
            .finish()
    }
}
