use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use std::fmt;

pub mod bedrock;
pub mod foundry;
pub mod gemini;
pub mod google_auth;
pub mod registry;
pub mod vertex;

pub use registry::{ProviderContext, ProviderRegistry};

use crate::DocsError;

/// Build the summarization prompt shared by every provider
pub fn build_prompt(url: &str, video_title: &str, transcript: &str) -> String {
    format!(
        "I have included a transcript for {} ({})\n\nCan you please summarize this?\n\n{}",
        url, video_title, transcript
    )
}

/// A `<provider>-<model>` string such as `bedrock-nova-2-lite-v1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    raw: String,
    provider: String,
    model: String,
}

impl ModelSpec {
    pub fn parse(raw: &str) -> Result<Self, DocsError> {
        let (provider, model) = raw
            .split_once('-')
            .filter(|(provider, model)| !provider.is_empty() && !model.is_empty())
            .ok_or_else(|| DocsError::UnknownProvider(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
        })
    }

    /// The full string as given on the command line
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Provider prefix (`gemini`, `vertex`, ...)
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Everything after the provider prefix
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Why a provider did not produce a summary
///
/// The `Display` form is what ends up in the summary column.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} API Error {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected {shape}: {raw}")]
    UnexpectedResponse {
        provider: &'static str,
        shape: &'static str,
        raw: String,
    },

    #[error("Error: {source}")]
    Transport {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("Error: {message}")]
    Auth {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Api { provider, .. }
            | Self::UnexpectedResponse { provider, .. }
            | Self::Transport { provider, .. }
            | Self::Auth { provider, .. } => provider,
        }
    }
}

/// An LLM backend able to summarize a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Prefix selecting this provider in a model spec
    fn name(&self) -> &'static str;

    /// Model identifier sent to the provider for `spec`
    fn model_identifier(&self, spec: &ModelSpec) -> Result<String, DocsError>;

    /// Summarize `prompt` with `model`
    async fn summarize(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}

/// Result of one summarization attempt
#[derive(Debug)]
pub enum SummaryOutcome {
    Summary(String),
    Failed(ProviderError),
}

impl SummaryOutcome {
    /// Text stored in the summary column and summary file
    pub fn into_text(self) -> String {
        match self {
            Self::Summary(text) => text,
            Self::Failed(error) => error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Routes summarization requests to the provider chosen by a model spec
pub struct SummaryDispatcher {
    spec: ModelSpec,
    model_id: String,
    provider: Box<dyn Provider>,
}

impl SummaryDispatcher {
    /// Bind a provider to a model spec, validating the model up front
    pub fn new(spec: ModelSpec, provider: Box<dyn Provider>) -> Result<Self, DocsError> {
        let model_id = provider.model_identifier(&spec)?;

        tracing::debug!(
            provider = provider.name(),
            model = %model_id,
            "Summary provider ready"
        );

        Ok(Self {
            spec,
            model_id,
            provider,
        })
    }

    /// Parse `model`, look up its provider and build it from the context
    pub fn from_registry(
        registry: &ProviderRegistry,
        model: &str,
        ctx: &ProviderContext<'_>,
    ) -> Result<Self, DocsError> {
        let spec = ModelSpec::parse(model)?;
        let provider = registry.build(&spec, ctx)?;
        Self::new(spec, provider)
    }

    pub fn model_spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Summarize one transcript; failures are returned, never raised
    pub async fn summarize(&self, transcript: &str, video_title: &str, url: &str) -> SummaryOutcome {
        let prompt = build_prompt(url, video_title, transcript);

        match self.provider.summarize(&prompt, &self.model_id).await {
            Ok(text) => SummaryOutcome::Summary(text),
            Err(error) => {
                tracing::warn!(
                    provider = error.provider(),
                    model = %self.spec,
                    %error,
                    "Summarization failed"
                );
                SummaryOutcome::Failed(error)
            }
        }
    }
}

/// Send a request and return its status and body text
pub(crate) async fn send(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<(StatusCode, String), ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Transport { provider, source })?;

    tracing::debug!(provider, status = status.as_u16(), bytes = body.len(), "Provider response");
    Ok((status, body))
}

/// Fail with an API error unless the status is 200
pub(crate) fn ensure_ok(
    provider: &'static str,
    status: StatusCode,
    body: &str,
) -> Result<(), ProviderError> {
    if status == StatusCode::OK {
        return Ok(());
    }

    Err(ProviderError::Api {
        provider,
        status: status.as_u16(),
        body: body.to_string(),
    })
}
