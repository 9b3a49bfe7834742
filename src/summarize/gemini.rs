use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::registry::ProviderContext;
use super::{ensure_ok, send, ModelSpec, Provider, ProviderError};
use crate::config::{Credentials, GEMINI_API_KEY};
use crate::DocsError;

pub const NAME: &str = "gemini";
const LABEL: &str = "Gemini";
const API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini through the Generative Language API
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
        }
    }

    pub fn build(ctx: &ProviderContext<'_>) -> Result<Box<dyn Provider>, DocsError> {
        let api_key = Credentials::require(
            &ctx.credentials.gemini_api_key,
            GEMINI_API_KEY,
            "Gemini models",
        )?;

        Ok(Box::new(Self::new(ctx.client.clone(), api_key)))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    /// Gemini model names carry the `gemini-` prefix themselves
    fn model_identifier(&self, spec: &ModelSpec) -> Result<String, DocsError> {
        Ok(spec.as_str().to_string())
    }

    async fn summarize(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        let request = self
            .client
            .post(format!("{}/v1beta/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body);

        let (status, text) = send(LABEL, request).await?;
        parse_response(status, &text)
    }
}

/// Text of the first candidate, all parts concatenated
fn parse_response(status: StatusCode, body: &str) -> Result<String, ProviderError> {
    ensure_ok(LABEL, status, body)?;

    let unexpected = || ProviderError::UnexpectedResponse {
        provider: LABEL,
        shape: "response format",
        raw: body.to_string(),
    };

    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|_| unexpected())?;
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(unexpected)?;

    Ok(content.parts.into_iter().filter_map(|part| part.text).collect())
}
