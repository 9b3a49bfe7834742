use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;

use super::google_auth::GoogleCredentials;
use super::registry::ProviderContext;
use super::{ensure_ok, send, ModelSpec, Provider, ProviderError};
use crate::config::{Credentials, PROJECT_ID};
use crate::DocsError;

pub const NAME: &str = "vertex";
const LABEL: &str = "Vertex";
const ANTHROPIC_VERSION: &str = "vertex-2023-10-16";

/// Anthropic Claude models served by Vertex AI's `rawPredict` endpoint
pub struct VertexProvider {
    client: Client,
    credentials: GoogleCredentials,
    project_id: String,
    region: String,
    max_tokens: u32,
    base_url: String,
}

impl VertexProvider {
    pub fn new(
        client: Client,
        credentials: GoogleCredentials,
        project_id: impl Into<String>,
        region: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        let region = region.into();
        Self {
            client,
            credentials,
            project_id: project_id.into(),
            base_url: format!("https://{}-aiplatform.googleapis.com", region),
            region,
            max_tokens,
        }
    }

    pub fn build(ctx: &ProviderContext<'_>) -> Result<Box<dyn Provider>, DocsError> {
        let project_id = Credentials::require(
            &ctx.credentials.vertex_project_id,
            PROJECT_ID,
            "GCP Vertex models",
        )?;
        let credentials = GoogleCredentials::application_default()?;

        Ok(Box::new(Self::new(
            ctx.client.clone(),
            credentials,
            project_id,
            ctx.settings.vertex_region.clone(),
            ctx.settings.max_tokens,
        )))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/anthropic/models/{}:rawPredict",
            self.base_url, self.project_id, self.region, model
        )
    }
}

#[async_trait]
impl Provider for VertexProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn model_identifier(&self, spec: &ModelSpec) -> Result<String, DocsError> {
        if !spec.model().starts_with("claude") {
            return Err(DocsError::UnsupportedModel {
                provider: NAME,
                model: spec.model().to_string(),
            });
        }
        Ok(spec.model().to_string())
    }

    async fn summarize(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let access_token = self.credentials.access_token().await?;

        let payload = serde_json::json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
            "stream": false
        });

        let request = self
            .client
            .post(self.endpoint(model))
            .bearer_auth(access_token)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(payload.to_string());

        let (status, body) = send(LABEL, request).await?;
        parse_response(status, &body)
    }
}

/// `content[0].text` of an Anthropic messages response
fn parse_response(status: StatusCode, body: &str) -> Result<String, ProviderError> {
    ensure_ok(LABEL, status, body)?;

    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.pointer("/content/0/text")?.as_str().map(str::to_string))
        .ok_or_else(|| ProviderError::UnexpectedResponse {
            provider: LABEL,
            shape: "response format",
            raw: body.to_string(),
        })
}
