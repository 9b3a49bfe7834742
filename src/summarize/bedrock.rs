use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::registry::ProviderContext;
use super::{ensure_ok, send, ModelSpec, Provider, ProviderError};
use crate::config::{Credentials, AWS_BEARER_TOKEN_BEDROCK};
use crate::DocsError;

pub const NAME: &str = "bedrock";
const LABEL: &str = "Bedrock";

/// AWS Bedrock's Converse API authenticated with a Bedrock API key
pub struct BedrockProvider {
    client: Client,
    bearer_token: String,
    max_tokens: u32,
    base_url: String,
}

impl BedrockProvider {
    pub fn new(
        client: Client,
        bearer_token: impl Into<String>,
        region: &str,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            bearer_token: bearer_token.into(),
            max_tokens,
            base_url: format!("https://bedrock-runtime.{}.amazonaws.com", region),
        }
    }

    pub fn build(ctx: &ProviderContext<'_>) -> Result<Box<dyn Provider>, DocsError> {
        let token = Credentials::require(
            &ctx.credentials.bedrock_bearer_token,
            AWS_BEARER_TOKEN_BEDROCK,
            "AWS Bedrock models",
        )?;

        Ok(Box::new(Self::new(
            ctx.client.clone(),
            token,
            &ctx.settings.bedrock_region,
            ctx.settings.max_tokens,
        )))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Map a short model name onto its US cross-region inference profile
pub fn inference_profile(model: &str) -> String {
    if model.starts_with("claude") {
        format!("us.anthropic.{}:0", model)
    } else if model.starts_with("nova") {
        format!("us.amazon.{}:0", model)
    } else {
        model.to_string()
    }
}

#[async_trait]
impl Provider for BedrockProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn model_identifier(&self, spec: &ModelSpec) -> Result<String, DocsError> {
        Ok(inference_profile(spec.model()))
    }

    async fn summarize(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "messages": [{
                "role": "user",
                "content": [{ "text": prompt }]
            }],
            "max_tokens": self.max_tokens
        });

        let request = self
            .client
            .post(format!(
                "{}/model/{}/converse",
                self.base_url,
                urlencoding::encode(model)
            ))
            .bearer_auth(&self.bearer_token)
            .json(&body);

        let (status, text) = send(LABEL, request).await?;
        parse_response(status, &text)
    }
}

/// `output.message.content[0].text` of a Converse response
fn parse_response(status: StatusCode, body: &str) -> Result<String, ProviderError> {
    ensure_ok(LABEL, status, body)?;

    let unexpected = |shape| ProviderError::UnexpectedResponse {
        provider: LABEL,
        shape,
        raw: body.to_string(),
    };

    let json: Value = serde_json::from_str(body).map_err(|_| unexpected("response structure"))?;
    let content = json
        .pointer("/output/message/content")
        .ok_or_else(|| unexpected("response structure"))?;

    content
        .pointer("/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| unexpected("content format"))
}
