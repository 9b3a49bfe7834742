use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::registry::ProviderContext;
use super::{ensure_ok, send, ModelSpec, Provider, ProviderError};
use crate::config::{Credentials, AZURE_FOUNDRY_API_KEY, AZURE_FOUNDRY_ENDPOINT};
use crate::DocsError;

pub const NAME: &str = "foundry";
const LABEL: &str = "Foundry";

/// Azure AI Foundry deployments through the OpenAI compatible chat completions API
pub struct FoundryProvider {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl FoundryProvider {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn build(ctx: &ProviderContext<'_>) -> Result<Box<dyn Provider>, DocsError> {
        let purpose = "Azure Foundry models";
        let endpoint = Credentials::require(
            &ctx.credentials.foundry_endpoint,
            AZURE_FOUNDRY_ENDPOINT,
            purpose,
        )?;
        let api_key = Credentials::require(
            &ctx.credentials.foundry_api_key,
            AZURE_FOUNDRY_API_KEY,
            purpose,
        )?;

        Ok(Box::new(Self::new(ctx.client.clone(), endpoint, api_key)))
    }
}

#[async_trait]
impl Provider for FoundryProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn model_identifier(&self, spec: &ModelSpec) -> Result<String, DocsError> {
        Ok(spec.model().to_string())
    }

    async fn summarize(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let request = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body);

        let (status, text) = send(LABEL, request).await?;
        parse_response(status, &text)
    }
}

/// `choices[0].message.content` of a chat completion
fn parse_response(status: StatusCode, body: &str) -> Result<String, ProviderError> {
    ensure_ok(LABEL, status, body)?;

    serde_json::from_str::<ChatCompletion>(body)
        .ok()
        .and_then(|completion| completion.choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ProviderError::UnexpectedResponse {
            provider: LABEL,
            shape: "response format",
            raw: body.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::test_support::stub_server;

    #[test]
    fn test_model_identifier() {
        let provider = FoundryProvider::new(Client::new(), "https://example.services.ai.azure.com/openai/v1/", "k");
        assert_eq!(provider.endpoint, "https://example.services.ai.azure.com/openai/v1");

        let spec = ModelSpec::parse("foundry-gpt-5-mini").unwrap();
        assert_eq!(provider.model_identifier(&spec).unwrap(), "gpt-5-mini");
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"id": "chatcmpl-1", "choices": [{"index": 0, "message": {"role": "assistant", "content": "Key points"}, "finish_reason": "stop"}]}"#;
        assert_eq!(parse_response(StatusCode::OK, body).unwrap(), "Key points");

        let err = parse_response(StatusCode::OK, r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedResponse { provider: "Foundry", .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_against_stub() {
        let server = stub_server("401 Unauthorized", r#"{"error": {"code": "401"}}"#).await;

        let provider = FoundryProvider::new(Client::new(), server.url(), "bad-key");
        let err = provider.summarize("prompt", "gpt-5-mini").await.unwrap_err();
        assert!(err.to_string().starts_with("Foundry API Error 401"));
    }

    #[tokio::test]
    async fn test_request_wire_format() {
        let server = stub_server(
            "200 OK",
            r#"{"choices": [{"message": {"role": "assistant", "content": "Key points"}}]}"#,
        )
        .await;

        let provider =
            FoundryProvider::new(Client::new(), format!("{}/openai/v1/", server.url()), "key");
        let summary = provider
            .summarize("Summarize: héllo \"board\"", "gpt-5-mini")
            .await
            .unwrap();
        assert_eq!(summary, "Key points");

        let request = server.request().await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/openai/v1/chat/completions");
        assert_eq!(request.header("authorization"), Some("Bearer key"));
        assert_eq!(request.header("api-key"), None);

        let body = request.json();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-5-mini",
                "messages": [{ "role": "user", "content": "Summarize: héllo \"board\"" }]
            })
        );
    }
}
