use reqwest::Client;

use super::{bedrock, foundry, gemini, vertex, ModelSpec, Provider};
use crate::config::{Credentials, ProviderSettings};
use crate::DocsError;

/// Everything a provider may need while being constructed
pub struct ProviderContext<'a> {
    pub credentials: &'a Credentials,
    pub settings: &'a ProviderSettings,
    pub client: Client,
}

impl<'a> ProviderContext<'a> {
    pub fn new(credentials: &'a Credentials, settings: &'a ProviderSettings) -> Self {
        Self {
            credentials,
            settings,
            client: Client::new(),
        }
    }
}

/// Constructor of a provider; fails when its credentials are missing
pub type ProviderBuilder = fn(&ProviderContext<'_>) -> Result<Box<dyn Provider>, DocsError>;

/// Registry mapping model spec prefixes to provider constructors
pub struct ProviderRegistry {
    builders: Vec<(&'static str, ProviderBuilder)>,
}

impl ProviderRegistry {
    /// Create a new registry with the built-in providers
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register(gemini::NAME, gemini::GeminiProvider::build);
        registry.register(vertex::NAME, vertex::VertexProvider::build);
        registry.register(bedrock::NAME, bedrock::BedrockProvider::build);
        registry.register(foundry::NAME, foundry::FoundryProvider::build);

        registry
    }

    pub fn empty() -> Self {
        Self {
            builders: Vec::new(),
        }
    }

    /// Register a provider; a later registration for the same prefix wins
    pub fn register(&mut self, prefix: &'static str, builder: ProviderBuilder) {
        self.builders.retain(|(existing, _)| *existing != prefix);
        self.builders.push((prefix, builder));
    }

    /// Find the constructor registered for a prefix
    pub fn find(&self, prefix: &str) -> Option<ProviderBuilder> {
        self.builders
            .iter()
            .find(|(name, _)| *name == prefix)
            .map(|(_, builder)| *builder)
    }

    /// List all registered prefixes
    pub fn list_providers(&self) -> Vec<&'static str> {
        self.builders.iter().map(|(name, _)| *name).collect()
    }

    /// Build the provider selected by a model spec
    pub fn build(
        &self,
        spec: &ModelSpec,
        ctx: &ProviderContext<'_>,
    ) -> Result<Box<dyn Provider>, DocsError> {
        let builder = self
            .find(spec.provider())
            .ok_or_else(|| DocsError::UnknownProvider(spec.as_str().to_string()))?;

        builder(ctx)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
