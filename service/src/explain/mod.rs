//! Plain-language explanations of proposal summaries.
//!
//! [`ExplainService`] validates the request, looks the explanation up in an
//! [`ExplanationCache`], and only on a miss asks a [`TextGenerator`] for new
//! text, which is then cached for a long TTL. Cache trouble never fails a
//! request: read errors count as misses and write errors are logged.

pub mod cache;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub use cache::{CacheError, ExplanationCache, InMemoryCache, RedisCache};

/// Default cache lifetime: 30 days.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Anything that can turn a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl TextGenerator for ce_llm::GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        ce_llm::GeminiClient::generate(self, prompt).await
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    pub ementa: String,
    #[serde(default)]
    pub proposicao_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ExplainResponse {
    pub explanation: String,
}

#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("ID da proposição e ementa são obrigatórios.")]
    MissingInput,

    #[error("Serviço de explicação indisponível.")]
    Unavailable,

    #[error("Falha ao gerar explicação.")]
    Generation(#[source] anyhow::Error),
}

/// Cache key for a proposal's explanation.
#[must_use]
pub fn cache_key(proposicao_id: &str) -> String {
    format!("explanation:{proposicao_id}")
}

#[derive(Clone)]
pub struct ExplainService {
    generator: Option<Arc<dyn TextGenerator>>,
    cache: Arc<dyn ExplanationCache>,
    ttl: Duration,
}

impl ExplainService {
    /// `generator` is `None` when no API key is configured; requests then
    /// fail with [`ExplainError::Unavailable`].
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        cache: Arc<dyn ExplanationCache>,
        ttl: Duration,
    ) -> Self {
        Self {
            generator,
            cache,
            ttl,
        }
    }

    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Explain a proposal's ementa, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// - [`ExplainError::MissingInput`] if either field is blank
    /// - [`ExplainError::Unavailable`] if no generator is configured
    /// - [`ExplainError::Generation`] if the generator fails
    pub async fn explain(&self, request: &ExplainRequest) -> Result<ExplainResponse, ExplainError> {
        let proposicao_id = request.proposicao_id.trim();
        let ementa = request.ementa.trim();
        if proposicao_id.is_empty() || ementa.is_empty() {
            return Err(ExplainError::MissingInput);
        }

        let generator = self.generator.as_ref().ok_or(ExplainError::Unavailable)?;
        let key = cache_key(proposicao_id);

        match self.cache.get(&key).await {
            Ok(Some(explanation)) => {
                tracing::debug!(proposicao_id, "explanation served from cache");
                return Ok(ExplainResponse { explanation });
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(proposicao_id, error = %err, "explanation cache read failed");
            }
        }

        let explanation = generator
            .generate(&ce_llm::explain_prompt(ementa))
            .await
            .map_err(|err| {
                tracing::error!(proposicao_id, error = %err, "explanation generation failed");
                ExplainError::Generation(err)
            })?;

        if let Err(err) = self.cache.set(&key, &explanation, self.ttl).await {
            tracing::warn!(proposicao_id, error = %err, "explanation cache write failed");
        }

        Ok(ExplainResponse { explanation })
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Scripted generator for tests.

    use super::TextGenerator;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed answer (or failure) and records every prompt.
    #[derive(Default)]
    pub struct MockTextGenerator {
        response: Mutex<Option<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl MockTextGenerator {
        pub fn answering(text: &str) -> Self {
            Self {
                response: Mutex::new(Some(text.to_string())),
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// A generator whose every call fails.
        pub fn failing() -> Self {
            Self::default()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for MockTextGenerator {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("generator unavailable"))
        }
    }
}
