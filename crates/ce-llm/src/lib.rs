//! Generative-text client for plain-language explanations.
//!
//! Wraps the Gemini `generateContent` REST call behind a small client so the
//! service can ask for an explanation of a proposal's ementa without knowing
//! the wire format.
//!
//! ```ignore
//! use ce_llm::{explain_prompt, GeminiClient};
//!
//! let client = GeminiClient::new(
//!     "https://generativelanguage.googleapis.com",
//!     "my-api-key",
//!     "gemini-2.0-flash",
//! );
//! let text = client.generate(&explain_prompt("Dispõe sobre ...")).await?;
//! ```

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

/// Default public endpoint for the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for explanations.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Build the prompt that asks for a neutral, lay explanation of an ementa.
#[must_use]
pub fn explain_prompt(ementa: &str) -> String {
    format!(
        "Você é um assistente especialista em política brasileira.\n\
         Explique a seguinte ementa de proposição legislativa de forma simples, \
         clara e imparcial, como se estivesse explicando para um cidadão leigo.\n\
         Seja direto e foque no objetivo principal.\n\n\
         Ementa: \"{}\"\n\n\
         Explicação:",
        ementa.trim()
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client with the given base URL, API key and model name.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key, model)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, proxies).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Model name this client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails, the API answers with a
    /// non-success status, or the response carries no text.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("generateContent request failed")?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model = %self.model, "generateContent rejected");
            return Err(anyhow!("generateContent returned {status}: {message}"));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("generateContent response was not valid JSON")?;

        parsed
            .into_text()
            .ok_or_else(|| anyhow!("generateContent returned no text"))
    }
}
