//! Model invocation service client
//!
//! The service is an external collaborator: RepoLens consumes a
//! text-generation endpoint and nothing more. The trait is the seam the
//! orchestrator is tested through; the HTTP implementation speaks an
//! Anthropic-style messages API.

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Per-call generation options
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

/// Token accounting reported by the service
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// One completed model call
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Free-text response body
    pub text: String,
    /// Model that actually served the call
    pub model_used: String,
    /// Usage statistics
    pub usage: TokenUsage,
}

/// External text-generation endpoint
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Run one generation. Transport failures, non-success statuses, and
    /// timeouts all surface as [`Error::Service`].
    async fn call(&self, model: &str, prompt: &str, options: &CallOptions) -> Result<ModelReply>;
}

/// HTTP client for an Anthropic-style messages endpoint
pub struct HttpModelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpModelClient {
    /// Build a client from configuration. The API key must already be
    /// resolved; a missing credential is a fatal startup condition and is
    /// checked by the caller.
    pub fn new(config: &ModelConfig, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn call(&self, model: &str, prompt: &str, options: &CallOptions) -> Result<ModelReply> {
        let request = MessagesRequest {
            model,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let send = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send();

        // Unbounded-latency collaborator: the timeout is ours to impose,
        // and a timeout is identical to any other call failure.
        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| Error::Service(format!("Model call timed out after {:?}", self.timeout)))?
            .map_err(|e| Error::Service(format!("Model call transport failure: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Service(format!(
                "Model service returned {}: {}",
                status, body
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Service(format!("Malformed model response body: {}", e)))?;

        let text = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(ModelReply {
            text,
            model_used: if parsed.model.is_empty() {
                model.to_string()
            } else {
                parsed.model
            },
            usage: parsed.usage,
        })
    }
}
