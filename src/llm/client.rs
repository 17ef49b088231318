//! Async LLM client used by the decision oracle
//!
//! A model-agnostic HTTP client. Speaks the Anthropic messages API, the
//! OpenAI-compatible chat API (DeepSeek, OpenAI, llama.cpp servers...) and
//! Ollama's generate endpoint, chosen from the URL.

use crate::core::error::{ColonyError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
    Ollama,
}

/// Short answers only: the reply is a single task label
const MAX_TOKENS: u32 = 50;
const TEMPERATURE: f32 = 0.7;

/// Async LLM client for making API calls
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: Option<String>, api_url: String, model: String, timeout: Duration) -> Result<Self> {
        let api_format = Self::detect_api_format(&api_url);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            api_url,
            model,
            api_format,
        })
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else if url.contains("/api/generate") {
            ApiFormat::Ollama
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from environment variables
    ///
    /// Optional: LLM_API_URL (defaults to a local Ollama server)
    /// Optional: LLM_MODEL (defaults to llama3.2:1b)
    /// Required for hosted APIs: LLM_API_KEY
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "http://localhost:11434/api/generate".into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "llama3.2:1b".into());
        let api_key = std::env::var("LLM_API_KEY").ok();

        if api_key.is_none() && Self::detect_api_format(&api_url) != ApiFormat::Ollama {
            return Err(ColonyError::OracleError("LLM_API_KEY not set".into()));
        }

        Self::new(api_key, api_url, model, timeout)
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a completion request to the LLM
    ///
    /// # Arguments
    /// * `system` - System prompt providing context and instructions
    /// * `user` - User message/query to process
    ///
    /// # Returns
    /// The LLM's text response
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
            ApiFormat::Ollama => self.complete_ollama(system, user).await,
        }
    }

    fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system: system.into(),
            messages: vec![Message {
                role: "user".into(),
                content: user.into(),
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", self.key())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ColonyError::OracleError(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| ColonyError::OracleError("Empty response".into()))
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                Message {
                    role: "system".into(),
                    content: system.into(),
                },
                Message {
                    role: "user".into(),
                    content: user.into(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.key()))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ColonyError::OracleError(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ColonyError::OracleError("Empty response".into()))
    }

    async fn complete_ollama(&self, system: &str, user: &str) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            system: system.into(),
            prompt: user.into(),
            stream: false,
            options: OllamaOptions {
                temperature: TEMPERATURE,
                top_p: 0.9,
                num_predict: MAX_TOKENS,
                stop: vec!["\n".into(), ".".into()],
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ColonyError::OracleError(format!("API error: {}", error_text)));
        }

        let completion: OllamaResponse = response
            .json()
            .await
            .map_err(|e| ColonyError::OracleError(e.to_string()))?;

        if completion.response.trim().is_empty() {
            return Err(ColonyError::OracleError("Empty response".into()));
        }
        Ok(completion.response)
    }
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Ollama generate API format
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    system: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: u32,
    stop: Vec<String>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}
