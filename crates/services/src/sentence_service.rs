use std::env;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::SentenceError;

/// Default endpoint for the hosted completion API.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
/// Default model used for sentence generation.
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

const SYSTEM_PROMPT: &str =
    "You are a German language assistant. You write one short A2-level example \
     sentence for a given verb.";

fn user_prompt(term: &str) -> String {
    format!(
        "Write one simple A1-level German sentence using the verb '{term}'. \
         Use it as a verb, vary the personal pronoun, and use Präsens, \
         Präteritum or Perfekt. Do not make the verb separable unless it \
         already is. Do not provide a translation. Write exactly one sentence."
    )
}

/// Something that can produce an example sentence for a term.
///
/// The quiz engine only ever talks to this trait, so tests can substitute
/// scripted sources for the HTTP-backed one.
#[async_trait]
pub trait SentenceSource: Send + Sync {
    /// Produce one example sentence using the given term.
    async fn sentence(&self, term: &str) -> Result<String, SentenceError>;
}

#[derive(Clone, Debug)]
pub struct SentenceConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl SentenceConfig {
    /// Config with the default endpoint and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Read the config from `QUIZ_AI_API_KEY`, `QUIZ_AI_BASE_URL` and
    /// `QUIZ_AI_MODEL`. Returns `None` when no usable key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Chat-completions-backed sentence generation.
///
/// Without a config the service is disabled and every call reports a
/// missing key; callers downgrade that to placeholder text, so a quiz can
/// run entirely without credentials.
#[derive(Clone)]
pub struct SentenceService {
    client: Client,
    config: Option<SentenceConfig>,
}

impl SentenceService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(SentenceConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<SentenceConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl SentenceSource for SentenceService {
    async fn sentence(&self, term: &str) -> Result<String, SentenceError> {
        let config = self.config.as_ref().ok_or(SentenceError::MissingApiKey)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(term),
                },
            ],
            temperature: 0.7,
        };

        debug!("requesting example sentence for '{term}'");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SentenceError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(SentenceError::EmptyResponse)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(SentenceError::EmptyResponse);
        }
        Ok(content.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
