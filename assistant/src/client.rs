//! Blocking client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use dashboard_data::{API_KEY_ENV, AssistantSettings, DashboardConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AssistantError, Result};
use crate::offline::offline_response;

const SYSTEM_PROMPT: &str = "You are a helpful cybersecurity analyst assistant for a \
university dashboard. Explain trends, severity priorities, and risks clearly for a \
first-year computer science student. Be concise and practical.\n";

/// Returned when the model answers with blank content.
pub const EMPTY_MESSAGE: &str = "AI API returned an empty message.";

/// Prefix of the text returned when the completion call fails.
pub const ERROR_PREFIX: &str = "Error calling AI API";

const HEALTH_CHECK_MESSAGE: &str = "Say 'OK' only.";

/// Everything needed to reach the completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub referer: String,
    pub title: String,
    /// Bearer token; `None` keeps the assistant offline.
    pub api_key: Option<String>,
}

impl AssistantConfig {
    /// Builds a config from file settings and an explicit key.
    pub fn from_settings(settings: &AssistantSettings, api_key: Option<String>) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: Duration::from_secs(settings.timeout_secs),
            referer: settings.referer.clone(),
            title: settings.title.clone(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Builds a config from file settings, taking the key from the
    /// environment.
    pub fn from_env(settings: &AssistantSettings) -> Self {
        Self::from_settings(settings, DashboardConfig::api_key())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self::from_settings(&AssistantSettings::default(), None)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Security-analysis assistant with an offline fallback.
pub struct Assistant {
    config: AssistantConfig,
    client: reqwest::blocking::Client,
}

impl Assistant {
    /// Creates an assistant; fails only if the HTTP client cannot be built.
    pub fn new(config: AssistantConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Whether an API key is configured.
    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Answers `message`, never failing.
    ///
    /// Without a key the answer comes from [`offline_response`]. If the
    /// completion call fails, the error text is followed by the offline
    /// answer.
    pub fn ask(&self, message: &str, context: Option<&str>) -> String {
        if !self.is_enabled() {
            debug!("no API key configured, answering offline");
            return offline_response(message, context);
        }

        match self.complete(message, context) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "completion call failed, falling back to offline answer");
                format!(
                    "{ERROR_PREFIX}: {e}\n\n{}",
                    offline_response(message, context)
                )
            }
        }
    }

    /// Makes one short completion call and reports the outcome as text.
    ///
    /// Without a key no call is made. Unlike [`Assistant::ask`], a failed
    /// call is reported without the offline fallback.
    pub fn health_check(&self) -> String {
        if !self.is_enabled() {
            return format!("{API_KEY_ENV} is not set; the assistant answers offline.");
        }
        match self.complete(HEALTH_CHECK_MESSAGE, Some("Context: test")) {
            Ok(answer) => answer,
            Err(e) => format!("{ERROR_PREFIX}: {e}"),
        }
    }

    /// Sends one completion request and returns the trimmed answer.
    ///
    /// A blank answer yields [`EMPTY_MESSAGE`].
    pub fn complete(&self, message: &str, context: Option<&str>) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;

        let system = system_prompt(context);
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        debug!(endpoint = %self.config.endpoint, model = %self.config.model, "sending completion request");
        let resp = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AssistantError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json()?;
        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(AssistantError::EmptyChoices)?;
        let content = first
            .message
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            Ok(EMPTY_MESSAGE.to_string())
        } else {
            Ok(content)
        }
    }
}

fn system_prompt(context: Option<&str>) -> String {
    match context.filter(|c| !c.trim().is_empty()) {
        Some(context) => {
            format!("{SYSTEM_PROMPT}\nHere is a summary of the current incidents:\n{context}\n")
        }
        None => SYSTEM_PROMPT.to_string(),
    }
}
