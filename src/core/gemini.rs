//! Gemini REST backend.
//!
//! Each [`GeminiSession`] keeps the turn history of its conversation and
//! replays it, together with the persona's system instruction, on every
//! `generateContent` call. History only grows when a reply comes back, so a
//! failed send leaves the context exactly as it was.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::message::Role;
use crate::core::persona::Persona;
use crate::core::session::{ChatBackend, ChatSession, SessionError, SharedSession};
use crate::utils::url::generate_content_url;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "API_KEY";

/// Read the credential once. Blank values count as absent.
pub fn api_key_from_env() -> Option<String> {
    [API_KEY_ENV, FALLBACK_API_KEY_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key_from_env();
        if api_key.is_none() {
            warn!("Gemini API key not found in {API_KEY_ENV} or {FALLBACK_API_KEY_ENV}");
        }
        Self::new(api_key, model, base_url)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl ChatBackend for GeminiBackend {
    fn open(&self, persona: &Persona) -> Result<SharedSession, SessionError> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            SessionError::Initialization(format!(
                "{API_KEY_ENV} (or {FALLBACK_API_KEY_ENV}) is not set"
            ))
        })?;

        if self.model.trim().is_empty() {
            return Err(SessionError::Initialization("no model configured".to_string()));
        }

        info!(persona = %persona.id, model = %self.model, "opened Gemini chat session");
        Ok(Arc::new(GeminiSession {
            client: self.client.clone(),
            api_key,
            url: generate_content_url(&self.base_url, &self.model),
            system_instruction: persona.system_instruction.clone(),
            history: Mutex::new(Vec::new()),
        }))
    }
}

pub struct GeminiSession {
    client: Client,
    api_key: String,
    url: String,
    system_instruction: String,
    history: Mutex<Vec<Content>>,
}

impl GeminiSession {
    fn build_request(&self, history: &[Content], utterance: &str) -> GenerateContentRequest {
        let mut contents = history.to_vec();
        contents.push(Content::text(Some(Role::User), utterance));
        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(None, &self.system_instruction)),
        }
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    async fn send(&self, utterance: &str) -> Result<String, SessionError> {
        let mut history = self.history.lock().await;
        let request = self.build_request(&history, utterance);
        debug!(turns = request.contents.len(), "sending generateContent request");

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| SessionError::request(format!("Gemini API request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SessionError::request(format!("Failed to read Gemini response: {err}")))?;

        if !status.is_success() {
            warn!(%status, "Gemini API returned an error");
            return Err(SessionError::request(format_api_error(status, &body)));
        }

        let reply = parse_generate_response(&body)?;

        let GenerateContentRequest { mut contents, .. } = request;
        contents.push(Content::text(Some(Role::Model), &reply));
        *history = contents;

        Ok(reply)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<Role>, text: &str) -> Self {
        Self {
            role: role.map(Role::as_str),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn parse_generate_response(body: &str) -> Result<String, SessionError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|err| SessionError::request(format!("Failed to parse Gemini response: {err}")))?;

    let candidate = parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next());

    let Some(candidate) = candidate else {
        let reason = parsed
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason);
        return Err(match reason {
            Some(reason) => SessionError::request(format!("Prompt was blocked: {reason}")),
            None => SessionError::request("Gemini API returned no candidates"),
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        return Err(SessionError::request(format!(
            "Gemini API returned no text (finish reason: {reason})"
        )));
    }

    Ok(text)
}

fn format_api_error(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    match serde_json::from_str::<ErrorWrapper>(trimmed) {
        Ok(wrapper) => {
            let message = wrapper
                .error
                .message
                .map(|m| m.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.to_string());
            match wrapper.error.status.filter(|s| !s.is_empty()) {
                Some(status_text) => format!("{status_text}: {message}"),
                None => message,
            }
        }
        Err(_) if trimmed.is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {trimmed}"),
    }
}
