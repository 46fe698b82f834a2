use crate::config::AppConfig;
use crate::error::{ExplainerError, Result};
use crate::llm::types::*;
use crate::llm::TextGenerator;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";

fn generation_failed(e: reqwest::Error) -> ExplainerError {
    ExplainerError::GenerationFailed(e.without_url().to_string())
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.gemini_api_key.clone(), config.gemini_model.clone())
            .with_base_url(config.gemini_base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let payload = GenerateContentRequest::from_prompt(prompt);

        info!(
            "Requesting explanation from {} ({} prompt chars)",
            self.model,
            prompt.chars().count()
        );

        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_deref().unwrap_or_default())
            .json(&payload)
            .send()
            .await
            .map_err(generation_failed)?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res
                .text()
                .await
                .map_err(generation_failed)?;
            let detail = serde_json::from_str::<GenerateContentResponse>(&err_text)
                .ok()
                .and_then(|body| body.error)
                .map(|error| error.message)
                .unwrap_or(err_text);
            return Err(ExplainerError::GenerationFailed(format!(
                "Gemini API Error (status {}): {}",
                status, detail
            )));
        }

        let body: GenerateContentResponse = res
            .json()
            .await
            .map_err(generation_failed)?;

        extract_text(body)
    }
}

/// Joins the text parts of the first candidate; anything else is a failure.
pub fn extract_text(body: GenerateContentResponse) -> Result<String> {
    if let Some(error) = body.error {
        return Err(ExplainerError::GenerationFailed(error.message));
    }

    let candidate = body
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .ok_or_else(|| ExplainerError::GenerationFailed("No candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        return Err(ExplainerError::GenerationFailed(format!(
            "Model returned no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    debug!("Received {} chars of explanation", text.chars().count());
    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}
