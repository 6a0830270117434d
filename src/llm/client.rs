use crate::advisor::{CompletionRequest, CompletionService};
use crate::error::{BudgetError, Result};
use crate::llm::types::*;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked, in order, by [`GeminiClient::from_env`].
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .map(Self::new)
            .ok_or_else(|| {
                BudgetError::AdvisorFailed(format!(
                    "No API key found; set one of {}",
                    API_KEY_VARS.join(", ")
                ))
            })
    }

    /// Points the client at another endpoint, e.g. a proxy or a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate_content(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, request.model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents: vec![Content::user(request.prompt.clone())],
            system_instruction: request.system_instruction.as_ref().map(|text| Content {
                role: "user".to_string(),
                parts: vec![Part::Text { text: text.clone() }],
            }),
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        };

        debug!("POST {}/models/{}:generateContent", self.base_url, request.model);
        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let err_text = res.text().await?;
            return Err(BudgetError::AdvisorFailed(format!(
                "Gemini API Error (status {}): {}",
                status, err_text
            )));
        }

        let body: GenerateContentResponse = res.json().await?;
        extract_text(body)
    }
}

impl CompletionService for GeminiClient {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>> {
        self.generate_content(request).boxed()
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String> {
    let candidate = body
        .candidates
        .ok_or_else(|| BudgetError::AdvisorFailed("No candidates returned".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| BudgetError::AdvisorFailed("Empty candidates list".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text),
            Part::Other(_) => None,
        })
        .collect();

    if text.trim().is_empty() {
        return Err(BudgetError::EmptyResponse);
    }
    Ok(text)
}
