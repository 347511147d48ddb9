use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::GenerativeClient;
use super::ExtractError;
use crate::config::GeminiConfig;

/// Blocking REST client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_k: u32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_k: config.top_k,
            timeout_secs: config.timeout_secs,
            client,
        }
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

/// Response body from `models/{model}:generateContent`
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerativeClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ExtractError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_k: self.top_k,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                ExtractError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractError::Timeout(self.timeout_secs)
            } else {
                ExtractError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ExtractError::HttpClient(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(ExtractError::EmptyResponse)
    }
}

/// Mock model client for tests. Returns a configured response, or fails
/// every call when constructed with `failing()`.
pub struct MockGenerativeClient {
    response: String,
    fail: bool,
}

impl MockGenerativeClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: String::new(),
            fail: true,
        }
    }
}

impl GenerativeClient for MockGenerativeClient {
    fn generate(&self, _prompt: &str) -> Result<String, ExtractError> {
        if self.fail {
            Err(ExtractError::HttpClient("mock transport failure".into()))
        } else {
            Ok(self.response.clone())
        }
    }
}
