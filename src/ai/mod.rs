//! AI comment service.
//!
//! One-shot call to the Gemini `generateContent` endpoint asking for a short
//! witty line about the winning restaurant. Thin HTTP wrapper; response
//! parsing is a pure function so it can be tested without a network. Every
//! failure path degrades to a canned comment, never to a user-facing error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Shown when the API call fails outright.
pub const FALLBACK_COMMENT: &str = "Enjoy your lunch!";

/// Shown when the model answers with empty text.
pub const EMPTY_RESPONSE_COMMENT: &str = "Great pick, you won't regret it.";

const SYSTEM_INSTRUCTION: &str = "You are a witty restaurant connoisseur cheering on office workers \
     heading out for lunch. Be friendly and playful. Answer with a single \
     short line, at most twenty words, no quotes.";

const TEMPERATURE: f32 = 0.8;
const MAX_OUTPUT_TOKENS: u32 = 80;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    /// Neither `GEMINI_API_KEY` nor `API_KEY` is set.
    #[error("missing API key: set GEMINI_API_KEY")]
    MissingApiKey,

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct CommentClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl CommentClient {
    /// Build a client from the environment. `GEMINI_API_KEY` wins over the
    /// generic `API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self, CommentError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| CommentError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CommentError::HttpClientBuild(e.to_string()))?;

        Ok(Self { http, api_key, model: model.into() })
    }

    /// Fetch a one-line comment for the winning restaurant. Infallible by
    /// design: transport and parse errors are logged and replaced with a
    /// canned fallback.
    pub async fn lunch_comment(&self, restaurant: &str) -> String {
        match self.generate(&build_prompt(restaurant)).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_RESPONSE_COMMENT.to_string(),
            Err(e) => {
                tracing::warn!("comment fetch failed: {}", e);
                FALLBACK_COMMENT.to_string()
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>, CommentError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt.to_string() }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part { text: SYSTEM_INSTRUCTION.to_string() }],
            },
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CommentError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| CommentError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(CommentError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

/// The user-turn prompt sent for a winning restaurant.
fn build_prompt(restaurant: &str) -> String {
    format!(
        "\"{restaurant}\" just won the lunch roulette. Give the office workers \
         headed there one short, witty line of encouragement."
    )
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Extract the first candidate's text, trimmed. `None` when the model came
/// back empty; `Err` only for malformed JSON.
fn parse_response(json: &str) -> Result<Option<String>, CommentError> {
    let api: GenerateResponse =
        serde_json::from_str(json).map_err(|e| CommentError::ApiParse(e.to_string()))?;

    let text = api
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_text_part() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"  Katsu day, lucky you!  "}]}}]}"#;
        assert_eq!(parse_response(json).unwrap(), Some("Katsu day, lucky you!".to_string()));
    }

    #[test]
    fn test_parse_joins_multiple_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Great "},{"text":"choice!"}]}}]}"#;
        assert_eq!(parse_response(json).unwrap(), Some("Great choice!".to_string()));
    }

    #[test]
    fn test_parse_no_candidates() {
        assert_eq!(parse_response(r#"{"candidates":[]}"#).unwrap(), None);
        assert_eq!(parse_response(r#"{}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_empty_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        assert_eq!(parse_response(json).unwrap(), None);
    }

    #[test]
    fn test_parse_missing_content() {
        let json = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(parse_response(json).unwrap(), None);
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(parse_response("not json"), Err(CommentError::ApiParse(_))));
    }

    #[test]
    fn test_prompt_names_the_restaurant() {
        let prompt = build_prompt("Pho 99");
        assert!(prompt.contains("\"Pho 99\""));
    }

    #[test]
    fn test_request_wire_shape() {
        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts: vec![Part { text: "hi".into() }] }],
            system_instruction: SystemInstruction { parts: vec![Part { text: "sys".into() }] },
            generation_config: GenerationConfig { temperature: 0.8, max_output_tokens: 80 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json["generationConfig"].get("maxOutputTokens").is_some());
        assert_eq!(json["contents"][0]["role"], "user");
    }
}
