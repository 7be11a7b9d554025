use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use evergreens_types::api::ChatTurn;

use crate::{ChatError, TextGenerator};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn generate_content(
        &self,
        system_instruction: &str,
        contents: &[ChatTurn],
    ) -> Result<String, ChatError> {
        let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&build_request(system_instruction, contents))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Rejected { status: status.as_u16(), body });
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_text(body)
    }
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        contents: &'a [ChatTurn],
    ) -> BoxFuture<'a, Result<String, ChatError>> {
        Box::pin(self.generate_content(system_instruction, contents))
    }
}

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    text: Option<String>,
}

fn build_request<'a>(system_instruction: &'a str, contents: &'a [ChatTurn]) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part { text: system_instruction }],
        },
        contents: contents
            .iter()
            .map(|turn| Content {
                role: Some(<&'static str>::from(turn.role)),
                parts: vec![Part { text: &turn.text }],
            })
            .collect(),
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ChatError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ChatError::EmptyReply);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_generate_content_shape() {
        let turns = vec![ChatTurn::model("Welcome!"), ChatTurn::user("Do you ship to Delhi?")];
        let body = serde_json::to_value(build_request("be nice", &turns)).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "systemInstruction": { "parts": [{ "text": "be nice" }] },
                "contents": [
                    { "role": "model", "parts": [{ "text": "Welcome!" }] },
                    { "role": "user", "parts": [{ "text": "Do you ship to Delhi?" }] }
                ]
            })
        );
    }

    #[test]
    fn reply_text_is_joined_from_first_candidate() {
        let raw = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Yes, we ship " }, { "text": "across India." }]
                    },
                    "finishReason": "STOP"
                },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ],
            "usageMetadata": { "promptTokenCount": 12 }
        });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Yes, we ship across India.");
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let raw = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert!(matches!(extract_text(parsed), Err(ChatError::EmptyReply)));
    }

    #[test]
    fn endpoint_includes_model() {
        let client =
            GeminiClient::new(Some("k".into()), "gemini-test", "http://localhost:9/v1beta/", None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9/v1beta/models/gemini-test:generateContent");
        assert!(client.has_api_key());
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let client = GeminiClient::new(Some("  ".into()), DEFAULT_MODEL, DEFAULT_API_BASE, None).unwrap();
        assert!(!client.has_api_key());
        let result = client.generate("persona", &[ChatTurn::user("hi")]).await;
        assert!(matches!(result, Err(ChatError::MissingApiKey)));
    }
}
