//! Google Gemini API client (generateContent, non-streaming).
//!
//! Two modes: text prompt → generated text, image bytes → description.
//! Neither retries, caches, or overrides the default timeout.

use base64::Engine;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_VISION_MODEL: &str = "gemini-pro-vision";

/// Instruction sent with image bytes; the audience is zh-TW, matching the
/// bot's fixed reply strings.
const IMAGE_PROMPT: &str = "用繁體中文描述這張圖片的內容";

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    vision_model: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("gemini request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gemini api error: {0}")]
    Api(String),
    #[error("gemini returned no candidates")]
    Empty,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        vision_model: Option<String>,
    ) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            vision_model: vision_model.unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Text mode: send a prompt, return generated text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
        };
        self.generate(&self.model, &request).await
    }

    /// Image mode: send raw image bytes (base64 inline), return a description.
    pub async fn describe_image(
        &self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, GeminiError> {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::text(IMAGE_PROMPT),
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data,
                        }),
                    },
                ],
            }],
        };
        self.generate(&self.vision_model, &request).await
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let res = self.client.post(&url).json(request).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GeminiError::Api(format!("{} {}", status, body)));
        }
        let data: GenerateContentResponse = res.json().await?;
        let text = data.first_candidate_text();
        if text.is_empty() {
            return Err(GeminiError::Empty);
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(s: &str) -> Self {
        Self {
            text: Some(s.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts; empty when absent.
    fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Hello " }, { "text": "world" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }"#;
        let res: GenerateContentResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(res.first_candidate_text(), "Hello world");
    }

    #[test]
    fn empty_response_yields_empty_text() {
        let res: GenerateContentResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(res.first_candidate_text(), "");
    }

    #[test]
    fn inline_data_serializes_camel_case() {
        let part = Part {
            text: None,
            inline_data: Some(InlineData {
                mime_type: "image/jpeg".to_string(),
                data: "QUJD".to_string(),
            }),
        };
        let v = serde_json::to_value(&part).expect("serialize");
        assert_eq!(v["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(v["inlineData"]["data"], "QUJD");
    }
}
