//! LINE Messaging API client: reply delivery and message content download.

use serde::Serialize;
use serde_json::json;

const DEFAULT_API_BASE: &str = "https://api.line.me";
const DEFAULT_BLOB_BASE: &str = "https://api-data.line.me";

/// Client for the Messaging API (reply endpoint) and the data endpoint
/// (message content blobs).
#[derive(Clone)]
pub struct LineClient {
    api_base: String,
    blob_base: String,
    access_token: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("line request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("line api error: {0}")]
    Api(String),
}

/// Downloaded message content: raw bytes plus the reported media type.
pub struct MessageContentBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyMessageRequest {
    reply_token: String,
    messages: Vec<serde_json::Value>,
}

impl LineClient {
    pub fn new(access_token: String, api_base: Option<String>, blob_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let blob_base = blob_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BLOB_BASE.to_string());
        Self {
            api_base,
            blob_base,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    /// POST /v2/bot/message/reply — deliver one text message to the
    /// originating context. The reply token is single-use.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let url = format!("{}/v2/bot/message/reply", self.api_base);
        let body = ReplyMessageRequest {
            reply_token: reply_token.to_string(),
            messages: vec![json!({ "type": "text", "text": text })],
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!("reply failed: {} {}", status, body)));
        }
        Ok(())
    }

    /// GET /v2/bot/message/{id}/content — fetch the binary body of a media
    /// message from the data endpoint.
    pub async fn get_message_content(
        &self,
        message_id: &str,
    ) -> Result<MessageContentBlob, LineError> {
        let url = format!("{}/v2/bot/message/{}/content", self.blob_base, message_id);
        let res = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(LineError::Api(format!(
                "get content failed: {} {}",
                status, body
            )));
        }
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = res.bytes().await?.to_vec();
        Ok(MessageContentBlob {
            bytes,
            content_type,
        })
    }
}
