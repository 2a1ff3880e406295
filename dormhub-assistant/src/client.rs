use dormhub_store::app_config::AssistantConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

/// Fixed style instruction prepended to every forwarded conversation.
const SYSTEM_INSTRUCTION: &str = "You are the DormHub assistant. You help university students find \
hostel accommodation near campus, explain listings, amenities, prices and booking requests, and \
answer questions about using the platform. Keep answers short, friendly and practical. If a \
question is unrelated to student housing, politely steer the conversation back.";

/// Internal conversation role vocabulary. The upstream API calls the
/// assistant side "model"; the mapping happens when the request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("upstream returned no candidates")]
    EmptyReply,
}

/// Relay to the external chat-completion endpoint. Each call is a single
/// best-effort request with fixed generation configuration; nothing is
/// persisted and nothing is retried.
pub struct AssistantClient {
    http: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    pub fn new(config: AssistantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn send(&self, transcript: &[ChatTurn]) -> Result<String, AssistantError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        );
        let body = build_request_body(
            transcript,
            self.config.temperature,
            self.config.max_output_tokens,
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "assistant upstream rejected request: {}", body);
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        extract_reply(&value)
    }
}

fn provider_role(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "model",
    }
}

fn build_request_body(transcript: &[ChatTurn], temperature: f64, max_output_tokens: u32) -> Value {
    let contents: Vec<Value> = transcript
        .iter()
        .map(|turn| {
            json!({
                "role": provider_role(turn.role),
                "parts": [{"text": turn.content}],
            })
        })
        .collect();

    json!({
        "system_instruction": {"parts": [{"text": SYSTEM_INSTRUCTION}]},
        "contents": contents,
        "generationConfig": {
            "temperature": temperature,
            "maxOutputTokens": max_output_tokens,
        },
        "safetySettings": [
            {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
            {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
            {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
            {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
        ],
    })
}

fn extract_reply(value: &Value) -> Result<String, AssistantError> {
    value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(AssistantError::EmptyReply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assistant_turns_map_to_the_model_role() {
        let transcript = vec![
            ChatTurn { role: ChatRole::User, content: "Any hostels near campus?".to_string() },
            ChatTurn { role: ChatRole::Assistant, content: "A few, yes.".to_string() },
            ChatTurn { role: ChatRole::User, content: "With wifi?".to_string() },
        ];
        let body = build_request_body(&transcript, 0.7, 512);

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "With wifi?");
    }

    #[test]
    fn system_instruction_and_generation_config_are_fixed() {
        let body = build_request_body(&[], 0.7, 512);
        assert!(body["system_instruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("DormHub assistant"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn reply_is_the_first_candidate_text() {
        let value = serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "Try Sunrise Hostel."}], "role": "model"}}
            ]
        });
        assert_eq!(extract_reply(&value).unwrap(), "Try Sunrise Hostel.");
    }

    #[test]
    fn empty_candidate_list_is_an_upstream_error() {
        let value = serde_json::json!({ "candidates": [] });
        assert!(matches!(extract_reply(&value), Err(AssistantError::EmptyReply)));
    }
}
