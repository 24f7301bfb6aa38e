//! Choices-based completion API (OpenAI compatible
//! `/v1/chat/completions`).
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::ai::gateway::{ChatTurn, Role};

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 256;
const TEMPERATURE: f32 = 0.7;

#[derive(Serialize, Debug, PartialEq)]
pub struct Message {
    pub role: &'static str,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Roles are sent as-is, the vocabulary already matches.
pub fn role(role: Role) -> &'static str {
    role.as_str()
}

impl ChatCompletionRequest {
    pub fn new(model: &str, turns: &[ChatTurn]) -> Self {
        let messages = turns
            .iter()
            .map(|turn| Message {
                role: role(turn.role),
                content: turn.content.clone(),
            })
            .collect();
        Self {
            model: model.to_string(),
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

pub fn completion(
    client: &Client,
    api_url: &str,
    api_key: &str,
    model: &str,
    turns: &[ChatTurn],
) -> RequestBuilder {
    client
        .post(api_url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&ChatCompletionRequest::new(model, turns))
}

/// Pull the text out of `choices[0].message.content`.
pub fn first_choice_content(data: &serde_json::Value) -> Option<String> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let turns = vec![
            ChatTurn::new(Role::User, "hi"),
            ChatTurn::new(Role::Assistant, "hello!"),
            ChatTurn::new(Role::User, "how are you?"),
        ];
        let payload =
            serde_json::to_value(ChatCompletionRequest::new("gpt-3.5-turbo", &turns)).unwrap();
        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["max_tokens"], 256);
        assert_eq!(
            payload["messages"],
            json!([
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello!"},
                {"role": "user", "content": "how are you?"}
            ])
        );
    }

    #[test]
    fn test_extracts_first_choice() {
        let data = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": " Hello! How can I help you today? "},
                "finish_reason": "stop"
            }]
        });
        assert_eq!(
            first_choice_content(&data),
            Some("Hello! How can I help you today?".to_string())
        );
    }

    #[test]
    fn test_extract_without_choices() {
        assert_eq!(first_choice_content(&json!({"choices": []})), None);
        assert_eq!(
            first_choice_content(&json!({"choices": [{"message": {"content": null}}]})),
            None
        );
    }
}
