//! Candidate-based completion API (Google Gemini `generateContent`).
//!
//! The request carries the transcript as `contents`, each with a
//! role and a list of text parts. The credential goes in the `key`
//! query parameter rather than a header.
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::ai::gateway::{ChatTurn, Role};

pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Serialize, Debug, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Gemini calls the assistant `model`.
pub fn role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

impl GenerateContentRequest {
    pub fn new(turns: &[ChatTurn]) -> Self {
        let contents = turns
            .iter()
            .map(|turn| Content {
                role: role(turn.role),
                parts: vec![Part {
                    text: turn.content.clone(),
                }],
            })
            .collect();
        Self { contents }
    }
}

pub fn generate_content(
    client: &Client,
    api_url: &str,
    api_key: &str,
    turns: &[ChatTurn],
) -> RequestBuilder {
    client
        .post(api_url)
        .query(&[("key", api_key)])
        .header("Content-Type", "application/json")
        .json(&GenerateContentRequest::new(turns))
}

/// Pull the text out of `candidates[0].content.parts[0].text`.
pub fn first_candidate_text(data: &serde_json::Value) -> Option<String> {
    data["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}
