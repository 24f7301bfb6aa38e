//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::gateway::{ChatTurn, GatewayError};

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatResponse {
    pub content: String,
}

impl ChatResponse {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Body returned for every failed completion. `status` and `details`
/// are only present when there is something to put in them.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&GatewayError> for ChatErrorResponse {
    fn from(err: &GatewayError) -> Self {
        match err {
            GatewayError::MissingCredential | GatewayError::EmptyResponse => Self {
                error: err.to_string(),
                status: None,
                details: None,
            },
            GatewayError::Upstream { status, body } => Self {
                error: String::from("Upstream API error"),
                status: Some(*status),
                details: Some(body.clone()),
            },
            GatewayError::Timeout | GatewayError::Internal(_) => Self {
                error: String::from("Internal server error"),
                status: None,
                details: Some(err.to_string()),
            },
        }
    }
}
