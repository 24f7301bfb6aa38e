//! The models shared by the gateway, the API and the conversation
//! view.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a turn in the conversation.
///
/// Clients can send anything in the `role` field. Only the literal
/// `"user"` is treated as the user, everything else (system prompts,
/// typos, a missing field) collapses into `Assistant` when the
/// transcript is deserialized so the rest of the gateway only ever
/// deals with two variants.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    #[default]
    Assistant,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "user" => Role::User,
            _ => Role::Assistant,
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatTurn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Create a new turn with a freshly generated ID.
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            role,
            content: content.to_string(),
        }
    }
}

/// Ordered list of turns. Order matters since it's the history the
/// model sees.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Transcript(Vec<ChatTurn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.0
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.0.push(turn)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.0.iter()
    }
}
