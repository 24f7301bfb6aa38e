use anyhow::Error;
use serde_json::Value;

use super::client::{RawResponse, Transport};
use super::render::Viewport;
use crate::ai::gateway::{ChatTurn, Role, Transcript};
use crate::api::public::chat::ChatRequest;

pub const NOT_JSON_ERROR: &str = "Server response is not valid JSON";
pub const UNEXPECTED_RESPONSE_ERROR: &str = "Unexpected server response. Please try again.";
pub const CONNECTION_ERROR: &str =
    "Failed to send message. Check your connection and try again.";

/// A single chat session as the user sees it.
///
/// Nothing is persisted, a new `Conversation` starts with an empty
/// transcript. Only one request can be outstanding at a time:
/// submitting while `loading` is a no-op.
pub struct Conversation<T: Transport> {
    transport: T,
    transcript: Transcript,
    input: String,
    loading: bool,
    error: Option<String>,
    viewport: Viewport,
}

impl<T: Transport> Conversation<T> {
    pub fn new(transport: T, viewport: Viewport) -> Self {
        Self {
            transport,
            transcript: Transcript::new(),
            input: String::new(),
            loading: false,
            error: None,
            viewport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Move the input into the transcript and build the request for
    /// the gateway. Returns `None` if there's nothing to send or a
    /// request is already in flight.
    pub fn begin_submit(&mut self) -> Option<ChatRequest> {
        if !self.can_submit() {
            return None;
        }

        let turn = ChatTurn::new(Role::User, &self.input);
        self.transcript.push(turn);
        self.input.clear();
        self.loading = true;
        self.error = None;
        self.viewport.scroll_to_bottom();

        Some(ChatRequest {
            messages: self.transcript.turns().to_vec(),
        })
    }

    /// Apply the outcome of a request started with `begin_submit`.
    /// Always leaves the conversation ready for the next submission.
    pub fn finish_submit(&mut self, result: Result<RawResponse, Error>) {
        match result {
            Ok(response) => self.apply_response(response),
            Err(e) => {
                tracing::error!("Failed to send message: {}", e);
                self.error = Some(CONNECTION_ERROR.to_string());
            }
        }
        self.loading = false;
        self.viewport.scroll_to_bottom();
    }

    /// Send the current input and wait for the reply. Returns whether
    /// anything was sent.
    pub async fn submit(&mut self) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let result = self.transport.send(&request).await;
        self.finish_submit(result);
        true
    }

    fn apply_response(&mut self, response: RawResponse) {
        if !response.is_success() {
            tracing::error!("Server error {}: {}", response.status, response.body);
            self.error = Some(format!("Error {}: {}", response.status, response.body));
            return;
        }

        let data: Value = match serde_json::from_str(&response.body) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("Failed to parse server response: {}", e);
                self.error = Some(NOT_JSON_ERROR.to_string());
                return;
            }
        };

        match data["content"].as_str().filter(|c| !c.is_empty()) {
            Some(content) => self
                .transcript
                .push(ChatTurn::new(Role::Assistant, content)),
            None => {
                tracing::error!("Unexpected server response: {}", data);
                self.error = Some(UNEXPECTED_RESPONSE_ERROR.to_string());
            }
        }
    }
}
