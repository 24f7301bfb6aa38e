use std::str::FromStr;
use std::time::Duration;

use anyhow::{Error, anyhow};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::error::GatewayError;
use super::models::ChatTurn;
use crate::{gemini, openai};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Which flavor of completion API sits upstream. Selected per
/// deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upstream {
    /// Candidate-based responses (`candidates[0].content.parts[0].text`)
    Gemini,
    /// Choices-based responses (`choices[0].message.content`)
    OpenAi,
}

impl Upstream {
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Upstream::Gemini => gemini::DEFAULT_API_URL,
            Upstream::OpenAi => openai::DEFAULT_API_URL,
        }
    }

    fn extract_content(&self, data: &Value) -> Option<String> {
        match self {
            Upstream::Gemini => gemini::first_candidate_text(data),
            Upstream::OpenAi => openai::first_choice_content(data),
        }
    }
}

impl FromStr for Upstream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Upstream::Gemini),
            "openai" => Ok(Upstream::OpenAi),
            other => Err(anyhow!("Unknown upstream {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub upstream: Upstream,
    pub upstream_url: String,
    /// Missing credentials are only reported when a request comes in
    pub api_key: Option<String>,
    /// Only sent to choices-based APIs
    pub model: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(upstream: Upstream, upstream_url: &str, api_key: Option<&str>) -> Self {
        Self {
            upstream,
            upstream_url: upstream_url.to_string(),
            api_key: api_key.map(String::from),
            model: openai::DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

/// Forwards a transcript to the upstream completion API and
/// normalizes whatever comes back into either the completion text or
/// a `GatewayError`.
///
/// The gateway is stateless apart from the pooled HTTP client so a
/// single instance is shared by every request. It never retries.
#[derive(Clone)]
pub struct Gateway {
    client: Client,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get the next assistant message for the transcript.
    ///
    /// The whole exchange (sending the request and reading the body)
    /// is bounded by the configured timeout. When the deadline passes
    /// the in-flight request future is dropped which closes the
    /// upstream connection instead of letting it run to completion.
    pub async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GatewayError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => {
                tracing::error!("API key not configured");
                return Err(GatewayError::MissingCredential);
            }
        };

        let request = self.request(api_key, turns);
        tracing::debug!(
            "Sending {} turns to {:?} upstream",
            turns.len(),
            self.config.upstream
        );

        match tokio::time::timeout(self.config.timeout, self.exchange(request)).await {
            Ok(result) => result.inspect_err(|err| {
                if let GatewayError::Internal(cause) = err {
                    tracing::error!("Internal server error: {}", cause);
                }
            }),
            Err(_) => {
                tracing::error!(
                    "Upstream request timed out after {}ms",
                    self.config.timeout.as_millis()
                );
                Err(GatewayError::Timeout)
            }
        }
    }

    fn request(&self, api_key: &str, turns: &[ChatTurn]) -> RequestBuilder {
        let GatewayConfig {
            upstream,
            upstream_url,
            model,
            ..
        } = &self.config;
        match upstream {
            Upstream::Gemini => gemini::generate_content(&self.client, upstream_url, api_key, turns),
            Upstream::OpenAi => {
                openai::completion(&self.client, upstream_url, api_key, model, turns)
            }
        }
    }

    async fn exchange(&self, request: RequestBuilder) -> Result<String, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Upstream API error: {} {}", status, body);
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        self.config.upstream.extract_content(&data).ok_or_else(|| {
            tracing::error!("No response from AI: {}", data);
            GatewayError::EmptyResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::Role;
    use mockito::Matcher;
    use serde_json::json;
    use tokio::net::TcpListener;

    const GEMINI_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn gemini_gateway(url: &str, api_key: Option<&str>) -> Gateway {
        Gateway::new(GatewayConfig::new(
            Upstream::Gemini,
            &format!("{}{}", url, GEMINI_PATH),
            api_key,
        ))
    }

    fn hi() -> Vec<ChatTurn> {
        vec![ChatTurn::new(Role::User, "hi")]
    }

    #[tokio::test]
    async fn test_gemini_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Json(json!({
                "contents": [{"role": "user", "parts": [{"text": "hi"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "hello!\n"}]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let gateway = gemini_gateway(&server.url(), Some("test-key"));
        let content = gateway.complete(&hi()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(content, "hello!");
    }

    #[tokio::test]
    async fn test_openai_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "Hello! How can I help you today?"},
                        "finish_reason": "stop"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let config = GatewayConfig::new(
            Upstream::OpenAi,
            &format!("{}/v1/chat/completions", server.url()),
            Some("test-key"),
        )
        .model("gpt-4o");
        let content = Gateway::new(config).complete(&hi()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(content, "Hello! How can I help you today?");
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        for api_key in [None, Some("")] {
            let gateway = gemini_gateway(&server.url(), api_key);
            let result = gateway.complete(&hi()).await;
            assert!(matches!(result, Err(GatewayError::MissingCredential)));
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("rate limited")
            .create_async()
            .await;

        let result = gemini_gateway(&server.url(), Some("test-key"))
            .complete(&hi())
            .await;

        match result {
            Err(GatewayError::Upstream { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_completion() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let result = gemini_gateway(&server.url(), Some("test-key"))
            .complete(&hi())
            .await;

        assert!(matches!(result, Err(GatewayError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GEMINI_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = gemini_gateway(&server.url(), Some("test-key"))
            .complete(&hi())
            .await;

        assert!(matches!(result, Err(GatewayError::Internal(_))));
    }

    #[tokio::test]
    async fn test_connection_failure_is_internal_error() {
        // Bind then drop a listener to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = gemini_gateway(&format!("http://{}", addr), Some("secret-gemini-key"))
            .complete(&hi())
            .await;

        match result {
            Err(GatewayError::Internal(cause)) => {
                assert!(!cause.contains("secret-gemini-key"), "leaked key: {}", cause);
                assert!(!cause.contains("key="), "leaked query: {}", cause);
            }
            other => panic!("Expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_times_out_when_upstream_hangs() {
        // Accept connections but never answer
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = GatewayConfig::new(
            Upstream::Gemini,
            &format!("http://{}{}", addr, GEMINI_PATH),
            Some("test-key"),
        )
        .timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let result = Gateway::new(config).complete(&hi()).await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(GatewayError::Timeout)));
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }

    #[test]
    fn test_parses_upstream() {
        assert_eq!("gemini".parse::<Upstream>().unwrap(), Upstream::Gemini);
        assert_eq!("OpenAI".parse::<Upstream>().unwrap(), Upstream::OpenAi);
        assert!("claude".parse::<Upstream>().is_err());
    }
}
