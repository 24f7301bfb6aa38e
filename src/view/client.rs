use anyhow::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};

use crate::api::public::chat::ChatRequest;
use crate::api::public::session::SessionResponse;
use crate::auth::SESSION_COOKIE;

/// The status and unparsed body of a gateway response. The
/// conversation decides what the body means.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How a conversation reaches the gateway. An `Err` means the request
/// never got a response at all.
#[async_trait]
pub trait Transport {
    async fn send(&self, request: &ChatRequest) -> Result<RawResponse, Error>;
}

/// Talks to a running server over HTTP, authenticating with the
/// session cookie.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: &str, session_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: session_token.map(String::from),
        }
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_token {
            Some(token) => request.header(
                reqwest::header::COOKIE,
                format!("{}={}", SESSION_COOKIE, token),
            ),
            None => request,
        }
    }

    /// Look up the current session. `None` when the server doesn't
    /// accept the token.
    pub async fn session(&self) -> Result<Option<SessionResponse>> {
        let url = format!("{}/api/session", self.base_url);
        let response = self.with_session(self.client.get(url)).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let session = response.error_for_status()?.json().await?;
        Ok(Some(session))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<RawResponse, Error> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .with_session(self.client.post(url))
            .json(request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::{ChatTurn, Role};
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_sends_transcript_with_session_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("cookie", "nietu.session-token=abc.def.ghi")
            .match_body(Matcher::PartialJson(json!({
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .with_status(200)
            .with_body(r#"{"content":"hello!"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(&format!("{}/", server.url()), Some("abc.def.ghi"));
        let request = ChatRequest {
            messages: vec![ChatTurn::new(Role::User, "hi")],
        };
        let response = transport.send(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response, RawResponse::new(200, r#"{"content":"hello!"}"#));
    }

    #[tokio::test]
    async fn test_passes_error_responses_through() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body(r#"{"error":"No response from AI"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(&server.url(), None);
        let response = transport
            .send(&ChatRequest { messages: vec![] })
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_session_lookup() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/api/session")
            .match_header("cookie", "nietu.session-token=good")
            .with_status(200)
            .with_body(
                json!({
                    "user": {"id": "1", "name": "Ada", "email": null, "image": null},
                    "expires": "2030-01-01T00:00:00+00:00"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _unauthorized = server
            .mock("GET", "/api/session")
            .match_header("cookie", Matcher::Missing)
            .with_status(401)
            .with_body(r#"{"error":"Not authenticated"}"#)
            .create_async()
            .await;

        let session = HttpTransport::new(&server.url(), Some("good"))
            .session()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.user.name.as_deref(), Some("Ada"));

        let anonymous = HttpTransport::new(&server.url(), None)
            .session()
            .await
            .unwrap();
        assert!(anonymous.is_none());
    }
}
