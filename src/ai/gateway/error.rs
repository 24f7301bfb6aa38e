use thiserror::Error;

/// Everything that can go wrong while getting a completion. Every
/// variant is reported to the caller as a JSON error body, never as
/// an unhandled fault.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API key not configured")]
    MissingCredential,
    #[error("Upstream API error: {status}")]
    Upstream { status: u16, body: String },
    #[error("No response from AI")]
    EmptyResponse,
    #[error("Request timeout")]
    Timeout,
    #[error("{0}")]
    Internal(String),
}

/// The URL is dropped since some upstreams carry the credential in
/// the query string and this text is sent back to the caller.
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Internal(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Internal(err.to_string())
    }
}
