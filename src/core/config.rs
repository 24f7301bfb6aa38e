use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use crate::ai::gateway::{DEFAULT_TIMEOUT, GatewayConfig, Upstream};
use crate::openai;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub session_secret: String,
    pub github_client_id: String,
    pub github_client_secret: String,
    pub public_url: String,
    pub assistant_name: String,
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Read the config from the environment.
    ///
    /// A missing upstream API key is allowed here and reported on
    /// each chat request instead. A missing session secret is not
    /// since the gate can't verify anything without it.
    pub fn from_env() -> Result<Self> {
        let upstream: Upstream = optional("NIETU_UPSTREAM")
            .unwrap_or_else(|| "gemini".to_string())
            .parse()?;
        let upstream_url = optional("NIETU_UPSTREAM_URL")
            .unwrap_or_else(|| upstream.default_api_url().to_string());
        let api_key = optional("NIETU_UPSTREAM_API_KEY");
        let model = optional("NIETU_UPSTREAM_MODEL")
            .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
        let timeout = match optional("NIETU_TIMEOUT_MS") {
            Some(ms) => {
                let millis: u64 = ms
                    .parse()
                    .with_context(|| format!("Invalid NIETU_TIMEOUT_MS {}", ms))?;
                if millis == 0 {
                    bail!("NIETU_TIMEOUT_MS must be greater than 0");
                }
                Duration::from_millis(millis)
            }
            None => DEFAULT_TIMEOUT,
        };
        let session_secret = optional("NIETU_SESSION_SECRET")
            .ok_or(anyhow!("Missing env var NIETU_SESSION_SECRET"))?;
        let github_client_id = optional("NIETU_GITHUB_CLIENT_ID").unwrap_or_default();
        let github_client_secret = optional("NIETU_GITHUB_CLIENT_SECRET").unwrap_or_default();
        let public_url = optional("NIETU_PUBLIC_URL")
            .unwrap_or_else(|| "http://127.0.0.1:3000".to_string());
        let assistant_name =
            optional("NIETU_ASSISTANT_NAME").unwrap_or_else(|| "Nietu AI".to_string());

        let gateway = GatewayConfig::new(upstream, &upstream_url, api_key.as_deref())
            .model(&model)
            .timeout(timeout);

        Ok(Self {
            gateway,
            session_secret,
            github_client_id,
            github_client_secret,
            public_url,
            assistant_name,
        })
    }

    pub fn github_configured(&self) -> bool {
        !self.github_client_id.is_empty() && !self.github_client_secret.is_empty()
    }
}
