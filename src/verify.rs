#![cfg(feature = "web")]

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::wave::WaveError;

/// Cloudflare Turnstile verification endpoint
pub const TURNSTILE_VERIFY_URL: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

/// Checks a client-supplied challenge token with a third party
#[async_trait]
pub trait BotVerifier: Send + Sync {
    /// `Ok(false)` means the service answered and rejected the token
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, WaveError>;
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Turnstile `siteverify` client
pub struct TurnstileVerifier {
    client: reqwest::Client,
    secret: String,
    endpoint: String,
}

impl TurnstileVerifier {
    pub fn new(secret: impl Into<String>, timeout: Duration) -> Result<Self, WaveError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WaveError::Verification(e.to_string()))?;

        Ok(TurnstileVerifier {
            client,
            secret: secret.into(),
            endpoint: TURNSTILE_VERIFY_URL.to_string(),
        })
    }

    /// Point the verifier at another endpoint with the same protocol
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl BotVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, WaveError> {
        let params = [
            ("secret", self.secret.as_str()),
            ("response", token),
            ("remoteip", remote_ip),
        ];

        let response: SiteVerifyResponse = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| WaveError::Verification(e.to_string()))?
            .json()
            .await
            .map_err(|e| WaveError::Verification(e.to_string()))?;

        if !response.success {
            log::info!("Bot verification rejected: {:?}", response.error_codes);
        }
        Ok(response.success)
    }
}
