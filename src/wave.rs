#![cfg(feature = "web")]

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

use crate::mailer::WaveNotifier;
use crate::ratelimit::RateLimiter;
use crate::verify::BotVerifier;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Identifier used when no forwarding header names the client
pub const LOCAL_CLIENT: &str = "local";

/// Why a wave request was turned away
#[derive(Debug, Error)]
pub enum WaveError {
    #[error("Forbidden")]
    ForbiddenOrigin,

    #[error("Bad content type")]
    UnsupportedMediaType,

    #[error("Invalid JSON body")]
    MalformedBody,

    #[error("Valid email required")]
    InvalidEmail,

    #[error("Too many requests")]
    RateLimited,

    #[error("Bot check failed")]
    BotCheckFailed,

    #[error("Email not configured")]
    NotConfigured,

    #[error("bot verification request failed: {0}")]
    Verification(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

impl WaveError {
    /// HTTP status code for this rejection
    pub fn status_code(&self) -> u16 {
        match self {
            WaveError::ForbiddenOrigin => 403,
            WaveError::UnsupportedMediaType => 415,
            WaveError::MalformedBody | WaveError::InvalidEmail | WaveError::BotCheckFailed => 400,
            WaveError::RateLimited => 429,
            WaveError::NotConfigured | WaveError::Verification(_) | WaveError::Transport(_) => 500,
        }
    }

    /// Message safe to show the caller; server-side failures stay generic
    pub fn public_message(&self) -> String {
        if self.status_code() >= 500 {
            "Something went wrong".to_string()
        } else {
            self.to_string()
        }
    }
}

/// What the pipeline needs to know about one incoming request
#[derive(Debug, Clone, Default)]
pub struct WaveRequest {
    pub origin: Option<String>,
    pub content_type: Option<String>,
    pub forwarded_for: Option<String>,
    pub body: Vec<u8>,
}

impl WaveRequest {
    /// First address of `x-forwarded-for`, or [`LOCAL_CLIENT`]
    pub fn client_id(&self) -> String {
        self.forwarded_for
            .as_deref()
            .and_then(|header| header.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(LOCAL_CLIENT)
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct WaveBody {
    #[serde(default)]
    email: Option<serde_json::Value>,
    #[serde(default)]
    token: Option<String>,
}

/// Basic shape check, plus it must parse as a deliverable mail address
pub fn is_email(candidate: &str) -> bool {
    EMAIL_REGEX.is_match(candidate) && candidate.parse::<lettre::Address>().is_ok()
}

/// Builds the origin allowlist: any local port, plus the production domain
pub fn origin_pattern(production_domain: Option<&str>) -> Result<Regex, regex::Error> {
    let pattern = match production_domain.filter(|d| !d.is_empty()) {
        Some(domain) => format!(
            r"^https?://(localhost:\d+|127\.0\.0\.1:\d+|{})$",
            regex::escape(domain)
        ),
        None => r"^https?://(localhost:\d+|127\.0\.0\.1:\d+)$".to_string(),
    };
    Regex::new(&pattern)
}

/// Contact form pipeline
///
/// Stages run in a fixed order and the first failure ends the request:
/// origin, content type, body, rate limit, bot check, mail configuration,
/// delivery.
pub struct WavePipeline {
    origin_allow: Regex,
    limiter: RateLimiter,
    verifier: Option<Arc<dyn BotVerifier>>,
    notifier: Option<Arc<dyn WaveNotifier>>,
}

impl WavePipeline {
    pub fn new(
        production_domain: Option<&str>,
        limiter: RateLimiter,
        verifier: Option<Arc<dyn BotVerifier>>,
        notifier: Option<Arc<dyn WaveNotifier>>,
    ) -> Result<Self, regex::Error> {
        Ok(WavePipeline {
            origin_allow: origin_pattern(production_domain)?,
            limiter,
            verifier,
            notifier,
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub async fn process(&self, request: WaveRequest) -> Result<(), WaveError> {
        // 1) Origin allowlist
        let origin = request.origin.as_deref().unwrap_or("");
        if !self.origin_allow.is_match(origin) {
            return Err(WaveError::ForbiddenOrigin);
        }

        // 2) JSON only
        let content_type = request.content_type.as_deref().unwrap_or("");
        if !content_type.contains("application/json") {
            return Err(WaveError::UnsupportedMediaType);
        }

        // 3) Body and email shape
        let body: WaveBody =
            serde_json::from_slice(&request.body).map_err(|_| WaveError::MalformedBody)?;
        let email = match body.email {
            Some(serde_json::Value::String(email)) if is_email(&email) => email,
            _ => return Err(WaveError::InvalidEmail),
        };

        // 4) Rate limit
        let client = request.client_id();
        if !self.limiter.check(&client) {
            log::warn!("Wave rate limit hit for {}", client);
            return Err(WaveError::RateLimited);
        }

        // 5) Bot check
        match &self.verifier {
            Some(verifier) => {
                let token = body.token.unwrap_or_default();
                if !verifier.verify(&token, &client).await? {
                    return Err(WaveError::BotCheckFailed);
                }
            }
            None => log::warn!("No bot verification secret; skipping bot check (dev only)"),
        }

        // 6) + 7) Mail configuration and delivery
        let notifier = self.notifier.as_ref().ok_or(WaveError::NotConfigured)?;
        notifier.notify(&email).await
    }
}
