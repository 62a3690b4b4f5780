#![cfg(feature = "web")]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::SiteConfig;
use crate::edit::passwords_match;
use crate::mailer::{SmtpNotifier, WaveNotifier};
use crate::ratelimit::RateLimiter;
use crate::store::{ContentError, ContentStore, parse_document};
use crate::verify::{BotVerifier, TurnstileVerifier};
use crate::wave::{WaveError, WavePipeline, WaveRequest};

/// Header carrying the edit password on content writes
pub const EDIT_PASSWORD_HEADER: &str = "x-edit-password";

/// How content writes are authorized
#[derive(Debug, Clone)]
pub enum WriteAccess {
    /// Writes must carry the edit password; `None` refuses every write
    Password(Option<String>),
    /// Anyone can overwrite the content. Insecure, for demo sites only.
    Open,
}

pub struct AppState {
    pub store: ContentStore,
    pub write_access: WriteAccess,
    pub wave: WavePipeline,
    pub site_key: Option<String>,
}

#[derive(Serialize)]
struct WaveConfigResponse {
    #[serde(rename = "siteKey")]
    site_key: Option<String>,
}

impl AppState {
    /// Wire the state from the server configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let verifier: Option<Arc<dyn BotVerifier>> = match config.turnstile_secret() {
            Some(secret) => Some(Arc::new(TurnstileVerifier::new(
                secret,
                config.verify_timeout(),
            )?)),
            None => {
                log::warn!("TURNSTILE_SECRET missing; bot verification disabled (dev only)");
                None
            }
        };

        let notifier: Option<Arc<dyn WaveNotifier>> = match config.mail_credentials() {
            Some(creds) => Some(Arc::new(SmtpNotifier::new(&config.smtp_relay, creds))),
            None => {
                log::warn!("EMAIL_USER/EMAIL_PASS missing; waves will fail until configured");
                None
            }
        };

        let write_access = if config.insecure_open_content_writes {
            log::warn!("Content writes are open to anyone (--insecure-open-content-writes)");
            WriteAccess::Open
        } else {
            if config.edit_password.is_none() {
                log::warn!("EDIT_PASSWORD missing; content writes are disabled");
            }
            WriteAccess::Password(config.edit_password.clone())
        };

        Ok(AppState {
            store: ContentStore::new(&config.content_file),
            write_access,
            wave: WavePipeline::new(
                config.production_domain.as_deref(),
                RateLimiter::default(),
                verifier,
                notifier,
            )?,
            site_key: config.turnstile_site_key.clone(),
        })
    }

    fn authorize_write(&self, headers: &HeaderMap) -> Result<(), ContentError> {
        match &self.write_access {
            WriteAccess::Open => Ok(()),
            WriteAccess::Password(Some(expected)) if !expected.is_empty() => {
                let supplied = headers
                    .get(EDIT_PASSWORD_HEADER)
                    .and_then(|v| v.to_str().ok());
                if supplied.is_some_and(|supplied| passwords_match(supplied, expected)) {
                    Ok(())
                } else {
                    Err(ContentError::Unauthorized)
                }
            }
            WriteAccess::Password(_) => Err(ContentError::Unauthorized),
        }
    }
}

/// Build the router: JSON API under `/api`, everything else from `static_dir`
pub fn router(state: Arc<AppState>, static_dir: impl AsRef<std::path::Path>) -> Router {
    api_router(state).fallback_service(ServeDir::new(static_dir.as_ref()))
}

/// The API routes alone
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/content", get(get_content).post(save_content))
        .route("/api/wave", axum::routing::post(send_wave))
        .route("/api/wave/config", get(wave_config))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

pub async fn run(config: SiteConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::from_config(&config)?);

    // Make sure the content file exists before the first visitor
    state.store.read()?;

    let app = router(state, &config.static_dir);

    let listener = TcpListener::bind(config.bind).await?;
    log::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        match &self {
            ContentError::InvalidBody(msg) => error_response(StatusCode::BAD_REQUEST, msg),
            ContentError::Unauthorized => error_response(StatusCode::UNAUTHORIZED, "Unauthorized"),
            _ => {
                log::error!("Content API failure: {}", self);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to access content")
            }
        }
    }
}

impl IntoResponse for WaveError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log::error!("Wave error: {}", self);
        }
        error_response(status, &self.public_message())
    }
}

async fn get_content(State(state): State<Arc<AppState>>) -> Result<Response, ContentError> {
    let doc = state.store.read()?;
    Ok(Json(doc).into_response())
}

async fn save_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ContentError> {
    state.authorize_write(&headers)?;

    let doc = parse_document(&body)?;
    state.store.write(&doc)?;

    Ok(Json(json!({ "ok": true })).into_response())
}

async fn send_wave(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WaveError> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let request = WaveRequest {
        origin: header_value(header::ORIGIN.as_str()),
        content_type: header_value(header::CONTENT_TYPE.as_str()),
        forwarded_for: header_value("x-forwarded-for"),
        body: body.to_vec(),
    };

    state.wave.process(request).await?;
    Ok(Json(json!({ "success": true })).into_response())
}

async fn wave_config(State(state): State<Arc<AppState>>) -> Json<WaveConfigResponse> {
    Json(WaveConfigResponse {
        site_key: state.site_key.clone(),
    })
}
