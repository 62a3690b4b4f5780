#![cfg(feature = "web")]

use axum::routing::post;
use axum::{Form, Json, Router};
use clap::Parser;
use portfolio::app::{AppState, WriteAccess, api_router};
use portfolio::client::HttpContentClient;
use portfolio::config::SiteConfig;
use portfolio::content::SectionKey;
use portfolio::edit::{EditError, EditMode, EditSession};
use portfolio::ratelimit::RateLimiter;
use portfolio::store::{ContentError, ContentStore};
use portfolio::verify::{BotVerifier, TurnstileVerifier};
use portfolio::wave::WavePipeline;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port
async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn site(store: ContentStore, password: &str) -> Router {
    api_router(Arc::new(AppState {
        store,
        write_access: WriteAccess::Password(Some(password.to_string())),
        wave: WavePipeline::new(None, RateLimiter::default(), None, None).unwrap(),
        site_key: None,
    }))
}

#[tokio::test]
async fn editor_round_trip_over_http() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    let addr = spawn(site(ContentStore::new(&path), "pw")).await;
    let client = HttpContentClient::new(&format!("http://{}/", addr));
    assert_eq!(client.endpoint(), format!("http://{}/api/content", addr));

    let mut session = EditSession::new(Some("pw".to_string()));
    assert!(session.load(&client).await.unwrap());
    session.authenticate("pw").unwrap();
    session.set_field(SectionKey::HeroGreeting, "Hello");
    session.add_skill("Rust");
    session.save_all(&client).await.unwrap();

    assert_eq!(session.mode(), EditMode::Anonymous);
    assert_eq!(session.content().hero_greeting, "Hello");

    let stored = ContentStore::new(&path).read().unwrap();
    assert_eq!(stored.hero_greeting, "Hello");
    assert_eq!(stored.skills, vec!["Rust".to_string()]);
}

#[tokio::test]
async fn server_rejects_a_mismatched_password() {
    let dir = tempdir().unwrap();
    let addr = spawn(site(ContentStore::new(dir.path().join("c.json")), "server-pw")).await;
    let client = HttpContentClient::new(&format!("http://{}", addr));

    // The local session accepts its own secret, the server does not
    let mut session = EditSession::new(Some("stale-pw".to_string()));
    session.load(&client).await.unwrap();
    session.authenticate("stale-pw").unwrap();
    session.set_field(SectionKey::About, "x");

    let err = session.save_all(&client).await.unwrap_err();
    assert!(
        matches!(err, EditError::Content(ContentError::Unauthorized)),
        "Got {:?}",
        err
    );
    assert!(session.is_dirty(), "Failed saves keep local edits");
}

#[tokio::test]
async fn turnstile_verifier_posts_the_expected_form() {
    let app = Router::new().route(
        "/siteverify",
        post(|Form(form): Form<HashMap<String, String>>| async move {
            let ok = form.get("secret").map(String::as_str) == Some("s3cret")
                && form.get("response").map(String::as_str) == Some("good-token")
                && form.get("remoteip").map(String::as_str) == Some("203.0.113.9");
            if ok {
                Json(json!({ "success": true }))
            } else {
                Json(json!({ "success": false, "error-codes": ["invalid-input-response"] }))
            }
        }),
    );
    let addr = spawn(app).await;

    let verifier = TurnstileVerifier::new("s3cret", Duration::from_secs(5))
        .unwrap()
        .with_endpoint(format!("http://{}/siteverify", addr));

    assert!(verifier.verify("good-token", "203.0.113.9").await.unwrap());
    assert!(!verifier.verify("bad-token", "203.0.113.9").await.unwrap());
}

#[tokio::test]
async fn unreachable_verifier_is_an_error() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let verifier = TurnstileVerifier::new("s", Duration::from_secs(2))
        .unwrap()
        .with_endpoint(format!("http://{}/siteverify", addr));
    let err = verifier.verify("t", "local").await.unwrap_err();
    assert_eq!(err.status_code(), 500);
}

#[test]
fn config_defaults_and_credentials() {
    let config = SiteConfig::try_parse_from(["website"]).unwrap();
    assert_eq!(config.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.verify_timeout(), Duration::from_secs(10));
    assert!(!config.insecure_open_content_writes);

    let config = SiteConfig::try_parse_from([
        "website",
        "--email-user",
        "me@example.com",
        "--email-pass",
        "",
        "--turnstile-secret",
        "",
    ])
    .unwrap();
    assert!(config.mail_credentials().is_none(), "Empty password means no mail");
    assert!(config.turnstile_secret().is_none());

    let config = SiteConfig::try_parse_from([
        "website",
        "--email-user",
        "me@example.com",
        "--email-pass",
        "app-password",
        "--insecure-open-content-writes",
    ])
    .unwrap();
    assert_eq!(config.mail_credentials().unwrap().user, "me@example.com");
    assert!(config.insecure_open_content_writes);
}
