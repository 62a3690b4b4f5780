#![cfg(feature = "web")]

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::mailer::{DEFAULT_RELAY, MailCredentials};

/// Server settings, read from flags with environment fallbacks
#[derive(Debug, Clone, Parser)]
#[command(name = "website", about = "Portfolio site with an editable content API")]
pub struct SiteConfig {
    /// Address to listen on
    #[arg(long, env = "PORTFOLIO_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// JSON file holding the editable site copy
    #[arg(long, env = "CONTENT_FILE", default_value = "data/content.json")]
    pub content_file: PathBuf,

    /// Directory of static pages and assets
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Password for the in-page editor and for content writes
    #[arg(long, env = "EDIT_PASSWORD", hide_env_values = true)]
    pub edit_password: Option<String>,

    /// Turnstile secret; without it the bot check is skipped
    #[arg(long, env = "TURNSTILE_SECRET", hide_env_values = true)]
    pub turnstile_secret: Option<String>,

    /// Turnstile site key handed to the page
    #[arg(long, env = "TURNSTILE_SITE_KEY")]
    pub turnstile_site_key: Option<String>,

    /// Outbound mail account
    #[arg(long, env = "EMAIL_USER")]
    pub email_user: Option<String>,

    #[arg(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// SMTP relay host for the outbound account
    #[arg(long, env = "SMTP_RELAY", default_value = DEFAULT_RELAY)]
    pub smtp_relay: String,

    /// Domain accepted as a wave origin besides localhost
    #[arg(long, env = "PRODUCTION_DOMAIN")]
    pub production_domain: Option<String>,

    /// Accept content writes without the edit password. Insecure; demo sites only.
    #[arg(long, env = "INSECURE_OPEN_CONTENT_WRITES", default_value_t = false)]
    pub insecure_open_content_writes: bool,

    /// Timeout for the outbound bot verification call
    #[arg(long, env = "VERIFY_TIMEOUT_SECS", default_value_t = 10)]
    pub verify_timeout_secs: u64,
}

impl SiteConfig {
    pub fn mail_credentials(&self) -> Option<MailCredentials> {
        MailCredentials::from_parts(self.email_user.clone(), self.email_pass.clone())
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    pub fn turnstile_secret(&self) -> Option<&str> {
        self.turnstile_secret.as_deref().filter(|s| !s.is_empty())
    }
}
