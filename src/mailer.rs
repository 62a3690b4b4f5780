#![cfg(feature = "web")]

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::wave::WaveError;

/// Default SMTP relay for the outbound account
pub const DEFAULT_RELAY: &str = "smtp.gmail.com";

/// Delivers the "someone waved" notification
#[async_trait]
pub trait WaveNotifier: Send + Sync {
    async fn notify(&self, visitor_email: &str) -> Result<(), WaveError>;
}

/// Login for the outbound mail account
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub user: String,
    pub pass: String,
}

impl MailCredentials {
    /// Both halves must be present and non-empty
    pub fn from_parts(user: Option<String>, pass: Option<String>) -> Option<Self> {
        match (user, pass) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some(MailCredentials { user, pass })
            }
            _ => None,
        }
    }
}

/// Sends wave notifications to the site owner over SMTP
///
/// The sender is always the owner's own account. The visitor's address only
/// ever appears as `Reply-To`, after it has been parsed as a mailbox.
pub struct SmtpNotifier {
    relay: String,
    credentials: MailCredentials,
}

impl SmtpNotifier {
    pub fn new(relay: impl Into<String>, credentials: MailCredentials) -> Self {
        SmtpNotifier {
            relay: relay.into(),
            credentials,
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, WaveError> {
        let creds = Credentials::new(
            self.credentials.user.clone(),
            self.credentials.pass.clone(),
        );

        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay)
            .map_err(|e| WaveError::Transport(e.to_string()))?
            .credentials(creds)
            .build())
    }

    /// Build the notification message without sending it
    pub fn build_message(&self, visitor_email: &str) -> Result<Message, WaveError> {
        let owner: Mailbox = format!("Portfolio <{}>", self.credentials.user)
            .parse()
            .map_err(|e: lettre::address::AddressError| WaveError::Transport(e.to_string()))?;
        let to: Mailbox = self
            .credentials
            .user
            .parse()
            .map_err(|e: lettre::address::AddressError| WaveError::Transport(e.to_string()))?;
        let visitor: Address = visitor_email.parse().map_err(|_| WaveError::InvalidEmail)?;
        let reply_to = Mailbox::new(None, visitor);

        let received = chrono::Utc::now().to_rfc2822();
        let text = format!(
            "From: {}\n\nSomeone sent you a wave! 👋\n\nReceived {}",
            visitor_email, received
        );
        let html = format!(
            "<p><b>From:</b> {}</p><p>Someone sent you a wave! 👋</p><p><small>Received {}</small></p>",
            escape_html(visitor_email),
            received
        );

        Message::builder()
            .from(owner)
            .to(to)
            .reply_to(reply_to)
            .subject("👋 New wave")
            .multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(text))
                    .singlepart(SinglePart::html(html)),
            )
            .map_err(|e| WaveError::Transport(e.to_string()))
    }
}

#[async_trait]
impl WaveNotifier for SmtpNotifier {
    async fn notify(&self, visitor_email: &str) -> Result<(), WaveError> {
        let message = self.build_message(visitor_email)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| WaveError::Transport(e.to_string()))?;

        log::info!("Wave notification sent for {}", visitor_email);
        Ok(())
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
