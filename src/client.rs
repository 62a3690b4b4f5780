#![cfg(feature = "web")]

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::app::EDIT_PASSWORD_HEADER;
use crate::content::{ContentDocument, PartialContent};
use crate::store::{ContentError, ContentSource};

/// Talks to a running site's `/api/content`
pub struct HttpContentClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContentClient {
    /// # Arguments
    /// * `base_url` - Site root, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str) -> Self {
        HttpContentClient {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/content", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn remote(e: reqwest::Error) -> ContentError {
    ContentError::Remote(e.to_string())
}

#[async_trait]
impl ContentSource for HttpContentClient {
    async fn fetch(&self) -> Result<PartialContent, ContentError> {
        let response = self.client.get(&self.endpoint).send().await.map_err(remote)?;
        if !response.status().is_success() {
            return Err(ContentError::Remote(format!(
                "GET {} returned {}",
                self.endpoint,
                response.status()
            )));
        }
        response.json().await.map_err(remote)
    }

    async fn publish(
        &self,
        doc: &ContentDocument,
        credential: Option<&str>,
    ) -> Result<(), ContentError> {
        let mut request = self.client.post(&self.endpoint).json(doc);
        if let Some(password) = credential {
            request = request.header(EDIT_PASSWORD_HEADER, password);
        }

        let response = request.send().await.map_err(remote)?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => Err(ContentError::Unauthorized),
            StatusCode::BAD_REQUEST => Err(ContentError::InvalidBody(
                response.text().await.unwrap_or_default(),
            )),
            status => Err(ContentError::Remote(format!(
                "POST {} returned {}",
                self.endpoint, status
            ))),
        }
    }
}
