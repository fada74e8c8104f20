//! Receipt classification: sends OCR text to a classifier endpoint and reads
//! back category, amount, date and merchant.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use receiptdesk_core::{Classification, ClassifierService};

/// Default classification endpoint.
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8001/classify";

/// Classification service reached over HTTP.
pub struct HttpClassifierClient {
    client: Client,
    url: String,
}

impl HttpClassifierClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpClassifierClient {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFIER_URL)
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[async_trait]
impl ClassifierService for HttpClassifierClient {
    fn name(&self) -> &str {
        "http-classifier"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        debug!(url = %self.url, chars = text.len(), "Sending receipt text to classifier");

        let response = self
            .client
            .post(&self.url)
            .json(&ClassifyRequest { text })
            .send()
            .await
            .context("Classifier HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Classifier returned {}: {}", status, error_body);
        }

        response
            .json::<Classification>()
            .await
            .context("Failed to parse classifier response")
    }
}
