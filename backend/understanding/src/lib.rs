//! Clients for the remote services that read a receipt: OCR first, then
//! classification of the transcribed text.

pub mod classify;
pub mod mock;
pub mod ocr;

pub use classify::{HttpClassifierClient, DEFAULT_CLASSIFIER_URL};
pub use mock::{MockClassifier, MockOcr};
pub use ocr::{HttpOcrClient, DEFAULT_FILE_FIELD, DEFAULT_OCR_URL};

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

/// Build the shared HTTP client. No timeout unless one is configured.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A URL on a port nothing listens on.
    pub async fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/")
    }
}
