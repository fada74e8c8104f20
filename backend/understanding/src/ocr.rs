//! Optical Character Recognition (OCR)
//!
//! Uploads the receipt image to an OCR endpoint as multipart form data and
//! reads back the plain-text transcription.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use receiptdesk_core::{OcrOutput, OcrService, ReceiptImage};

/// Default OCR endpoint.
pub const DEFAULT_OCR_URL: &str = "http://localhost:8000/ocr/";

/// Default multipart field carrying the image bytes.
pub const DEFAULT_FILE_FIELD: &str = "file";

/// OCR service reached over HTTP.
pub struct HttpOcrClient {
    client: Client,
    url: String,
    file_field: String,
}

impl HttpOcrClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            file_field: DEFAULT_FILE_FIELD.to_string(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_file_field(mut self, field: impl Into<String>) -> Self {
        self.file_field = field.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpOcrClient {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_URL)
    }
}

/// The reference service answers failures with HTTP 200 and an `error` key.
#[derive(Deserialize)]
struct OcrResponseBody {
    text: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl OcrService for HttpOcrClient {
    fn name(&self) -> &str {
        "http-ocr"
    }

    async fn recognize(&self, image: &ReceiptImage) -> Result<OcrOutput> {
        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .with_context(|| format!("Invalid MIME type '{}'", image.mime_type))?;
        let form = Form::new().part(self.file_field.clone(), part);

        debug!(url = %self.url, file = %image.file_name, bytes = image.len(), "Sending receipt to OCR service");

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .context("OCR HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("OCR service returned {}: {}", status, error_body);
        }

        let body: OcrResponseBody = response
            .json()
            .await
            .context("Failed to parse OCR response")?;

        match (body.text, body.error) {
            (Some(text), _) => Ok(OcrOutput { text }),
            (None, Some(error)) => bail!("OCR service reported an error: {error}"),
            (None, None) => bail!("OCR response has no text field"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, serve};
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn echo_ocr(mut multipart: Multipart) -> Json<Value> {
        while let Some(field) = multipart.next_field().await.unwrap() {
            if field.name() == Some("file") {
                let name = field.file_name().unwrap_or_default().to_string();
                let mime = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.unwrap();
                return Json(json!({
                    "filename": name,
                    "text": format!("{name}|{mime}|{}", String::from_utf8_lossy(&data)),
                }));
            }
        }
        Json(json!({ "error": "no file field" }))
    }

    fn receipt() -> ReceiptImage {
        ReceiptImage::new("r.png", "image/png", &b"PIXELS"[..])
    }

    #[tokio::test]
    async fn uploads_file_field_and_reads_text() {
        let base = serve(Router::new().route("/ocr/", post(echo_ocr))).await;
        let client = HttpOcrClient::new(format!("{base}/ocr/"));

        let out = client.recognize(&receipt()).await.unwrap();
        assert_eq!(out.text, "r.png|image/png|PIXELS");
    }

    #[tokio::test]
    async fn custom_file_field_is_used() {
        let base = serve(Router::new().route("/ocr/", post(echo_ocr))).await;
        let client = HttpOcrClient::new(format!("{base}/ocr/")).with_file_field("image");

        let err = client.recognize(&receipt()).await.unwrap_err();
        assert!(err.to_string().contains("no file field"));
    }

    #[tokio::test]
    async fn error_body_with_ok_status_fails() {
        let router = Router::new().route(
            "/ocr/",
            post(|| async { Json(json!({ "error": "cannot identify image file" })) }),
        );
        let base = serve(router).await;
        let err = HttpOcrClient::new(format!("{base}/ocr/"))
            .recognize(&receipt())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot identify image file"));
    }

    #[tokio::test]
    async fn non_success_status_fails() {
        let router = Router::new().route(
            "/ocr/",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "tesseract crashed") }),
        );
        let base = serve(router).await;
        let err = HttpOcrClient::new(format!("{base}/ocr/"))
            .recognize(&receipt())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500"), "{msg}");
        assert!(msg.contains("tesseract crashed"), "{msg}");
    }

    #[tokio::test]
    async fn unreachable_service_fails() {
        let err = HttpOcrClient::new(dead_url().await)
            .recognize(&receipt())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("OCR HTTP request failed"));
    }
}
