use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use receiptdesk_core::{Classification, ClassifierService, OcrOutput, OcrService, ReceiptImage};

/// An OCR service that returns a canned transcription.
pub struct MockOcr {
    response: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockOcr {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrService for MockOcr {
    fn name(&self) -> &str {
        "mock-ocr"
    }

    async fn recognize(&self, _image: &ReceiptImage) -> Result<OcrOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.response {
            Ok(text) => Ok(OcrOutput { text: text.clone() }),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}

/// A classifier that returns a canned result and records the text it saw.
pub struct MockClassifier {
    response: Result<Classification, String>,
    seen: Mutex<Vec<String>>,
}

impl MockClassifier {
    pub fn with_result(classification: Classification) -> Self {
        Self {
            response: Ok(classification),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Texts received so far, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ClassifierService for MockClassifier {
    fn name(&self) -> &str {
        "mock-classifier"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }
        match &self.response {
            Ok(c) => Ok(c.clone()),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}
