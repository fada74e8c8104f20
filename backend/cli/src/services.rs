//! Wires configured endpoints into an [`Extractor`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use receiptdesk_config::{ensure_valid, ReceiptdeskConfig};
use receiptdesk_form::Extractor;
use receiptdesk_understanding::{
    build_http_client, HttpClassifierClient, HttpOcrClient, DEFAULT_CLASSIFIER_URL,
    DEFAULT_FILE_FIELD, DEFAULT_OCR_URL,
};
use tracing::debug;

/// Refuses an invalid config, so a zero timeout never reaches a client.
pub fn build_extractor(config: &ReceiptdeskConfig) -> Result<Extractor> {
    ensure_valid(config)?;

    let ocr_cfg = config.ocr();
    let ocr = HttpOcrClient::new(ocr_cfg.url.as_deref().unwrap_or(DEFAULT_OCR_URL))
        .with_client(build_http_client(ocr_cfg.timeout_secs.map(Duration::from_secs))?)
        .with_file_field(ocr_cfg.file_field.as_deref().unwrap_or(DEFAULT_FILE_FIELD));

    let cls_cfg = config.classifier();
    let classifier =
        HttpClassifierClient::new(cls_cfg.url.as_deref().unwrap_or(DEFAULT_CLASSIFIER_URL))
            .with_client(build_http_client(cls_cfg.timeout_secs.map(Duration::from_secs))?);

    debug!(ocr = ocr.url(), classifier = classifier.url(), "Configured extraction services");
    Ok(Extractor::new(Arc::new(ocr), Arc::new(classifier)))
}
