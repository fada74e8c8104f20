use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use receiptdesk_core::ReceiptImage;
use tokio::fs;
use tracing::{info, warn};

use crate::mime_detect::{detect_mime_type, is_image};

/// Read a user-selected receipt file from disk.
///
/// The `image/*` restriction is only a hint: other files are accepted with a
/// warning and left for the services to reject.
pub async fn load_receipt_image(path: &Path) -> Result<ReceiptImage> {
    let data = fs::read(path)
        .await
        .with_context(|| format!("Failed to read receipt file: {}", path.display()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("receipt")
        .to_string();
    let mime_type = detect_mime_type(path);

    if !is_image(mime_type) {
        warn!(file = %file_name, mime = %mime_type, "Selected file does not look like an image");
    }
    info!(file = %file_name, mime = %mime_type, bytes = data.len(), "Loaded receipt file");

    Ok(ReceiptImage::new(file_name, mime_type, Bytes::from(data)))
}
