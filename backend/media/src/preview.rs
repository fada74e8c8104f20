//! Preview handles for the selected receipt.
//!
//! A [`PreviewStore`] is the registry of locally renderable references to
//! selected files. Each [`PreviewHandle`] owns one entry and releases it when
//! dropped, so replacing a selection or tearing the form down never leaves
//! stale entries behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use receiptdesk_core::ReceiptImage;
use tracing::debug;
use uuid::Uuid;

const PREVIEW_SCHEME: &str = "preview:";

/// Shared registry of live previews.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    entries: Arc<Mutex<HashMap<Uuid, Bytes>>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the image's bytes and return the handle that owns them.
    pub fn allocate(&self, image: &ReceiptImage) -> PreviewHandle {
        let id = Uuid::new_v4();
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(id, image.data.clone());
        }
        debug!(preview = %id, file = %image.file_name, bytes = image.len(), "Allocated preview");
        PreviewHandle {
            id,
            mime_type: image.mime_type.clone(),
            data: image.data.clone(),
            store: self.clone(),
        }
    }

    /// Look up the bytes behind a `preview:<id>` URL, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        let id = url.strip_prefix(PREVIEW_SCHEME)?.parse::<Uuid>().ok()?;
        self.entries
            .lock()
            .ok()?
            .get(&id)
            .cloned()
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    fn release(&self, id: &Uuid) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.remove(id).is_some() {
                debug!(preview = %id, "Released preview");
            }
        }
    }
}

/// Owned reference to one preview entry. Dropping it releases the entry.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    mime_type: String,
    data: Bytes,
    store: PreviewStore,
}

impl PreviewHandle {
    /// Locally renderable reference, resolvable through the owning store.
    pub fn url(&self) -> String {
        format!("{PREVIEW_SCHEME}{}", self.id)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Self-contained `data:` URL for renderers that cannot reach the store.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.release(&self.id);
    }
}
