use bytes::Bytes;

/// The raw receipt file picked by the user, exactly as it will be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl ReceiptImage {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
