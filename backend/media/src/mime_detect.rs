//! MIME type detection for receipt files.
//!
//! Used to label the multipart upload and to apply the `image/*` selection hint.

use std::path::Path;

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "bmp"          => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "heic"         => "image/heic",
        "avif"         => "image/avif",

        // Things people pick by mistake
        "pdf"          => "application/pdf",
        "txt"          => "text/plain",
        "csv"          => "text/csv",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image. This is the `image/*` picker hint.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether the terminal thumbnail renderer can decode this type.
pub fn is_previewable(mime: &str) -> bool {
    matches!(
        mime,
        "image/jpeg" | "image/png" | "image/gif" | "image/webp" | "image/bmp"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_jpeg_case_insensitive() {
        assert_eq!(detect_mime_type(&PathBuf::from("receipt.JPG")), "image/jpeg");
    }

    #[test]
    fn pdf_is_not_an_image() {
        let mime = detect_mime_type(&PathBuf::from("statement.pdf"));
        assert!(!is_image(mime));
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_mime_type(&PathBuf::from("scan")), "application/octet-stream");
    }

    #[test]
    fn heic_is_image_but_not_previewable() {
        assert!(is_image("image/heic"));
        assert!(!is_previewable("image/heic"));
    }
}
