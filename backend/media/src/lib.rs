//! Receipt selection and local previews.

pub mod selection;
pub mod mime_detect;
pub mod preview;
pub mod thumbnail;

pub use selection::load_receipt_image;
pub use mime_detect::{detect_mime_type, is_image, is_previewable};
pub use preview::{PreviewHandle, PreviewStore};
pub use thumbnail::ascii_preview;
