pub mod draft;
pub mod error;
pub mod image;
pub mod policy;
pub mod state;
pub mod traits;

pub use draft::{Category, DraftField, ExpenseDraft, SubmittedExpense};
pub use error::{
    ExtractionError, ExtractionStage, FormError, ValidationError, ValidationErrors,
};
pub use image::ReceiptImage;
pub use policy::MergePolicy;
pub use state::ExtractionState;
pub use traits::{Classification, ClassifierService, OcrOutput, OcrService};
