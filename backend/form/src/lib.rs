//! The receipt-to-expense form.
//!
//! [`ExpenseForm`] owns the draft and the selected receipt, [`Extractor`]
//! chains the OCR and classification services, and [`validate_draft`] gates
//! submission.

pub mod extraction;
pub mod form;
pub mod validation;

pub use extraction::{merge, ExtractionReport, ExtractionResult, ExtractionTicket, Extractor};
pub use form::ExpenseForm;
pub use validation::validate_draft;
