use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draft::DraftField;

/// Which remote call an extraction failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    Ocr,
    Classification,
}

impl ExtractionStage {
    /// Stable name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStage::Ocr => "ocr",
            ExtractionStage::Classification => "classification",
        }
    }
}

impl fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStage::Ocr => f.write_str("OCR service"),
            ExtractionStage::Classification => f.write_str("classification service"),
        }
    }
}

/// A failed extraction, tagged with the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed: {message}")]
pub struct ExtractionError {
    pub stage: ExtractionStage,
    pub message: String,
}

impl ExtractionError {
    pub fn new(stage: ExtractionStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Build from an `anyhow` chain, keeping every context layer in the message.
    pub fn from_anyhow(stage: ExtractionStage, err: &anyhow::Error) -> Self {
        Self::new(stage, format!("{err:#}"))
    }
}

/// A single reason a draft cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    Missing(DraftField),

    #[error("amount '{0}' is not a number")]
    InvalidAmount(String),

    #[error("amount '{0}' has more than two decimal places")]
    AmountPrecision(String),

    #[error("date '{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("category '{0}' is not one of the available categories")]
    UnknownCategory(String),
}

impl ValidationError {
    /// The field this error is attached to.
    pub fn field(&self) -> DraftField {
        match self {
            ValidationError::Missing(field) => *field,
            ValidationError::InvalidAmount(_) | ValidationError::AmountPrecision(_) => {
                DraftField::Amount
            }
            ValidationError::InvalidDate(_) => DraftField::Date,
            ValidationError::UnknownCategory(_) => DraftField::Category,
        }
    }
}

/// Every validation failure found in one pass over a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_field(&self, field: DraftField) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors surfaced to the user by the expense form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please upload an image first")]
    NoImageSelected,

    #[error("Extraction already in progress")]
    ExtractionInFlight,

    #[error("Extraction result discarded: the selected image changed")]
    StaleExtraction,

    #[error("Failed to process image ({}): {}", .0.stage, .0.message)]
    Extraction(#[from] ExtractionError),

    #[error("Expense is incomplete: {0}")]
    Invalid(#[from] ValidationErrors),
}
