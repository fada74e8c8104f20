//! Extraction orchestrator: OCR, then classification of the OCR text, then a
//! merge into the draft under an explicit [`MergePolicy`].

use std::sync::Arc;

use receiptdesk_core::{
    Classification, ClassifierService, ExpenseDraft, ExtractionError, ExtractionStage,
    MergePolicy, OcrOutput, OcrService, ReceiptImage,
};
use tracing::{debug, info};

/// Both service responses from one successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    pub ocr: OcrOutput,
    pub classification: Classification,
}

/// Permission to run one extraction, issued by the form. Carries the image
/// so the run can proceed without borrowing the form.
#[derive(Debug, Clone)]
pub struct ExtractionTicket {
    pub(crate) generation: u64,
    pub(crate) image: ReceiptImage,
}

impl ExtractionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &ReceiptImage {
        &self.image
    }
}

/// Outcome of a ticketed run, handed back to the form.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub generation: u64,
    pub outcome: Result<ExtractionResult, ExtractionError>,
}

/// Runs the two service calls in order.
#[derive(Clone)]
pub struct Extractor {
    ocr: Arc<dyn OcrService>,
    classifier: Arc<dyn ClassifierService>,
}

impl Extractor {
    pub fn new(ocr: Arc<dyn OcrService>, classifier: Arc<dyn ClassifierService>) -> Self {
        Self { ocr, classifier }
    }

    /// OCR the image, then classify the transcription. The second call needs
    /// the first call's output, so they never overlap.
    pub async fn run(&self, image: &ReceiptImage) -> Result<ExtractionResult, ExtractionError> {
        debug!(ocr = self.ocr.name(), file = %image.file_name, "Starting OCR");
        let ocr = self
            .ocr
            .recognize(image)
            .await
            .map_err(|e| ExtractionError::from_anyhow(ExtractionStage::Ocr, &e))?;

        debug!(classifier = self.classifier.name(), chars = ocr.text.len(), "Classifying receipt text");
        let classification = self
            .classifier
            .classify(&ocr.text)
            .await
            .map_err(|e| ExtractionError::from_anyhow(ExtractionStage::Classification, &e))?;

        info!(
            category = classification.category.as_deref().unwrap_or(""),
            has_amount = classification.amount.is_some(),
            "Extraction finished"
        );
        Ok(ExtractionResult {
            ocr,
            classification,
        })
    }

    /// Run a ticket issued by [`crate::ExpenseForm::begin_extraction`].
    pub async fn run_ticket(&self, ticket: ExtractionTicket) -> ExtractionReport {
        let outcome = self.run(&ticket.image).await;
        ExtractionReport {
            generation: ticket.generation,
            outcome,
        }
    }
}

/// Merge an extraction result into `draft` and return the new draft.
pub fn merge(draft: &ExpenseDraft, result: &ExtractionResult, policy: MergePolicy) -> ExpenseDraft {
    let c = &result.classification;
    let extracted = ExpenseDraft {
        text: result.ocr.text.clone(),
        amount: c.amount_string(),
        category: c.category.clone().unwrap_or_default(),
        date: c.date.clone().unwrap_or_default(),
        name: c.merchant.clone().unwrap_or_default(),
        notes: draft.notes.clone(),
    };

    match policy {
        MergePolicy::FullOverwrite => extracted,
        MergePolicy::FillEmptyOnly => {
            let keep_or = |current: &str, new: String| {
                if current.trim().is_empty() {
                    new
                } else {
                    current.to_string()
                }
            };
            ExpenseDraft {
                text: extracted.text,
                amount: keep_or(&draft.amount, extracted.amount),
                category: keep_or(&draft.category, extracted.category),
                date: keep_or(&draft.date, extracted.date),
                name: keep_or(&draft.name, extracted.name),
                notes: draft.notes.clone(),
            }
        }
    }
}
