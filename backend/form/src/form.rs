//! The expense form component: one draft, one selected receipt with its
//! preview, and the single-flight extraction state machine.

use receiptdesk_core::{
    DraftField, ExpenseDraft, ExtractionState, FormError, MergePolicy, ReceiptImage,
    SubmittedExpense,
};
use receiptdesk_logging::{ExpenseEvent, ExpenseEventLogger};
use receiptdesk_media::{PreviewHandle, PreviewStore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::extraction::{merge, ExtractionReport, ExtractionTicket, Extractor};
use crate::validation::validate_draft;

pub struct ExpenseForm {
    id: Uuid,
    draft: ExpenseDraft,
    image: Option<ReceiptImage>,
    preview: Option<PreviewHandle>,
    previews: PreviewStore,
    state: ExtractionState,
    /// Bumped on every selection so results for a replaced image are dropped.
    generation: u64,
    merge_policy: MergePolicy,
}

impl ExpenseForm {
    pub fn new(previews: PreviewStore) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft: ExpenseDraft::default(),
            image: None,
            preview: None,
            previews,
            state: ExtractionState::Idle,
            generation: 0,
            merge_policy: MergePolicy::default(),
        }
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn image(&self) -> Option<&ReceiptImage> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> &ExtractionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    // -----------------------------------------------------------------------
    // Upload / preview
    // -----------------------------------------------------------------------

    /// Hold `image` for extraction and allocate its preview. The previous
    /// selection and its preview are released.
    pub fn select_image(&mut self, image: ReceiptImage) -> &PreviewHandle {
        ExpenseEventLogger::log_event(
            &self.id.to_string(),
            ExpenseEvent::ImageSelected {
                file_name: image.file_name.clone(),
                mime_type: image.mime_type.clone(),
                bytes: image.len(),
            },
        );
        // Release before allocating so the old handle never outlives its replacement.
        self.preview = None;
        self.generation += 1;
        let handle = self.previews.allocate(&image);
        self.image = Some(image);
        self.preview.insert(handle)
    }

    // -----------------------------------------------------------------------
    // Draft state
    // -----------------------------------------------------------------------

    /// Replace one field; the others are left exactly as they were.
    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Wholesale replacement, used only by extraction.
    fn replace_draft(&mut self, draft: ExpenseDraft) {
        self.draft = draft;
    }

    // -----------------------------------------------------------------------
    // Extraction
    // -----------------------------------------------------------------------

    /// Start an extraction. Fails without side effects when no image is
    /// selected or a run is already outstanding.
    pub fn begin_extraction(&mut self) -> Result<ExtractionTicket, FormError> {
        if !self.state.can_start() {
            return Err(FormError::ExtractionInFlight);
        }
        let Some(image) = self.image.clone() else {
            return Err(FormError::NoImageSelected);
        };

        ExpenseEventLogger::log_event(
            &self.id.to_string(),
            ExpenseEvent::ExtractionStarted {
                file_name: image.file_name.clone(),
            },
        );
        self.state = ExtractionState::Extracting;
        Ok(ExtractionTicket {
            generation: self.generation,
            image,
        })
    }

    /// Apply the outcome of a run started with [`Self::begin_extraction`].
    ///
    /// The loading state is cleared whatever the outcome. A failed run or a
    /// run for a replaced image leaves the draft untouched.
    pub fn complete_extraction(&mut self, report: ExtractionReport) -> Result<(), FormError> {
        if report.generation != self.generation {
            warn!(
                form = %self.id,
                stale = report.generation,
                current = self.generation,
                "Discarding extraction for a replaced image"
            );
            if self.state.is_loading() {
                self.state = ExtractionState::Idle;
            }
            return Err(FormError::StaleExtraction);
        }

        match report.outcome {
            Ok(result) => {
                let merged = merge(&self.draft, &result, self.merge_policy);
                ExpenseEventLogger::log_event(
                    &self.id.to_string(),
                    ExpenseEvent::ExtractionSucceeded {
                        text: merged.text.clone(),
                        category: merged.category.clone(),
                        amount: merged.amount.clone(),
                    },
                );
                self.replace_draft(merged);
                self.state = ExtractionState::Done;
                Ok(())
            }
            Err(err) => {
                warn!(form = %self.id, stage = %err.stage, error = %err.message, "Error processing image");
                ExpenseEventLogger::log_event(
                    &self.id.to_string(),
                    ExpenseEvent::ExtractionFailed {
                        stage: err.stage.as_str().to_string(),
                        error_msg: err.message.clone(),
                    },
                );
                self.state = ExtractionState::Failed(err.clone());
                Err(FormError::Extraction(err))
            }
        }
    }

    /// Begin, run and complete an extraction in one call.
    pub async fn extract(&mut self, extractor: &Extractor) -> Result<(), FormError> {
        let ticket = self.begin_extraction()?;
        let report = extractor.run_ticket(ticket).await;
        self.complete_extraction(report)
    }

    // -----------------------------------------------------------------------
    // Review / submit
    // -----------------------------------------------------------------------

    /// Validate the draft and, only if it passes, record the expense.
    /// The draft is kept as-is either way.
    pub fn submit(&self) -> Result<SubmittedExpense, FormError> {
        let expense = validate_draft(&self.draft)?;

        match serde_json::to_value(&expense) {
            Ok(json) => ExpenseEventLogger::log_event(
                &self.id.to_string(),
                ExpenseEvent::ExpenseSubmitted { expense: json },
            ),
            Err(e) => warn!(form = %self.id, error = %e, "Could not serialize submitted expense"),
        }
        info!(form = %self.id, category = %expense.category, amount = %expense.amount, "Submitting expense");
        Ok(expense)
    }
}
