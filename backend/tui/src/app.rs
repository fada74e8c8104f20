//! TUI App State
//!
//! Wraps the [`ExpenseForm`] with what only the terminal needs: focus, the
//! file-path prompt, the status line and a cached thumbnail.

use std::str::FromStr;

use receiptdesk_core::{Category, DraftField, FormError, ReceiptImage};
use receiptdesk_form::{ExpenseForm, ExtractionReport, ExtractionTicket};
use receiptdesk_media::{ascii_preview, is_previewable};

/// Fields reachable with Tab. Extracted text is display-only.
pub const FOCUS_ORDER: [DraftField; 5] = [
    DraftField::Amount,
    DraftField::Date,
    DraftField::Category,
    DraftField::Name,
    DraftField::Notes,
];

pub const THUMBNAIL_WIDTH: u16 = 36;
pub const THUMBNAIL_HEIGHT: u16 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

pub struct AppState {
    pub form: ExpenseForm,
    pub focus: DraftField,
    /// `Some` while the Ctrl-O path prompt is open.
    pub path_prompt: Option<String>,
    pub status: Option<StatusLine>,
    pub thumbnail: Vec<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(form: ExpenseForm) -> Self {
        Self {
            form,
            focus: FOCUS_ORDER[0],
            path_prompt: None,
            status: None,
            thumbnail: Vec::new(),
            should_quit: false,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind: StatusKind::Info,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine {
            kind: StatusKind::Error,
            text: text.into(),
        });
    }

    // -----------------------------------------------------------------------
    // Focus and editing
    // -----------------------------------------------------------------------

    pub fn focus_next(&mut self) {
        let idx = self.focus_index();
        self.focus = FOCUS_ORDER[(idx + 1) % FOCUS_ORDER.len()];
    }

    pub fn focus_prev(&mut self) {
        let idx = self.focus_index();
        self.focus = FOCUS_ORDER[(idx + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()];
    }

    fn focus_index(&self) -> usize {
        FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or(0)
    }

    /// Append a typed character to the focused field. The category is a
    /// selector and ignores free typing.
    pub fn type_char(&mut self, c: char) {
        if self.focus == DraftField::Category {
            return;
        }
        let mut value = self.form.draft().get(self.focus).to_string();
        value.push(c);
        self.form.update_field(self.focus, value);
    }

    pub fn backspace(&mut self) {
        if self.focus == DraftField::Category {
            self.form.update_field(DraftField::Category, "");
            return;
        }
        let mut value = self.form.draft().get(self.focus).to_string();
        if value.pop().is_some() {
            self.form.update_field(self.focus, value);
        }
    }

    /// Step the category selector. A blank or unrecognised value (such as a
    /// classifier's "Other") starts from either end of the option list.
    pub fn cycle_category(&mut self, forward: bool) {
        let next = match Category::from_str(&self.form.draft().category) {
            Ok(current) if forward => current.next(),
            Ok(current) => current.prev(),
            Err(_) if forward => Category::ALL[0],
            Err(_) => Category::ALL[Category::ALL.len() - 1],
        };
        self.form.update_field(DraftField::Category, next.as_str());
    }

    // -----------------------------------------------------------------------
    // Form actions
    // -----------------------------------------------------------------------

    pub fn select_image(&mut self, image: ReceiptImage) {
        let file_name = image.file_name.clone();
        let mime = image.mime_type.clone();
        let handle = self.form.select_image(image);

        self.thumbnail = if is_previewable(&mime) {
            ascii_preview(handle.bytes(), THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT).unwrap_or_default()
        } else {
            Vec::new()
        };
        self.info(format!("Selected {file_name}"));
    }

    /// Ask the form for an extraction ticket; refusals land on the status line.
    pub fn begin_extraction(&mut self) -> Option<ExtractionTicket> {
        match self.form.begin_extraction() {
            Ok(ticket) => {
                self.status = None;
                Some(ticket)
            }
            Err(e) => {
                self.error(e.to_string());
                None
            }
        }
    }

    pub fn apply_report(&mut self, report: ExtractionReport) {
        match self.form.complete_extraction(report) {
            Ok(()) => self.info("Receipt extracted. Review the fields and press Ctrl-S"),
            // The user already moved on to another file.
            Err(FormError::StaleExtraction) => self.info("Ignored result for a replaced image"),
            Err(e) => self.error(e.to_string()),
        }
    }

    pub fn submit(&mut self) {
        match self.form.submit() {
            Ok(expense) => self.info(format!(
                "Submitted {} {} {} on {}",
                expense.category.emoji(),
                expense.name,
                expense.amount,
                expense.date
            )),
            Err(e) => self.error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use receiptdesk_media::PreviewStore;

    fn state() -> AppState {
        AppState::new(ExpenseForm::new(PreviewStore::new()))
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut s = state();
        assert_eq!(s.focus, DraftField::Amount);
        s.focus_prev();
        assert_eq!(s.focus, DraftField::Notes);
        s.focus_next();
        s.focus_next();
        assert_eq!(s.focus, DraftField::Date);
    }

    #[test]
    fn typing_edits_only_focused_field() {
        let mut s = state();
        s.focus = DraftField::Name;
        for c in "Cafe".chars() {
            s.type_char(c);
        }
        s.backspace();
        assert_eq!(s.form.draft().name, "Caf");
        assert_eq!(s.form.draft().amount, "");
    }

    #[test]
    fn category_ignores_typing_and_cycles() {
        let mut s = state();
        s.focus = DraftField::Category;
        s.type_char('x');
        assert_eq!(s.form.draft().category, "");

        s.cycle_category(true);
        assert_eq!(s.form.draft().category, "Groceries");
        s.cycle_category(false);
        assert_eq!(s.form.draft().category, "Entertainment");

        s.form.update_field(DraftField::Category, "Other");
        s.cycle_category(true);
        assert_eq!(s.form.draft().category, "Groceries");
    }

    #[test]
    fn extraction_without_image_reports_on_status_line() {
        let mut s = state();
        assert!(s.begin_extraction().is_none());
        let status = s.status.unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Please upload an image first");
    }

    #[test]
    fn non_image_selection_has_no_thumbnail() {
        let mut s = state();
        s.select_image(ReceiptImage::new("notes.txt", "text/plain", &b"hello"[..]));
        assert!(s.thumbnail.is_empty());
        assert!(s.form.preview().is_some());
    }

    #[tokio::test]
    async fn failed_extraction_is_reported_and_keeps_draft() {
        use receiptdesk_form::Extractor;
        use receiptdesk_understanding::{MockClassifier, MockOcr};
        use std::sync::Arc;

        let mut s = state();
        s.select_image(ReceiptImage::new("r.png", "image/png", &b"png"[..]));
        s.form.update_field(DraftField::Notes, "lunch");
        let extractor = Extractor::new(
            Arc::new(MockOcr::failing("cannot identify image file")),
            Arc::new(MockClassifier::with_result(Default::default())),
        );

        let ticket = s.begin_extraction().unwrap();
        s.apply_report(extractor.run_ticket(ticket).await);

        let status = s.status.unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("OCR service"), "{}", status.text);
        assert!(!s.form.is_loading());
        assert_eq!(s.form.draft().notes, "lunch");
    }

    #[test]
    fn invalid_submit_lists_problems() {
        let mut s = state();
        s.form.update_field(DraftField::Amount, "12.50");
        s.submit();
        let status = s.status.unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("Merchant Name"));
    }
}
