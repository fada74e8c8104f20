//! Expense Event Logger
//!
//! Structured form events (selection, extraction, submission) emitted on the
//! `expense_events` target. Submitted expenses are only ever written here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::redact::{redact_json, redact_sensitive_data};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpenseEvent {
    ImageSelected {
        file_name: String,
        mime_type: String,
        bytes: usize,
    },
    ExtractionStarted {
        file_name: String,
    },
    ExtractionSucceeded {
        text: String,
        category: String,
        amount: String,
    },
    ExtractionFailed {
        stage: String,
        error_msg: String,
    },
    ExpenseSubmitted {
        expense: Value,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub form_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: ExpenseEvent,
}

pub struct ExpenseEventLogger;

impl ExpenseEventLogger {
    /// Build the redacted entry for an event.
    pub fn entry(form_id: &str, mut event: ExpenseEvent) -> EventLogEntry {
        match &mut event {
            ExpenseEvent::ExtractionSucceeded { text, .. } => {
                *text = redact_sensitive_data(text);
            }
            ExpenseEvent::ExtractionFailed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            ExpenseEvent::ExpenseSubmitted { expense } => redact_json(expense),
            ExpenseEvent::ImageSelected { .. } | ExpenseEvent::ExtractionStarted { .. } => {}
        }

        EventLogEntry {
            form_id: form_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Redact and emit an event as one JSON line.
    pub fn log_event(form_id: &str, event: ExpenseEvent) {
        let entry = Self::entry(form_id, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "expense_events", form_id = %entry.form_id, event = %json, "Expense event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn submitted_expense_is_redacted() {
        let entry = ExpenseEventLogger::entry(
            "form-1",
            ExpenseEvent::ExpenseSubmitted {
                expense: json!({ "text": "VISA 4111111111111111", "amount": "9.99" }),
            },
        );
        let ExpenseEvent::ExpenseSubmitted { expense } = &entry.event else {
            panic!("wrong event");
        };
        assert_eq!(expense["text"], "VISA [REDACTED_CARD]");
        assert_eq!(expense["amount"], "9.99");
    }

    #[test]
    fn entry_serializes_with_type_tag() {
        let entry = ExpenseEventLogger::entry(
            "form-1",
            ExpenseEvent::ExtractionFailed {
                stage: "ocr".into(),
                error_msg: "connection refused".into(),
            },
        );
        let v = serde_json::to_value(&entry).unwrap();
        assert_eq!(v["event"]["type"], "extraction_failed");
        assert_eq!(v["event"]["stage"], "ocr");
        assert_eq!(v["form_id"], "form-1");
    }
}
