//! Structured logging for receiptdesk.
//!
//! Handles subscriber setup, receipt-text redaction, and expense event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, ExpenseEvent, ExpenseEventLogger};
pub use logger::{init_logger, LogSettings};
pub use redact::{redact_json, redact_sensitive_data};
