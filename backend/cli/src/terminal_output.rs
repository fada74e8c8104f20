//! Terminal output helpers: ANSI notes and the field table printed by
//! `receiptdesk extract`.

use receiptdesk_core::{DraftField, ExpenseDraft};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

/// Warnings go to stderr so `--json` output stays parseable.
pub fn note_warn(msg: &str) {
    if supports_color() {
        eprintln!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        eprintln!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Draft table
// ---------------------------------------------------------------------------

/// Two-column table of a draft. Required fields are starred, blank ones
/// dimmed, and multi-line text is indented under its label.
pub fn render_draft(draft: &ExpenseDraft, color: bool) -> String {
    let labels: Vec<String> = DraftField::ALL
        .iter()
        .map(|f| {
            if f.is_required() {
                format!("{}*", f.label())
            } else {
                f.label().to_string()
            }
        })
        .collect();
    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (field, label) in DraftField::ALL.iter().zip(&labels) {
        let value = draft.get(*field);
        let shown = match (value.is_empty(), color) {
            (true, true) => format!("{DIM}(empty){RESET}"),
            (true, false) => "(empty)".to_string(),
            (false, _) => value.replace('\n', &format!("\n  {}", " ".repeat(width + 2))),
        };
        let label = if color {
            format!("{BOLD}{label:<width$}{RESET}")
        } else {
            format!("{label:<width$}")
        };
        out.push_str(&format!("  {label}  {shown}\n"));
    }
    out
}
