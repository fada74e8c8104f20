//! `receiptdesk config`: inspect the resolved configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use receiptdesk_config::{validate, ReceiptdeskConfig};

use crate::terminal_output::{note_error, note_success, note_warn};

pub fn show(config: &ReceiptdeskConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to render config")?;
    print!("{yaml}");
    Ok(())
}

pub fn path(path: &Path) {
    println!("{}", path.display());
}

/// Print every finding; fail when there is at least one error.
pub fn check(path: &Path, config: &ReceiptdeskConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }
    if !report.is_valid() {
        bail!("{} has {} error(s)", path.display(), report.errors.len());
    }
    note_success(&format!("{} is valid", path.display()));
    Ok(())
}
