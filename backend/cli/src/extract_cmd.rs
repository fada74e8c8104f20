//! `receiptdesk extract`: one-shot select + extract, printing the draft.

use std::path::Path;

use anyhow::{Context, Result};
use receiptdesk_config::ReceiptdeskConfig;
use receiptdesk_core::{ExpenseDraft, MergePolicy};
use receiptdesk_form::ExpenseForm;
use receiptdesk_media::{is_image, load_receipt_image, PreviewStore};

use crate::services::build_extractor;
use crate::terminal_output::{note_success, note_warn, render_draft, supports_color};

pub async fn run(
    image: &Path,
    json: bool,
    merge_policy: Option<MergePolicy>,
    config: &ReceiptdeskConfig,
) -> Result<()> {
    let draft = extract(image, merge_policy, config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
    } else {
        note_success(&format!("Extracted {}", image.display()));
        print!("{}", render_draft(&draft, supports_color()));
        let missing = draft.missing_required();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            note_warn(&format!("Still needed before submitting: {}", names.join(", ")));
        }
    }
    Ok(())
}

pub async fn extract(
    image: &Path,
    merge_policy: Option<MergePolicy>,
    config: &ReceiptdeskConfig,
) -> Result<ExpenseDraft> {
    let extractor = build_extractor(config)?;

    let receipt = load_receipt_image(image).await?;
    if !is_image(&receipt.mime_type) {
        note_warn(&format!("{} does not look like an image", receipt.file_name));
    }
    let mut form = ExpenseForm::new(PreviewStore::new())
        .with_merge_policy(merge_policy.unwrap_or_else(|| config.merge_policy()));
    form.select_image(receipt);
    form.extract(&extractor)
        .await
        .with_context(|| format!("Could not extract {}", image.display()))?;

    Ok(form.draft().clone())
}
