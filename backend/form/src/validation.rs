//! Review-time checks standing in for the form's native input constraints:
//! required fields, a two-decimal amount, an ISO date, and a category from the
//! fixed option set.

use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use receiptdesk_core::{
    Category, DraftField, ExpenseDraft, SubmittedExpense, ValidationError, ValidationErrors,
};
use regex::Regex;
use rust_decimal::Decimal;

/// A number input's valid floating-point number: optional minus, digits with
/// an optional fraction (or a bare fraction), optional exponent.
static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?(?:\d+(?:\.\d+)?|\.\d+))(?:[eE]([+-]?\d+))?$").unwrap());

/// Beyond this no `Decimal` can hold the shifted value.
const MAX_EXPONENT: u32 = 28;

/// Validate a draft and, if every constraint holds, produce the typed record.
pub fn validate_draft(draft: &ExpenseDraft) -> Result<SubmittedExpense, ValidationErrors> {
    let mut errors: Vec<ValidationError> = draft
        .missing_required()
        .into_iter()
        .map(ValidationError::Missing)
        .collect();

    let amount = check_present(draft, DraftField::Amount, parse_amount, &mut errors);
    let date = check_present(draft, DraftField::Date, parse_date, &mut errors);
    let category = check_present(draft, DraftField::Category, parse_category, &mut errors);

    match (amount, date, category) {
        (Some(amount), Some(date), Some(category)) if errors.is_empty() => Ok(SubmittedExpense {
            text: draft.text.clone(),
            amount,
            category,
            date,
            name: draft.name.trim().to_string(),
            notes: draft.notes.clone(),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Run `parse` on a field only when it is filled in; blanks are already
/// reported as missing.
fn check_present<T>(
    draft: &ExpenseDraft,
    field: DraftField,
    parse: fn(&str) -> Result<T, ValidationError>,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    let raw = draft.get(field).trim();
    if raw.is_empty() {
        return None;
    }
    match parse(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(raw.to_string());
    // `Decimal::from_str` alone also takes `_` separators, a leading `+` and "12.".
    let caps = AMOUNT_PATTERN.captures(raw).ok_or_else(invalid)?;
    let mantissa = match caps[1].strip_prefix('-') {
        Some(rest) if rest.starts_with('.') => format!("-0{rest}"),
        _ if caps[1].starts_with('.') => format!("0{}", &caps[1]),
        _ => caps[1].to_string(),
    };
    let mut amount = Decimal::from_str(&mantissa).map_err(|_| invalid())?;

    if let Some(exp) = caps.get(2) {
        let exp: i32 = exp.as_str().parse().map_err(|_| invalid())?;
        if exp.unsigned_abs() > MAX_EXPONENT {
            return Err(invalid());
        }
        for _ in 0..exp.unsigned_abs() {
            amount = if exp > 0 {
                amount.checked_mul(Decimal::TEN)
            } else {
                amount.checked_div(Decimal::TEN)
            }
            .ok_or_else(invalid)?;
        }
    }

    if amount.normalize().scale() > 2 {
        return Err(ValidationError::AmountPrecision(raw.to_string()));
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    // chrono accepts single-digit months and days; the form's date input does not.
    if raw.len() != 10 {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn parse_category(raw: &str) -> Result<Category, ValidationError> {
    Category::from_str(raw).map_err(|_| ValidationError::UnknownCategory(raw.to_string()))
}
