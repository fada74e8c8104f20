//! Log Redaction Layer
//!
//! Scrubs card numbers and phone numbers from receipt text prior to logging.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d[ -]?){12,18}\d\b").unwrap());
static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Cards first: a 16-digit run would otherwise be half-eaten by the phone pattern.
    let redacted = CARD_RE.replace_all(input, "[REDACTED_CARD]");
    TELEPHONE_RE
        .replace_all(&redacted, "[REDACTED_PHONE]")
        .to_string()
}

/// Redacts every string leaf of a JSON value in place.
pub fn redact_json(value: &mut Value) {
    match value {
        Value::String(s) => *s = redact_sensitive_data(s),
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        Value::Object(map) => map.values_mut().for_each(redact_json),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redaction() {
        let raw = "CARD 4111 1111 1111 1111 call (555) 123-4567 TOTAL 12.50";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("4111 1111 1111 1111"));
        assert!(!clean.contains("123-4567"));
        assert!(clean.contains("TOTAL 12.50"));
    }

    #[test]
    fn leaves_amounts_and_dates_alone() {
        let raw = "2024-01-01 Subtotal 1234.56";
        assert_eq!(redact_sensitive_data(raw), raw);
    }

    #[test]
    fn redacts_nested_json_strings() {
        let mut v = json!({ "text": "tel 555-123-4567", "amount": "12.5", "n": 3 });
        redact_json(&mut v);
        assert_eq!(v["text"], "tel [REDACTED_PHONE]");
        assert_eq!(v["amount"], "12.5");
        assert_eq!(v["n"], 3);
    }
}
