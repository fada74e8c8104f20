use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::image::ReceiptImage;

/// Text transcription returned by an OCR service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrOutput {
    pub text: String,
}

/// Structured fields a classification service derived from receipt text.
/// Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub merchant: Option<String>,
}

impl Classification {
    /// Amount rendered the way the form displays numbers: shortest
    /// round-trip form, no trailing `.0` (`12.5` → `"12.5"`, `12.0` → `"12"`),
    /// and exponent form outside `[1e-6, 1e21)` (`1e+21`, `1e-7`).
    /// Absent amount renders as an empty string.
    pub fn amount_string(&self) -> String {
        match self.amount {
            Some(amount) if amount.is_finite() => format_number(amount),
            _ => String::new(),
        }
    }
}

fn format_number(n: f64) -> String {
    // Also folds -0 into "0".
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{n}");
    }
    // `{:e}` is shortest round-trip too, but omits the `+` on positive exponents.
    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Trait for services that transcribe a receipt image to text.
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Service name used in logs (e.g., "http-ocr").
    fn name(&self) -> &str;

    async fn recognize(&self, image: &ReceiptImage) -> Result<OcrOutput>;
}

/// Trait for services that classify receipt text into expense fields.
#[async_trait]
pub trait ClassifierService: Send + Sync {
    fn name(&self) -> &str;

    async fn classify(&self, text: &str) -> Result<Classification>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_string_matches_form_display() {
        let mut c = Classification {
            amount: Some(12.5),
            ..Default::default()
        };
        assert_eq!(c.amount_string(), "12.5");
        c.amount = Some(12.0);
        assert_eq!(c.amount_string(), "12");
        c.amount = Some(0.0);
        assert_eq!(c.amount_string(), "0");
        c.amount = Some(-0.0);
        assert_eq!(c.amount_string(), "0");
        c.amount = Some(-4.25);
        assert_eq!(c.amount_string(), "-4.25");
        c.amount = Some(1e21);
        assert_eq!(c.amount_string(), "1e+21");
        c.amount = Some(-2.5e22);
        assert_eq!(c.amount_string(), "-2.5e+22");
        c.amount = Some(123456789012345680000.0);
        assert_eq!(c.amount_string(), "123456789012345680000");
        c.amount = Some(1e-7);
        assert_eq!(c.amount_string(), "1e-7");
        c.amount = Some(0.000001);
        assert_eq!(c.amount_string(), "0.000001");
        c.amount = Some(f64::NAN);
        assert_eq!(c.amount_string(), "");
        c.amount = None;
        assert_eq!(c.amount_string(), "");
    }

    #[test]
    fn classification_tolerates_missing_and_extra_fields() {
        let c: Classification = serde_json::from_str(
            r#"{"service":"classifier","category":"Groceries","confidence":0.4,"status":"success"}"#,
        )
        .unwrap();
        assert_eq!(c.category.as_deref(), Some("Groceries"));
        assert!(c.amount.is_none());
        assert!(c.merchant.is_none());
    }

    #[test]
    fn classification_accepts_null_amount() {
        let c: Classification = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert_eq!(c.amount_string(), "");
    }
}
