//! receiptdesk runtime configuration schema.
//!
//! Every field is optional on disk; [`crate::defaults::apply_all_defaults`]
//! fills in what the user left out.

use receiptdesk_core::MergePolicy;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration, read from `config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptdeskConfig {
    /// Endpoints of the external extraction services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<ServicesConfig>,

    /// Form behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<FormConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<OcrServiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierServiceConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Multipart field name carrying the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_field: Option<String>,
    /// Per-request timeout; unset means wait indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    /// How extraction results combine with what the user already typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_policy: Option<MergePolicy>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the daily NDJSON log file; unset disables file logging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl ReceiptdeskConfig {
    pub fn ocr(&self) -> OcrServiceConfig {
        self.services
            .as_ref()
            .and_then(|s| s.ocr.clone())
            .unwrap_or_default()
    }

    pub fn classifier(&self) -> ClassifierServiceConfig {
        self.services
            .as_ref()
            .and_then(|s| s.classifier.clone())
            .unwrap_or_default()
    }

    pub fn merge_policy(&self) -> MergePolicy {
        self.form
            .as_ref()
            .and_then(|f| f.merge_policy)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn log_dir(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
services:
  ocr:
    url: http://ocr.local/ocr/
    fileField: image
    timeoutSecs: 30
  classifier:
    url: http://cls.local/classify
form:
  mergePolicy: fill-empty-only
logging:
  level: debug
"#;
        let cfg: ReceiptdeskConfig = serde_yaml::from_str(yaml).unwrap();
        let ocr = cfg.ocr();
        assert_eq!(ocr.url.as_deref(), Some("http://ocr.local/ocr/"));
        assert_eq!(ocr.file_field.as_deref(), Some("image"));
        assert_eq!(ocr.timeout_secs, Some(30));
        assert_eq!(cfg.classifier().timeout_secs, None);
        assert_eq!(cfg.merge_policy(), MergePolicy::FillEmptyOnly);
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_dir(), None);
    }

    #[test]
    fn empty_sections_are_omitted_on_write() {
        let yaml = serde_yaml::to_string(&ReceiptdeskConfig::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
