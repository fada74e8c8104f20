//! Config validation with user-friendly messages.

use crate::schema::ReceiptdeskConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Everything found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &ReceiptdeskConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_services(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_services(config: &ReceiptdeskConfig, report: &mut ValidationReport) {
    let Some(services) = &config.services else { return };

    if let Some(ocr) = &services.ocr {
        if let Some(url) = &ocr.url {
            check_url("services.ocr.url", url, report);
        }
        if let Some(field) = &ocr.file_field {
            if field.trim().is_empty() {
                report.error("services.ocr.fileField", "fileField cannot be empty");
            }
        }
        check_timeout("services.ocr.timeoutSecs", ocr.timeout_secs, report);
    }

    if let Some(classifier) = &services.classifier {
        if let Some(url) = &classifier.url {
            check_url("services.classifier.url", url, report);
        }
        check_timeout("services.classifier.timeoutSecs", classifier.timeout_secs, report);
    }
}

fn validate_logging(config: &ReceiptdeskConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !matches!(
            level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            report.warn(
                "logging.level",
                format!("Unknown level '{level}'; it will be read as an env-filter directive"),
            );
        }
    }
}

fn check_url(path: &str, url: &str, report: &mut ValidationReport) {
    let url = url.trim();
    if url.is_empty() {
        report.error(path, "URL cannot be empty");
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        report.error(path, format!("'{url}' must start with http:// or https://"));
    } else if url.starts_with("http://") && !is_local(url) {
        report.warn(path, "Receipts will be sent over plain HTTP to a non-local host");
    }
}

fn is_local(url: &str) -> bool {
    let rest = url.trim_start_matches("http://");
    ["localhost", "127.0.0.1", "[::1]"].iter().any(|host| {
        rest.strip_prefix(*host)
            .is_some_and(|tail| tail.is_empty() || tail.starts_with([':', '/']))
    })
}

fn check_timeout(path: &str, timeout: Option<u64>, report: &mut ValidationReport) {
    if timeout == Some(0) {
        report.error(path, "timeoutSecs must be > 0 (omit it to wait indefinitely)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{OcrServiceConfig, ServicesConfig};

    fn with_ocr(ocr: OcrServiceConfig) -> ReceiptdeskConfig {
        ReceiptdeskConfig {
            services: Some(ServicesConfig {
                ocr: Some(ocr),
                classifier: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        let report = validate(&apply_all_defaults(ReceiptdeskConfig::default()));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn non_http_url_is_error() {
        let report = validate(&with_ocr(OcrServiceConfig {
            url: Some("ftp://ocr.local/".into()),
            ..Default::default()
        }));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "services.ocr.url");
    }

    #[test]
    fn empty_file_field_and_zero_timeout_are_errors() {
        let report = validate(&with_ocr(OcrServiceConfig {
            url: None,
            file_field: Some(" ".into()),
            timeout_secs: Some(0),
        }));
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["services.ocr.fileField", "services.ocr.timeoutSecs"]);
    }

    #[test]
    fn plain_http_to_remote_host_warns() {
        let report = validate(&with_ocr(OcrServiceConfig {
            url: Some("http://ocr.example.com/ocr/".into()),
            ..Default::default()
        }));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
