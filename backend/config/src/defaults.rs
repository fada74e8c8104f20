//! Config defaults: fills in every setting the user left out.

use crate::schema::{
    ClassifierServiceConfig, FormConfig, LoggingConfig, OcrServiceConfig, ReceiptdeskConfig,
    ServicesConfig,
};

pub const DEFAULT_OCR_URL: &str = "http://localhost:8000/ocr/";
pub const DEFAULT_OCR_FILE_FIELD: &str = "file";
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8001/classify";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ReceiptdeskConfig) -> ReceiptdeskConfig {
    let config = apply_service_defaults(config);
    let config = apply_form_defaults(config);
    apply_logging_defaults(config)
}

/// Endpoint URLs and the multipart field. Timeouts stay unset.
fn apply_service_defaults(mut config: ReceiptdeskConfig) -> ReceiptdeskConfig {
    let services = config.services.get_or_insert_with(ServicesConfig::default);

    let ocr = services.ocr.get_or_insert_with(OcrServiceConfig::default);
    ocr.url.get_or_insert_with(|| DEFAULT_OCR_URL.to_string());
    ocr.file_field
        .get_or_insert_with(|| DEFAULT_OCR_FILE_FIELD.to_string());

    let classifier = services
        .classifier
        .get_or_insert_with(ClassifierServiceConfig::default);
    classifier
        .url
        .get_or_insert_with(|| DEFAULT_CLASSIFIER_URL.to_string());

    config
}

fn apply_form_defaults(mut config: ReceiptdeskConfig) -> ReceiptdeskConfig {
    let form = config.form.get_or_insert_with(FormConfig::default);
    form.merge_policy.get_or_insert_with(Default::default);
    config
}

fn apply_logging_defaults(mut config: ReceiptdeskConfig) -> ReceiptdeskConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use receiptdesk_core::MergePolicy;

    #[test]
    fn fills_service_endpoints() {
        let cfg = apply_all_defaults(ReceiptdeskConfig::default());
        let ocr = cfg.ocr();
        assert_eq!(ocr.url.as_deref(), Some(DEFAULT_OCR_URL));
        assert_eq!(ocr.file_field.as_deref(), Some("file"));
        assert_eq!(ocr.timeout_secs, None);
        assert_eq!(cfg.classifier().url.as_deref(), Some(DEFAULT_CLASSIFIER_URL));
        assert_eq!(cfg.form.unwrap().merge_policy, Some(MergePolicy::FullOverwrite));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = ReceiptdeskConfig::default();
        cfg.services = Some(ServicesConfig {
            ocr: Some(OcrServiceConfig {
                url: Some("https://ocr.example.com/ocr/".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        cfg.logging = Some(LoggingConfig {
            level: Some("warn".into()),
            dir: None,
        });

        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.ocr().url.as_deref(), Some("https://ocr.example.com/ocr/"));
        assert_eq!(cfg.ocr().file_field.as_deref(), Some("file"));
        assert_eq!(cfg.log_level(), "warn");
    }
}
