//! `receiptdesk-config`: runtime configuration.
//!
//! Provides:
//! - Typed config schema (service endpoints, merge policy, logging)
//! - YAML read/write with atomic replace
//! - `${ENV_VAR}` substitution and `RECEIPTDESK_*` overrides
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides_with, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{
    ClassifierServiceConfig, FormConfig, LoggingConfig, OcrServiceConfig, ReceiptdeskConfig,
    ServicesConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file and run it through env substitution, env overrides
/// and defaults.
///
/// This is the main entry point for loading a config at runtime. It does not
/// validate: logging is usually configured from the result, so callers run
/// [`ensure_valid`] once a subscriber is installed.
pub async fn load_and_prepare(path: &Path) -> Result<ReceiptdeskConfig> {
    prepare_with(load_config(path).await?, &std::env::vars().collect())
}

/// The processing half of [`load_and_prepare`] with an explicit environment.
pub fn prepare_with(
    raw_config: ReceiptdeskConfig,
    env: &HashMap<String, String>,
) -> Result<ReceiptdeskConfig> {
    let value: Value =
        serde_json::to_value(&raw_config).context("Failed to serialize config for processing")?;

    let value =
        resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;

    let config: ReceiptdeskConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides_with(config, env)?;
    Ok(apply_all_defaults(config))
}

/// Validate, log every finding, and fail if any of them is an error.
pub fn ensure_valid(config: &ReceiptdeskConfig) -> Result<ValidationReport> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let details: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        bail!("Invalid configuration: {}", details.join("; "));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use receiptdesk_core::MergePolicy;

    #[tokio::test]
    async fn pipeline_substitutes_overrides_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(
            &path,
            "services:\n  ocr:\n    url: http://${OCR_HOST}/ocr/\nform:\n  mergePolicy: full-overwrite\n",
        )
        .unwrap();

        let env: HashMap<String, String> = [
            ("OCR_HOST", "localhost:9000"),
            ("RECEIPTDESK_MERGE_POLICY", "fill-empty-only"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = prepare_with(load_config(&path).await.unwrap(), &env).unwrap();

        assert_eq!(cfg.ocr().url.as_deref(), Some("http://localhost:9000/ocr/"));
        assert_eq!(cfg.ocr().file_field.as_deref(), Some("file"));
        assert_eq!(cfg.classifier().url.as_deref(), Some(defaults::DEFAULT_CLASSIFIER_URL));
        assert_eq!(cfg.merge_policy(), MergePolicy::FillEmptyOnly);
        assert_eq!(cfg.log_level(), "info");
    }

    #[test]
    fn env_override_beats_file_value() {
        let raw: ReceiptdeskConfig =
            serde_yaml::from_str("services:\n  ocr:\n    url: http://localhost:1/ocr/\n").unwrap();
        let env = HashMap::from([(
            env::OCR_URL_VAR.to_string(),
            "http://localhost:2/ocr/".to_string(),
        )]);
        let cfg = prepare_with(raw, &env).unwrap();
        assert_eq!(cfg.ocr().url.as_deref(), Some("http://localhost:2/ocr/"));
    }

    #[test]
    fn ensure_valid_rejects_errors_and_keeps_warnings() {
        let raw: ReceiptdeskConfig =
            serde_yaml::from_str("services:\n  ocr:\n    timeoutSecs: 0\n").unwrap();
        let cfg = prepare_with(raw, &HashMap::new()).unwrap();
        let err = ensure_valid(&cfg).unwrap_err().to_string();
        assert!(err.contains("services.ocr.timeoutSecs"), "{err}");

        let raw: ReceiptdeskConfig = serde_yaml::from_str(
            "services:\n  classifier:\n    url: http://classify.example.com/\n",
        )
        .unwrap();
        let cfg = prepare_with(raw, &HashMap::new()).unwrap();
        let report = ensure_valid(&cfg).unwrap();
        assert_eq!(report.warnings.len(), 1);
    }
}
