//! Environment handling for config values.
//!
//! Two passes run at load time:
//! - `${VAR_NAME}` references inside string values are substituted
//!   (uppercase `[A-Z_][A-Z0-9_]*` names only; `$${VAR}` is a literal `${VAR}`);
//! - `RECEIPTDESK_*` variables override individual settings.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use receiptdesk_core::MergePolicy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::schema::{FormConfig, LoggingConfig, ReceiptdeskConfig, ServicesConfig};

pub const OCR_URL_VAR: &str = "RECEIPTDESK_OCR_URL";
pub const CLASSIFIER_URL_VAR: &str = "RECEIPTDESK_CLASSIFIER_URL";
pub const MERGE_POLICY_VAR: &str = "RECEIPTDESK_MERGE_POLICY";
pub const LOG_LEVEL_VAR: &str = "RECEIPTDESK_LOG_LEVEL";

/// A reference, optionally preceded by the `$` escape.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config value tree. Unset or empty
/// variables are an error.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let out = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(out.into_owned())
}

/// Apply `RECEIPTDESK_*` overrides from `env`.
pub fn apply_env_overrides_with(
    mut config: ReceiptdeskConfig,
    env: &HashMap<String, String>,
) -> Result<ReceiptdeskConfig> {
    let set = |name: &str| env.get(name).filter(|v| !v.trim().is_empty()).cloned();

    if let Some(url) = set(OCR_URL_VAR) {
        debug!(var = OCR_URL_VAR, "Overriding OCR url from environment");
        let services = config.services.get_or_insert_with(ServicesConfig::default);
        services.ocr.get_or_insert_with(Default::default).url = Some(url);
    }
    if let Some(url) = set(CLASSIFIER_URL_VAR) {
        debug!(var = CLASSIFIER_URL_VAR, "Overriding classifier url from environment");
        let services = config.services.get_or_insert_with(ServicesConfig::default);
        services.classifier.get_or_insert_with(Default::default).url = Some(url);
    }
    if let Some(raw) = set(MERGE_POLICY_VAR) {
        let policy = MergePolicy::from_str(raw.trim())
            .map_err(|e| anyhow::anyhow!("{MERGE_POLICY_VAR}: {e}"))?;
        config.form.get_or_insert_with(FormConfig::default).merge_policy = Some(policy);
    }
    if let Some(level) = set(LOG_LEVEL_VAR) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_nested_var() {
        let v = json!({"services": {"ocr": {"url": "http://${OCR_HOST}/ocr/"}}});
        let result = resolve_env_vars_with(&v, &env(&[("OCR_HOST", "ocr.local:8000")])).unwrap();
        assert_eq!(result["services"]["ocr"]["url"], "http://ocr.local:8000/ocr/");
    }

    #[test]
    fn error_names_missing_var_and_path() {
        let v = json!({"logging": {"dir": "${LOG_ROOT}"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("LOG_ROOT"));
        assert!(err.contains("logging.dir"));
    }

    #[test]
    fn escaped_reference_stays_literal() {
        let v = json!({"k": "$${NOT_A_VAR} and ${REAL}"});
        let result = resolve_env_vars_with(&v, &env(&[("REAL", "x")])).unwrap();
        assert_eq!(result["k"], "${NOT_A_VAR} and x");
    }

    #[test]
    fn overrides_urls_policy_and_level() {
        let cfg = apply_env_overrides_with(
            ReceiptdeskConfig::default(),
            &env(&[
                (OCR_URL_VAR, "http://ocr:9000/ocr/"),
                (CLASSIFIER_URL_VAR, "http://cls:9001/classify"),
                (MERGE_POLICY_VAR, "fill-empty-only"),
                (LOG_LEVEL_VAR, "debug"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.ocr().url.as_deref(), Some("http://ocr:9000/ocr/"));
        assert_eq!(cfg.classifier().url.as_deref(), Some("http://cls:9001/classify"));
        assert_eq!(cfg.merge_policy(), MergePolicy::FillEmptyOnly);
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn blank_override_is_ignored() {
        let cfg = apply_env_overrides_with(ReceiptdeskConfig::default(), &env(&[(OCR_URL_VAR, " ")]))
            .unwrap();
        assert!(cfg.services.is_none());
    }

    #[test]
    fn bad_merge_policy_is_rejected() {
        let err = apply_env_overrides_with(
            ReceiptdeskConfig::default(),
            &env(&[(MERGE_POLICY_VAR, "sometimes")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains(MERGE_POLICY_VAR));
    }
}
