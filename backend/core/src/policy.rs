//! How an extraction result is merged into a draft the user may already
//! have edited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Merge policy applied when extraction results land in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergePolicy {
    /// Always trust the latest scan: every extracted field is overwritten,
    /// absent values become empty. Notes are preserved.
    FullOverwrite,
    /// Only fill fields that are currently blank. Extracted text is always
    /// replaced.
    FillEmptyOnly,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::FullOverwrite
    }
}

impl MergePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::FullOverwrite => "full-overwrite",
            MergePolicy::FillEmptyOnly => "fill-empty-only",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full-overwrite" => Ok(MergePolicy::FullOverwrite),
            "fill-empty-only" => Ok(MergePolicy::FillEmptyOnly),
            other => Err(format!(
                "unknown merge policy '{other}'. Use 'full-overwrite' or 'fill-empty-only'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_full_overwrite() {
        assert_eq!(MergePolicy::default(), MergePolicy::FullOverwrite);
    }

    #[test]
    fn parses_kebab_names() {
        assert_eq!(
            "fill-empty-only".parse::<MergePolicy>().unwrap(),
            MergePolicy::FillEmptyOnly
        );
        assert!("overwrite".parse::<MergePolicy>().is_err());
    }
}
