use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Tag names that never take a closing tag, as MediaWiki permits them.
pub const DEFAULT_VOID_TAGS: &[&str] = &["br", "wbr", "hr", "img"];

/// Bounds and tag rules shared by all matchers.
///
/// Deserializes from a partial camelCase object; missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    /// Lines examined on each side of the starting line, the starting
    /// line included.
    pub max_scan_lines: usize,
    /// Lines longer than this many chars are skipped unscanned.
    pub max_line_length: usize,
    pub void_tags: Vec<String>,
    /// Compare tag names case-insensitively.
    pub ignore_case: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_scan_lines: 1000,
            max_line_length: 10_000,
            void_tags: DEFAULT_VOID_TAGS.iter().map(|tag| tag.to_string()).collect(),
            ignore_case: true,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_scan_lines == 0 {
            return Err(ConfigError {
                message: "maxScanLines must be at least 1".into(),
            });
        }
        if self.max_line_length == 0 {
            return Err(ConfigError {
                message: "maxLineLength must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The form a tag name is compared in.
    pub fn normalize_name(&self, name: &str) -> String {
        if self.ignore_case {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Whether an already normalized tag name is a void tag.
    pub fn is_void(&self, name: &str) -> bool {
        self.void_tags
            .iter()
            .any(|tag| tag == name || (self.ignore_case && tag.eq_ignore_ascii_case(name)))
    }
}
