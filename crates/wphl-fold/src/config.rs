use serde::{Deserialize, Serialize};
use wphl_matcher::{ConfigError, MatchConfig};

/// Folding behaviour: matcher bounds plus tooltip timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FoldConfig {
    #[serde(flatten)]
    pub matching: MatchConfig,
    /// Delay before the tooltip hides once nothing is foldable.
    pub hide_delay_ms: u64,
    /// How long a tooltip stays up without cursor activity.
    pub tooltip_timeout_ms: u64,
    /// Text shown in place of a folded range.
    pub placeholder: String,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            matching: MatchConfig::default(),
            hide_delay_ms: 500,
            tooltip_timeout_ms: 5000,
            placeholder: "\u{22ef}".into(),
        }
    }
}

impl FoldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()?;
        if self.tooltip_timeout_ms == 0 {
            return Err(ConfigError {
                message: "tooltipTimeoutMs must be at least 1".into(),
            });
        }
        if self.placeholder.is_empty() {
            return Err(ConfigError {
                message: "placeholder must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = FoldConfig::default();
        assert_eq!(config.placeholder, "⋯");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_flattened() {
        let config: FoldConfig =
            serde_json::from_str(r#"{"maxScanLines": 20, "hideDelayMs": 100}"#).unwrap();
        assert_eq!(config.matching.max_scan_lines, 20);
        assert_eq!(config.hide_delay_ms, 100);
        assert_eq!(config.tooltip_timeout_ms, 5000);
    }

    #[test]
    fn test_validate() {
        let config = FoldConfig {
            placeholder: String::new(),
            ..FoldConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = FoldConfig::default();
        config.matching.max_scan_lines = 0;
        assert!(config.validate().is_err());
    }
}
