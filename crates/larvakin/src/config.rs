//! Analysis configuration.

use std::path::Path;

use crate::endpoints::{EndpointConfig, HeadRule};
use crate::error::ConfigError;
use crate::kinematics::Calibration;
use crate::landmarks::SegmentProportions;
use crate::midline::MidlineConfig;

/// Every tunable of the engine, loaded once per session.
///
/// Missing JSON fields fall back to their defaults, so a config file only
/// needs the values it changes.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub endpoints: EndpointConfig,
    pub midline: MidlineConfig,
    /// Landmark fraction table.
    pub proportions: SegmentProportions,
    /// Pixel scale. Outputs stay in pixels when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,
}

impl AnalysisConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoints.validate().map_err(ConfigError::Invalid)?;
        self.midline.validate().map_err(ConfigError::Invalid)?;
        self.proportions
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("proportions: {e}")))?;
        if let Some(cal) = &self.calibration {
            cal.validate().map_err(ConfigError::Invalid)?;
        }
        Ok(())
    }

    pub fn with_head_rule(mut self, rule: HeadRule) -> Self {
        self.endpoints.head_rule = rule;
        self
    }

    pub fn with_proportions(mut self, proportions: SegmentProportions) -> Self {
        self.proportions = proportions;
        self
    }

    pub fn with_calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = Some(calibration);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AnalysisConfig::from_json_str(
            r#"{"endpoints": {"head_rule": "leftmost"}, "calibration": {"pixels_per_unit": 12.5}}"#,
        )
        .unwrap();
        assert_eq!(cfg.endpoints.head_rule, HeadRule::Leftmost);
        assert_relative_eq!(cfg.endpoints.snap_tolerance_px, 15.0);
        assert_eq!(cfg.midline.resample_count, 100);
        assert_relative_eq!(cfg.calibration.unwrap().pixels_per_unit, 12.5);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = AnalysisConfig::from_json_str(r#"{"proportions": {"t2": 0.01}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.starts_with("proportions")), "{err}");

        let err = AnalysisConfig::from_json_str(r#"{"calibration": {"pixels_per_unit": -1}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = AnalysisConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AnalysisConfig::from_json_file(Path::new("/nonexistent/larvakin.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn default_round_trips() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.validate().is_ok());
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let back = AnalysisConfig::from_json_str(&json).unwrap();
        assert_eq!(back.proportions, cfg.proportions);
        assert!(back.calibration.is_none());
    }
}
