//! Analysis configuration.
//!
//! Loaded from YAML (`.yaml` / `.yml`) or JSON (`.json`) by file extension.
//! Only scheduling and output options live here; metric thresholds and game
//! constants are fixed.

use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Runtime options for the analysis coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run the per-player analyzers on the rayon pool
    pub parallel: bool,
    /// Build order entries after this many seconds are dropped
    pub build_order_horizon_secs: f64,
    /// Also analyze AI / non-human slots in batch runs
    pub analyze_non_humans: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { parallel: true, build_order_horizon_secs: 480.0, analyze_non_humans: false }
    }
}

impl AnalysisConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        debug!(path = %path.display(), "loading analysis config");

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            other => Err(AnalysisError::InvalidConfig(format!(
                "unsupported config extension '{other}'"
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.build_order_horizon_secs.is_finite() || self.build_order_horizon_secs <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "build_order_horizon_secs must be positive, got {}",
                self.build_order_horizon_secs
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert!(config.parallel);
        assert_eq!(config.build_order_horizon_secs, 480.0);
        assert!(!config.analyze_non_humans);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = AnalysisConfig::from_yaml_str("parallel: false\n").unwrap();
        assert!(!config.parallel);
        assert_eq!(config.build_order_horizon_secs, 480.0);
    }

    #[test]
    fn test_rejects_non_positive_horizon() {
        let err = AnalysisConfig::from_json_str(r#"{"build_order_horizon_secs": 0}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("analysis.yml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "analyze_non_humans: true\nbuild_order_horizon_secs: 300").unwrap();
        let config = AnalysisConfig::load(&yaml_path).unwrap();
        assert!(config.analyze_non_humans);
        assert_eq!(config.build_order_horizon_secs, 300.0);

        let json_path = dir.path().join("analysis.json");
        fs::write(&json_path, r#"{"parallel": false}"#).unwrap();
        assert!(!AnalysisConfig::load(&json_path).unwrap().parallel);

        let toml_path = dir.path().join("analysis.toml");
        fs::write(&toml_path, "parallel = false").unwrap();
        assert!(matches!(
            AnalysisConfig::load(&toml_path),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnalysisConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
