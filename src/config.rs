//! TOML-based analysis configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::analysis::SortOrder;
use crate::schedule::ScenarioId;
use crate::synthetic::SyntheticConfig;

/// Top-level configuration parsed from TOML.
///
/// All sections are optional and fall back to [`AnalysisConfig::default`].
/// Command-line flags override individual fields after loading.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Where the schedule and simulation tables live.
    #[serde(default)]
    pub data: DataConfig,
    /// Which scenario to analyze and how to order the output.
    #[serde(default)]
    pub analysis: AnalysisSection,
    /// Output options.
    #[serde(default)]
    pub report: ReportConfig,
    /// Parameters of the demo dataset generator.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Dataset directory holding the CSV tables.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisSection {
    /// Scenario to analyze.
    pub scenario_id: ScenarioId,
    /// Row order of the summary table and CSV export.
    pub sort: SortOrder,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            scenario_id: 1,
            sort: SortOrder::Rotation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Write the summaries as CSV to this path.
    pub csv_out: Option<PathBuf>,
    /// Print one line per rotation before the aggregate report.
    pub show_table: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            csv_out: None,
            show_table: true,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(thiserror::Error, Debug)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"synthetic.rotations"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl AnalysisConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.data.dir.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "data.dir".into(),
                message: "must not be empty".into(),
            });
        }

        if self
            .report
            .csv_out
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            errors.push(ConfigError {
                field: "report.csv_out".into(),
                message: "must not be empty when set".into(),
            });
        }

        let syn = &self.synthetic;
        if syn.depots == 0 {
            errors.push(ConfigError {
                field: "synthetic.depots".into(),
                message: "must be > 0".into(),
            });
        }
        if syn.terminals < 2 {
            errors.push(ConfigError {
                field: "synthetic.terminals".into(),
                message: "must be >= 2".into(),
            });
        }
        if syn.min_passenger_trips > syn.max_passenger_trips {
            errors.push(ConfigError {
                field: "synthetic.min_passenger_trips".into(),
                message: "must be <= synthetic.max_passenger_trips".into(),
            });
        }
        if !(syn.min_route_km > 0.0 && syn.min_route_km <= syn.max_route_km) {
            errors.push(ConfigError {
                field: "synthetic.min_route_km".into(),
                message: "must be > 0 and <= synthetic.max_route_km".into(),
            });
        }
        if !(syn.min_soc_per_km >= 0.0 && syn.min_soc_per_km <= syn.max_soc_per_km) {
            errors.push(ConfigError {
                field: "synthetic.min_soc_per_km".into(),
                message: "must be >= 0 and <= synthetic.max_soc_per_km".into(),
            });
        }
        if syn.average_speed_kmh <= 0.0 {
            errors.push(ConfigError {
                field: "synthetic.average_speed_kmh".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let errors = AnalysisConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[data]
dir = "/srv/eflips/export"

[analysis]
scenario_id = 7
sort = "depot"

[report]
csv_out = "rotations.csv"
show_table = false

[synthetic]
depots = 2
terminals = 4
rotations = 10
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.analysis.scenario_id), Some(7));
        assert_eq!(cfg.as_ref().map(|c| c.analysis.sort), Some(SortOrder::Depot));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.report.csv_out.clone()),
            Some(PathBuf::from("rotations.csv"))
        );
        assert_eq!(cfg.as_ref().map(|c| c.synthetic.rotations), Some(10));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[analysis]
scenario_id = 1
database_url = "postgresql://localhost/eflips"
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_sort_order_rejected() {
        let toml = r#"
[analysis]
sort = "distance"
"#;
        assert!(AnalysisConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[analysis]
scenario_id = 3
"#;
        let cfg = AnalysisConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.analysis.scenario_id), Some(3));
        assert_eq!(cfg.as_ref().map(|c| c.analysis.sort), Some(SortOrder::Rotation));
        assert_eq!(
            cfg.as_ref().map(|c| c.data.dir.clone()),
            Some(PathBuf::from("data"))
        );
        assert_eq!(cfg.as_ref().map(|c| c.report.show_table), Some(true));
    }

    #[test]
    fn validation_catches_inverted_trip_range() {
        let mut cfg = AnalysisConfig::default();
        cfg.synthetic.min_passenger_trips = 9;
        cfg.synthetic.max_passenger_trips = 3;
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "synthetic.min_passenger_trips")
        );
    }

    #[test]
    fn validation_catches_empty_data_dir() {
        let mut cfg = AnalysisConfig::default();
        cfg.data.dir = PathBuf::new();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "data.dir"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = AnalysisConfig::from_toml_file(Path::new("/nonexistent/analysis.toml"))
            .unwrap_err();
        assert_eq!(err.field, "config");
        assert!(err.message.contains("/nonexistent/analysis.toml"));
    }
}
