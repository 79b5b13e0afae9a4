//! Session configuration file (YAML or JSON).

use crate::error::{AppError, AppResult};
use dp_sweep::{
    DEFAULT_STEPS, GasFlowUnit, ParameterModel, PhaseMode, RawParameters, SweepSettings,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment-level settings plus the initial parameter text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Engineering tag shown as the plot title
    pub title: String,
    /// Number of log intervals; a sweep has `sweep_steps + 1` points
    pub sweep_steps: usize,
    pub gas_unit: GasFlowUnit,
    /// Phase mode a new session starts in
    pub phase: PhaseMode,
    pub defaults: RawParameters,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            sweep_steps: DEFAULT_STEPS,
            gas_unit: GasFlowUnit::default(),
            phase: PhaseMode::default(),
            defaults: RawParameters::default(),
        }
    }
}

impl AppConfig {
    pub fn settings(&self) -> AppResult<SweepSettings> {
        Ok(SweepSettings::new(self.sweep_steps, self.gas_unit)?)
    }

    pub fn parameters(&self) -> AppResult<ParameterModel> {
        Ok(ParameterModel::from_raw(&self.defaults, self.phase)?)
    }

    /// Check that a session can be built from this config.
    pub fn validate(&self) -> AppResult<()> {
        self.settings()?;
        self.parameters()?;
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> AppResult<Self> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load and validate a config; the parser is chosen by file extension.
pub fn load_config(path: &Path) -> AppResult<AppConfig> {
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = match format {
        Format::Yaml => serde_yaml::from_str(&content)?,
        Format::Json => serde_json::from_str(&content)?,
    };
    config.validate()?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> AppResult<()> {
    config.validate()?;
    let content = match format_of(path)? {
        Format::Yaml => serde_yaml::to_string(config)?,
        Format::Json => serde_json::to_string_pretty(config)?,
    };
    std::fs::write(path, content).map_err(|source| AppError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_sweep::{Field, InputError};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("dp-app-{}-{}", std::process::id(), name))
    }

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = AppConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.settings().unwrap().num_points(), 26);
        assert_eq!(config.parameters().unwrap().value(Field::PipeDiameter), 2.066141);
    }

    #[test]
    fn partial_yaml_overrides() {
        let yaml = r#"
title: FT-101
sweep_steps: 20
gas_unit: mscfh
phase: liquid
defaults:
  density: "62.4 lbm/ft3"
  meter_type: "Miller eccentric orifice"
  tap_position: "90 degree"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.title, "FT-101");
        assert_eq!(config.gas_unit, GasFlowUnit::Mscfh);
        assert_eq!(config.phase, PhaseMode::Liquid);
        assert_eq!(config.defaults.pipe_diameter, "2.066141");

        let params = config.parameters().unwrap();
        assert!((params.value(Field::Density) - 999.55).abs() < 0.1);
        assert!(params.selection().tap_position().is_some());
    }

    #[test]
    fn rejects_bad_steps_and_values() {
        assert!(matches!(
            AppConfig::from_yaml_str("sweep_steps: 0"),
            Err(AppError::Sweep(_))
        ));
        assert!(matches!(
            AppConfig::from_yaml_str("defaults:\n  dp_min: \"300\""),
            Err(AppError::Input(InputError::InvalidRange { .. }))
        ));
        assert!(matches!(
            AppConfig::from_yaml_str("phase: plasma"),
            Err(AppError::Yaml(_))
        ));
    }

    #[test]
    fn save_and_load_round_trip() {
        let config = AppConfig {
            title: "FT-202".into(),
            sweep_steps: 30,
            ..AppConfig::default()
        };
        for ext in ["yaml", "json"] {
            let path = temp_path(&format!("round-trip.{ext}"));
            save_config(&path, &config).unwrap();
            let loaded = load_config(&path).unwrap();
            assert_eq!(loaded, config);
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = temp_path("config.toml");
        assert!(matches!(
            load_config(&path),
            Err(AppError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_path("missing.yaml");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}
