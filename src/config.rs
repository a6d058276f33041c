//! Workflow tunables.
//!
//! Defaults match the reservoir workflow: a 0.1 ft extrapolation grid and
//! discharge rounded to hundredths. Values can come from a TOML file or from
//! the environment (a `.env` file is honoured).

use std::path::Path;

use serde::Deserialize;

use crate::error::CurveError;

const ENV_STEP: &str = "RATING_EXTRAPOLATION_STEP";
const ENV_DECIMALS: &str = "RATING_DISCHARGE_DECIMALS";

/// Most decimal places an `f64` discharge can meaningfully carry.
pub const MAX_DISCHARGE_DECIMALS: u32 = 15;

/// Settings for the storage-discharge workflow.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Grid step used when extending the elevation-storage tail.
    #[serde(default = "default_extrapolation_step")]
    pub extrapolation_step: f64,

    /// Decimal places kept on derived discharge values.
    #[serde(default = "default_discharge_decimals")]
    pub discharge_decimals: u32,

    /// Column label for storage in exported curves.
    #[serde(default = "default_storage_label")]
    pub storage_label: String,

    /// Column label for discharge in exported curves.
    #[serde(default = "default_discharge_label")]
    pub discharge_label: String,
}

fn default_extrapolation_step() -> f64 {
    0.1
}
fn default_discharge_decimals() -> u32 {
    2
}
fn default_storage_label() -> String {
    "Storage (ac-ft)".to_string()
}
fn default_discharge_label() -> String {
    "Q (CFS)".to_string()
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            extrapolation_step: default_extrapolation_step(),
            discharge_decimals: default_discharge_decimals(),
            storage_label: default_storage_label(),
            discharge_label: default_discharge_label(),
        }
    }
}

impl WorkflowConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, CurveError> {
        let config: Self =
            toml::from_str(s).map_err(|e| CurveError::config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, CurveError> {
        let s = std::fs::read_to_string(path).map_err(|e| CurveError::io(path, e))?;
        Self::from_toml_str(&s)
    }

    /// Defaults overridden by `RATING_EXTRAPOLATION_STEP` and
    /// `RATING_DISCHARGE_DECIMALS` (read from `.env` if present).
    pub fn from_env() -> Result<Self, CurveError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the env keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CurveError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_STEP) {
            config.extrapolation_step = raw
                .trim()
                .parse()
                .map_err(|e| CurveError::config(format!("{ENV_STEP}='{raw}': {e}")))?;
        }
        if let Some(raw) = lookup(ENV_DECIMALS) {
            config.discharge_decimals = raw
                .trim()
                .parse()
                .map_err(|e| CurveError::config(format!("{ENV_DECIMALS}='{raw}': {e}")))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        if !(self.extrapolation_step.is_finite() && self.extrapolation_step > 0.0) {
            return Err(CurveError::config(format!(
                "extrapolation_step must be finite and > 0, got {}",
                self.extrapolation_step
            )));
        }
        if self.discharge_decimals > MAX_DISCHARGE_DECIMALS {
            return Err(CurveError::config(format!(
                "discharge_decimals must be at most {MAX_DISCHARGE_DECIMALS}, got {}",
                self.discharge_decimals
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = WorkflowConfig::default();
        assert!((c.extrapolation_step - 0.1).abs() < 1e-12);
        assert_eq!(c.discharge_decimals, 2);
        assert_eq!(c.discharge_label, "Q (CFS)");
    }

    #[test]
    fn toml_partial_uses_defaults() {
        let c = WorkflowConfig::from_toml_str("extrapolation_step = 0.5\n").unwrap();
        assert!((c.extrapolation_step - 0.5).abs() < 1e-12);
        assert_eq!(c.discharge_decimals, 2);
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        let err = WorkflowConfig::from_toml_str("step = 0.5\n").unwrap_err();
        assert!(matches!(err, CurveError::Config { .. }));
    }

    #[test]
    fn toml_rejects_non_positive_step() {
        let err = WorkflowConfig::from_toml_str("extrapolation_step = 0.0\n").unwrap_err();
        assert!(matches!(err, CurveError::Config { .. }));
    }

    #[test]
    fn lookup_overrides() {
        let c = WorkflowConfig::from_lookup(|key| match key {
            "RATING_EXTRAPOLATION_STEP" => Some("0.25".to_string()),
            "RATING_DISCHARGE_DECIMALS" => Some(" 3 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert!((c.extrapolation_step - 0.25).abs() < 1e-12);
        assert_eq!(c.discharge_decimals, 3);
    }

    #[test]
    fn lookup_rejects_garbage() {
        let err = WorkflowConfig::from_lookup(|key| {
            (key == "RATING_DISCHARGE_DECIMALS").then(|| "two".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("RATING_DISCHARGE_DECIMALS"));
    }

    #[test]
    fn rejects_excess_decimals() {
        let err = WorkflowConfig::from_lookup(|key| {
            (key == "RATING_DISCHARGE_DECIMALS").then(|| "400".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("discharge_decimals"));

        let err = WorkflowConfig::from_toml_str("discharge_decimals = 16\n").unwrap_err();
        assert!(matches!(err, CurveError::Config { .. }));
        assert!(WorkflowConfig::from_toml_str("discharge_decimals = 15\n").is_ok());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.toml");
        std::fs::write(&path, "discharge_decimals = 1\nstorage_label = \"S\"\n").unwrap();
        let c = WorkflowConfig::load(&path).unwrap();
        assert_eq!(c.discharge_decimals, 1);
        assert_eq!(c.storage_label, "S");
    }
}
