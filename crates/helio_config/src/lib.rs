//! TOML configuration for the solar coordinate workspace.
//!
//! Every section is optional and falls back to its defaults:
//!
//! ```toml
//! [ephemeris]
//! strict_validation = true
//!
//! [transform]
//! finite_difference_dt_s = 1.0
//! observer_rtol = 1e-5
//! rsun_km = 695700.0
//!
//! [time]
//! leap_second_kernel = "naif0012.tls"
//!
//! [logging]
//! level = "info"
//! ```

pub mod error;

use std::path::{Path, PathBuf};

use helio_coords::TransformConfig;
use helio_ephem::EphemerisConfig;
use helio_time::LeapSecondKernel;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelioConfig {
    pub ephemeris: EphemerisSection,
    pub transform: TransformSection,
    pub time: TimeSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EphemerisSection {
    /// Reject epochs outside the analytic model's validity window.
    pub strict_validation: bool,
}

impl Default for EphemerisSection {
    fn default() -> Self {
        Self {
            strict_validation: EphemerisConfig::default().strict_validation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformSection {
    pub finite_difference_dt_s: f64,
    pub observer_rtol: f64,
    pub rsun_km: f64,
}

impl Default for TransformSection {
    fn default() -> Self {
        let defaults = TransformConfig::default();
        Self {
            finite_difference_dt_s: defaults.finite_difference_dt_s,
            observer_rtol: defaults.observer_rtol,
            rsun_km: defaults.rsun_km,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeSection {
    /// NAIF LSK text file. The built-in table is used when unset.
    pub leap_second_kernel: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl HelioConfig {
    /// Read, parse and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ephemeris_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("ephemeris: {e}")))?;
        self.transform_config()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("transform: {e}")))?;

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        Ok(())
    }

    pub fn ephemeris_config(&self) -> EphemerisConfig {
        EphemerisConfig {
            strict_validation: self.ephemeris.strict_validation,
            ..EphemerisConfig::default()
        }
    }

    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            finite_difference_dt_s: self.transform.finite_difference_dt_s,
            observer_rtol: self.transform.observer_rtol,
            rsun_km: self.transform.rsun_km,
        }
    }

    /// The configured leap-second table, or the built-in one.
    pub fn leap_second_kernel(&self) -> Result<LeapSecondKernel, ConfigError> {
        match &self.time.leap_second_kernel {
            Some(path) => LeapSecondKernel::load(path)
                .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display()))),
            None => Ok(LeapSecondKernel::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = HelioConfig::from_toml_str("").unwrap();
        assert_eq!(config, HelioConfig::default());
        assert_eq!(config.transform_config(), TransformConfig::default());
        assert_eq!(config.ephemeris_config(), EphemerisConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = HelioConfig::from_toml_str("[transform]\nobserver_rtol = 1e-3\n").unwrap();
        assert_eq!(config.transform.observer_rtol, 1e-3);
        assert_eq!(config.transform.finite_difference_dt_s, 1.0);
        assert!(config.ephemeris.strict_validation);
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = HelioConfig::from_toml_str("[transform]\nfinite_difference_dt_s = 0.0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("finite_difference_dt_s")));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = HelioConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_key() {
        let err = HelioConfig::from_toml_str("[transform]\nrsun = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn builtin_kernel_when_unset() {
        let lsk = HelioConfig::default().leap_second_kernel().unwrap();
        assert_eq!(
            lsk.data().leap_seconds.len(),
            LeapSecondKernel::builtin().data().leap_seconds.len()
        );
    }
}
