use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};

use crate::error::{InvalidConfigSnafu, LoadConfigSnafu, TableResult};

/// Prefix for environment overrides, e.g. `TABCROP_DETECTOR_BASE_THRESHOLD=0.8`.
pub const ENV_PREFIX: &str = "TABCROP_";

/// Default minimum confidence for a detection to count as a table.
pub const DEFAULT_DETECTOR_BASE_THRESHOLD: f32 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum confidence score required for a table.
    pub detector_base_threshold: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detector_base_threshold: DEFAULT_DETECTOR_BASE_THRESHOLD,
        }
    }
}

/// Per-call changes to a [`DetectorConfig`]. Unset fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfigOverride {
    pub detector_base_threshold: Option<f32>,
}

impl DetectorConfigOverride {
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            detector_base_threshold: Some(threshold),
        }
    }
}

impl DetectorConfig {
    /// Defaults, then the JSON file at `path` if given, then `TABCROP_*` environment
    /// variables.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(DetectorConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Json::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(path: Option<&Path>) -> TableResult<Self> {
        let config: DetectorConfig = Self::figment(path).extract().context(LoadConfigSnafu {
            stage: "extract-detector-config",
        })?;
        config.validate()?;
        tracing::debug!("loaded detector config {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> TableResult<()> {
        let threshold = self.detector_base_threshold;
        ensure!(
            (0.0..=1.0).contains(&threshold),
            InvalidConfigSnafu {
                stage: "validate-detector-config",
                details: format!("detector_base_threshold {threshold} is outside [0, 1]"),
            }
        );
        Ok(())
    }

    /// A new config with every set field of `overrides` applied. `self` is untouched.
    pub fn merged(&self, overrides: &DetectorConfigOverride) -> Self {
        Self {
            detector_base_threshold: overrides
                .detector_base_threshold
                .unwrap_or(self.detector_base_threshold),
        }
    }
}
