//! Configuration loading and validation
//!
//! Configuration is read once from YAML before any processing starts and then
//! passed by value into every component; there is no global state. Keys follow
//! snake_case, and the upper-case keys of older `config.yml` files
//! (`STATS_ROLLING_WINDOW`, `ROLLING_OVER_SEASONS`, `RAINY_THRESHOLD`,
//! `YEAR_RANGE`, `BATCH_SIZE`) are accepted as aliases.
//!
//! ```yaml
//! window_size: 5
//! cross_season_rollover: true
//! rain_threshold: 0.2
//! year_range: [2022, 2024]
//! batch_size: 50
//! provider_timeout_secs: 30
//! ```

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{FeatureError, Result};

const DEFAULT_WINDOW_SIZE: usize = 5;
const DEFAULT_RAIN_THRESHOLD: f64 = 0.2;
const DEFAULT_BATCH_SIZE: usize = 50;

/// Shape of a rolling window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingWindowSpec {
    /// Number of sessions in a full window, at least 1
    pub size: usize,
    /// Whether round 1 of a season continues into the previous season's last event
    pub cross_season: bool,
    /// Whether slot 0 is the anchor's own event
    pub inclusive: bool,
}

impl Default for RollingWindowSpec {
    fn default() -> Self {
        Self { size: DEFAULT_WINDOW_SIZE, cross_season: true, inclusive: false }
    }
}

impl RollingWindowSpec {
    pub fn new(size: usize) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn with_cross_season(mut self, cross_season: bool) -> Self {
        self.cross_season = cross_season;
        self
    }

    pub fn with_inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(FeatureError::configuration("window_size must be at least 1"));
        }
        Ok(())
    }
}

/// Inclusive `[start, end]` range of seasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange(pub i32, pub i32);

impl YearRange {
    pub fn start(&self) -> i32 {
        self.0
    }

    pub fn end(&self) -> i32 {
        self.1
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.0..=self.1
    }
}

/// Process-wide feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Sessions per rolling window
    #[serde(default = "default_window_size", alias = "STATS_ROLLING_WINDOW")]
    pub window_size: usize,
    /// Roll back into the previous season from round 1
    #[serde(default = "default_cross_season", alias = "ROLLING_OVER_SEASONS")]
    pub cross_season_rollover: bool,
    /// Fraction of rainy weather samples at which a session counts as wet
    #[serde(default = "default_rain_threshold", alias = "RAINY_THRESHOLD")]
    pub rain_threshold: f64,
    /// Seasons processed by the pipeline
    #[serde(alias = "YEAR_RANGE")]
    pub year_range: YearRange,
    /// Records written between sink commits
    #[serde(default = "default_batch_size", alias = "BATCH_SIZE")]
    pub batch_size: usize,
    /// Per-call provider timeout in seconds
    #[serde(default)]
    pub provider_timeout_secs: Option<f64>,
    /// Clear the sink before the first write
    #[serde(default)]
    pub clear_sink: bool,
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_cross_season() -> bool {
    true
}

fn default_rain_threshold() -> f64 {
    DEFAULT_RAIN_THRESHOLD
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl FeatureConfig {
    /// Configuration with defaults for everything except the seasons to process.
    pub fn new(year_range: YearRange) -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            cross_season_rollover: true,
            rain_threshold: DEFAULT_RAIN_THRESHOLD,
            year_range,
            batch_size: DEFAULT_BATCH_SIZE,
            provider_timeout_secs: None,
            clear_sink: false,
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FeatureError::file_error(path.to_path_buf(), e))?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FeatureConfig = serde_yaml_ng::from_str(yaml)
            .map_err(|e| FeatureError::configuration(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make feature computation meaningless.
    pub fn validate(&self) -> Result<()> {
        self.window_spec().validate()?;

        if !(0.0..=1.0).contains(&self.rain_threshold) {
            return Err(FeatureError::configuration(format!(
                "rain_threshold must be within [0, 1], got {}",
                self.rain_threshold
            )));
        }

        if self.year_range.start() > self.year_range.end() {
            return Err(FeatureError::configuration(format!(
                "year_range start {} is after end {}",
                self.year_range.start(),
                self.year_range.end()
            )));
        }

        if self.batch_size == 0 {
            return Err(FeatureError::configuration("batch_size must be at least 1"));
        }

        if let Some(secs) = self.provider_timeout_secs {
            if !(secs > 0.0 && Duration::try_from_secs_f64(secs).is_ok()) {
                return Err(FeatureError::configuration(format!(
                    "provider_timeout_secs must be a positive, representable duration, got {}",
                    secs
                )));
            }
        }

        Ok(())
    }

    /// Window shape used for every historical window.
    pub fn window_spec(&self) -> RollingWindowSpec {
        RollingWindowSpec {
            size: self.window_size,
            cross_season: self.cross_season_rollover,
            inclusive: false,
        }
    }

    /// Per-call provider timeout; `None` when unset or not representable.
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_secs.and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}
