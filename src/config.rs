use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::kernel::time::DEFAULT_LOOP_HZ;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} must be non-negative, got {value}")]
    NegativeNoiseBound { name: &'static str, value: f32 },

    #[error("ai throttle range is inverted: min {min} > max {max}")]
    InvertedThrottleRange { min: f32, max: f32 },

    #[error("drive_loop_hz must be positive")]
    ZeroLoopRate,
}

/// One record-count alert threshold. The active color is the one of the
/// highest threshold not exceeding the current count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLevel {
    pub count: u64,
    pub color: [u8; 3],
}

/// Process-wide drive configuration. Loaded once at startup, validated,
/// then shared read-only across the kernel (`Arc<DriveConfig>`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Inject exploration noise into user commands (forward motion only).
    pub control_noise: bool,
    /// Uniform noise bound for steering, drawn from [-angle_noise, +angle_noise].
    pub angle_noise: f32,
    /// Uniform noise bound for throttle, drawn from [-throttle_noise, +throttle_noise].
    pub throttle_noise: f32,
    /// Force recording on during autonomous ticks.
    pub record_during_ai: bool,
    /// Multiplier applied to the pilot throttle in full autonomous mode.
    pub ai_throttle_mult: f32,
    /// Throttle floor in full autonomous mode.
    pub ai_min_throttle: f32,
    /// Throttle ceiling in full autonomous mode.
    pub ai_max_throttle: f32,
    /// Fixed tick rate of the drive loop.
    pub drive_loop_hz: u32,
    /// Stop the drive loop after this many ticks. None = run forever.
    pub max_loops: Option<u64>,
    /// Seed for the exploration noise source. None = entropy.
    pub noise_seed: Option<u64>,
    /// Record-count alert thresholds for operator feedback.
    pub record_alert_levels: Vec<AlertLevel>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            control_noise: false,
            angle_noise: 0.1,
            throttle_noise: 0.05,
            record_during_ai: false,
            ai_throttle_mult: 1.0,
            ai_min_throttle: 0.0,
            ai_max_throttle: 1.0,
            drive_loop_hz: DEFAULT_LOOP_HZ,
            max_loops: None,
            noise_seed: None,
            record_alert_levels: vec![
                AlertLevel { count: 1_000, color: [0, 255, 0] },
                AlertLevel { count: 5_000, color: [255, 165, 0] },
                AlertLevel { count: 10_000, color: [255, 0, 0] },
            ],
        }
    }
}

impl DriveConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: DriveConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate invariants the kernel assumes. Called by `load`; call
    /// directly when building a config in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.angle_noise < 0.0 {
            return Err(ConfigError::NegativeNoiseBound {
                name: "angle_noise",
                value: self.angle_noise,
            });
        }
        if self.throttle_noise < 0.0 {
            return Err(ConfigError::NegativeNoiseBound {
                name: "throttle_noise",
                value: self.throttle_noise,
            });
        }
        if self.ai_min_throttle > self.ai_max_throttle {
            return Err(ConfigError::InvertedThrottleRange {
                min: self.ai_min_throttle,
                max: self.ai_max_throttle,
            });
        }
        if self.drive_loop_hz == 0 {
            return Err(ConfigError::ZeroLoopRate);
        }
        Ok(())
    }
}
