//! Simulation settings
//!
//! Tuning for the step clamp, trail length, arena shape and frame schedule.
//! Loaded from JSON when provided, otherwise defaults.

use std::env::VarError;

use serde::{Deserialize, Serialize};

use crate::consts::{ASPECT_RATIO, DISPLAY_HZ, MAX_DELTA_MS, MAX_TRACE_LENGTH, WORLD_WIDTH};
use crate::error::ConfigError;
use crate::frame::FrameSchedule;
use crate::sim::Arena;

/// Simulation settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest elapsed time fed into one step (ms)
    pub max_delta_ms: f32,
    /// Trail capacity per body
    pub max_trace_length: usize,
    /// Arena width in world units
    pub world_width: f32,
    /// Arena width / height
    pub aspect_ratio: f32,
    /// How the host paces ticks
    pub schedule: FrameSchedule,
    /// Publish per-tick status to the debug sink
    pub debug_status: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_delta_ms: MAX_DELTA_MS,
            max_trace_length: MAX_TRACE_LENGTH,
            world_width: WORLD_WIDTH,
            aspect_ratio: ASPECT_RATIO,
            schedule: FrameSchedule::DisplayRefresh { hz: DISPLAY_HZ },
            debug_status: true,
        }
    }
}

impl Settings {
    /// Environment variable holding a JSON settings override
    pub const ENV_KEY: &'static str = "BALL_TRAILS_SETTINGS";

    /// Parse and validate settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the environment, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(Self::ENV_KEY))
    }

    fn from_env_value(value: Result<String, VarError>) -> Result<Self, ConfigError> {
        match value {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", Self::ENV_KEY);
                Ok(settings)
            }
            Err(VarError::NotPresent) => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e @ VarError::NotUnicode(_)) => {
                Err(ConfigError::Parse(format!("{}: {e}", Self::ENV_KEY)))
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_delta_ms.is_finite() && self.max_delta_ms > 0.0) {
            return Err(ConfigError::InvalidMaxDelta(self.max_delta_ms));
        }
        if self.max_trace_length == 0 {
            return Err(ConfigError::InvalidTraceLength);
        }
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(ConfigError::InvalidWorldWidth(self.world_width));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::InvalidAspectRatio(self.aspect_ratio));
        }
        self.schedule.validate()
    }

    /// Arena height in world units
    pub fn world_height(&self) -> f32 {
        self.world_width / self.aspect_ratio
    }

    /// Arena walls derived from width and aspect ratio
    pub fn arena(&self) -> Arena {
        Arena::new(self.world_width, self.world_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_delta_ms, 50.0);
        assert_eq!(settings.max_trace_length, 32);
        let arena = settings.arena();
        assert_eq!(arena.half_width, 50.0);
        assert!((arena.half_height * 2.0 - 100.0 / 1.65).abs() < 1e-4);
    }

    #[test]
    fn test_from_json_partial_override() {
        let settings =
            Settings::from_json(r#"{ "max_trace_length": 8, "schedule": { "slow_motion": { "delay_ms": 250 } } }"#)
                .unwrap();
        assert_eq!(settings.max_trace_length, 8);
        assert_eq!(settings.max_delta_ms, 50.0);
        assert_eq!(settings.schedule, FrameSchedule::SlowMotion { delay_ms: 250 });
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert_eq!(
            Settings::from_json(r#"{ "max_delta_ms": 0.0 }"#),
            Err(ConfigError::InvalidMaxDelta(0.0))
        );
        assert_eq!(
            Settings::from_json(r#"{ "max_trace_length": 0 }"#),
            Err(ConfigError::InvalidTraceLength)
        );
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_value_handling() {
        assert_eq!(
            Settings::from_env_value(Err(VarError::NotPresent)),
            Ok(Settings::default())
        );
        assert_eq!(
            Settings::from_env_value(Ok(r#"{ "debug_status": false }"#.to_string()))
                .map(|s| s.debug_status),
            Ok(false)
        );
        let bad = VarError::NotUnicode(std::ffi::OsString::from("settings"));
        assert!(matches!(
            Settings::from_env_value(Err(bad)),
            Err(ConfigError::Parse(msg)) if msg.contains(Settings::ENV_KEY)
        ));
    }
}
