//! Configuration errors
//!
//! Raised before the simulation starts; a running world has no error channel.

use std::fmt;

/// Rejected body or settings configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Body radius must be positive and finite
    InvalidRadius(f32),
    /// Body mass must be positive and finite
    InvalidMass(f32),
    /// Body position contains NaN or infinity
    NonFinitePosition,
    /// Body velocity contains NaN or infinity
    NonFiniteVelocity,
    /// Trail capacity must be at least one point
    InvalidTraceLength,
    /// Maximum step must be positive and finite
    InvalidMaxDelta(f32),
    /// Arena width must be positive and finite
    InvalidWorldWidth(f32),
    /// Aspect ratio must be positive and finite
    InvalidAspectRatio(f32),
    /// Frame schedule rate or delay must be non-zero
    InvalidSchedule,
    /// Settings JSON could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRadius(r) => write!(f, "radius must be positive and finite (got {r})"),
            Self::InvalidMass(m) => write!(f, "mass must be positive and finite (got {m})"),
            Self::NonFinitePosition => write!(f, "position must be finite"),
            Self::NonFiniteVelocity => write!(f, "velocity must be finite"),
            Self::InvalidTraceLength => write!(f, "max_trace_length must be greater than 0"),
            Self::InvalidMaxDelta(d) => {
                write!(f, "max_delta_ms must be positive and finite (got {d})")
            }
            Self::InvalidWorldWidth(w) => {
                write!(f, "world_width must be positive and finite (got {w})")
            }
            Self::InvalidAspectRatio(a) => {
                write!(f, "aspect_ratio must be positive and finite (got {a})")
            }
            Self::InvalidSchedule => write!(f, "frame schedule rate/delay must be non-zero"),
            Self::Parse(msg) => write!(f, "invalid settings JSON: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
