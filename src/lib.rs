//! Ball Trails - bouncing bodies with fading trails
//!
//! Core modules:
//! - `sim`: Bodies, behavior units, world rosters and the physics step
//! - `frame`: Per-frame driver (resize check, update, render request)
//! - `render`: Drawing capability consumed by the simulation
//! - `settings`: Data-driven tuning with validation
//! - `scene`: Stock initial body layouts

pub mod error;
pub mod frame;
pub mod render;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use frame::{
    DebugSink, DriverState, FixedViewport, FrameDriver, FrameSchedule, LogDebugSink, TickReport,
    Viewport,
};
pub use render::{Color, CommandBuffer, DrawCommand, Renderer};
pub use settings::Settings;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Largest elapsed time fed into a single step (milliseconds)
    pub const MAX_DELTA_MS: f32 = 50.0;
    /// Number of past positions kept in a body's trail
    pub const MAX_TRACE_LENGTH: usize = 32;

    /// Arena width in world units
    pub const WORLD_WIDTH: f32 = 100.0;
    /// Arena width / height
    pub const ASPECT_RATIO: f32 = 1.65;

    /// Mass used for bodies that should not be pushed around
    pub const IMMOVABLE_MASS: f32 = 1.0e6;

    /// Display refresh rate used by the native loop
    pub const DISPLAY_HZ: u32 = 60;
}

/// Heading of a vector in radians, in (-π, π]
#[inline]
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), heading(pos))
}
