//! Per-frame driver
//!
//! Each tick: clamp the elapsed time, re-check the viewport, step the world,
//! then issue a render pass. The host owns the clock and calls [`FrameDriver::tick`]
//! once per display refresh (or once per slow-motion delay).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Renderer;
use crate::settings::Settings;
use crate::sim::{StepStats, World, advance};

/// How the host paces ticks; per-tick semantics are the same for both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSchedule {
    /// Tick once per display refresh
    DisplayRefresh { hz: u32 },
    /// Debug slow motion: fixed wall-clock delay between ticks
    SlowMotion { delay_ms: u64 },
}

impl FrameSchedule {
    /// Wall-clock delay before the next tick
    pub fn delay(&self) -> Duration {
        match *self {
            FrameSchedule::DisplayRefresh { hz } => {
                Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)))
            }
            FrameSchedule::SlowMotion { delay_ms } => Duration::from_millis(delay_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            FrameSchedule::DisplayRefresh { hz: 0 } | FrameSchedule::SlowMotion { delay_ms: 0 } => {
                Err(ConfigError::InvalidSchedule)
            }
            _ => Ok(()),
        }
    }
}

/// Container the drawing surface is fitted into
pub trait Viewport {
    /// Current container size in pixels (width, height)
    fn container_size(&self) -> (f32, f32);
}

/// Container with a constant size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport {
    pub width: f32,
    pub height: f32,
}

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Viewport for FixedViewport {
    fn container_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Best-effort sink for status values
pub trait DebugSink {
    fn publish(&mut self, value: serde_json::Value);
}

/// Debug sink that writes status through the `log` facade
#[derive(Debug, Default)]
pub struct LogDebugSink;

impl DebugSink for LogDebugSink {
    fn publish(&mut self, value: serde_json::Value) {
        log::debug!("{value}");
    }
}

/// Driver lifecycle; there is no pause or stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Surface fitted to the container at a fixed aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
struct SurfaceFit {
    container: (f32, f32),
    canvas: (f32, f32),
    scale: f32,
}

impl SurfaceFit {
    fn compute(container: (f32, f32), aspect_ratio: f32, world_width: f32) -> Self {
        let (width, height) = container;
        let canvas = if width / aspect_ratio > height {
            // Limited by height
            (height * aspect_ratio, height)
        } else {
            // Limited by width
            (width, width / aspect_ratio)
        };
        Self {
            container,
            canvas,
            scale: canvas.0 / world_width,
        }
    }
}

/// Status published to the debug sink once per tick
#[derive(Debug, Clone, Serialize)]
pub struct FrameStatus {
    pub tick: u64,
    pub scale: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub bodies: usize,
    pub dt_ms: f32,
    #[serde(flatten)]
    pub stats: StepStats,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Clamped elapsed time used for the step (ms)
    pub dt: f32,
    pub scale: f32,
    /// Scale was recomputed this tick
    pub rescaled: bool,
    pub stats: StepStats,
    /// Delay before the host should tick again
    pub next_delay: Duration,
}

/// Orchestrates resize check → update → render for each tick
#[derive(Debug)]
pub struct FrameDriver {
    settings: Settings,
    state: DriverState,
    last_timestamp: f64,
    fit: Option<SurfaceFit>,
    ticks: u64,
}

impl FrameDriver {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: DriverState::Idle,
            last_timestamp: 0.0,
            fit: None,
            ticks: 0,
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// World-to-screen scale from the last resize check
    pub fn scale(&self) -> f32 {
        self.fit.map_or(1.0, |fit| fit.scale)
    }

    /// Run one frame at `timestamp_ms` (monotonic host clock)
    pub fn tick(
        &mut self,
        world: &mut World,
        timestamp_ms: f64,
        viewport: &dyn Viewport,
        renderer: &mut dyn Renderer,
        debug: Option<&mut dyn DebugSink>,
    ) -> TickReport {
        let elapsed = match self.state {
            DriverState::Idle => {
                log::info!("Frame driver running ({:?})", self.settings.schedule);
                self.state = DriverState::Running;
                0.0
            }
            DriverState::Running => timestamp_ms - self.last_timestamp,
        };
        self.last_timestamp = timestamp_ms;
        self.ticks += 1;

        let rescaled = self.check_viewport(viewport);
        let (dt, stats) = advance(world, elapsed, self.settings.max_delta_ms);

        let scale = self.scale();
        renderer.clear();
        renderer.set_transform(scale, true);
        world.render(renderer);

        match debug {
            Some(sink) if self.settings.debug_status => {
                self.publish_status(sink, world, dt, stats);
            }
            _ => {}
        }

        TickReport {
            tick: self.ticks,
            dt,
            scale,
            rescaled,
            stats,
            next_delay: self.settings.schedule.delay(),
        }
    }

    /// Refit the surface only when the container size changed
    fn check_viewport(&mut self, viewport: &dyn Viewport) -> bool {
        let container = viewport.container_size();
        if self.fit.is_some_and(|fit| fit.container == container) {
            return false;
        }
        let fit = SurfaceFit::compute(
            container,
            self.settings.aspect_ratio,
            self.settings.world_width,
        );
        log::debug!(
            "Viewport {:?} -> canvas {:?}, scale {:.3}",
            container,
            fit.canvas,
            fit.scale
        );
        self.fit = Some(fit);
        true
    }

    fn publish_status(&self, sink: &mut dyn DebugSink, world: &World, dt: f32, stats: StepStats) {
        let (canvas_width, canvas_height) = self.fit.map_or((0.0, 0.0), |fit| fit.canvas);
        let status = FrameStatus {
            tick: self.ticks,
            scale: self.scale(),
            canvas_width,
            canvas_height,
            bodies: world.len(),
            dt_ms: dt,
            stats,
        };
        match serde_json::to_value(&status) {
            Ok(value) => sink.publish(value),
            Err(e) => log::warn!("Failed to serialize frame status: {e}"),
        }
    }
}
