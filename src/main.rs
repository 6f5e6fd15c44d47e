//! Ball Trails entry point
//!
//! Native host: owns the clock, paces ticks and hands a recording renderer to
//! the frame driver. Runs until the process is killed.
//!
//! Usage: `ball-trails [SEED [COUNT]]` scatters COUNT (default 8) bodies from
//! SEED; without arguments the stock two-body scene is used.

use std::time::Instant;

use ball_trails::scene::{default_scene, scatter_scene};
use ball_trails::sim::World;
use ball_trails::{
    CommandBuffer, ConfigError, FixedViewport, FrameDriver, LogDebugSink, Settings,
};

const DEFAULT_SCATTER_COUNT: usize = 8;

/// Headless surface size
const SURFACE_WIDTH: f32 = 1280.0;
const SURFACE_HEIGHT: f32 = 720.0;

fn setup() -> Result<(FrameDriver, World), ConfigError> {
    let settings = Settings::load()?;
    let mut world = World::new();

    let mut args = std::env::args().skip(1);
    match args.next().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => {
            let count = args
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(DEFAULT_SCATTER_COUNT);
            log::info!("Scatter scene: seed {seed}, {count} bodies");
            scatter_scene(&mut world, &settings, seed, count)?;
        }
        None => {
            log::info!("Default scene");
            default_scene(&mut world, &settings)?;
        }
    }

    Ok((FrameDriver::new(settings)?, world))
}

fn main() {
    env_logger::init();
    log::info!("Ball Trails (native) starting...");

    let (mut driver, mut world) = match setup() {
        Ok(parts) => parts,
        Err(e) => {
            log::error!("Refusing to start: {e}");
            std::process::exit(1);
        }
    };

    let viewport = FixedViewport::new(SURFACE_WIDTH, SURFACE_HEIGHT);
    let mut renderer = CommandBuffer::new();
    let mut debug_sink = LogDebugSink;
    let start = Instant::now();

    loop {
        renderer.reset();
        let timestamp = start.elapsed().as_secs_f64() * 1000.0;
        let report = driver.tick(
            &mut world,
            timestamp,
            &viewport,
            &mut renderer,
            Some(&mut debug_sink),
        );
        log::trace!(
            "Tick {}: {} draw commands",
            report.tick,
            renderer.commands.len()
        );
        std::thread::sleep(report.next_delay);
    }
}
