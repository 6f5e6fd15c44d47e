//! Initial body layouts

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::IMMOVABLE_MASS;
use crate::error::ConfigError;
use crate::polar_to_cartesian;
use crate::render::colors;
use crate::settings::Settings;
use crate::sim::{BodyConfig, BodyId, TraitUnit, World};

/// Attempts per requested body before the scatter gives up on the rest
const PLACEMENT_ATTEMPTS: usize = 200;

/// Canonical behavior list for the given settings
pub fn canonical_traits(settings: &Settings) -> Vec<TraitUnit> {
    TraitUnit::canonical(settings.arena(), settings.max_trace_length)
}

/// Stock scene: an immovable body at the center and a light one drifting past
pub fn default_scene(world: &mut World, settings: &Settings) -> Result<Vec<BodyId>, ConfigError> {
    let anchor = BodyConfig::new(Vec2::ZERO, Vec2::ZERO, 5.0, IMMOVABLE_MASS)
        .with_color(colors::WHITE)
        .fixed();
    let drifter = BodyConfig::new(Vec2::new(10.0, 20.0), polar_to_cartesian(0.005, -1.0), 3.0, 1.0)
        .with_color(colors::CORAL);

    Ok(vec![
        world.spawn(anchor, canonical_traits(settings))?,
        world.spawn(drifter, canonical_traits(settings))?,
    ])
}

/// Seeded scatter of non-overlapping bodies inside the arena
///
/// Mass scales with area. May place fewer than `count` bodies if the arena is
/// too crowded.
pub fn scatter_scene(
    world: &mut World,
    settings: &Settings,
    seed: u64,
    count: usize,
) -> Result<Vec<BodyId>, ConfigError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let arena = settings.arena();
    let mut placed: Vec<BodyConfig> = Vec::with_capacity(count);

    let mut attempts = 0;
    while placed.len() < count && attempts < count * PLACEMENT_ATTEMPTS {
        attempts += 1;

        let radius = rng.random_range(1.0..4.0);
        let max_x = arena.half_width - radius;
        let max_y = arena.half_height - radius;
        if max_x <= 0.0 || max_y <= 0.0 {
            continue;
        }
        let pos = Vec2::new(
            rng.random_range(-max_x..max_x),
            rng.random_range(-max_y..max_y),
        );
        if !arena.contains_circle(pos, radius) {
            continue;
        }
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(0.002..0.01);
        let color = colors::PALETTE[rng.random_range(0..colors::PALETTE.len())];

        // Check it doesn't overlap with an existing body
        if placed
            .iter()
            .any(|other| other.pos.distance(pos) <= other.radius + radius)
        {
            continue;
        }

        placed.push(
            BodyConfig::new(pos, polar_to_cartesian(speed, angle), radius, radius * radius)
                .with_color(color),
        );
    }

    if placed.len() < count {
        log::warn!(
            "Scatter placed {} of {} bodies after {} attempts",
            placed.len(),
            count,
            attempts
        );
    }

    placed
        .into_iter()
        .map(|config| world.spawn(config, canonical_traits(settings)))
        .collect()
}
