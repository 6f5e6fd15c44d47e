//! Physics update pipeline
//!
//! One step walks the roster in order and runs each body's update hooks in
//! the body's own unit order. Bodies earlier in the roster have already moved
//! when later bodies run.

use serde::Serialize;

use super::behavior::{Behavior, UpdateContext};
use super::world::World;

/// Counters collected during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StepStats {
    /// Pairs that exchanged velocity
    pub collisions: u32,
    /// Overlapping pairs skipped because no contact normal exists
    pub degenerate_pairs: u32,
    /// Bodies rolled back to their pre-step state after going non-finite
    pub non_finite_resets: u32,
}

/// Clamp a raw frame gap into a usable step (negative gaps become 0)
#[inline]
pub fn clamp_delta(elapsed_ms: f64, max_delta_ms: f32) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
        return 0.0;
    }
    (elapsed_ms as f32).min(max_delta_ms)
}

/// Advance the world by `dt` milliseconds
pub fn step(world: &mut World, dt: f32) -> StepStats {
    let mut stats = StepStats::default();
    let World {
        bodies,
        collidable,
        resolved,
        ..
    } = world;
    resolved.clear();

    for index in 0..bodies.len() {
        let (start_pos, start_vel) = (bodies[index].pos, bodies[index].vel);
        let unit_count = bodies[index].traits().len();
        for unit_index in 0..unit_count {
            let unit = bodies[index].traits()[unit_index];
            let mut ctx = UpdateContext {
                bodies: bodies.as_mut_slice(),
                index,
                collidable: collidable.as_slice(),
                resolved: &mut *resolved,
                stats: &mut stats,
            };
            unit.on_update(&mut ctx, dt);
        }

        let body = &mut bodies[index];
        if !body.is_finite() {
            log::error!(
                "Body {} went non-finite (pos {:?}, vel {:?}); restoring pre-step state",
                body.id().0,
                body.pos,
                body.vel
            );
            body.pos = start_pos;
            body.vel = start_vel;
            stats.non_finite_resets += 1;
        }
    }

    log::trace!(
        "Step dt={:.2}ms: {} collisions, {} degenerate, {} reset",
        dt,
        stats.collisions,
        stats.degenerate_pairs,
        stats.non_finite_resets
    );
    stats
}

/// Clamp the elapsed time and run one step; returns the dt actually used
pub fn advance(world: &mut World, elapsed_ms: f64, max_delta_ms: f32) -> (f32, StepStats) {
    let dt = clamp_delta(elapsed_ms, max_delta_ms);
    (dt, step(world, dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{ASPECT_RATIO, IMMOVABLE_MASS, MAX_DELTA_MS, WORLD_WIDTH};
    use crate::sim::behavior::TraitUnit;
    use crate::sim::body::{BodyConfig, BodyId};
    use crate::sim::boundary::Arena;
    use crate::sim::motion::LinearMotion;
    use glam::Vec2;
    use proptest::prelude::*;

    const FRAME_MS: f32 = 16.0;

    fn arena() -> Arena {
        Arena::new(WORLD_WIDTH, WORLD_WIDTH / ASPECT_RATIO)
    }

    fn spawn(world: &mut World, config: BodyConfig) -> BodyId {
        world
            .spawn(config, TraitUnit::canonical(arena(), 32))
            .unwrap()
    }

    fn total_momentum(world: &World) -> Vec2 {
        world.bodies().iter().map(|b| b.momentum()).sum()
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(16.0, MAX_DELTA_MS), 16.0);
        assert_eq!(clamp_delta(500.0, MAX_DELTA_MS), 50.0);
        assert_eq!(clamp_delta(-10.0, MAX_DELTA_MS), 0.0);
        assert_eq!(clamp_delta(f64::NAN, MAX_DELTA_MS), 0.0);
    }

    #[test]
    fn test_advance_uses_clamped_delta() {
        let mut world = World::new();
        let id = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        let (dt, _) = advance(&mut world, 500.0, MAX_DELTA_MS);
        assert_eq!(dt, 50.0);
        let x = world.get(id).unwrap().pos.x;
        assert!((x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_trail_bounded_and_records_pre_move_position() {
        let mut world = World::new();
        let id = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.003, 0.002), 1.0, 1.0),
        );

        for _ in 0..100 {
            let before = world.get(id).unwrap().pos;
            step(&mut world, FRAME_MS);
            let body = world.get(id).unwrap();
            assert!(body.trail().len() <= 32);
            assert_eq!(body.trail().back().copied(), Some(before));
            assert_ne!(body.pos, before);
        }
        assert_eq!(world.get(id).unwrap().trail().len(), 32);
    }

    #[test]
    fn test_boundary_reflection_right_wall() {
        let mut world = World::new();
        let half_width = arena().half_width;
        let id = spawn(
            &mut world,
            BodyConfig::new(
                Vec2::new(half_width - 2.2, 0.0),
                Vec2::new(0.01, 0.0),
                2.0,
                1.0,
            ),
        );

        // Edge not yet at the wall
        step(&mut world, FRAME_MS);
        assert_eq!(world.get(id).unwrap().vel, Vec2::new(0.01, 0.0));

        // Edge crosses the wall
        step(&mut world, FRAME_MS);
        let body = world.get(id).unwrap();
        assert!(body.pos.x + body.radius >= half_width);
        assert_eq!(body.vel, Vec2::new(-0.01, 0.0));

        // Keeps heading left
        let mut last_x = body.pos.x;
        for _ in 0..5 {
            step(&mut world, FRAME_MS);
            let body = world.get(id).unwrap();
            assert_eq!(body.vel, Vec2::new(-0.01, 0.0));
            assert!(body.pos.x < last_x);
            last_x = body.pos.x;
        }
    }

    #[test]
    fn test_pair_resolved_once_per_step() {
        let mut world = World::new();
        let a = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        let b = spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.5, 0.0), Vec2::new(-0.01, 0.0), 1.0, 1.0),
        );

        let stats = step(&mut world, 0.0);
        assert_eq!(stats.collisions, 1);
        assert_eq!(world.resolved_pairs().len(), 1);
        assert!(world.resolved_pairs().contains(b, a));

        let vel_a = world.get(a).unwrap().vel;
        let vel_b = world.get(b).unwrap().vel;
        assert!((vel_a - Vec2::new(-0.01, 0.0)).length() < 1e-6);
        assert!((vel_b - Vec2::new(0.01, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_resolved_pairs_cleared_each_step() {
        let mut world = World::new();
        spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.5, 0.0), Vec2::new(-0.01, 0.0), 1.0, 1.0),
        );
        step(&mut world, 0.0);
        assert_eq!(world.resolved_pairs().len(), 1);

        // Now separating: still overlapping, so recorded, but no exchange
        let stats = step(&mut world, 0.0);
        assert_eq!(stats.collisions, 0);
        assert_eq!(world.resolved_pairs().len(), 1);
    }

    #[test]
    fn test_fixed_body_velocity_never_changes() {
        let mut world = World::new();
        let fixed = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.002, 0.0), 2.0, 0.5).fixed(),
        );
        let mover = spawn(
            &mut world,
            BodyConfig::new(Vec2::new(3.5, 0.0), Vec2::new(-0.05, 0.0), 2.0, 50.0),
        );

        let stats = step(&mut world, FRAME_MS);
        assert_eq!(stats.collisions, 1);
        assert_eq!(world.get(fixed).unwrap().vel, Vec2::new(0.002, 0.0));
        assert!(world.get(mover).unwrap().vel.x > -0.05);
    }

    proptest! {
        #[test]
        fn prop_fixed_body_velocity_unchanged_by_any_hitter(
            mass in 0.01f32..1.0e6,
            speed in 0.001f32..1.0,
            angle in -0.5f32..0.5,
            fixed_vx in 0.0f32..0.01,
            fixed_vy in -0.01f32..0.01,
        ) {
            let mut world = World::new();
            let fixed_vel = Vec2::new(fixed_vx, fixed_vy);
            let fixed = spawn(
                &mut world,
                BodyConfig::new(Vec2::ZERO, fixed_vel, 2.0, 0.5).fixed(),
            );
            // Hitter heads roughly toward the fixed body from the right and the
            // fixed body never moves away from it, so the pair always closes
            let hitter_vel = Vec2::new(-angle.cos(), angle.sin()) * speed;
            let hitter = spawn(
                &mut world,
                BodyConfig::new(Vec2::new(3.5, 0.0), hitter_vel, 2.0, mass),
            );

            let stats = step(&mut world, 0.0);
            prop_assert_eq!(stats.collisions, 1);
            let after = world.get(fixed).unwrap().vel;
            prop_assert_eq!(after.x.to_bits(), fixed_vel.x.to_bits());
            prop_assert_eq!(after.y.to_bits(), fixed_vel.y.to_bits());
            prop_assert!(world.get(hitter).unwrap().is_finite());
        }
    }

    #[test]
    fn test_overflowing_body_is_rolled_back_not_propagated() {
        let mut world = World::new();
        let start = Vec2::new(1.0e38, 0.0);
        let vel = Vec2::new(f32::MAX, 0.0);
        let runaway = world
            .spawn(
                BodyConfig::new(start, vel, 1.0, 1.0),
                vec![TraitUnit::LinearMotion(LinearMotion)],
            )
            .unwrap();
        let steady = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.01, 0.0), 1.0, 1.0),
        );

        let stats = step(&mut world, 50.0);
        assert_eq!(stats.non_finite_resets, 1);
        let body = world.get(runaway).unwrap();
        assert!(body.is_finite());
        assert_eq!(body.pos, start);
        assert_eq!(body.vel, vel);

        // The rest of the step still ran
        let x = world.get(steady).unwrap().pos.x;
        assert!((x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_light_body_bounces_off_fixed_heavy_body() {
        let mut world = World::new();
        let a = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::ZERO, 5.0, IMMOVABLE_MASS).fixed(),
        );
        let start = Vec2::new(10.0, 20.0);
        let initial_vel = -start.normalize() * 0.005;
        let b = spawn(&mut world, BodyConfig::new(start, initial_vel, 3.0, 1.0));

        let mut hit = false;
        for _ in 0..1000 {
            step(&mut world, FRAME_MS);
            let distance = world.get(a).unwrap().pos.distance(world.get(b).unwrap().pos);
            if distance < 8.0 {
                hit = true;
                break;
            }
        }
        assert!(hit, "bodies never met");

        let body_a = world.get(a).unwrap();
        let body_b = world.get(b).unwrap();
        assert_eq!(body_a.vel, Vec2::ZERO);
        assert_eq!(body_a.pos, Vec2::ZERO);
        // Direction inverted along the line of centers
        let cos = body_b.vel.normalize().dot(initial_vel.normalize());
        assert!(cos < -0.999, "cos = {cos}");
        assert!((body_b.speed() - 0.005).abs() < 1e-4);

        // Moves away afterwards instead of sticking
        let mut last = body_b.pos.distance(body_a.pos);
        for _ in 0..10 {
            step(&mut world, FRAME_MS);
            let distance = world.get(a).unwrap().pos.distance(world.get(b).unwrap().pos);
            assert!(distance > last);
            last = distance;
        }
    }

    #[test]
    fn test_two_hits_in_one_step_resolved_in_roster_order() {
        let mut world = World::new();
        let middle = spawn(&mut world, BodyConfig::new(Vec2::ZERO, Vec2::ZERO, 1.0, 1.0));
        spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.5, 0.0), Vec2::new(-0.01, 0.0), 1.0, 1.0),
        );
        spawn(
            &mut world,
            BodyConfig::new(Vec2::new(-1.5, 0.0), Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        let before = total_momentum(&world);

        let stats = step(&mut world, 0.0);
        assert_eq!(stats.collisions, 2);
        assert!((total_momentum(&world) - before).length() < 1e-6);
        // Second hit saw the velocity left by the first one
        assert!(world.get(middle).unwrap().vel.x > 0.0);
    }

    #[test]
    fn test_coincident_bodies_are_skipped_not_nan() {
        let mut world = World::new();
        let a = spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.0, 1.0), Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        let b = spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0, 1.0),
        );

        // dt = 0 keeps the centers coincident when the collision unit runs
        let stats = step(&mut world, 0.0);
        assert_eq!(stats.degenerate_pairs, 1);
        assert_eq!(stats.collisions, 0);
        assert_eq!(world.get(a).unwrap().vel, Vec2::new(0.01, 0.0));
        assert_eq!(world.get(b).unwrap().vel, Vec2::ZERO);
        assert!(world.bodies().iter().all(|body| body.is_finite()));
    }

    #[test]
    fn test_removed_body_no_longer_collides() {
        let mut world = World::new();
        let a = spawn(
            &mut world,
            BodyConfig::new(Vec2::ZERO, Vec2::new(0.01, 0.0), 1.0, 1.0),
        );
        let b = spawn(
            &mut world,
            BodyConfig::new(Vec2::new(1.5, 0.0), Vec2::new(-0.01, 0.0), 1.0, 1.0),
        );
        world.remove(b);

        let stats = step(&mut world, 0.0);
        assert_eq!(stats.collisions, 0);
        assert_eq!(world.get(a).unwrap().vel, Vec2::new(0.01, 0.0));
    }
}
