//! Rectangular arena walls
//!
//! Velocity components are negated when the body's edge reaches a wall. The
//! body is not pushed back out, so a deep overlap can flip the same component
//! on consecutive frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::{Behavior, UpdateContext};

/// Axis-aligned arena centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub half_width: f32,
    pub half_height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_width: width / 2.0,
            half_height: height / 2.0,
        }
    }

    /// Whether a circle lies entirely inside the walls
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x.abs() + radius < self.half_width && pos.y.abs() + radius < self.half_height
    }

    /// Velocity after bouncing a circle off any wall it touches
    pub fn reflect(&self, pos: Vec2, radius: f32, vel: Vec2) -> Vec2 {
        let mut vel = vel;
        if pos.y + radius >= self.half_height || -pos.y + radius >= self.half_height {
            vel.y = -vel.y;
        }
        if pos.x + radius >= self.half_width || -pos.x + radius >= self.half_width {
            vel.x = -vel.x;
        }
        vel
    }
}

/// Bounces the body off the arena walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryReflection {
    pub arena: Arena,
}

impl BoundaryReflection {
    pub fn new(arena: Arena) -> Self {
        Self { arena }
    }
}

impl Behavior for BoundaryReflection {
    fn on_update(&self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let body = ctx.body();
        body.vel = self.arena.reflect(body.pos, body.radius, body.vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_right_wall() {
        let arena = Arena::new(100.0, 60.0);
        let vel = arena.reflect(Vec2::new(48.0, 0.0), 2.0, Vec2::new(0.01, 0.0));
        assert_eq!(vel, Vec2::new(-0.01, 0.0));
    }

    #[test]
    fn test_reflect_inside_is_noop() {
        let arena = Arena::new(100.0, 60.0);
        let vel = Vec2::new(0.3, -0.2);
        assert_eq!(arena.reflect(Vec2::new(10.0, -5.0), 2.0, vel), vel);
    }

    #[test]
    fn test_reflect_corner_flips_both() {
        let arena = Arena::new(100.0, 60.0);
        let vel = arena.reflect(Vec2::new(-49.0, 29.5), 1.0, Vec2::new(-0.1, 0.2));
        assert_eq!(vel, Vec2::new(0.1, -0.2));
    }

    #[test]
    fn test_contains_circle() {
        let arena = Arena::new(100.0, 60.0);
        assert!(arena.contains_circle(Vec2::new(0.0, 0.0), 5.0));
        assert!(!arena.contains_circle(Vec2::new(0.0, 27.0), 5.0));
    }
}
