//! Fading positional trail behind a body

use super::behavior::{Behavior, Registry, UpdateContext};
use super::body::Body;
use crate::render::Renderer;

/// Older points are dimmed by this extra factor
const TRAIL_ALPHA_DIVISOR: f32 = 16.0;

/// Records the body's position each frame and draws it as shrinking dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trailing {
    /// Maximum number of stored positions
    pub capacity: usize,
}

impl Trailing {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// (radius, alpha) for trail point `i`, oldest first
    pub fn point_style(&self, i: usize, body_radius: f32) -> (f32, f32) {
        let t = i as f32 / self.capacity as f32;
        (body_radius * (0.5 + 0.5 * t), t / TRAIL_ALPHA_DIVISOR)
    }
}

impl Behavior for Trailing {
    fn on_create(&self, body: &mut Body, _registry: &mut Registry<'_>) {
        body.clear_trail();
    }

    fn on_update(&self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let body = ctx.body();
        let pos = body.pos;
        body.record_trail(pos, self.capacity);
    }

    fn on_draw(&self, body: &Body, renderer: &mut dyn Renderer) {
        for (i, &point) in body.trail().iter().enumerate() {
            let (radius, alpha) = self.point_style(i, body.radius);
            renderer.fill_circle(point, radius, body.color, alpha);
        }
    }
}
