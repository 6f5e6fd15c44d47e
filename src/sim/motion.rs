//! Straight-line integration

use super::behavior::{Behavior, UpdateContext};

/// `pos += vel * dt`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearMotion;

impl Behavior for LinearMotion {
    fn on_update(&self, ctx: &mut UpdateContext<'_>, dt: f32) {
        let body = ctx.body();
        body.pos += body.vel * dt;
    }
}
