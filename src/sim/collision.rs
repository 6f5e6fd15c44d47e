//! Pairwise circle collision detection and elastic response
//!
//! Every collidable body checks every other collidable body (brute force, the
//! arena only holds a handful). Pairs are resolved sequentially in collidable
//! roster order, so a body hit twice in one frame answers the second hit with
//! the velocity produced by the first. That is an approximation of a true
//! simultaneous multi-body contact and depends on roster order.

use std::collections::HashSet;

use glam::Vec2;

use super::behavior::{Behavior, Registry, UpdateContext};
use super::body::{Body, BodyId};
use crate::heading;

/// Centers closer than this have no usable contact normal
const MIN_SEPARATION: f32 = f32::EPSILON;

/// Unordered body pairs already handled during the current step
#[derive(Debug, Default, Clone)]
pub struct ResolvedPairs {
    pairs: HashSet<(BodyId, BodyId)>,
}

impl ResolvedPairs {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn contains(&self, a: BodyId, b: BodyId) -> bool {
        self.pairs.contains(&Self::key(a, b))
    }

    /// Returns false if the pair was already recorded
    pub fn insert(&mut self, a: BodyId, b: BodyId) -> bool {
        self.pairs.insert(Self::key(a, b))
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Outcome of an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// New velocities for both bodies
    Resolved { vel_a: Vec2, vel_b: Vec2 },
    /// Overlapping but already moving apart
    Separating,
    /// Coincident centers or a non-finite result; left untouched
    Degenerate,
}

/// Whether two circles overlap
#[inline]
pub fn overlapping(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    pos_a.distance(pos_b) < radius_a + radius_b
}

/// 2D elastic collision between two circles
///
/// Velocities are decomposed along the line of centers (contact angle `phi`)
/// and its tangent. The normal components exchange momentum as a 1D elastic
/// collision; the tangential components are unchanged.
pub fn elastic_response(
    pos_a: Vec2,
    vel_a: Vec2,
    mass_a: f32,
    pos_b: Vec2,
    vel_b: Vec2,
    mass_b: f32,
) -> Contact {
    let offset = pos_b - pos_a;
    if offset.length() <= MIN_SEPARATION {
        return Contact::Degenerate;
    }

    let (theta_a, speed_a) = (heading(vel_a), vel_a.length());
    let (theta_b, speed_b) = (heading(vel_b), vel_b.length());
    let phi = heading(offset);

    // Normal (along a -> b) and tangential components
    let normal_a = speed_a * (theta_a - phi).cos();
    let tangent_a = speed_a * (theta_a - phi).sin();
    let normal_b = speed_b * (theta_b - phi).cos();
    let tangent_b = speed_b * (theta_b - phi).sin();

    if normal_a - normal_b <= 0.0 {
        return Contact::Separating;
    }

    let total = mass_a + mass_b;
    let new_normal_a = (normal_a * (mass_a - mass_b) + 2.0 * mass_b * normal_b) / total;
    let new_normal_b = (normal_b * (mass_b - mass_a) + 2.0 * mass_a * normal_a) / total;

    let normal = Vec2::new(phi.cos(), phi.sin());
    let tangent = normal.perp();

    let vel_a = normal * new_normal_a + tangent * tangent_a;
    let vel_b = normal * new_normal_b + tangent * tangent_b;

    if !(vel_a.is_finite() && vel_b.is_finite()) {
        return Contact::Degenerate;
    }

    Contact::Resolved { vel_a, vel_b }
}

/// Detects overlaps with other collidable bodies and bounces them elastically
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairwiseCollision;

impl Behavior for PairwiseCollision {
    fn on_create(&self, body: &mut Body, registry: &mut Registry<'_>) {
        registry.register_collidable(body.id());
    }

    fn on_update(&self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let (id, fixed) = {
            let body = ctx.body_ref();
            (body.id(), body.fixed)
        };
        // Fixed bodies never start a scan; they are only ever hit
        if fixed {
            return;
        }

        let collidable = ctx.collidable;
        for &other_id in collidable {
            if other_id == id || ctx.resolved.contains(id, other_id) {
                continue;
            }
            let Some(other) = ctx.index_of(other_id) else {
                continue;
            };

            let contact = {
                let (a, b) = ctx.pair_mut(other);
                if !overlapping(a.pos, a.radius, b.pos, b.radius) {
                    continue;
                }
                let contact = elastic_response(a.pos, a.vel, a.mass, b.pos, b.vel, b.mass);
                if let Contact::Resolved { vel_a, vel_b } = contact {
                    a.vel = vel_a;
                    if !b.fixed {
                        b.vel = vel_b;
                    }
                }
                contact
            };

            match contact {
                Contact::Resolved { .. } => ctx.stats.collisions += 1,
                Contact::Separating => {}
                Contact::Degenerate => {
                    log::warn!(
                        "Skipping degenerate contact between bodies {} and {}",
                        id.0,
                        other_id.0
                    );
                    ctx.stats.degenerate_pairs += 1;
                }
            }
            ctx.resolved.insert(id, other_id);
        }
    }
}
