//! Behavior units and their hook interface
//!
//! A body carries an ordered list of [`TraitUnit`]s. Each unit implements only
//! the [`Behavior`] hooks it needs; the rest fall through to no-ops.

use super::body::{Body, BodyId};
use super::boundary::{Arena, BoundaryReflection};
use super::collision::{PairwiseCollision, ResolvedPairs};
use super::motion::LinearMotion;
use super::step::StepStats;
use super::trailing::Trailing;
use crate::error::ConfigError;
use crate::render::Renderer;

/// World-side registration available to create hooks
pub struct Registry<'a> {
    pub(crate) collidable: &'a mut Vec<BodyId>,
}

impl Registry<'_> {
    /// Add a body to the collidable roster (idempotent)
    pub fn register_collidable(&mut self, id: BodyId) {
        if !self.collidable.contains(&id) {
            self.collidable.push(id);
        }
    }
}

/// Mutable view of the world handed to update hooks for one body
pub struct UpdateContext<'a> {
    pub(crate) bodies: &'a mut [Body],
    pub(crate) index: usize,
    pub(crate) collidable: &'a [BodyId],
    pub(crate) resolved: &'a mut ResolvedPairs,
    pub(crate) stats: &'a mut StepStats,
}

impl UpdateContext<'_> {
    /// The body whose hooks are running
    pub fn body(&mut self) -> &mut Body {
        &mut self.bodies[self.index]
    }

    pub fn body_ref(&self) -> &Body {
        &self.bodies[self.index]
    }

    /// Roster index of a live body (bodies are kept sorted by id)
    pub(crate) fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id()).ok()
    }

    /// The owning body and another one, both mutable
    pub(crate) fn pair_mut(&mut self, other: usize) -> (&mut Body, &mut Body) {
        let index = self.index;
        debug_assert_ne!(index, other);
        if index < other {
            let (lo, hi) = self.bodies.split_at_mut(other);
            (&mut lo[index], &mut hi[0])
        } else {
            let (lo, hi) = self.bodies.split_at_mut(index);
            (&mut hi[0], &mut lo[other])
        }
    }
}

/// Optional per-body hooks
pub trait Behavior {
    /// One-time setup when the body joins a world
    fn on_create(&self, _body: &mut Body, _registry: &mut Registry<'_>) {}

    /// Per-frame mutation; `dt` is the clamped elapsed time in ms
    fn on_update(&self, _ctx: &mut UpdateContext<'_>, _dt: f32) {}

    /// Read-only draw emission, called before the body itself is drawn
    fn on_draw(&self, _body: &Body, _renderer: &mut dyn Renderer) {}
}

/// The fixed set of behavior units a body can be composed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraitUnit {
    Trailing(Trailing),
    LinearMotion(LinearMotion),
    PairwiseCollision(PairwiseCollision),
    BoundaryReflection(BoundaryReflection),
}

impl TraitUnit {
    /// Standard composition: trail records the pre-move position, collision
    /// and walls see the post-move position.
    pub fn canonical(arena: Arena, trace_length: usize) -> Vec<TraitUnit> {
        vec![
            TraitUnit::Trailing(Trailing::new(trace_length)),
            TraitUnit::LinearMotion(LinearMotion),
            TraitUnit::PairwiseCollision(PairwiseCollision),
            TraitUnit::BoundaryReflection(BoundaryReflection::new(arena)),
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            TraitUnit::Trailing(_) => "trailing",
            TraitUnit::LinearMotion(_) => "linear_motion",
            TraitUnit::PairwiseCollision(_) => "pairwise_collision",
            TraitUnit::BoundaryReflection(_) => "boundary_reflection",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            TraitUnit::Trailing(t) if t.capacity == 0 => Err(ConfigError::InvalidTraceLength),
            _ => Ok(()),
        }
    }
}

impl Behavior for TraitUnit {
    fn on_create(&self, body: &mut Body, registry: &mut Registry<'_>) {
        match self {
            TraitUnit::Trailing(t) => t.on_create(body, registry),
            TraitUnit::LinearMotion(t) => t.on_create(body, registry),
            TraitUnit::PairwiseCollision(t) => t.on_create(body, registry),
            TraitUnit::BoundaryReflection(t) => t.on_create(body, registry),
        }
    }

    fn on_update(&self, ctx: &mut UpdateContext<'_>, dt: f32) {
        match self {
            TraitUnit::Trailing(t) => t.on_update(ctx, dt),
            TraitUnit::LinearMotion(t) => t.on_update(ctx, dt),
            TraitUnit::PairwiseCollision(t) => t.on_update(ctx, dt),
            TraitUnit::BoundaryReflection(t) => t.on_update(ctx, dt),
        }
    }

    fn on_draw(&self, body: &Body, renderer: &mut dyn Renderer) {
        match self {
            TraitUnit::Trailing(t) => t.on_draw(body, renderer),
            TraitUnit::LinearMotion(t) => t.on_draw(body, renderer),
            TraitUnit::PairwiseCollision(t) => t.on_draw(body, renderer),
            TraitUnit::BoundaryReflection(t) => t.on_draw(body, renderer),
        }
    }
}
