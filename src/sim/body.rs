//! Body entity: configuration, trail and its ordered behavior units

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behavior::{Behavior, TraitUnit};
use crate::error::ConfigError;
use crate::heading;
use crate::render::{Color, Renderer};

/// Stable handle for a body within one world (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Construction parameters for a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    /// World units, origin at arena center
    pub pos: Vec2,
    /// World units per millisecond
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    #[serde(default)]
    pub color: Color,
    /// Collision response never changes this body's velocity
    #[serde(default)]
    pub fixed: bool,
}

impl BodyConfig {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            mass,
            color: Color::default(),
            fixed: false,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Reject values that make the physics meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if !self.pos.is_finite() {
            return Err(ConfigError::NonFinitePosition);
        }
        if !self.vel.is_finite() {
            return Err(ConfigError::NonFiniteVelocity);
        }
        Ok(())
    }
}

/// A simulated circular body
#[derive(Debug, Clone)]
pub struct Body {
    id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub color: Color,
    pub fixed: bool,
    /// Past positions, oldest first
    trail: VecDeque<Vec2>,
    /// Behavior units, invoked in this order every frame
    traits: Vec<TraitUnit>,
}

impl Body {
    pub(crate) fn new(
        id: BodyId,
        config: BodyConfig,
        traits: Vec<TraitUnit>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        for unit in &traits {
            unit.validate()?;
        }
        Ok(Self {
            id,
            pos: config.pos,
            vel: config.vel,
            radius: config.radius,
            mass: config.mass,
            color: config.color,
            fixed: config.fixed,
            trail: VecDeque::new(),
            traits,
        })
    }

    /// Stable handle assigned by the owning world
    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Heading of the velocity in radians
    #[inline]
    pub fn heading(&self) -> f32 {
        heading(self.vel)
    }

    /// Velocity magnitude (world units per ms)
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Momentum vector
    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    /// Kinetic energy
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    pub fn traits(&self) -> &[TraitUnit] {
        &self.traits
    }

    /// Trail positions, oldest first
    pub fn trail(&self) -> &VecDeque<Vec2> {
        &self.trail
    }

    /// Append a position and drop the oldest entries beyond `capacity`
    pub fn record_trail(&mut self, pos: Vec2, capacity: usize) {
        self.trail.push_back(pos);
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Draw every unit's layer, then the solid body on top
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for unit in &self.traits {
            unit.on_draw(self, renderer);
        }
        renderer.fill_circle(self.pos, self.radius, self.color, 1.0);
    }
}
