//! World: owns bodies and the collidable roster

use super::behavior::{Behavior, Registry, TraitUnit};
use super::body::{Body, BodyConfig, BodyId};
use super::collision::ResolvedPairs;
use crate::error::ConfigError;
use crate::render::Renderer;

/// The live simulation roster plus the collidable subset
#[derive(Debug)]
pub struct World {
    /// Insertion order (and therefore ascending id order)
    pub(crate) bodies: Vec<Body>,
    /// Insertion order; decides pair discovery order
    pub(crate) collidable: Vec<BodyId>,
    /// Pairs handled during the current step
    pub(crate) resolved: ResolvedPairs,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            collidable: Vec::new(),
            resolved: ResolvedPairs::new(),
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build a body, run its create hooks and append it to the roster
    pub fn spawn(
        &mut self,
        config: BodyConfig,
        traits: Vec<TraitUnit>,
    ) -> Result<BodyId, ConfigError> {
        let id = self.next_body_id();
        let mut body = Body::new(id, config, traits)?;

        let mut registry = Registry {
            collidable: &mut self.collidable,
        };
        let units = body.traits().to_vec();
        for unit in &units {
            unit.on_create(&mut body, &mut registry);
        }

        log::info!(
            "Spawned body {} at ({:.2}, {:.2}) r={} m={}{}",
            id.0,
            body.pos.x,
            body.pos.y,
            body.radius,
            body.mass,
            if body.fixed { " [fixed]" } else { "" }
        );
        self.bodies.push(body);
        Ok(id)
    }

    /// Remove a body from both rosters
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let index = self.index_of(id)?;
        self.collidable.retain(|&c| c != id);
        let body = self.bodies.remove(index);
        log::info!("Removed body {}", id.0);
        Some(body)
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id()).ok()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    /// Bodies in roster order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Collidable roster in registration order
    pub fn collidable(&self) -> &[BodyId] {
        &self.collidable
    }

    pub fn is_collidable(&self, id: BodyId) -> bool {
        self.collidable.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Pairs handled during the most recent step
    pub fn resolved_pairs(&self) -> &ResolvedPairs {
        &self.resolved
    }

    /// Draw every body in roster order (later bodies on top)
    pub fn render(&self, renderer: &mut dyn Renderer) {
        for body in &self.bodies {
            body.render(renderer);
        }
    }
}
