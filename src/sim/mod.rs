//! Deterministic simulation module
//!
//! Bodies are composed from behavior units and advanced by a single-threaded
//! step:
//! - Stable iteration order (roster insertion order)
//! - Each unit's hooks run in the body's unit order
//! - No rendering or platform dependencies beyond the `Renderer` trait

pub mod behavior;
pub mod body;
pub mod boundary;
pub mod collision;
pub mod motion;
pub mod step;
pub mod trailing;
pub mod world;

pub use behavior::{Behavior, Registry, TraitUnit, UpdateContext};
pub use body::{Body, BodyConfig, BodyId};
pub use boundary::{Arena, BoundaryReflection};
pub use collision::{Contact, PairwiseCollision, ResolvedPairs, elastic_response, overlapping};
pub use motion::LinearMotion;
pub use step::{StepStats, advance, clamp_delta, step};
pub use trailing::Trailing;
pub use world::World;
