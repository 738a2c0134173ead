//! Force generators and the per-tick registry that applies them.

mod drag;
mod gravity;
mod registry;
mod spring;

pub use drag::Drag;
pub use gravity::Gravity;
pub use registry::ForceRegistry;
pub use spring::{AnchoredSpring, Rod, Spring, Wire};

use crate::dynamics::{Body, BodySnapshot};

/// A source of force.
///
/// `update_force` is called once per tick for every body the generator is
/// registered against. It must only add to the body's accumulators. Other
/// bodies are read through `snapshot`, which holds positions from before any
/// generator ran this tick.
pub trait ForceGenerator {
    fn update_force(&self, body: &mut dyn Body, dt: f32, snapshot: &BodySnapshot);
}
