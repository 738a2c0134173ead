use serde::{Deserialize, Serialize};

use crate::dynamics::{Body, BodySnapshot};
use crate::math::Vec3;

use super::ForceGenerator;

/// Uniform gravitational field.
///
/// The force is scaled by the mass the body's integrator divides by, so every
/// body accelerates at `acceleration` regardless of its mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gravity {
    pub acceleration: Vec3,
}

impl Gravity {
    pub fn new(acceleration: Vec3) -> Self {
        Self { acceleration }
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl ForceGenerator for Gravity {
    fn update_force(&self, body: &mut dyn Body, _dt: f32, _snapshot: &BodySnapshot) {
        if body.is_immovable() {
            return;
        }
        let force = self.acceleration * body.integration_mass();
        body.add_force(force);
    }
}
