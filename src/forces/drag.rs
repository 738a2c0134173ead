use serde::{Deserialize, Serialize};

use crate::dynamics::{Body, BodySnapshot};

use super::ForceGenerator;

/// Velocity-proportional friction: `-v (k1 + k2 |v|)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    /// Linear coefficient k1
    pub k1: f32,
    /// Quadratic coefficient k2
    pub k2: f32,
}

impl Drag {
    pub fn new(k1: f32, k2: f32) -> Self {
        Self { k1, k2 }
    }
}

impl Default for Drag {
    fn default() -> Self {
        Self::new(0.1, 0.2)
    }
}

impl ForceGenerator for Drag {
    fn update_force(&self, body: &mut dyn Body, _dt: f32, _snapshot: &BodySnapshot) {
        let velocity = body.velocity();
        let speed = velocity.magnitude();
        if speed == 0.0 {
            return;
        }
        body.add_force(-velocity * (self.k1 + self.k2 * speed));
    }
}
