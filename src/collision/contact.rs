use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Identifies a body in the world.
///
/// Handles are never reused; once a body is gone its handle stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Broad-phase candidate. `body_a < body_b`, so sorting pairs sorts them
/// by the lower handle first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

impl CollisionPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        let (body_a, body_b) = if a <= b { (a, b) } else { (b, a) };
        Self { body_a, body_b }
    }
}

/// A single contact between two bodies.
///
/// The normal is a unit vector pointing from the second body toward the
/// first, so moving the first body along `normal` separates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// World-space contact point
    pub point: Vec3,
    pub normal: Vec3,
    /// Penetration depth (positive when overlapping)
    pub depth: f32,
}

impl Contact {
    pub fn new(point: Vec3, normal: Vec3, depth: f32) -> Self {
        Self { point, normal, depth }
    }

    /// The same contact seen from the other body
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}
