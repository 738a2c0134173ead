use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::Vec3;

/// A point mass with a collision radius and no orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Acceleration applied during the last integration step
    pub acceleration: Vec3,
    /// Sphere radius used by particle collisions
    pub radius: f32,
    /// Simulated seconds since creation
    pub age: f32,
    /// RGB color tag for renderers
    pub color: [u8; 3],
    pub(crate) inv_mass: f32,
    pub(crate) force: Vec3,
}

impl Particle {
    /// Creates a particle at the origin.
    ///
    /// `mass` must be positive (use `f32::INFINITY` for an immovable particle)
    /// and `radius` positive and finite.
    pub fn new(mass: f32, radius: f32) -> Result<Self> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "particle mass must be positive, got {mass}"
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "particle radius must be positive and finite, got {radius}"
            )));
        }

        Ok(Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            radius,
            age: 0.0,
            color: [255, 255, 255],
            inv_mass: if mass.is_finite() { 1.0 / mass } else { 0.0 },
            force: Vec3::ZERO,
        })
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Force accumulated since the last integration
    #[inline]
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_creation() {
        let p = Particle::new(2.0, 0.5)
            .unwrap()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_velocity(Vec3::X);

        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.velocity, Vec3::X);
        assert!((p.inv_mass() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_infinite_mass_is_immovable() {
        let p = Particle::new(f32::INFINITY, 1.0).unwrap();
        assert_eq!(p.inv_mass(), 0.0);
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert!(Particle::new(0.0, 1.0).is_err());
        assert!(Particle::new(-1.0, 1.0).is_err());
        assert!(Particle::new(f32::NAN, 1.0).is_err());
        assert!(Particle::new(1.0, 0.0).is_err());
        assert!(Particle::new(1.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_forces_accumulate() {
        let mut p = Particle::new(1.0, 1.0).unwrap();
        p.add_force(Vec3::X);
        p.add_force(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(p.accumulated_force(), Vec3::new(1.0, 2.0, 0.0));
        p.clear_forces();
        assert_eq!(p.accumulated_force(), Vec3::ZERO);
    }
}
