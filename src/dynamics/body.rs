use crate::error::Result;
use crate::geometry::{Aabb, Shape};
use crate::math::{Mat3, Quat, Vec3};

use super::integrator::{integrate_particle, integrate_rigid_body};
use super::particle::Particle;
use super::rigid_body::RigidBody;

/// Capabilities shared by everything the world simulates.
///
/// Force generators and collision resolution only talk to bodies through
/// this trait.
pub trait Body {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    fn angular_velocity(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Inverse mass; 0 marks an immovable body
    fn inv_mass(&self) -> f32;

    fn mass(&self) -> f32 {
        let inv_mass = self.inv_mass();
        if inv_mass > 0.0 {
            1.0 / inv_mass
        } else {
            f32::INFINITY
        }
    }

    fn is_immovable(&self) -> bool {
        self.inv_mass() == 0.0
    }

    /// Mass the integrator divides accumulated force by.
    ///
    /// Generators that want a uniform acceleration (gravity) scale their force
    /// by this value.
    fn integration_mass(&self) -> f32;

    fn add_force(&mut self, force: Vec3);

    /// Adds a force applied at a world point
    fn add_force_at_point(&mut self, force: Vec3, point: Vec3);

    fn inv_inertia_world(&self) -> Mat3 {
        Mat3::ZERO
    }

    /// Advances the body by `dt` and clears its accumulators
    fn integrate(&mut self, dt: f32) -> Result<()>;
}

impl Body for Particle {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    fn integration_mass(&self) -> f32 {
        self.mass()
    }

    fn add_force(&mut self, force: Vec3) {
        Particle::add_force(self, force);
    }

    fn add_force_at_point(&mut self, force: Vec3, _point: Vec3) {
        Particle::add_force(self, force);
    }

    fn integrate(&mut self, dt: f32) -> Result<()> {
        integrate_particle(self, dt)
    }
}

impl Body for RigidBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.linear_velocity = velocity;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    fn integration_mass(&self) -> f32 {
        1.0
    }

    fn add_force(&mut self, force: Vec3) {
        RigidBody::add_force(self, force);
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        RigidBody::add_force_at_point(self, force, point);
    }

    fn inv_inertia_world(&self) -> Mat3 {
        self.inv_inertia_world
    }

    fn integrate(&mut self, dt: f32) -> Result<()> {
        integrate_rigid_body(self, dt)
    }
}

/// A body owned by the world: either a particle or a rigid body.
#[derive(Debug, Clone, PartialEq)]
pub enum SimBody {
    Particle(Particle),
    Rigid(RigidBody),
}

impl SimBody {
    #[inline]
    pub fn as_body(&self) -> &dyn Body {
        match self {
            SimBody::Particle(p) => p,
            SimBody::Rigid(r) => r,
        }
    }

    #[inline]
    pub fn as_body_mut(&mut self) -> &mut dyn Body {
        match self {
            SimBody::Particle(p) => p,
            SimBody::Rigid(r) => r,
        }
    }

    pub fn as_particle(&self) -> Option<&Particle> {
        match self {
            SimBody::Particle(p) => Some(p),
            SimBody::Rigid(_) => None,
        }
    }

    pub fn as_rigid(&self) -> Option<&RigidBody> {
        match self {
            SimBody::Rigid(r) => Some(r),
            SimBody::Particle(_) => None,
        }
    }

    pub fn as_rigid_mut(&mut self) -> Option<&mut RigidBody> {
        match self {
            SimBody::Rigid(r) => Some(r),
            SimBody::Particle(_) => None,
        }
    }

    /// Composed geometry; particles have none
    pub fn shape(&self) -> Option<&Shape> {
        self.as_rigid().map(RigidBody::shape)
    }

    pub fn rotation(&self) -> Quat {
        match self {
            SimBody::Particle(_) => Quat::IDENTITY,
            SimBody::Rigid(r) => r.rotation,
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            SimBody::Particle(p) => p.color,
            SimBody::Rigid(r) => r.color,
        }
    }

    /// Radius of the sphere about the body origin enclosing the body
    pub fn bounding_radius(&self) -> f32 {
        match self {
            SimBody::Particle(p) => p.radius,
            SimBody::Rigid(r) => r.bounding_radius(),
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self {
            SimBody::Particle(p) => Aabb::from_center_half_extents(p.position, Vec3::splat(p.radius)),
            SimBody::Rigid(r) => r.aabb(),
        }
    }

    /// Full size along each local axis, for renderers
    pub fn extents(&self) -> Vec3 {
        match self {
            SimBody::Particle(p) => Vec3::splat(2.0 * p.radius),
            SimBody::Rigid(r) => r.shape().extents(),
        }
    }
}

impl From<Particle> for SimBody {
    fn from(particle: Particle) -> Self {
        SimBody::Particle(particle)
    }
}

impl From<RigidBody> for SimBody {
    fn from(body: RigidBody) -> Self {
        SimBody::Rigid(body)
    }
}
