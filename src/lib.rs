//! # forcebox
//!
//! A small real-time physics sandbox for particles and rigid bodies.
//!
//! ## Features
//!
//! - **Dynamics**: explicit Euler integration of particles and rigid bodies,
//!   with quaternion orientation and world-space inertia tensors
//! - **Forces**: pluggable force generators (gravity, drag, springs, rods,
//!   wires) applied through a per-tick registry
//! - **Shapes**: cuboids and cones with analytic inertia, including
//!   center-of-mass offsets via the parallel-axis theorem
//! - **Broad Phase**: an octree rebuilt every tick
//! - **Narrow Phase**: oriented box corner test and bounding-sphere fallback,
//!   resolved with mass-weighted separation and contact forces
//!
//! ## Quick Start
//!
//! ```rust
//! use forcebox::prelude::*;
//!
//! let config = SimulationConfig {
//!     gravity_enabled: true,
//!     ..SimulationConfig::default()
//! };
//! let mut world = World::new(config).unwrap();
//!
//! // An immovable floor and a box dropped onto it
//! world
//!     .add_object(ObjectDesc::cuboid(Vec3::new(10.0, 0.5, 10.0)).fixed())
//!     .unwrap();
//! let crate_box = world
//!     .add_object(ObjectDesc::cuboid(Vec3::splat(0.5)).with_position(Vec3::new(0.0, 5.0, 0.0)))
//!     .unwrap();
//!
//! let dt = 1.0 / 60.0;
//! for _ in 0..120 {
//!     world.step(dt);
//! }
//!
//! for transform in world.query_transforms() {
//!     println!("{:?} at {:?}", transform.handle, transform.position);
//! }
//! assert!(world.body(crate_box).is_some());
//! ```

pub mod collision;
pub mod dynamics;
pub mod error;
pub mod forces;
pub mod geometry;
pub mod math;
mod world;

pub use error::{PhysicsError, Result};
pub use world::{
    BodyTransform, CollisionCounts, ForceLink, ObjectDesc, ObjectKind, SimulationConfig, World,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{BodyHandle, CollisionPair, Contact, Octree};
    pub use crate::dynamics::{Body, Particle, RigidBody, SimBody};
    pub use crate::error::PhysicsError;
    pub use crate::forces::{AnchoredSpring, Drag, ForceGenerator, Gravity, Rod, Spring, Wire};
    pub use crate::geometry::{Aabb, MassProperties, Shape, ShapeType};
    pub use crate::math::{Mat3, Mat4, Quat, Vec3};
    pub use crate::world::{
        BodyTransform, CollisionCounts, ForceLink, ObjectDesc, ObjectKind, SimulationConfig, World,
    };
}
