mod body;
mod body_set;
mod integrator;
mod particle;
mod rigid_body;

pub use body::{Body, SimBody};
pub use body_set::{BodySet, BodySnapshot};
pub use integrator::{integrate_particle, integrate_rigid_body};
pub use particle::Particle;
pub use rigid_body::RigidBody;
