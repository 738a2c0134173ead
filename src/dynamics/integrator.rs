use crate::error::{PhysicsError, Result};
use crate::math::Vec3;

use super::particle::Particle;
use super::rigid_body::RigidBody;

/// Advances a particle by one explicit Euler step.
///
/// `velocity += (force / mass) * dt`, then `position += velocity * dt`. The
/// accumulated force is cleared whether or not the step is committed; a
/// non-finite result leaves position and velocity untouched.
pub fn integrate_particle(particle: &mut Particle, dt: f32) -> Result<()> {
    particle.age += dt;

    if particle.inv_mass == 0.0 {
        particle.clear_forces();
        return Ok(());
    }

    let acceleration = particle.force * particle.inv_mass;
    let velocity = particle.velocity + acceleration * dt;
    let position = particle.position + velocity * dt;
    particle.clear_forces();

    if !(acceleration.is_finite() && velocity.is_finite() && position.is_finite()) {
        return Err(PhysicsError::DegenerateGeometry {
            context: "non-finite particle integration",
        });
    }

    particle.acceleration = acceleration;
    particle.velocity = velocity;
    particle.position = position;
    Ok(())
}

/// Advances a rigid body by one step.
///
/// Linear: `v += force * dt` (forces are already accelerations),
/// `x += v * dt`. Angular: the world inverse inertia is refreshed from the
/// current orientation, `ω += (I⁻¹ τ) * dt`, then the orientation is
/// integrated with `ω` and re-normalized. Accumulators are always cleared;
/// the new state is committed only when every component is finite.
pub fn integrate_rigid_body(body: &mut RigidBody, dt: f32) -> Result<()> {
    if body.inv_mass == 0.0 {
        body.clear_forces();
        return Ok(());
    }

    body.update_world_inertia();

    let linear_acceleration = body.force;
    let linear_velocity = body.linear_velocity + linear_acceleration * dt;
    let position = body.position + linear_velocity * dt;

    let angular_acceleration = body.inv_inertia_world * body.torque;
    let angular_velocity = body.angular_velocity + angular_acceleration * dt;
    let rotation = body.rotation.integrate_angular(angular_velocity, dt);

    body.clear_forces();

    let finite = [linear_acceleration, linear_velocity, position, angular_acceleration, angular_velocity]
        .iter()
        .all(|v: &Vec3| v.is_finite())
        && rotation.is_finite();
    if !finite {
        return Err(PhysicsError::DegenerateGeometry {
            context: "non-finite rigid body integration",
        });
    }

    body.linear_acceleration = linear_acceleration;
    body.linear_velocity = linear_velocity;
    body.position = position;
    body.angular_acceleration = angular_acceleration;
    body.angular_velocity = angular_velocity;
    body.rotation = rotation;
    body.update_world_inertia();
    Ok(())
}
