use crate::collision::contact::Contact;
use crate::dynamics::{Body, SimBody};
use crate::error::{PhysicsError, Result};
use crate::math::Vec3;

/// Parameters for contact resolution, taken from the world configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionParams {
    /// Fraction of the pre-contact speed returned along the normal
    pub restitution: f32,
    /// Elapsed time of the frame being resolved
    pub frame_time: f32,
    /// Used instead of `frame_time` when that is zero
    pub fallback_frame_time: f32,
}

impl ResolutionParams {
    #[inline]
    fn effective_frame_time(&self) -> f32 {
        if self.frame_time > 0.0 {
            self.frame_time
        } else {
            self.fallback_frame_time
        }
    }
}

/// Separates two bodies along a contact and corrects their velocities.
///
/// `contact.normal` must point from `b` toward `a`. Every correction is
/// computed from the state before resolution, then applied to both bodies.
///
/// - Position: the penetration is split by inverse mass, so
///   `shift_a / shift_b = mass_b / mass_a` and immovable bodies stay put.
/// - Velocity, particle pairs: a restitution impulse along the normal.
/// - Velocity, otherwise: each movable body receives a force
///   `normal * restitution * max(|v|, |ω|) / frame_time` at the contact point,
///   which also spins rigid bodies hit off-center.
pub fn resolve_contact(
    a: &mut SimBody,
    b: &mut SimBody,
    contact: &Contact,
    params: &ResolutionParams,
) -> Result<()> {
    let normal = contact.normal;
    if !normal.is_finite() || normal.magnitude_squared() < 1e-12 {
        return Err(PhysicsError::DegenerateGeometry {
            context: "near-zero contact normal",
        });
    }

    let wa = a.as_body().inv_mass();
    let wb = b.as_body().inv_mass();
    let total = wa + wb;
    if total <= 0.0 {
        return Ok(());
    }

    let shift_a = normal * (contact.depth * wa / total);
    let shift_b = -normal * (contact.depth * wb / total);

    match (a, b) {
        (SimBody::Particle(pa), SimBody::Particle(pb)) => {
            let closing = normal.dot(pa.velocity - pb.velocity);
            pa.position += shift_a;
            pb.position += shift_b;
            if closing < 0.0 {
                let k = -closing * (params.restitution + 1.0) / total;
                pa.velocity += normal * (k * wa);
                pb.velocity -= normal * (k * wb);
            }
        }
        (a, b) => {
            let force_a = response_force(a.as_body(), normal, params);
            let force_b = response_force(b.as_body(), -normal, params);

            let body_a = a.as_body_mut();
            body_a.set_position(body_a.position() + shift_a);
            if wa > 0.0 {
                body_a.add_force_at_point(force_a, contact.point);
            }

            let body_b = b.as_body_mut();
            body_b.set_position(body_b.position() + shift_b);
            if wb > 0.0 {
                body_b.add_force_at_point(force_b, contact.point);
            }
        }
    }

    Ok(())
}

/// Force pushing `body` along `direction`, scaled by its own speed
fn response_force(body: &dyn Body, direction: Vec3, params: &ResolutionParams) -> Vec3 {
    let intensity = body
        .velocity()
        .magnitude()
        .max(body.angular_velocity().magnitude());
    direction * (params.restitution * intensity * body.integration_mass() / params.effective_frame_time())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{Particle, RigidBody};
    use crate::geometry::Shape;

    const PARAMS: ResolutionParams = ResolutionParams {
        restitution: 0.9,
        frame_time: 0.5,
        fallback_frame_time: 1.0 / 60.0,
    };

    fn cuboid(mass: f32, x: f32) -> SimBody {
        RigidBody::new(Shape::cuboid(Vec3::splat(0.5)), mass)
            .unwrap()
            .with_position(Vec3::new(x, 0.0, 0.0))
            .into()
    }

    fn position(body: &SimBody) -> Vec3 {
        body.as_body().position()
    }

    #[test]
    fn test_mass_weighted_position_correction() {
        let (m1, m2) = (2.0, 6.0);
        let mut a = cuboid(m1, 0.0);
        let mut b = cuboid(m2, 0.8);
        let contact = Contact::new(Vec3::new(0.3, 0.0, 0.0), -Vec3::X, 0.2);

        resolve_contact(&mut a, &mut b, &contact, &PARAMS).unwrap();

        let shift_a = position(&a).magnitude();
        let shift_b = (position(&b) - Vec3::new(0.8, 0.0, 0.0)).magnitude();
        assert!((shift_a / shift_b - m2 / m1).abs() < 1e-4);
        assert!((shift_a + shift_b - 0.2).abs() < 1e-5);
        // Pushed apart, not together.
        assert!(position(&a).x < 0.0);
        assert!(position(&b).x > 0.8);
    }

    #[test]
    fn test_immovable_body_does_not_move() {
        let mut wall: SimBody = RigidBody::fixed(Shape::cuboid(Vec3::ONE)).unwrap().into();
        let mut a = cuboid(1.0, 1.4);
        let contact = Contact::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X, 0.1);

        resolve_contact(&mut a, &mut wall, &contact, &PARAMS).unwrap();
        assert!((position(&a).x - 1.5).abs() < 1e-6);
        assert_eq!(position(&wall), Vec3::ZERO);
    }

    #[test]
    fn test_response_force_uses_own_speed() {
        let mut a = cuboid(1.0, 0.0);
        a.as_body_mut().set_velocity(Vec3::new(2.0, 0.0, 0.0));
        let mut b = cuboid(1.0, 0.8);
        let contact = Contact::new(Vec3::new(0.3, 0.0, 0.0), -Vec3::X, 0.2);

        resolve_contact(&mut a, &mut b, &contact, &PARAMS).unwrap();

        let force_a = a.as_rigid().unwrap().accumulated_force();
        // -X * 0.9 * 2 / 0.5
        assert!((force_a - Vec3::new(-3.6, 0.0, 0.0)).magnitude() < 1e-5);
        // B was at rest, so it only gets the positional push.
        assert_eq!(b.as_rigid().unwrap().accumulated_force(), Vec3::ZERO);
    }

    #[test]
    fn test_off_center_contact_spins() {
        let mut a = cuboid(1.0, 0.0);
        a.as_body_mut().set_velocity(Vec3::new(1.0, 0.0, 0.0));
        let mut b = cuboid(1.0, 0.8);
        let contact = Contact::new(Vec3::new(0.3, 0.5, 0.0), -Vec3::X, 0.2);

        resolve_contact(&mut a, &mut b, &contact, &PARAMS).unwrap();
        assert!(a.as_rigid().unwrap().accumulated_torque().z > 0.0);
    }

    #[test]
    fn test_zero_frame_time_uses_fallback() {
        let params = ResolutionParams {
            frame_time: 0.0,
            ..PARAMS
        };
        let mut a = cuboid(1.0, 0.0);
        a.as_body_mut().set_velocity(Vec3::new(1.0, 0.0, 0.0));
        let mut b = cuboid(1.0, 0.8);
        let contact = Contact::new(Vec3::new(0.3, 0.0, 0.0), -Vec3::X, 0.2);

        resolve_contact(&mut a, &mut b, &contact, &params).unwrap();
        let force = a.as_rigid().unwrap().accumulated_force();
        assert!((force.x + 0.9 * 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_normal_is_skipped() {
        let mut a = cuboid(1.0, 0.0);
        let mut b = cuboid(1.0, 0.0);
        let contact = Contact::new(Vec3::ZERO, Vec3::ZERO, 1.0);

        let result = resolve_contact(&mut a, &mut b, &contact, &PARAMS);
        assert!(matches!(result, Err(PhysicsError::DegenerateGeometry { .. })));
        assert_eq!(position(&a), Vec3::ZERO);
        assert_eq!(position(&b), Vec3::ZERO);
    }

    #[test]
    fn test_particle_restitution_impulse() {
        let mut p: SimBody = Particle::new(1.0, 0.5)
            .unwrap()
            .with_velocity(Vec3::new(1.0, 0.0, 0.0))
            .into();
        let mut q: SimBody = Particle::new(1.0, 0.5)
            .unwrap()
            .with_position(Vec3::new(0.9, 0.0, 0.0))
            .with_velocity(Vec3::new(-1.0, 0.0, 0.0))
            .into();
        let contact = Contact::new(Vec3::new(0.45, 0.0, 0.0), -Vec3::X, 0.1);
        let params = ResolutionParams {
            restitution: 1.0,
            ..PARAMS
        };

        resolve_contact(&mut p, &mut q, &contact, &params).unwrap();

        // Equal masses with full restitution swap velocities.
        assert!((p.as_body().velocity() - Vec3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-5);
        assert!((q.as_body().velocity() - Vec3::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
        assert!((position(&q).x - position(&p).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_separating_particles_keep_velocity() {
        let mut p: SimBody = Particle::new(1.0, 0.5)
            .unwrap()
            .with_velocity(Vec3::new(-1.0, 0.0, 0.0))
            .into();
        let mut q: SimBody = Particle::new(1.0, 0.5)
            .unwrap()
            .with_position(Vec3::new(0.9, 0.0, 0.0))
            .into();
        let contact = Contact::new(Vec3::new(0.45, 0.0, 0.0), -Vec3::X, 0.1);

        resolve_contact(&mut p, &mut q, &contact, &PARAMS).unwrap();
        assert_eq!(p.as_body().velocity(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(q.as_body().velocity(), Vec3::ZERO);
    }
}
