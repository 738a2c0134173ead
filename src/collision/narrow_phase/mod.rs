pub mod box_box;
pub mod sphere;

use crate::collision::contact::Contact;
use crate::dynamics::SimBody;
use crate::geometry::{OrientedBox, Shape};

fn oriented_box(body: &SimBody) -> Option<OrientedBox> {
    let rigid = body.as_rigid()?;
    match rigid.shape() {
        Shape::Cuboid(cuboid) => Some(cuboid.oriented(rigid.position, rigid.rotation)),
        Shape::Cone(_) => None,
    }
}

/// Exact contact test for a candidate pair.
///
/// Box pairs use the oriented corner test and particles against boxes use
/// the closest point on the box. Pairs involving a cone, and particle pairs,
/// fall back to bounding spheres about the body origins. The returned normal
/// points from `b` toward `a`.
pub fn collide(a: &SimBody, b: &SimBody) -> Option<Contact> {
    match (a, oriented_box(a), b, oriented_box(b)) {
        (_, Some(box_a), _, Some(box_b)) => box_box::collide(&box_a, &box_b),
        (SimBody::Particle(p), _, _, Some(box_b)) => {
            sphere::intersect_box(p.position, p.radius, &box_b)
        }
        (_, Some(box_a), SimBody::Particle(p), _) => {
            sphere::intersect_box(p.position, p.radius, &box_a).map(Contact::flipped)
        }
        _ => sphere::intersect(
            a.as_body().position(),
            a.bounding_radius(),
            b.as_body().position(),
            b.bounding_radius(),
        ),
    }
}
