use crate::collision::contact::Contact;
use crate::geometry::OrientedBox;
use crate::math::Vec3;

/// Sphere overlap test.
///
/// The normal points from sphere `b` toward sphere `a`. Coincident centers
/// have no separating direction and yield a zero normal, which resolution
/// rejects as degenerate.
pub fn intersect(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<Contact> {
    let delta = center_a - center_b;
    let distance = delta.magnitude();
    let radii = radius_a + radius_b;
    if distance >= radii {
        return None;
    }

    let normal = delta.try_normalized().unwrap_or(Vec3::ZERO);
    let depth = radii - distance;
    let point = center_b + normal * (radius_b - 0.5 * depth);
    Some(Contact::new(point, normal, depth))
}

/// Sphere against an oriented box.
///
/// Uses the point of the box closest to the sphere center. The normal points
/// from the box toward the sphere. A center inside the box is pushed out
/// through the nearest face, with faces tried in
/// [`OrientedBox::face_normals`] order.
pub fn intersect_box(center: Vec3, radius: f32, obb: &OrientedBox) -> Option<Contact> {
    let local = center - obb.center;
    let h = [obb.half_extents.x, obb.half_extents.y, obb.half_extents.z];

    let mut closest = obb.center;
    for (axis, &half) in obb.axes.iter().zip(h.iter()) {
        closest += *axis * local.dot(*axis).clamp(-half, half);
    }

    let delta = center - closest;
    let distance = delta.magnitude();
    if distance >= radius {
        return None;
    }
    if let Some(normal) = delta.try_normalized() {
        return Some(Contact::new(closest, normal, radius - distance));
    }

    // Center inside the box.
    let normals = obb.face_normals();
    let mut best = (0, f32::INFINITY);
    for (i, n) in normals.iter().enumerate() {
        let gap = h[i % 3] - local.dot(*n);
        if gap < best.1 {
            best = (i, gap);
        }
    }
    let (face, gap) = best;
    let normal = normals[face];
    Some(Contact::new(center + normal * gap, normal, radius + gap))
}
