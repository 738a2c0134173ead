use crate::collision::contact::Contact;
use crate::geometry::OrientedBox;
use crate::math::consts::CONTACT_EPSILON;
use crate::math::Vec3;

/// Tests whether a corner of `first` lies inside `second`.
///
/// The first corner (in [`OrientedBox::corners`] order) that is on the inner
/// side of all six face planes of `second` becomes the contact point. The
/// contact normal is the outward normal of the face of `second` that `first`
/// penetrates least deeply, so it points from `second` toward `first`. Faces
/// are tried in the order +X, +Y, +Z, -X, -Y, -Z and the first minimum wins.
///
/// The test is not symmetric: a pair that only touches with corners of
/// `second` reports nothing here, see [`collide`].
pub fn intersect(first: &OrientedBox, second: &OrientedBox) -> Option<Contact> {
    let corners = first.corners();
    let face_points = second.face_points();
    let face_normals = second.face_normals();

    let inside = |corner: Vec3| {
        face_points
            .iter()
            .zip(face_normals.iter())
            .all(|(&f, &n)| (corner - f).dot(n) <= CONTACT_EPSILON)
    };
    let point = corners.iter().copied().find(|&c| inside(c))?;

    let mut best: Option<(usize, f32)> = None;
    for (i, (&f, &n)) in face_points.iter().zip(face_normals.iter()).enumerate() {
        // Distance `first` has to travel along `n` to clear this face plane.
        let deepest = corners
            .iter()
            .map(|c| c.dot(n))
            .fold(f32::INFINITY, f32::min);
        let depth = f.dot(n) - deepest;
        if best.map_or(true, |(_, d)| depth < d) {
            best = Some((i, depth));
        }
    }

    let (face, depth) = best?;
    Some(Contact::new(point, face_normals[face], depth.max(0.0)))
}

/// Single contact for a box pair.
///
/// Tries corners of `a` inside `b` first, then corners of `b` inside `a`
/// (flipped so the normal still points toward `a`).
pub fn collide(a: &OrientedBox, b: &OrientedBox) -> Option<Contact> {
    intersect(a, b).or_else(|| intersect(b, a).map(Contact::flipped))
}
