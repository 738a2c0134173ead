use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::math::{Mat3, Quat, Vec3};

use super::aabb::Aabb;

/// The kind of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Cuboid,
    Cone,
}

/// Geometry composed into a rigid body.
///
/// Shapes are pure descriptors: they know their extents and can derive an
/// inertia tensor for a given mass, but hold no dynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Cuboid(Cuboid),
    Cone(Cone),
}

impl Shape {
    /// Box from half-extents
    #[inline]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Cuboid(Cuboid::new(half_extents))
    }

    /// Box from full width (x), height (y) and depth (z)
    #[inline]
    pub fn cuboid_from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::Cuboid(Cuboid::new(Vec3::new(width, height, depth) * 0.5))
    }

    /// Solid cone standing along +Y
    #[inline]
    pub fn cone(radius: f32, height: f32) -> Self {
        Self::Cone(Cone::new(radius, height))
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Cuboid(_) => ShapeType::Cuboid,
            Shape::Cone(_) => ShapeType::Cone,
        }
    }

    /// Rejects non-positive and non-finite extents.
    pub fn validate(&self) -> Result<()> {
        let extents = self.extents();
        if !extents.is_finite() || extents.x <= 0.0 || extents.y <= 0.0 || extents.z <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "{:?} extents must be positive and finite, got {:?}",
                self.shape_type(),
                extents
            )));
        }
        Ok(())
    }

    /// Full size along each local axis, as handed to renderers
    #[inline]
    pub fn extents(&self) -> Vec3 {
        match self {
            Shape::Cuboid(b) => b.size(),
            Shape::Cone(c) => Vec3::new(2.0 * c.radius, c.height, 2.0 * c.radius),
        }
    }

    /// Radius of the sphere about the body origin enclosing the whole shape
    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Cuboid(b) => b.half_extents.magnitude(),
            Shape::Cone(c) => c.bounding_radius(),
        }
    }

    /// World-space AABB for a body at `position` with `rotation`
    pub fn world_aabb(&self, position: Vec3, rotation: Quat) -> Aabb {
        match self {
            Shape::Cuboid(b) => b.oriented(position, rotation).aabb(),
            Shape::Cone(c) => Aabb::from_center_half_extents(position, Vec3::splat(c.bounding_radius())),
        }
    }

    /// Body-space mass properties for a body of the given mass
    pub fn mass_properties(&self, mass: f32) -> MassProperties {
        match self {
            Shape::Cuboid(b) => b.mass_properties(mass),
            Shape::Cone(c) => c.mass_properties(mass),
        }
    }
}

/// Mass and body-space inertia tensor about the center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    pub inertia: Mat3,
}

impl MassProperties {
    #[inline]
    pub fn new(mass: f32, inertia_diagonal: Vec3) -> Self {
        Self {
            mass,
            inertia: Mat3::from_diagonal(inertia_diagonal),
        }
    }

    /// Returns the inverse mass (0 for infinite mass)
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.mass > 0.0 && self.mass.is_finite() {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Inverse inertia tensor, `None` when the tensor is singular
    #[inline]
    pub fn inv_inertia(&self) -> Option<Mat3> {
        self.inertia.try_inverse()
    }

    /// Re-expresses the tensor about a point displaced by `offset` from the
    /// current reference point (parallel-axis theorem):
    /// `I' = I + m (|t|² E - t tᵀ)`.
    pub fn shifted(self, offset: Vec3) -> Self {
        let correction =
            Mat3::IDENTITY * offset.magnitude_squared() - Mat3::outer_product(offset, offset);
        Self {
            mass: self.mass,
            inertia: self.inertia + correction * self.mass,
        }
    }
}

/// A box (cuboid) shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cuboid {
    /// Half the width (x), height (y) and depth (z)
    pub half_extents: Vec3,
}

impl Cuboid {
    #[inline]
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// `Ixx = m(h² + d²)/12`, `Iyy = m(w² + d²)/12`, `Izz = m(w² + h²)/12`
    pub fn mass_properties(&self, mass: f32) -> MassProperties {
        let size = self.size();
        let x2 = size.x * size.x;
        let y2 = size.y * size.y;
        let z2 = size.z * size.z;

        MassProperties::new(
            mass,
            Vec3::new(
                (1.0 / 12.0) * mass * (y2 + z2),
                (1.0 / 12.0) * mass * (x2 + z2),
                (1.0 / 12.0) * mass * (x2 + y2),
            ),
        )
    }

    /// Places this box in the world
    #[inline]
    pub fn oriented(&self, center: Vec3, rotation: Quat) -> OrientedBox {
        OrientedBox {
            center,
            axes: [rotation.local_x(), rotation.local_y(), rotation.local_z()],
            half_extents: self.half_extents,
        }
    }
}

/// A solid cone of `radius` at the base and `height` along +Y.
///
/// The body origin sits at the centroid, a quarter of the height above the base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    pub radius: f32,
    pub height: f32,
}

impl Cone {
    #[inline]
    pub fn new(radius: f32, height: f32) -> Self {
        Self { radius, height }
    }

    pub fn bounding_radius(&self) -> f32 {
        let apex = 0.75 * self.height;
        let rim = (self.radius * self.radius + (0.25 * self.height).powi(2)).sqrt();
        apex.max(rim)
    }

    /// Inertia about the centroid:
    /// `Ixx = Izz = m(3r²/20 + 3h²/80)`, `Iyy = 3mr²/10`
    pub fn mass_properties(&self, mass: f32) -> MassProperties {
        let r2 = self.radius * self.radius;
        let h2 = self.height * self.height;
        let lateral = mass * (3.0 * r2 / 20.0 + 3.0 * h2 / 80.0);
        MassProperties::new(mass, Vec3::new(lateral, 0.3 * mass * r2, lateral))
    }
}

/// A box placed in world space: center, unit local axes and half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub half_extents: Vec3,
}

impl OrientedBox {
    /// The 8 world-space corners. Index bit 0 picks +X, bit 1 +Y, bit 2 +Z.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
            *corner = self.center
                + self.axes[0] * (sign(1) * self.half_extents.x)
                + self.axes[1] * (sign(2) * self.half_extents.y)
                + self.axes[2] * (sign(4) * self.half_extents.z);
        }
        corners
    }

    /// Outward unit normals of the 6 faces, ordered +X, +Y, +Z, -X, -Y, -Z
    pub fn face_normals(&self) -> [Vec3; 6] {
        [
            self.axes[0],
            self.axes[1],
            self.axes[2],
            -self.axes[0],
            -self.axes[1],
            -self.axes[2],
        ]
    }

    /// World-space centers of the 6 faces, in [`OrientedBox::face_normals`] order
    pub fn face_points(&self) -> [Vec3; 6] {
        let h = [self.half_extents.x, self.half_extents.y, self.half_extents.z];
        let normals = self.face_normals();
        let mut points = [Vec3::ZERO; 6];
        for (i, point) in points.iter_mut().enumerate() {
            *point = self.center + normals[i] * h[i % 3];
        }
        points
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(&self.corners())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_box_inertia() {
        let props = Shape::cuboid_from_size(2.0, 4.0, 6.0).mass_properties(12.0);
        assert!(vec3_approx_eq(props.inertia.diagonal(), Vec3::new(52.0, 40.0, 20.0)));
        assert!(approx_eq(props.inv_mass(), 1.0 / 12.0));
    }

    #[test]
    fn test_cone_inertia() {
        let props = Shape::cone(1.0, 4.0).mass_properties(10.0);
        let lateral = 10.0 * (3.0 / 20.0 + 3.0 * 16.0 / 80.0);
        assert!(vec3_approx_eq(props.inertia.diagonal(), Vec3::new(lateral, 3.0, lateral)));
    }

    #[test]
    fn test_parallel_axis_shift() {
        let props = Shape::cuboid(Vec3::ONE).mass_properties(3.0);
        let shifted = props.shifted(Vec3::new(2.0, 0.0, 0.0));
        let base = props.inertia.diagonal();
        // No change about the axis parallel to the offset, m·d² about the others.
        assert!(vec3_approx_eq(
            shifted.inertia.diagonal(),
            base + Vec3::new(0.0, 12.0, 12.0)
        ));
        assert!(approx_eq(shifted.inertia.row(0).y, 0.0));
    }

    #[test]
    fn test_validate_rejects_bad_extents() {
        assert!(Shape::cuboid(Vec3::ONE).validate().is_ok());
        assert!(Shape::cuboid(Vec3::new(1.0, -1.0, 1.0)).validate().is_err());
        assert!(Shape::cuboid(Vec3::new(1.0, f32::NAN, 1.0)).validate().is_err());
        assert!(Shape::cone(0.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_bounding_radius() {
        assert!(approx_eq(Shape::cuboid(Vec3::new(1.0, 2.0, 2.0)).bounding_radius(), 3.0));
        // Tall cone: the apex is the farthest point from the centroid.
        assert!(approx_eq(Shape::cone(0.5, 4.0).bounding_radius(), 3.0));
    }

    #[test]
    fn test_oriented_box_corners_and_faces() {
        let obb = Cuboid::new(Vec3::new(1.0, 2.0, 3.0)).oriented(Vec3::new(10.0, 0.0, 0.0), Quat::IDENTITY);
        let corners = obb.corners();
        assert!(vec3_approx_eq(corners[0], Vec3::new(9.0, -2.0, -3.0)));
        assert!(vec3_approx_eq(corners[7], Vec3::new(11.0, 2.0, 3.0)));

        let faces = obb.face_points();
        assert!(vec3_approx_eq(faces[0], Vec3::new(11.0, 0.0, 0.0)));
        assert!(vec3_approx_eq(faces[4], Vec3::new(10.0, -2.0, 0.0)));
    }

    #[test]
    fn test_rotated_world_aabb_grows() {
        let shape = Shape::cuboid(Vec3::new(1.0, 1.0, 1.0));
        let aabb = shape.world_aabb(Vec3::ZERO, Quat::from_axis_angle(Vec3::Z, PI / 4.0));
        assert!(approx_eq(aabb.max.x, 2.0f32.sqrt()));
        assert!(approx_eq(aabb.max.z, 1.0));
    }
}
