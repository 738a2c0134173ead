use crate::error::{PhysicsError, Result};
use crate::geometry::{Aabb, MassProperties, Shape};
use crate::math::{Mat3, Quat, Vec3};

/// A rigid body with composed geometry.
///
/// Forces added to a rigid body are treated as acceleration contributions:
/// the integrator adds `force * dt` to the linear velocity without dividing by
/// mass. Mass still weights collision correction and scales the inertia
/// tensor, so heavier bodies rotate less under the same torque.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    /// Position of the body origin in world space
    pub position: Vec3,
    /// Orientation, kept unit length
    pub rotation: Quat,

    pub linear_velocity: Vec3,
    /// Acceleration applied during the last integration step
    pub linear_acceleration: Vec3,
    /// Angular velocity (in radians per second)
    pub angular_velocity: Vec3,
    /// Angular acceleration applied during the last integration step
    pub angular_acceleration: Vec3,

    /// RGB color tag for renderers
    pub color: [u8; 3],

    pub(crate) shape: Shape,
    pub(crate) inv_mass: f32,
    pub(crate) mass_properties: MassProperties,
    pub(crate) inv_inertia_local: Mat3,
    pub(crate) inv_inertia_world: Mat3,
    /// Center of mass relative to the body origin, in body space
    pub(crate) center_of_mass: Vec3,

    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl RigidBody {
    /// Creates a dynamic body of the given mass at the origin.
    pub fn new(shape: Shape, mass: f32) -> Result<Self> {
        shape.validate()?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "rigid body mass must be positive and finite, got {mass}"
            )));
        }

        let props = shape.mass_properties(mass);
        let inv_inertia_local = props.inv_inertia().ok_or(PhysicsError::DegenerateGeometry {
            context: "singular body inertia tensor",
        })?;

        Ok(Self::with_mass_properties(shape, props, 1.0 / mass, inv_inertia_local))
    }

    /// Creates an immovable body (infinite mass and inertia).
    pub fn fixed(shape: Shape) -> Result<Self> {
        shape.validate()?;
        let props = MassProperties {
            mass: f32::INFINITY,
            inertia: Mat3::ZERO,
        };
        Ok(Self::with_mass_properties(shape, props, 0.0, Mat3::ZERO))
    }

    fn with_mass_properties(
        shape: Shape,
        mass_properties: MassProperties,
        inv_mass: f32,
        inv_inertia_local: Mat3,
    ) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            linear_acceleration: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            angular_acceleration: Vec3::ZERO,
            color: [255, 255, 255],
            shape,
            inv_mass,
            mass_properties,
            inv_inertia_local,
            inv_inertia_world: inv_inertia_local,
            center_of_mass: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the orientation (normalized) and refreshes the world inertia
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation.normalize();
        self.update_world_inertia();
        self
    }

    pub fn with_linear_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, velocity: Vec3) -> Self {
        self.angular_velocity = velocity;
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Builder form of [`RigidBody::move_center_mass`]
    pub fn with_center_of_mass_offset(mut self, translation: Vec3) -> Result<Self> {
        self.move_center_mass(translation)?;
        Ok(self)
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the mass (infinity for immovable bodies)
    #[inline]
    pub fn mass(&self) -> f32 {
        if self.inv_mass > 0.0 {
            1.0 / self.inv_mass
        } else {
            f32::INFINITY
        }
    }

    /// Body-space inertia tensor about the current center of mass
    #[inline]
    pub fn inertia(&self) -> Mat3 {
        self.mass_properties.inertia
    }

    #[inline]
    pub fn inv_inertia_world(&self) -> Mat3 {
        self.inv_inertia_world
    }

    /// Center of mass offset from the body origin, in body space
    #[inline]
    pub fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    /// Center of mass in world space
    #[inline]
    pub fn world_center_of_mass(&self) -> Vec3 {
        self.position + self.rotation.rotate_vec(self.center_of_mass)
    }

    #[inline]
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    #[inline]
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    #[inline]
    pub fn bounding_radius(&self) -> f32 {
        self.shape.bounding_radius()
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        self.shape.world_aabb(self.position, self.rotation)
    }

    /// Moves the center of mass by `translation` (body space) and shifts the
    /// inertia tensor with the parallel-axis theorem.
    ///
    /// Immovable bodies only record the new offset.
    pub fn move_center_mass(&mut self, translation: Vec3) -> Result<()> {
        if !translation.is_finite() {
            return Err(PhysicsError::InvalidConfiguration(format!(
                "center of mass translation must be finite, got {translation:?}"
            )));
        }
        if self.inv_mass == 0.0 {
            self.center_of_mass += translation;
            return Ok(());
        }

        let shifted = self.mass_properties.shifted(translation);
        let inv_inertia_local = shifted.inv_inertia().ok_or(PhysicsError::DegenerateGeometry {
            context: "singular inertia tensor after center of mass shift",
        })?;

        self.mass_properties = shifted;
        self.inv_inertia_local = inv_inertia_local;
        self.center_of_mass += translation;
        self.update_world_inertia();
        Ok(())
    }

    /// Adds a force through the center of mass
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Adds a force at a world point; off-center points also produce torque
    pub fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force += force;
        self.torque += (point - self.world_center_of_mass()).cross(force);
    }

    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Gets the velocity at a world point
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(point - self.world_center_of_mass())
    }

    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Recomputes the world-space inverse inertia tensor: `R I⁻¹ Rᵀ`
    pub fn update_world_inertia(&mut self) {
        let rot = self.rotation.to_mat3();
        self.inv_inertia_world = rot * self.inv_inertia_local * rot.transpose();
    }
}
