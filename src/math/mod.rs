mod mat3;
mod mat4;
mod quat;
mod vec3;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec3::Vec3;

/// Tolerances shared by the collision code
pub mod consts {
    /// Points this close to a face plane count as touching it
    pub const CONTACT_EPSILON: f32 = 1e-4;
}
