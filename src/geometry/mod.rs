mod aabb;
mod shape;

pub use aabb::Aabb;
pub use shape::{Cone, Cuboid, MassProperties, OrientedBox, Shape, ShapeType};
