pub mod broad_phase;
pub mod contact;
pub mod narrow_phase;
pub mod resolution;

pub use broad_phase::Octree;
pub use contact::{BodyHandle, CollisionPair, Contact};
pub use narrow_phase::collide;
pub use resolution::{resolve_contact, ResolutionParams};
