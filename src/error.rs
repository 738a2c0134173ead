use thiserror::Error;

use crate::collision::BodyHandle;

/// Errors reported by the physics world.
///
/// Construction problems surface as `InvalidConfiguration`. Degenerate math
/// inside a tick is reported to the caller of the individual operation but
/// never aborts [`World::step`](crate::World::step).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("degenerate geometry: {context}")]
    DegenerateGeometry { context: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown body {0:?}")]
    UnknownBody(BodyHandle),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;
