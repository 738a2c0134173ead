use serde::{Deserialize, Serialize};

use crate::collision::BodyHandle;
use crate::dynamics::{Body, BodySnapshot};
use crate::math::Vec3;

use super::ForceGenerator;

/// Which deviations from the rest length a link resists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resists {
    StretchAndCompression,
    StretchOnly,
}

/// Hooke's law between `position` and `other`:
/// `-k (len - rest)` along the direction from `other` to `position`.
fn link_force(position: Vec3, other: Vec3, stiffness: f32, rest_length: f32, resists: Resists) -> Vec3 {
    let delta = position - other;
    let length = delta.magnitude();
    if resists == Resists::StretchOnly && length <= rest_length {
        return Vec3::ZERO;
    }

    match delta.try_normalized() {
        Some(direction) => direction * (-stiffness * (length - rest_length)),
        None => {
            tracing::debug!("spring ends coincide, no force direction");
            Vec3::ZERO
        }
    }
}

/// A spring from a body to a fixed point in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchoredSpring {
    pub anchor: Vec3,
    pub stiffness: f32,
    pub rest_length: f32,
}

impl AnchoredSpring {
    pub fn new(anchor: Vec3, stiffness: f32, rest_length: f32) -> Self {
        Self {
            anchor,
            stiffness,
            rest_length,
        }
    }
}

impl ForceGenerator for AnchoredSpring {
    fn update_force(&self, body: &mut dyn Body, _dt: f32, _snapshot: &BodySnapshot) {
        let force = link_force(
            body.position(),
            self.anchor,
            self.stiffness,
            self.rest_length,
            Resists::StretchAndCompression,
        );
        body.add_force(force);
    }
}

macro_rules! pair_link {
    ($(#[$doc:meta])* $name:ident, $resists:expr) => {
        $(#[$doc])*
        ///
        /// The generator acts on the body it is registered against and reads
        /// the other end from the snapshot. Register one instance on each end,
        /// each pointing at the other, for equal and opposite forces.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            pub other: BodyHandle,
            pub stiffness: f32,
            pub rest_length: f32,
        }

        impl $name {
            pub fn new(other: BodyHandle, stiffness: f32, rest_length: f32) -> Self {
                Self {
                    other,
                    stiffness,
                    rest_length,
                }
            }
        }

        impl ForceGenerator for $name {
            fn update_force(&self, body: &mut dyn Body, _dt: f32, snapshot: &BodySnapshot) {
                let Some(other) = snapshot.position(self.other) else {
                    return;
                };
                let force = link_force(body.position(), other, self.stiffness, self.rest_length, $resists);
                body.add_force(force);
            }
        }
    };
}

pair_link!(
    /// A spring between two bodies, pulling when stretched and pushing when compressed
    Spring,
    Resists::StretchAndCompression
);

pair_link!(
    /// A rod between two bodies: any change of length is pushed back toward the rest length
    Rod,
    Resists::StretchAndCompression
);

pair_link!(
    /// A wire (cable) between two bodies: only pulls, and only once taut
    Wire,
    Resists::StretchOnly
);
