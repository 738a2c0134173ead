use crate::collision::BodyHandle;
use crate::dynamics::BodySet;

use super::ForceGenerator;

/// Ordered (body, generator) associations for one tick.
///
/// The registry borrows its generators and refers to bodies by handle, so it
/// owns nothing and is cheap to rebuild each tick.
#[derive(Default)]
pub struct ForceRegistry<'g> {
    entries: Vec<(BodyHandle, &'g dyn ForceGenerator)>,
}

impl<'g> ForceRegistry<'g> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add(&mut self, body: BodyHandle, generator: &'g dyn ForceGenerator) {
        self.entries.push((body, generator));
    }

    /// Drops every association registered against `body`
    pub fn remove_body(&mut self, body: BodyHandle) {
        self.entries.retain(|(handle, _)| *handle != body);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every generator on its body, in registration order.
    ///
    /// Positions are snapshotted first so pairwise generators see the same
    /// state on both ends. Associations whose body no longer exists are
    /// skipped. Returns the number of generators that ran.
    pub fn update_forces(&self, bodies: &mut BodySet, dt: f32) -> usize {
        let snapshot = bodies.snapshot();
        let mut applied = 0;
        for (handle, generator) in &self.entries {
            if let Some(body) = bodies.get_mut(*handle) {
                generator.update_force(body.as_body_mut(), dt, &snapshot);
                applied += 1;
            }
        }
        applied
    }
}

impl std::fmt::Debug for ForceRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceRegistry")
            .field("entries", &self.entries.len())
            .finish()
    }
}
