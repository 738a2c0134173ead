use crate::collision::BodyHandle;
use crate::math::Vec3;

use super::body::SimBody;

/// Storage for the simulated bodies.
///
/// Handles are issued in increasing order and never reused, so a handle from
/// before [`BodySet::clear`] stays invalid afterwards.
#[derive(Debug, Default, Clone)]
pub struct BodySet {
    bodies: Vec<SimBody>,
    first_id: u32,
}

impl BodySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: SimBody) -> BodyHandle {
        let handle = BodyHandle::new(self.first_id + self.bodies.len() as u32);
        self.bodies.push(body);
        handle
    }

    #[inline]
    fn slot(&self, handle: BodyHandle) -> Option<usize> {
        let slot = handle.0.checked_sub(self.first_id)? as usize;
        (slot < self.bodies.len()).then_some(slot)
    }

    #[inline]
    fn handle_at(&self, slot: usize) -> BodyHandle {
        BodyHandle::new(self.first_id + slot as u32)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slot(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&SimBody> {
        self.slot(handle).map(|slot| &self.bodies[slot])
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut SimBody> {
        let slot = self.slot(handle)?;
        Some(&mut self.bodies[slot])
    }

    /// Mutable access to two distinct bodies at once
    pub fn get_pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut SimBody, &mut SimBody)> {
        let (ia, ib) = (self.slot(a)?, self.slot(b)?);
        if ia == ib {
            return None;
        }

        if ia < ib {
            let (left, right) = self.bodies.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.bodies.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &SimBody)> {
        self.bodies
            .iter()
            .enumerate()
            .map(move |(slot, body)| (self.handle_at(slot), body))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut SimBody)> {
        let first_id = self.first_id;
        self.bodies
            .iter_mut()
            .enumerate()
            .map(move |(slot, body)| (BodyHandle::new(first_id + slot as u32), body))
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        (0..self.bodies.len()).map(move |slot| self.handle_at(slot))
    }

    /// Positions of every body, frozen at the time of the call
    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            first_id: self.first_id,
            positions: self
                .bodies
                .iter()
                .map(|body| body.as_body().position())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drops every body; outstanding handles become invalid
    pub fn clear(&mut self) {
        self.first_id = self.first_id.saturating_add(self.bodies.len() as u32);
        self.bodies.clear();
    }
}

/// Read-only copy of body positions taken before forces are applied.
///
/// Generators that look at another body (pairwise springs, rods, wires) read
/// it from here, so every generator in a tick sees the same state no matter
/// which body is being updated.
#[derive(Debug, Clone, Default)]
pub struct BodySnapshot {
    first_id: u32,
    positions: Vec<Vec3>,
}

impl BodySnapshot {
    pub fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        let slot = handle.0.checked_sub(self.first_id)? as usize;
        self.positions.get(slot).copied()
    }
}
