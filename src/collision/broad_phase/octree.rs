use std::collections::BTreeSet;

use crate::collision::contact::{BodyHandle, CollisionPair};
use crate::geometry::Aabb;
use crate::math::Vec3;

/// Default subdivision limit
pub const DEFAULT_MAX_DEPTH: u32 = 5;
/// Default number of entries a leaf holds before it splits
pub const DEFAULT_NODE_CAPACITY: usize = 4;

/// A node in the octree
#[derive(Debug, Clone)]
struct OctreeNode {
    /// Cell bounds
    bounds: Aabb,
    /// Index of the first of 8 consecutive children, `u32::MAX` for a leaf
    first_child: u32,
    /// Entry indices stored in this leaf
    items: Vec<u32>,
}

impl OctreeNode {
    fn leaf(bounds: Aabb) -> Self {
        Self {
            bounds,
            first_child: u32::MAX,
            items: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.first_child == u32::MAX
    }
}

/// Octal space partition over a cubic world, rebuilt every tick.
///
/// An entry is stored in every leaf its bounds overlap, so two overlapping
/// entries always share at least one leaf. [`Octree::rebuild`] grows the root
/// cell to enclose every entry. Entries inserted one by one that stick out of
/// the root are still stored in the leaves they reach, and are also checked
/// against each other for overlaps beyond the root. The tree only stores
/// handles and bounds; it never owns bodies.
#[derive(Debug)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    /// Configured world bounds, the root cell after a `clear`
    world_bounds: Aabb,
    entries: Vec<(BodyHandle, Aabb)>,
    /// Entries not fully contained in the root cell
    outside: Vec<u32>,
    max_depth: u32,
    node_capacity: usize,
}

impl Octree {
    /// Creates an empty tree covering `[-half_extent, half_extent]` on every axis
    pub fn new(half_extent: f32) -> Self {
        Self::with_limits(half_extent, DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY)
    }

    pub fn with_limits(half_extent: f32, max_depth: u32, node_capacity: usize) -> Self {
        let bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(half_extent));
        Self {
            nodes: vec![OctreeNode::leaf(bounds)],
            world_bounds: bounds,
            entries: Vec::new(),
            outside: Vec::new(),
            max_depth,
            node_capacity: node_capacity.max(1),
        }
    }

    /// Bounds covered by the root cell
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }

    /// Changes the world bounds and empties the tree
    pub fn set_half_extent(&mut self, half_extent: f32) {
        self.world_bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(half_extent));
        self.clear();
    }

    /// Removes every entry and resets the root cell to the world bounds
    pub fn clear(&mut self) {
        self.reset_root(self.world_bounds);
    }

    fn reset_root(&mut self, bounds: Aabb) {
        self.nodes.clear();
        self.nodes.push(OctreeNode::leaf(bounds));
        self.entries.clear();
        self.outside.clear();
    }

    /// Clears the tree and re-inserts every entry.
    ///
    /// The root cell is the world bounds grown to cover every finite entry,
    /// so bodies resting against the world walls are partitioned like any
    /// other.
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = (BodyHandle, Aabb)>) {
        let entries: Vec<_> = entries.into_iter().collect();
        let root = entries
            .iter()
            .filter(|(_, aabb)| aabb.min.is_finite() && aabb.max.is_finite())
            .fold(self.world_bounds, |root, &(_, aabb)| root.merged(aabb));

        self.reset_root(root);
        for (handle, aabb) in entries {
            self.insert(handle, aabb);
        }
    }

    /// Inserts a body with its world-space bounds
    pub fn insert(&mut self, handle: BodyHandle, aabb: Aabb) {
        let entry = self.entries.len() as u32;
        self.entries.push((handle, aabb));

        if !self.bounds().contains_aabb(aabb) {
            self.outside.push(entry);
            if !self.bounds().intersects(aabb) {
                return;
            }
        }

        let mut stack = vec![(0u32, 0u32)];
        while let Some((node, depth)) = stack.pop() {
            let n = &self.nodes[node as usize];
            if !n.is_leaf() {
                for child in n.first_child..n.first_child + 8 {
                    if self.nodes[child as usize].bounds.intersects(aabb) {
                        stack.push((child, depth + 1));
                    }
                }
                continue;
            }

            self.nodes[node as usize].items.push(entry);
            if self.nodes[node as usize].items.len() > self.node_capacity && depth < self.max_depth {
                self.split(node, depth);
            }
        }
    }

    /// Turns a leaf into an internal node, pushing its items down one level
    fn split(&mut self, node: u32, depth: u32) {
        let bounds = self.nodes[node as usize].bounds;
        let first_child = self.nodes.len() as u32;
        for octant in 0..8 {
            self.nodes.push(OctreeNode::leaf(bounds.octant(octant)));
        }

        let items = std::mem::take(&mut self.nodes[node as usize].items);
        self.nodes[node as usize].first_child = first_child;

        for item in items {
            let aabb = self.entries[item as usize].1;
            for child in first_child..first_child + 8 {
                if self.nodes[child as usize].bounds.intersects(aabb) {
                    self.nodes[child as usize].items.push(item);
                }
            }
        }

        // A child can still be over capacity when every item overlaps it.
        if depth + 1 < self.max_depth {
            for child in first_child..first_child + 8 {
                if self.nodes[child as usize].items.len() > self.node_capacity {
                    self.split(child, depth + 1);
                }
            }
        }
    }

    /// Candidate pairs whose bounds overlap, deduplicated and sorted by handle.
    pub fn query_pairs(&self) -> Vec<CollisionPair> {
        let mut pairs = BTreeSet::new();
        let mut consider = |a: u32, b: u32| {
            let (handle_a, aabb_a) = self.entries[a as usize];
            let (handle_b, aabb_b) = self.entries[b as usize];
            if handle_a != handle_b && aabb_a.intersects(aabb_b) {
                pairs.insert(CollisionPair::new(handle_a, handle_b));
            }
        };

        // Overlaps beyond the root cell are not covered by any leaf.
        for (i, &a) in self.outside.iter().enumerate() {
            for &b in &self.outside[i + 1..] {
                consider(a, b);
            }
        }

        let mut stack = vec![0u32];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node as usize];
            if n.is_leaf() {
                for (i, &a) in n.items.iter().enumerate() {
                    for &b in &n.items[i + 1..] {
                        consider(a, b);
                    }
                }
            } else {
                stack.extend(n.first_child..n.first_child + 8);
            }
        }

        pairs.into_iter().collect()
    }

    /// Handles whose bounds overlap `aabb`
    pub fn query_aabb(&self, aabb: Aabb) -> Vec<BodyHandle> {
        let mut hits = BTreeSet::new();
        if !self.bounds().contains_aabb(aabb) {
            for &entry in &self.outside {
                let (handle, bounds) = self.entries[entry as usize];
                if bounds.intersects(aabb) {
                    hits.insert(handle);
                }
            }
        }

        let mut stack = vec![0u32];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node as usize];
            if !n.bounds.intersects(aabb) {
                continue;
            }
            if n.is_leaf() {
                for &entry in &n.items {
                    let (handle, bounds) = self.entries[entry as usize];
                    if bounds.intersects(aabb) {
                        hits.insert(handle);
                    }
                }
            } else {
                stack.extend(n.first_child..n.first_child + 8);
            }
        }

        hits.into_iter().collect()
    }

    /// Returns the number of bodies in the tree
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of cells, leaves and internal nodes alike
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of entries that stick out of the root cell
    pub fn outside_count(&self) -> usize {
        self.outside.len()
    }
}
