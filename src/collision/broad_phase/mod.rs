mod octree;

pub use octree::{Octree, DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY};
