use thiserror::Error;

/// Errors reported while configuring or checking a tree.
///
/// Queries never fail; these come from [`crate::Bvh::with_config`] and
/// [`crate::Bvh::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BvhError {
    #[error("max_leaf_size must be at least 1")]
    ZeroLeafSize,

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidCost { name: &'static str, value: f32 },

    #[error("root_padding must be finite and non-negative, got {0}")]
    InvalidPadding(f32),

    #[error("node {node} points at child {child} outside the node store ({len} nodes)")]
    ChildOutOfRange { node: usize, child: usize, len: usize },

    #[error("node {node} has children at {child}, which is not after its parent")]
    ChildBeforeParent { node: usize, child: usize },

    #[error("node {node} is reachable from more than one parent")]
    SharedNode { node: usize },

    #[error("leaf {node} holds {count} objects, limit is {max}")]
    LeafTooLarge { node: usize, count: usize, max: usize },

    #[error("leaf {node} holds no objects")]
    EmptyLeaf { node: usize },

    #[error("leaf {node} covers objects past the end of the object array")]
    LeafOutOfRange { node: usize },

    #[error("object slot {slot} is covered by {count} leaves")]
    ObjectCoverage { slot: usize, count: usize },

    #[error("box of node {node} does not contain the boxes below it")]
    Containment { node: usize },

    #[error("node {node} is never reached from the root")]
    Unreachable { node: usize },
}

/// Result type for tree construction and validation.
pub type BvhResult<T> = Result<T, BvhError>;
