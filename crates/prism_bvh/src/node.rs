use prism_math::Aabb;
use std::ops::Range;

/// One entry of the flat node store.
///
/// Internal nodes point at their first child; the second child always sits
/// right after it. Leaves own a contiguous run of the tree's object array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node, children at `first_child` and `first_child + 1`.
    Internal { bbox: Aabb, first_child: usize },
    /// Leaf over `objects[first_object..first_object + count]`.
    Leaf {
        bbox: Aabb,
        first_object: usize,
        count: usize,
    },
}

impl BvhNode {
    /// Box enclosing everything below this node.
    #[inline]
    pub fn bbox(&self) -> &Aabb {
        match self {
            BvhNode::Internal { bbox, .. } | BvhNode::Leaf { bbox, .. } => bbox,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Indices of the two children, `None` for a leaf.
    #[inline]
    pub fn children(&self) -> Option<(usize, usize)> {
        match *self {
            BvhNode::Internal { first_child, .. } => Some((first_child, first_child + 1)),
            BvhNode::Leaf { .. } => None,
        }
    }

    /// Range of the object array covered by a leaf, `None` for an internal node.
    #[inline]
    pub fn objects(&self) -> Option<Range<usize>> {
        match *self {
            BvhNode::Leaf {
                first_object,
                count,
                ..
            } => Some(first_object..first_object + count),
            BvhNode::Internal { .. } => None,
        }
    }

    /// Placeholder for a node whose range has not been partitioned yet.
    pub(crate) fn pending(bbox: Aabb) -> Self {
        BvhNode::Leaf {
            bbox,
            first_object: 0,
            count: 0,
        }
    }
}
