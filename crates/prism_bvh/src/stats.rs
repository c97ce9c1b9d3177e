//! Tree statistics and structural checks.

use crate::node::BvhNode;
use crate::split::SplitKind;
use crate::{Bvh, BvhError, BvhResult, Primitive};

/// How many splits of a build each rule produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub sah: usize,
    pub median: usize,
    pub midpoint: usize,
}

impl SplitCounts {
    pub fn total(&self) -> usize {
        self.sah + self.median + self.midpoint
    }

    pub(crate) fn record(&mut self, kind: SplitKind) {
        match kind {
            SplitKind::Sah => self.sah += 1,
            SplitKind::Median => self.median += 1,
            SplitKind::Midpoint => self.midpoint += 1,
        }
    }
}

/// Shape of a built tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhStats {
    pub objects: usize,
    pub nodes: usize,
    pub internal_nodes: usize,
    pub leaves: usize,
    /// Edges on the longest root-to-leaf path.
    pub max_depth: usize,
    pub max_leaf_size: usize,
    pub splits: SplitCounts,
    /// SAH estimate of the cost of one random ray query, relative to the
    /// root box, with the build's cost constants.
    pub expected_cost: f32,
}

impl<P: Primitive> Bvh<P> {
    /// Walk the tree and summarise its shape.
    pub fn stats(&self) -> BvhStats {
        let root_area = self.root().bbox().surface_area();
        let mut stats = BvhStats {
            objects: self.objects.len(),
            nodes: self.nodes.len(),
            internal_nodes: 0,
            leaves: 0,
            max_depth: 0,
            max_leaf_size: 0,
            splits: self.splits,
            expected_cost: 0.0,
        };

        let mut pending = vec![(0usize, 0usize)];
        while let Some((index, depth)) = pending.pop() {
            let node = &self.nodes[index];
            let area_ratio = if root_area > 0.0 {
                node.bbox().surface_area() / root_area
            } else {
                0.0
            };
            stats.max_depth = stats.max_depth.max(depth);

            match *node {
                BvhNode::Internal { first_child, .. } => {
                    stats.internal_nodes += 1;
                    stats.expected_cost += area_ratio * self.config.cost_traversal;
                    pending.push((first_child, depth + 1));
                    pending.push((first_child + 1, depth + 1));
                }
                BvhNode::Leaf { count, .. } => {
                    stats.leaves += 1;
                    stats.max_leaf_size = stats.max_leaf_size.max(count);
                    stats.expected_cost +=
                        area_ratio * count as f32 * self.config.cost_intersection;
                }
            }
        }

        stats
    }

    /// Check every structural invariant of the tree.
    ///
    /// - children lie inside the node store, after their parent, and belong
    ///   to exactly one parent; every node is reachable from the root
    /// - leaves hold between 1 and `max_leaf_size` objects (a single empty
    ///   leaf is allowed for an empty tree)
    /// - leaves cover every object slot exactly once
    /// - each node's box contains its children's boxes, and each leaf's box
    ///   contains its objects' boxes
    pub fn validate(&self) -> BvhResult<()> {
        let len = self.nodes.len();
        let mut reached = vec![false; len];
        let mut coverage = vec![0usize; self.objects.len()];

        reached[0] = true;
        let mut pending = vec![0usize];

        while let Some(index) = pending.pop() {
            let node = &self.nodes[index];
            match *node {
                BvhNode::Internal { first_child, .. } => {
                    for child in [first_child, first_child + 1] {
                        if child >= len {
                            return Err(BvhError::ChildOutOfRange {
                                node: index,
                                child,
                                len,
                            });
                        }
                        if child <= index {
                            return Err(BvhError::ChildBeforeParent { node: index, child });
                        }
                        if reached[child] {
                            return Err(BvhError::SharedNode { node: child });
                        }
                        if !node.bbox().contains(self.nodes[child].bbox()) {
                            return Err(BvhError::Containment { node: index });
                        }
                        reached[child] = true;
                        pending.push(child);
                    }
                }
                BvhNode::Leaf {
                    first_object,
                    count,
                    ..
                } => {
                    if count == 0 && !self.objects.is_empty() {
                        return Err(BvhError::EmptyLeaf { node: index });
                    }
                    if count > self.config.max_leaf_size {
                        return Err(BvhError::LeafTooLarge {
                            node: index,
                            count,
                            max: self.config.max_leaf_size,
                        });
                    }
                    let end = first_object + count;
                    if end > self.objects.len() {
                        return Err(BvhError::LeafOutOfRange { node: index });
                    }
                    for slot in first_object..end {
                        coverage[slot] += 1;
                        if !node.bbox().contains(&self.objects[slot].bounding_box()) {
                            return Err(BvhError::Containment { node: index });
                        }
                    }
                }
            }
        }

        if let Some(node) = reached.iter().position(|&r| !r) {
            return Err(BvhError::Unreachable { node });
        }
        if let Some((slot, &count)) = coverage.iter().enumerate().find(|(_, &c)| c != 1) {
            return Err(BvhError::ObjectCoverage { slot, count });
        }
        Ok(())
    }
}
