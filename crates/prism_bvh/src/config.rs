//! Build parameters.

use crate::{BvhError, BvhResult};
use serde::{Deserialize, Serialize};

/// Parameters controlling how the tree is built.
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BvhConfig {
    /// Ranges with at most this many objects become leaves.
    pub max_leaf_size: usize,
    /// Number of splits, counted from the root in build order, that use the
    /// surface area heuristic. Later splits use the spatial median.
    pub sah_split_budget: usize,
    /// Estimated cost of visiting one internal node.
    pub cost_traversal: f32,
    /// Estimated cost of one ray-object test.
    pub cost_intersection: f32,
    /// Outward padding applied to every face of the root box.
    pub root_padding: f32,
}

impl BvhConfig {
    /// Default leaf size.
    pub const DEFAULT_LEAF_SIZE: usize = 2;
    /// Default root padding.
    pub const DEFAULT_ROOT_PADDING: f32 = 1e-4;

    pub fn with_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size;
        self
    }

    pub fn with_sah_split_budget(mut self, budget: usize) -> Self {
        self.sah_split_budget = budget;
        self
    }

    pub fn with_costs(mut self, traversal: f32, intersection: f32) -> Self {
        self.cost_traversal = traversal;
        self.cost_intersection = intersection;
        self
    }

    pub fn with_root_padding(mut self, padding: f32) -> Self {
        self.root_padding = padding;
        self
    }

    /// Check that the parameters describe a buildable tree.
    pub fn validate(&self) -> BvhResult<()> {
        if self.max_leaf_size == 0 {
            return Err(BvhError::ZeroLeafSize);
        }
        check_cost("cost_traversal", self.cost_traversal)?;
        check_cost("cost_intersection", self.cost_intersection)?;
        if !(self.root_padding >= 0.0 && self.root_padding.is_finite()) {
            return Err(BvhError::InvalidPadding(self.root_padding));
        }
        Ok(())
    }
}

fn check_cost(name: &'static str, value: f32) -> BvhResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(BvhError::InvalidCost { name, value })
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_leaf_size: Self::DEFAULT_LEAF_SIZE,
            sah_split_budget: 3,
            cost_traversal: 1.0,
            cost_intersection: 10.0,
            root_padding: Self::DEFAULT_ROOT_PADDING,
        }
    }
}
