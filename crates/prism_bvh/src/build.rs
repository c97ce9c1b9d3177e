//! Tree construction.
//!
//! Pending ranges are kept on an explicit work-list instead of the call
//! stack. The list is LIFO with the left half pushed last, so nodes are
//! partitioned in the same order a recursive pre-order build would visit
//! them, and the split ordinal that selects SAH or median splitting counts
//! the same splits.

use crate::node::BvhNode;
use crate::split::{enclose, BuildRef, SplitKind, SplitStrategy};
use crate::stats::SplitCounts;
use crate::{BvhConfig, Primitive};
use prism_math::Aabb;
use std::time::Instant;

/// Everything a finished build hands over to [`crate::Bvh`].
pub(crate) struct BuildOutput<P> {
    pub nodes: Vec<BvhNode>,
    pub objects: Vec<P>,
    pub source_indices: Vec<usize>,
    pub splits: SplitCounts,
}

/// A node whose object range still has to be partitioned.
#[derive(Debug, Clone, Copy)]
struct PendingRange {
    node: usize,
    start: usize,
    end: usize,
}

pub(crate) fn build<P: Primitive>(objects: Vec<P>, config: &BvhConfig) -> BuildOutput<P> {
    let start_time = Instant::now();

    let mut refs: Vec<BuildRef> = objects
        .iter()
        .enumerate()
        .map(|(index, object)| BuildRef {
            index,
            bbox: object.bounding_box(),
            centroid: object.centroid(),
        })
        .collect();

    if refs.is_empty() {
        log::warn!("Building BVH over an empty object list");
        return BuildOutput {
            nodes: vec![BvhNode::Leaf {
                bbox: Aabb::EMPTY,
                first_object: 0,
                count: 0,
            }],
            objects,
            source_indices: Vec::new(),
            splits: SplitCounts::default(),
        };
    }

    let root_bbox = enclose(&refs).padded(config.root_padding);

    // Every split adds two nodes, and there are fewer splits than objects
    let mut nodes = Vec::with_capacity(2 * refs.len());
    nodes.push(BvhNode::pending(root_bbox));

    let mut splits = SplitCounts::default();
    let mut pending = vec![PendingRange {
        node: 0,
        start: 0,
        end: refs.len(),
    }];

    while let Some(PendingRange { node, start, end }) = pending.pop() {
        let bbox = *nodes[node].bbox();
        let count = end - start;

        if count <= config.max_leaf_size {
            nodes[node] = BvhNode::Leaf {
                bbox,
                first_object: start,
                count,
            };
            continue;
        }

        let strategy = SplitStrategy::for_ordinal(splits.total(), config);
        let (offset, kind) = strategy.split(&mut refs[start..end], &bbox, config);
        splits.record(kind);
        if kind == SplitKind::Midpoint {
            log::trace!(
                "{:?} split of objects {}..{} fell back to the index midpoint",
                strategy,
                start,
                end
            );
        }

        let mid = start + offset;
        let first_child = nodes.len();
        nodes.push(BvhNode::pending(enclose(&refs[start..mid])));
        nodes.push(BvhNode::pending(enclose(&refs[mid..end])));
        nodes[node] = BvhNode::Internal { bbox, first_child };

        pending.push(PendingRange {
            node: first_child + 1,
            start: mid,
            end,
        });
        pending.push(PendingRange {
            node: first_child,
            start,
            end: mid,
        });
    }

    let source_indices: Vec<usize> = refs.iter().map(|r| r.index).collect();
    let objects = permute(objects, &source_indices);

    log::debug!(
        "Built BVH: {} objects, {} nodes, {} SAH / {} median / {} midpoint splits in {:?}",
        objects.len(),
        nodes.len(),
        splits.sah,
        splits.median,
        splits.midpoint,
        start_time.elapsed()
    );

    BuildOutput {
        nodes,
        objects,
        source_indices,
        splits,
    }
}

/// Reorder `objects` so that slot `i` holds `objects[order[i]]`.
fn permute<P>(objects: Vec<P>, order: &[usize]) -> Vec<P> {
    let mut slot_of = vec![0usize; order.len()];
    for (slot, &source) in order.iter().enumerate() {
        slot_of[source] = slot;
    }

    let mut tagged: Vec<(usize, P)> = objects
        .into_iter()
        .enumerate()
        .map(|(source, object)| (slot_of[source], object))
        .collect();
    tagged.sort_unstable_by_key(|(slot, _)| *slot);
    tagged.into_iter().map(|(_, object)| object).collect()
}
