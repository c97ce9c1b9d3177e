//! Ordered stack traversal.
//!
//! Both queries walk the tree the same way: at an internal node the children
//! whose boxes the ray enters are visited nearest first, and the farther one
//! is deferred on a stack together with its entry distance. What happens at
//! a leaf and which deferred subtrees are still worth visiting is decided by
//! a [`LeafVisitor`].
//!
//! The stack is the only mutable state of a query. It belongs to the caller
//! (or to the call), never to the tree, so any number of threads can query
//! one tree at the same time.

use crate::node::BvhNode;
use crate::{Accelerator, Bvh, Hit, Primitive};
use prism_math::{Interval, Ray};
use std::ops::{ControlFlow, Range};

/// A subtree deferred for later, with the ray parameter at which the ray
/// enters its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StackItem {
    pub node: usize,
    pub t_entry: f32,
}

/// Reusable storage for deferred subtrees.
///
/// Each query clears it before use. Keeping one per worker thread avoids an
/// allocation per ray; sharing one between concurrent queries is impossible
/// since queries borrow it mutably.
#[derive(Debug, Default, Clone)]
pub struct TraversalStack {
    items: Vec<StackItem>,
}

impl TraversalStack {
    /// Enough for the depth of any reasonably balanced tree.
    const DEFAULT_CAPACITY: usize = 32;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }
}

/// Per-query behaviour plugged into the shared walk.
trait LeafVisitor {
    /// Largest ray parameter that can still change the result.
    fn t_max(&self) -> f32;

    /// Whether a deferred subtree should still be visited.
    fn resume(&self, frame: &StackItem) -> bool;

    /// Process the objects of one leaf; `Break` ends the query.
    fn visit(&mut self, objects: Range<usize>) -> ControlFlow<()>;
}

struct NearestVisitor<'a, P> {
    objects: &'a [P],
    ray: &'a Ray,
    t_min: f32,
    best_t: f32,
    best: Option<usize>,
}

impl<P: Primitive> LeafVisitor for NearestVisitor<'_, P> {
    fn t_max(&self) -> f32 {
        self.best_t
    }

    fn resume(&self, frame: &StackItem) -> bool {
        frame.t_entry < self.best_t
    }

    fn visit(&mut self, objects: Range<usize>) -> ControlFlow<()> {
        for slot in objects {
            let ray_t = Interval::new(self.t_min, self.best_t);
            if let Some(t) = self.objects[slot].intersect(self.ray, ray_t) {
                if t < self.best_t {
                    self.best_t = t;
                    self.best = Some(slot);
                }
            }
        }
        ControlFlow::Continue(())
    }
}

struct AnyVisitor<'a, P> {
    objects: &'a [P],
    ray: &'a Ray,
    ray_t: Interval,
    hit: bool,
}

impl<P: Primitive> LeafVisitor for AnyVisitor<'_, P> {
    fn t_max(&self) -> f32 {
        self.ray_t.max
    }

    fn resume(&self, _frame: &StackItem) -> bool {
        true
    }

    fn visit(&mut self, objects: Range<usize>) -> ControlFlow<()> {
        let blocked = self.objects[objects]
            .iter()
            .any(|object| object.intersect(self.ray, self.ray_t).is_some());
        if blocked {
            self.hit = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

impl<P: Primitive> Bvh<P> {
    fn walk<V: LeafVisitor>(
        &self,
        ray: &Ray,
        ray_t: Interval,
        stack: &mut TraversalStack,
        visitor: &mut V,
    ) {
        let stack = &mut stack.items;
        stack.clear();

        if self.nodes[0].bbox().intersect(ray, ray_t).is_none() {
            return;
        }

        let mut current = 0;
        loop {
            match self.nodes[current] {
                BvhNode::Internal { first_child, .. } => {
                    let (left, right) = (first_child, first_child + 1);
                    let clipped = ray_t.clip_max(visitor.t_max());
                    let hit_left = self.nodes[left].bbox().intersect(ray, clipped);
                    let hit_right = self.nodes[right].bbox().intersect(ray, clipped);

                    match (hit_left, hit_right) {
                        (Some(t_left), Some(t_right)) => {
                            let (near, far, t_far) = if t_right < t_left {
                                (right, left, t_left)
                            } else {
                                (left, right, t_right)
                            };
                            stack.push(StackItem {
                                node: far,
                                t_entry: t_far,
                            });
                            current = near;
                            continue;
                        }
                        (Some(_), None) => {
                            current = left;
                            continue;
                        }
                        (None, Some(_)) => {
                            current = right;
                            continue;
                        }
                        (None, None) => {}
                    }
                }
                BvhNode::Leaf {
                    first_object,
                    count,
                    ..
                } => {
                    if visitor.visit(first_object..first_object + count).is_break() {
                        return;
                    }
                }
            }

            // Dead end: continue with the most recently deferred subtree that
            // can still matter, dropping the ones that cannot
            loop {
                match stack.pop() {
                    Some(frame) if visitor.resume(&frame) => {
                        current = frame.node;
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    /// Nearest hit inside `ray_t`, using `stack` for deferred subtrees.
    pub fn nearest_hit_with(
        &self,
        stack: &mut TraversalStack,
        ray: &Ray,
        ray_t: Interval,
    ) -> Option<Hit<'_, P>> {
        let mut visitor = NearestVisitor {
            objects: &self.objects,
            ray,
            t_min: ray_t.min,
            best_t: ray_t.max,
            best: None,
        };
        self.walk(ray, ray_t, stack, &mut visitor);

        let t = visitor.best_t;
        visitor.best.map(|slot| Hit {
            object: &self.objects[slot],
            index: slot,
            source_index: self.source_indices[slot],
            t,
            point: ray.at(t),
        })
    }

    /// Any hit inside `ray_t`, using `stack` for deferred subtrees.
    pub fn any_hit_with(&self, stack: &mut TraversalStack, ray: &Ray, ray_t: Interval) -> bool {
        let mut visitor = AnyVisitor {
            objects: &self.objects,
            ray,
            ray_t,
            hit: false,
        };
        self.walk(ray, ray_t, stack, &mut visitor);
        visitor.hit
    }

    /// Shadow query over the segment encoded by `shadow_ray`, see
    /// [`Accelerator::occluded`].
    pub fn occluded_with(&self, stack: &mut TraversalStack, shadow_ray: &Ray) -> bool {
        match shadow_ray.unit_segment() {
            Some((unit, length)) => {
                self.any_hit_with(stack, &unit, Interval::new(crate::RAY_EPSILON, length))
            }
            None => false,
        }
    }
}

impl<P: Primitive> Accelerator for Bvh<P> {
    type Object = P;

    fn nearest_hit_in(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_, P>> {
        self.nearest_hit_with(&mut TraversalStack::new(), ray, ray_t)
    }

    fn any_hit_in(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.any_hit_with(&mut TraversalStack::new(), ray, ray_t)
    }
}
