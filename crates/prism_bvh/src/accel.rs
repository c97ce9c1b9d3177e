//! The query interface shared by every acceleration structure.

use crate::Primitive;
use prism_math::{Interval, Ray, Vec3};

/// Smallest ray parameter accepted by the default queries.
///
/// Keeps secondary rays that start on a surface from hitting that surface
/// again at `t ≈ 0`.
pub const RAY_EPSILON: f32 = 1e-4;

/// Result of a nearest-hit query.
#[derive(Debug)]
pub struct Hit<'a, P> {
    /// The object that was hit.
    pub object: &'a P,
    /// Slot of the object in the structure's object array.
    pub index: usize,
    /// Position of the object in the sequence the structure was built from.
    pub source_index: usize,
    /// Ray parameter of the intersection.
    pub t: f32,
    /// `ray.origin + ray.direction * t`
    pub point: Vec3,
}

impl<P> Clone for Hit<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Hit<'_, P> {}

/// Ray queries against a fixed set of objects.
///
/// Implemented by [`crate::Bvh`] and by the brute-force
/// [`crate::LinearScan`], so callers can switch structures without touching
/// their shading code.
pub trait Accelerator {
    type Object: Primitive;

    /// Closest intersection with a parameter inside `ray_t`.
    fn nearest_hit_in(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_, Self::Object>>;

    /// Whether any object intersects the ray inside `ray_t`.
    fn any_hit_in(&self, ray: &Ray, ray_t: Interval) -> bool;

    /// Closest intersection in front of the ray origin.
    fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_, Self::Object>> {
        self.nearest_hit_in(ray, Interval::new(RAY_EPSILON, f32::INFINITY))
    }

    /// Shadow query over the segment encoded by `shadow_ray`.
    ///
    /// The direction points from the shading point to the light and its
    /// length is the distance to the light; only objects strictly between
    /// the two count. A zero-length segment is never occluded.
    fn occluded(&self, shadow_ray: &Ray) -> bool {
        match shadow_ray.unit_segment() {
            Some((unit, length)) => self.any_hit_in(&unit, Interval::new(RAY_EPSILON, length)),
            None => false,
        }
    }
}
