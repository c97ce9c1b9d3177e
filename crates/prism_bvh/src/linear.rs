//! Brute-force queries, the "no acceleration structure" option.

use crate::{Accelerator, Hit, Primitive};
use prism_math::{Interval, Ray};

/// Tests every object for every ray.
///
/// Linear in the object count, which makes it the reference the tree is
/// checked against and a sensible choice for very small scenes.
#[derive(Debug, Clone)]
pub struct LinearScan<P> {
    objects: Vec<P>,
}

impl<P: Primitive> LinearScan<P> {
    pub fn new(objects: Vec<P>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[P] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<P> {
        self.objects
    }
}

impl<P: Primitive> Accelerator for LinearScan<P> {
    type Object = P;

    fn nearest_hit_in(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_, P>> {
        let mut closest = ray_t.max;
        let mut best = None;

        for (index, object) in self.objects.iter().enumerate() {
            if let Some(t) = object.intersect(ray, ray_t.clip_max(closest)) {
                if t < closest {
                    closest = t;
                    best = Some(index);
                }
            }
        }

        best.map(|index| Hit {
            object: &self.objects[index],
            index,
            source_index: index,
            t: closest,
            point: ray.at(closest),
        })
    }

    fn any_hit_in(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.objects
            .iter()
            .any(|object| object.intersect(ray, ray_t).is_some())
    }
}
