//! Small primitives and scene generators shared by the unit tests.

use crate::Primitive;
use prism_math::{Aabb, Interval, Ray, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Analytic sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Ball {
    pub center: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Primitive for Ball {
    fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let near = (h - sqrtd) / a;
        if ray_t.surrounds(near) {
            return Some(near);
        }
        let far = (h + sqrtd) / a;
        ray_t.surrounds(far).then_some(far)
    }
}

/// Solid axis-aligned box, hit where the ray enters it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Block(pub Aabb);

impl Primitive for Block {
    fn bounding_box(&self) -> Aabb {
        self.0
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        self.0.intersect(ray, ray_t)
    }
}

/// `n` balls with centres in `[-extent, extent]^3`.
pub(crate) fn random_balls(seed: u64, n: usize, extent: f32) -> Vec<Ball> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let center = Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            );
            Ball::new(center, rng.gen_range(0.05..0.6))
        })
        .collect()
}

/// Rays starting outside or inside a scene of the given extent, aimed at a
/// random point inside it.
pub(crate) fn random_rays(seed: u64, n: usize, extent: f32) -> Vec<Ray> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let reach = extent * 2.0;
            let origin = Vec3::new(
                rng.gen_range(-reach..reach),
                rng.gen_range(-reach..reach),
                rng.gen_range(-reach..reach),
            );
            let target = Vec3::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            );
            Ray::new(origin, target - origin, 0.0)
        })
        .collect()
}
