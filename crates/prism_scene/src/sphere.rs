//! Sphere primitive.

use crate::shape::Surface;
use crate::MaterialId;
use prism_bvh::Primitive;
use prism_math::{Aabb, Interval, Ray, Vec3};

/// A sphere with a material reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Primitive for Sphere {
    fn bounding_box(&self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        Aabb::from_points(self.center - rvec, self.center + rvec)
    }

    fn centroid(&self) -> Vec3 {
        self.center
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let root = (h - sqrtd) / a;
        if ray_t.surrounds(root) {
            return Some(root);
        }
        let root = (h + sqrtd) / a;
        ray_t.surrounds(root).then_some(root)
    }
}

impl Surface for Sphere {
    /// Zero for a point at the center, which includes every point of a
    /// zero-radius sphere.
    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}
