//! The capability the tree needs from scene objects.

use prism_math::{Aabb, Interval, Ray, Vec3};
use std::sync::Arc;

/// Anything a ray can hit and that can be bounded by a box.
///
/// The tree only reads these three things. Shading data (normals,
/// materials) stays with the caller, which receives a reference to the hit
/// object back from a query.
pub trait Primitive: Send + Sync {
    /// Axis-aligned box enclosing the whole object.
    fn bounding_box(&self) -> Aabb;

    /// Representative point used to order objects during the build.
    fn centroid(&self) -> Vec3 {
        self.bounding_box().centroid()
    }

    /// Nearest ray parameter inside `ray_t` at which the ray hits the object.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;
}

impl<T: Primitive + ?Sized> Primitive for &T {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn centroid(&self) -> Vec3 {
        (**self).centroid()
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        (**self).intersect(ray, ray_t)
    }
}

impl<T: Primitive + ?Sized> Primitive for Box<T> {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn centroid(&self) -> Vec3 {
        (**self).centroid()
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        (**self).intersect(ray, ray_t)
    }
}

impl<T: Primitive + ?Sized> Primitive for Arc<T> {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    fn centroid(&self) -> Vec3 {
        (**self).centroid()
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        (**self).intersect(ray, ray_t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Ball;

    #[test]
    fn test_default_centroid_is_box_center() {
        let ball = Ball::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(ball.centroid(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_forwarding_impls_agree() {
        let ball = Ball::new(Vec3::new(0.0, 0.0, -3.0), 1.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let ray_t = Interval::new(0.0, f32::INFINITY);

        let direct = ball.intersect(&ray, ray_t);
        let by_ref = (&ball).intersect(&ray, ray_t);
        let boxed: Box<dyn Primitive> = Box::new(ball);
        let shared: Arc<dyn Primitive> = Arc::new(ball);

        assert_eq!(direct, Some(2.0));
        assert_eq!(by_ref, direct);
        assert_eq!(boxed.intersect(&ray, ray_t), direct);
        assert_eq!(shared.intersect(&ray, ray_t), direct);
        assert_eq!(boxed.bounding_box(), ball.bounding_box());
    }
}
