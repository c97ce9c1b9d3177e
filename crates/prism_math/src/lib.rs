//! Geometry primitives shared by the Prism crates.
//!
//! Re-exports glam and adds the handful of types a ray query needs:
//! parameter intervals, axis-aligned boxes and rays.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_indexing_matches_fields() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], v.x);
        assert_eq!(v[1], v.y);
        assert_eq!(v[2], v.z);
    }

    #[test]
    fn test_componentwise_min_max() {
        let a = Vec3::new(1.0, 5.0, -3.0);
        let b = Vec3::new(4.0, 2.0, 6.0);
        assert_eq!(a.min(b), Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(a.max(b), Vec3::new(4.0, 5.0, 6.0));
    }
}
