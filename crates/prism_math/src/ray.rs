use crate::Vec3;

/// A ray in 3D space with origin, direction, and time.
///
/// The direction is not required to be normalized. Shadow rays use that
/// freedom to encode a finite segment: the direction points from the shading
/// point to the light and its length is the distance between them (see
/// [`Ray::segment`] and [`Ray::unit_segment`]). The `time` field is carried
/// for motion blur and is never read by the acceleration structures.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Ray from `from` whose direction reaches `to` at `t = 1`.
    pub fn segment(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from, 0.0)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Split the direction into a unit vector and its length.
    ///
    /// Returns `None` for a zero-length or non-finite direction.
    pub fn unit_segment(&self) -> Option<(Ray, f32)> {
        let length = self.direction.length();
        if !(length > 0.0 && length.is_finite()) {
            return None;
        }
        let unit = Ray::new(self.origin, self.direction / length, self.time);
        Some((unit, length))
    }
}
