use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Stored as two corners. The empty box has `min = +inf` and `max = -inf` on
/// every axis, so extending it with any real box yields that box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The empty box (contains nothing).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create an AABB from its corners. The caller guarantees `min <= max`.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grow this box to also enclose `other`.
    ///
    /// Commutative and idempotent: extending by a box that is already
    /// contained leaves `self` unchanged.
    #[inline]
    pub fn extend(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Grow this box to also enclose a point.
    #[inline]
    pub fn extend_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// True when the box contains no point.
    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z)
    }

    /// Size of the box along each axis.
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => Interval::new(self.min.x, self.max.x),
            1 => Interval::new(self.min.y, self.max.y),
            _ => Interval::new(self.min.z, self.max.z),
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.extent();

        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Total area of the six faces, `2 * (dx*dy + dy*dz + dz*dx)`.
    ///
    /// The empty box has zero area.
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Copy of the box moved outward by `epsilon` on every face.
    pub fn padded(&self, epsilon: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(epsilon),
            max: self.max + Vec3::splat(epsilon),
        }
    }

    /// True if `other` lies entirely inside this box (faces may touch).
    pub fn contains(&self, other: &Aabb) -> bool {
        other.is_empty() || (self.min.cmple(other.min).all() && other.max.cmple(self.max).all())
    }

    /// Slab test against the parameter range `ray_t`.
    ///
    /// Returns the parameter at which the ray enters the box, clamped to
    /// `ray_t.min` when the origin is already inside. A ray parallel to a slab
    /// only hits if its origin lies within that slab, and a zero-length or
    /// non-finite direction never hits.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        if ray.direction == Vec3::ZERO || !ray.direction.is_finite() {
            return None;
        }

        let mut t_near = ray_t.min;
        let mut t_far = ray_t.max;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let slab = self.axis_interval(axis);

            if dir == 0.0 {
                if !slab.contains(origin) {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if !(t_near <= t_far) {
                return None;
            }
        }

        Some(t_near)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
