use prism_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Point light source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    #[serde(default = "white")]
    pub color: Vec3,
}

fn white() -> Vec3 {
    Vec3::ONE
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }

    /// Shadow ray from `point` to this light.
    ///
    /// The direction is left unnormalized so its length is the distance to
    /// the light, which is what [`prism_bvh::Accelerator::occluded`] expects.
    pub fn shadow_ray_from(&self, point: Vec3) -> Ray {
        Ray::segment(point, self.position)
    }
}
