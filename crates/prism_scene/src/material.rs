//! Surface appearance, carried for the renderer.

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

/// Index into a scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// Phong-style material with reflection and refraction terms.
///
/// The acceleration structures never look at materials; they are stored so
/// a hit can be shaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base color (linear RGB)
    pub color: Vec3,
    /// Diffuse coefficient
    pub diffuse: f32,
    /// Specular coefficient
    pub specular: f32,
    /// Specular exponent
    pub shine: f32,
    /// Fraction of light passed through the surface
    pub transmittance: f32,
    /// Index of refraction
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::splat(0.8),
            diffuse: 0.9,
            specular: 0.1,
            shine: 32.0,
            transmittance: 0.0,
            ior: 1.0,
        }
    }
}
