//! Seeded random sphere scenes.

use crate::{
    Material, MaterialId, PointLight, SceneDescription, SceneError, SceneResult, ShapeDesc,
};
use prism_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters for [`random_scene`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSceneParams {
    /// Number of spheres
    pub count: usize,
    pub seed: u64,
    /// Sphere centers lie in `[-extent, extent]` on every axis
    pub extent: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Size of the generated material palette
    pub materials: usize,
}

impl Default for RandomSceneParams {
    fn default() -> Self {
        Self {
            count: 1000,
            seed: 0,
            extent: 10.0,
            min_radius: 0.05,
            max_radius: 0.5,
            materials: 8,
        }
    }
}

impl RandomSceneParams {
    /// Largest accepted `extent` and radius. The light sits at `3 * extent`,
    /// which must stay finite.
    pub const MAX_EXTENT: f32 = f32::MAX / 4.0;

    /// Check that every range handed to the generator is finite and ordered.
    pub fn validate(&self) -> SceneResult<()> {
        let invalid = |field, reason| Err(SceneError::InvalidRandomParams { field, reason });

        if !(self.extent > 0.0 && self.extent <= Self::MAX_EXTENT) {
            return invalid("extent", "must be positive, finite and at most f32::MAX / 4");
        }
        if !(self.min_radius > 0.0 && self.min_radius <= Self::MAX_EXTENT) {
            return invalid("min_radius", "must be positive, finite and at most f32::MAX / 4");
        }
        if !(self.max_radius >= self.min_radius && self.max_radius <= Self::MAX_EXTENT) {
            return invalid("max_radius", "must be finite and at least min_radius");
        }
        Ok(())
    }
}

/// Generate a scene of randomly placed spheres lit by one light above them.
///
/// The same parameters always produce the same scene.
pub fn random_scene(params: &RandomSceneParams) -> SceneResult<SceneDescription> {
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let extent = params.extent;
    let (min_radius, max_radius) = (params.min_radius, params.max_radius);

    let materials: Vec<Material> = (0..params.materials.max(1))
        .map(|_| Material {
            color: Vec3::new(rng.gen(), rng.gen(), rng.gen()),
            specular: rng.gen_range(0.0..0.5),
            ..Material::default()
        })
        .collect();

    let shapes = (0..params.count)
        .map(|_| ShapeDesc::Sphere {
            center: Vec3::new(
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
            ),
            radius: rng.gen_range(min_radius..=max_radius),
            material: MaterialId(rng.gen_range(0..materials.len())),
        })
        .collect();

    log::debug!(
        "Generated random scene: {} spheres, {} materials, seed {}",
        params.count,
        materials.len(),
        params.seed
    );

    Ok(SceneDescription {
        materials,
        shapes,
        lights: vec![PointLight::new(Vec3::new(0.0, 3.0 * extent, 0.0), Vec3::ONE)],
        ..SceneDescription::default()
    })
}
