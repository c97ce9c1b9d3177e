//! JSON scene descriptions and the scenes built from them.

use crate::{Material, MaterialId, PointLight, Shape, Sphere, Triangle};
use prism_bvh::{Accelerator, Bvh, BvhConfig, BvhError, Hit, LinearScan};
use prism_math::{Interval, Ray, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Shape {shape} uses material {material}, but the scene has {count} materials")]
    UnknownMaterial {
        shape: usize,
        material: usize,
        count: usize,
    },

    #[error("Shape {shape} is invalid: {reason}")]
    InvalidShape { shape: usize, reason: &'static str },

    #[error("Random scene parameter {field} is invalid: {reason}")]
    InvalidRandomParams {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Invalid BVH settings: {0}")]
    Bvh(#[from] BvhError),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Which acceleration structure a scene is queried through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorKind {
    /// Test every object for every ray.
    Linear,
    #[default]
    Bvh,
}

/// A shape as written in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        #[serde(default)]
        material: MaterialId,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        material: MaterialId,
    },
}

impl ShapeDesc {
    pub fn material(&self) -> MaterialId {
        match *self {
            ShapeDesc::Sphere { material, .. } | ShapeDesc::Triangle { material, .. } => material,
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        match *self {
            ShapeDesc::Sphere { center, radius, .. } => {
                if !center.is_finite() {
                    return Err("sphere center is not finite");
                }
                if !(radius > 0.0 && radius.is_finite()) {
                    return Err("sphere radius must be positive and finite");
                }
            }
            ShapeDesc::Triangle { vertices, material } => {
                if !vertices.iter().all(|v| v.is_finite()) {
                    return Err("triangle vertex is not finite");
                }
                let [v0, v1, v2] = vertices;
                if Triangle::new(v0, v1, v2, material).is_degenerate() {
                    return Err("triangle vertices are collinear");
                }
            }
        }
        Ok(())
    }

    pub fn to_shape(&self) -> Shape {
        match *self {
            ShapeDesc::Sphere {
                center,
                radius,
                material,
            } => Sphere::new(center, radius, material).into(),
            ShapeDesc::Triangle {
                vertices: [v0, v1, v2],
                material,
            } => Triangle::new(v0, v1, v2, material).into(),
        }
    }
}

/// Everything a scene file contains.
///
/// ```json
/// {
///   "materials": [{ "color": [0.8, 0.2, 0.2] }],
///   "shapes": [{ "type": "sphere", "center": [0, 0, -3], "radius": 1, "material": 0 }],
///   "lights": [{ "position": [0, 5, 0] }],
///   "accelerator": "bvh",
///   "bvh": { "max_leaf_size": 2 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub materials: Vec<Material>,
    pub shapes: Vec<ShapeDesc>,
    pub lights: Vec<PointLight>,
    pub accelerator: AcceleratorKind,
    pub bvh: BvhConfig,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scene description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading scene: {}", path.display());
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check shape geometry and material references.
    pub fn validate(&self) -> SceneResult<()> {
        for (index, shape) in self.shapes.iter().enumerate() {
            shape.check().map_err(|reason| SceneError::InvalidShape {
                shape: index,
                reason,
            })?;
            let material = shape.material().0;
            if material >= self.materials.len() {
                return Err(SceneError::UnknownMaterial {
                    shape: index,
                    material,
                    count: self.materials.len(),
                });
            }
        }
        Ok(())
    }

    /// Validate the description and build its acceleration structure.
    pub fn build(self) -> SceneResult<Scene> {
        self.validate()?;

        let shapes: Vec<Shape> = self.shapes.iter().map(ShapeDesc::to_shape).collect();
        let accelerator = match self.accelerator {
            AcceleratorKind::Linear => SceneAccelerator::Linear(LinearScan::new(shapes)),
            AcceleratorKind::Bvh => SceneAccelerator::Bvh(Bvh::with_config(shapes, self.bvh)?),
        };

        log::debug!(
            "Scene ready: {} shapes, {} materials, {} lights, {:?} accelerator",
            self.shapes.len(),
            self.materials.len(),
            self.lights.len(),
            self.accelerator
        );

        Ok(Scene {
            materials: self.materials,
            lights: self.lights,
            accelerator,
        })
    }
}

/// The acceleration structure picked by [`AcceleratorKind`].
#[derive(Debug)]
pub enum SceneAccelerator {
    Linear(LinearScan<Shape>),
    Bvh(Bvh<Shape>),
}

impl Accelerator for SceneAccelerator {
    type Object = Shape;

    fn nearest_hit_in(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_, Shape>> {
        match self {
            SceneAccelerator::Linear(linear) => linear.nearest_hit_in(ray, ray_t),
            SceneAccelerator::Bvh(bvh) => bvh.nearest_hit_in(ray, ray_t),
        }
    }

    fn any_hit_in(&self, ray: &Ray, ray_t: Interval) -> bool {
        match self {
            SceneAccelerator::Linear(linear) => linear.any_hit_in(ray, ray_t),
            SceneAccelerator::Bvh(bvh) => bvh.any_hit_in(ray, ray_t),
        }
    }
}

/// A built scene, ready for ray queries.
#[derive(Debug)]
pub struct Scene {
    materials: Vec<Material>,
    lights: Vec<PointLight>,
    accelerator: SceneAccelerator,
}

impl Scene {
    pub fn accelerator(&self) -> &SceneAccelerator {
        &self.accelerator
    }

    /// The tree, when the scene was built with one.
    pub fn bvh(&self) -> Option<&Bvh<Shape>> {
        match &self.accelerator {
            SceneAccelerator::Bvh(bvh) => Some(bvh),
            SceneAccelerator::Linear(_) => None,
        }
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Whether nothing lies between `point` and `light`.
    pub fn light_visible(&self, point: Vec3, light: &PointLight) -> bool {
        !self.accelerator.occluded(&light.shadow_ray_from(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Surface;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> ShapeDesc {
        ShapeDesc::Sphere {
            center: Vec3::new(x, y, z),
            radius,
            material: MaterialId(0),
        }
    }

    fn description(shapes: Vec<ShapeDesc>) -> SceneDescription {
        SceneDescription {
            materials: vec![Material::default()],
            shapes,
            ..SceneDescription::default()
        }
    }

    fn three_spheres() -> Scene {
        description(vec![
            sphere(-2.0, 0.0, 0.0, 0.4),
            sphere(0.0, 0.0, 0.0, 0.4),
            sphere(2.0, 0.0, 0.0, 0.4),
        ])
        .build()
        .unwrap()
    }

    #[test]
    fn test_three_spheres_tree_shape() {
        let scene = three_spheres();
        let bvh = scene.bvh().unwrap();

        assert_eq!(bvh.nodes().len(), 3);
        assert_eq!(bvh.root().children(), Some((1, 2)));
        assert_eq!(bvh.nodes()[1].objects().map(|r| r.len()), Some(1));
        assert_eq!(bvh.nodes()[2].objects().map(|r| r.len()), Some(2));
        assert_eq!(bvh.validate(), Ok(()));
    }

    #[test]
    fn test_three_spheres_nearest_hit_is_leftmost() {
        let scene = three_spheres();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);

        let hit = scene.accelerator().nearest_hit(&ray).unwrap();

        assert!((hit.t - 2.6).abs() < 1e-4);
        assert_eq!(hit.source_index, 0);
        assert!((hit.point - Vec3::new(-2.4, 0.0, 0.0)).length() < 1e-4);
        assert!((hit.object.normal_at(hit.point) - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_ray_above_scene_misses_root() {
        let scene = three_spheres();
        let ray = Ray::new(Vec3::new(-5.0, 10.0, 0.0), Vec3::X, 0.0);
        let bvh = scene.bvh().unwrap();

        let ray_t = Interval::new(1e-4, f32::INFINITY);
        assert_eq!(bvh.root().bbox().intersect(&ray, ray_t), None);
        assert!(scene.accelerator().nearest_hit(&ray).is_none());
        assert!(!scene.accelerator().any_hit_in(&ray, Interval::new(1e-4, f32::INFINITY)));
    }

    #[test]
    fn test_shadow_blocked_between_point_and_light() {
        let scene = description(vec![sphere(0.0, 2.0, 0.0, 0.5)]).build().unwrap();
        let light = PointLight::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE);

        assert!(scene.accelerator().occluded(&light.shadow_ray_from(Vec3::ZERO)));
        assert!(!scene.light_visible(Vec3::ZERO, &light));
        // Off to the side the same sphere does not block
        assert!(scene.light_visible(Vec3::new(3.0, 0.0, 0.0), &light));
    }

    #[test]
    fn test_occluder_beyond_light_does_not_shadow() {
        let scene = description(vec![sphere(0.0, 7.0, 0.0, 0.5)]).build().unwrap();
        let light = PointLight::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE);

        assert!(scene.light_visible(Vec3::ZERO, &light));
    }

    #[test]
    fn test_linear_and_bvh_scenes_agree() {
        let shapes: Vec<ShapeDesc> = (0..20)
            .map(|i| sphere(i as f32 * 1.5 - 15.0, (i % 3) as f32, -(i % 5) as f32, 0.6))
            .collect();
        let bvh_scene = description(shapes.clone()).build().unwrap();
        let linear_scene = SceneDescription {
            accelerator: AcceleratorKind::Linear,
            ..description(shapes)
        }
        .build()
        .unwrap();
        assert!(linear_scene.bvh().is_none());

        for i in 0..50 {
            let target = Vec3::new(i as f32 * 0.6 - 15.0, 1.0, -2.0);
            let origin = Vec3::new(0.0, 8.0, 10.0);
            let ray = Ray::segment(origin, target);

            let a = bvh_scene.accelerator().nearest_hit(&ray);
            let b = linear_scene.accelerator().nearest_hit(&ray);
            match (a, b) {
                (Some(a), Some(b)) => {
                    assert_eq!(a.source_index, b.source_index);
                    assert!((a.t - b.t).abs() < 1e-5);
                }
                (None, None) => {}
                _ => panic!("structures disagree for ray {i}"),
            }
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "materials": [{ "color": [0.8, 0.2, 0.2] }, { "color": [0.2, 0.8, 0.2] }],
            "shapes": [
                { "type": "sphere", "center": [0, 0, -3], "radius": 1, "material": 1 },
                { "type": "triangle", "vertices": [[-1, -1, -5], [1, -1, -5], [0, 1, -5]] }
            ],
            "lights": [{ "position": [0, 5, 0] }],
            "bvh": { "max_leaf_size": 1 }
        }"#;

        let desc = SceneDescription::from_json(json).unwrap();
        assert_eq!(desc.accelerator, AcceleratorKind::Bvh);
        assert_eq!(desc.bvh.max_leaf_size, 1);
        assert_eq!(desc.shapes[0].material(), MaterialId(1));
        assert_eq!(desc.shapes[1].material(), MaterialId(0));

        let scene = desc.build().unwrap();
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.bvh().map(|b| b.len()), Some(2));

        let hit = scene
            .accelerator()
            .nearest_hit(&Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0))
            .unwrap();
        assert_eq!(hit.source_index, 0);
        let material = scene.material(hit.object.material()).unwrap();
        assert_eq!(material.color, Vec3::new(0.2, 0.8, 0.2));
    }

    #[test]
    fn test_json_round_trip_keeps_description() {
        let desc = SceneDescription {
            lights: vec![PointLight::new(Vec3::Y, Vec3::ONE)],
            accelerator: AcceleratorKind::Linear,
            ..description(vec![sphere(1.0, 2.0, 3.0, 0.5)])
        };
        let parsed = SceneDescription::from_json(&desc.to_json().unwrap()).unwrap();
        assert_eq!(parsed, desc);
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let mut desc = description(vec![sphere(0.0, 0.0, 0.0, 1.0)]);
        desc.materials.clear();

        match desc.build() {
            Err(SceneError::UnknownMaterial {
                shape: 0,
                material: 0,
                count: 0,
            }) => {}
            other => panic!("expected unknown material, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        let flat = ShapeDesc::Triangle {
            vertices: [Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
            material: MaterialId(0),
        };
        for (case, bad) in [sphere(0.0, 0.0, 0.0, 0.0), sphere(f32::NAN, 0.0, 0.0, 1.0), flat]
            .into_iter()
            .enumerate()
        {
            let desc = description(vec![sphere(5.0, 5.0, 5.0, 1.0), bad]);
            assert!(
                matches!(desc.validate(), Err(SceneError::InvalidShape { shape: 1, .. })),
                "case {case}"
            );
        }
    }

    #[test]
    fn test_invalid_bvh_config_is_reported() {
        let mut desc = description(vec![sphere(0.0, 0.0, 0.0, 1.0)]);
        desc.bvh.max_leaf_size = 0;

        assert!(matches!(
            desc.build(),
            Err(SceneError::Bvh(BvhError::ZeroLeafSize))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneDescription::load("/nonexistent/prism/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
        assert!(err.to_string().contains("scene.json"));
    }

    #[test]
    fn test_load_from_file() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("prism_scene_{}.json", std::process::id()));
        let desc = description(vec![sphere(0.0, 0.0, -2.0, 0.5)]);
        std::fs::write(&path, desc.to_json().unwrap()).unwrap();

        let loaded = SceneDescription::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap(), desc);
    }

    #[test]
    fn test_empty_scene_misses_everything() {
        let scene = SceneDescription::default().build().unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        assert!(scene.accelerator().nearest_hit(&ray).is_none());
        assert!(scene.bvh().unwrap().is_empty());
        assert!(scene.bvh().unwrap().root().bbox().is_empty());
    }
}
