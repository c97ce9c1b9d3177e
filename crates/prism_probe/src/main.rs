//! Prism probe: build a scene, check the tree, and compare BVH queries
//! against brute force over many random rays.
//!
//! Usage: `prism_probe [config.json]`

mod config;

use anyhow::{bail, Context, Result};
use config::ProbeConfig;
use prism_bvh::{Accelerator, Bvh, LinearScan, TraversalStack, RAY_EPSILON};
use prism_math::{Aabb, Interval, Ray, Vec3};
use prism_scene::{random_scene, PointLight, SceneDescription, Shape, ShapeDesc, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Offset of shadow ray origins along the surface normal.
const SHADOW_BIAS: f32 = 1e-3;

/// Relative tolerance when comparing hit distances between structures.
const T_TOLERANCE: f32 = 1e-5;

/// What one probe ray found.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Outcome {
    t: Option<f32>,
    /// Bit `i` is set when light `i` is blocked from the hit point
    shadowed: u64,
}

impl Outcome {
    fn agrees_with(&self, other: &Outcome) -> bool {
        let t_match = match (self.t, other.t) {
            (Some(a), Some(b)) => (a - b).abs() <= T_TOLERANCE * a.abs().max(1.0),
            (None, None) => true,
            _ => false,
        };
        t_match && self.shadowed == other.shadowed
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting Prism probe");

    let config = match std::env::args_os().nth(1) {
        Some(path) => ProbeConfig::load(Path::new(&path))?,
        None => ProbeConfig::default(),
    };

    let desc = scene_description(&config)?;

    let shapes: Vec<Shape> = desc.shapes.iter().map(ShapeDesc::to_shape).collect();
    let lights = &desc.lights[..desc.lights.len().min(64)];
    if lights.len() < desc.lights.len() {
        log::warn!("Only the first {} lights are probed", lights.len());
    }

    let start = Instant::now();
    let bvh = Bvh::with_config(shapes.clone(), desc.bvh).context("Invalid BVH settings")?;
    log::info!("Built BVH over {} shapes in {:?}", bvh.len(), start.elapsed());

    bvh.validate().context("BVH failed validation")?;
    let stats = bvh.stats();
    log::info!(
        "BVH: {} nodes ({} internal, {} leaves), depth {}, largest leaf {}, expected cost {:.2}",
        stats.nodes,
        stats.internal_nodes,
        stats.leaves,
        stats.max_depth,
        stats.max_leaf_size,
        stats.expected_cost
    );
    log::info!(
        "Splits: {} SAH, {} median, {} midpoint",
        stats.splits.sah,
        stats.splits.median,
        stats.splits.midpoint
    );

    let linear = LinearScan::new(shapes);
    let rays = probe_rays(bvh.root().bbox(), config.rays, config.ray_seed);

    let start = Instant::now();
    let with_bvh: Vec<Outcome> = rays
        .par_iter()
        .map_init(TraversalStack::new, |stack, ray| trace_bvh(&bvh, stack, ray, lights))
        .collect();
    let bvh_time = start.elapsed();

    let start = Instant::now();
    let with_linear: Vec<Outcome> = rays
        .par_iter()
        .map(|ray| trace(&linear, ray, lights))
        .collect();
    let linear_time = start.elapsed();

    let hits = with_bvh.iter().filter(|o| o.t.is_some()).count();
    log::info!(
        "{} rays, {} hits: BVH {:?}, brute force {:?}",
        rays.len(),
        hits,
        bvh_time,
        linear_time
    );

    let mismatches: Vec<usize> = with_bvh
        .iter()
        .zip(&with_linear)
        .enumerate()
        .filter(|(_, (a, b))| !a.agrees_with(b))
        .map(|(i, _)| i)
        .collect();

    for &i in mismatches.iter().take(10) {
        log::warn!(
            "Ray {} {:?}: BVH {:?}, brute force {:?}",
            i,
            rays[i],
            with_bvh[i],
            with_linear[i]
        );
    }
    if !mismatches.is_empty() {
        bail!(
            "{} of {} rays disagree between BVH and brute force",
            mismatches.len(),
            rays.len()
        );
    }

    log::info!("All rays agree");
    Ok(())
}

/// Load the configured scene file, or generate a random scene.
fn scene_description(config: &ProbeConfig) -> Result<SceneDescription> {
    let desc = match &config.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!(
                "Generating random scene: {} spheres, seed {}",
                config.random.count,
                config.random.seed
            );
            let random = random_scene(&config.random).context("Invalid random scene settings")?;
            SceneDescription {
                bvh: config.bvh,
                ..random
            }
        }
    };
    desc.validate().context("Scene description is invalid")?;
    Ok(desc)
}

/// Rays from a shell around `bounds` aimed at random points inside it.
fn probe_rays(bounds: &Aabb, count: usize, seed: u64) -> Vec<Ray> {
    let bounds = if bounds.is_empty() {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    } else {
        *bounds
    };
    let center = bounds.centroid();
    let reach = bounds.extent().length().max(1.0);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut point_in = |lo: Vec3, hi: Vec3| {
        Vec3::new(
            rng.gen_range(lo.x..=hi.x),
            rng.gen_range(lo.y..=hi.y),
            rng.gen_range(lo.z..=hi.z),
        )
    };

    (0..count)
        .map(|_| {
            let offset = point_in(Vec3::splat(-1.0), Vec3::splat(1.0)).normalize_or_zero();
            let origin = center + offset * reach;
            let target = point_in(bounds.min, bounds.max);
            Ray::segment(origin, target)
        })
        .collect()
}

fn trace_bvh(
    bvh: &Bvh<Shape>,
    stack: &mut TraversalStack,
    ray: &Ray,
    lights: &[PointLight],
) -> Outcome {
    let hit = bvh.nearest_hit_with(stack, ray, Interval::new(RAY_EPSILON, f32::INFINITY));
    let Some(hit) = hit else {
        return Outcome {
            t: None,
            shadowed: 0,
        };
    };

    let origin = shadow_origin(hit.object, hit.point);
    let shadowed = shadow_mask(lights, |light| {
        bvh.occluded_with(stack, &light.shadow_ray_from(origin))
    });
    Outcome {
        t: Some(hit.t),
        shadowed,
    }
}

fn trace<A: Accelerator<Object = Shape>>(accel: &A, ray: &Ray, lights: &[PointLight]) -> Outcome {
    let Some(hit) = accel.nearest_hit(ray) else {
        return Outcome {
            t: None,
            shadowed: 0,
        };
    };

    let origin = shadow_origin(hit.object, hit.point);
    let shadowed = shadow_mask(lights, |light| {
        accel.occluded(&light.shadow_ray_from(origin))
    });
    Outcome {
        t: Some(hit.t),
        shadowed,
    }
}

fn shadow_origin(object: &Shape, point: Vec3) -> Vec3 {
    point + object.normal_at(point) * SHADOW_BIAS
}

fn shadow_mask(lights: &[PointLight], mut occluded: impl FnMut(&PointLight) -> bool) -> u64 {
    lights
        .iter()
        .enumerate()
        .filter(|(_, light)| occluded(light))
        .fold(0, |mask, (i, _)| mask | (1 << i))
}
