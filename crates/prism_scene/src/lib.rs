//! Scene objects for the Prism BVH.
//!
//! Concrete shapes that implement [`prism_bvh::Primitive`] plus the shading
//! accessors a renderer needs after a hit, and a JSON scene description that
//! picks and builds the acceleration structure.

mod light;
mod material;
mod random;
mod scene;
mod shape;
mod sphere;
mod triangle;

pub use light::PointLight;
pub use material::{Material, MaterialId};
pub use random::{random_scene, RandomSceneParams};
pub use scene::{
    AcceleratorKind, Scene, SceneAccelerator, SceneDescription, SceneError, SceneResult,
    ShapeDesc,
};
pub use shape::{Shape, Surface};
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export the math and query types used throughout this crate.
pub use prism_bvh::{Accelerator, Bvh, BvhConfig, Hit, LinearScan, Primitive};
pub use prism_math::{Aabb, Interval, Ray, Vec3};
