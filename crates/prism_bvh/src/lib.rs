//! Bounding volume hierarchy for ray queries.
//!
//! The tree is built once over a set of [`Primitive`]s and then answers two
//! kinds of queries read-only:
//!
//! - nearest hit: which object does this ray hit first, and where
//! - any hit: is this segment blocked by anything (shadow rays)
//!
//! Nodes live in a flat array and reference their children by index. The two
//! children of an internal node are always adjacent, so a node only stores
//! the index of the first one. The first few splits near the root are chosen
//! with the surface area heuristic; deeper splits use a cheap spatial median.
//!
//! ```ignore
//! use prism_bvh::{Accelerator, Bvh};
//!
//! let bvh = Bvh::build(spheres);
//! if let Some(hit) = bvh.nearest_hit(&ray) {
//!     shade(hit.object, hit.point);
//! }
//! let in_shadow = bvh.occluded(&Ray::segment(hit_point, light_position));
//! ```

mod accel;
mod build;
mod bvh;
mod config;
mod error;
mod linear;
mod node;
mod primitive;
mod split;
mod stats;
mod traverse;

#[cfg(test)]
mod testing;

pub use accel::{Accelerator, Hit, RAY_EPSILON};
pub use bvh::Bvh;
pub use config::BvhConfig;
pub use error::{BvhError, BvhResult};
pub use linear::LinearScan;
pub use node::BvhNode;
pub use primitive::Primitive;
pub use split::SplitKind;
pub use stats::{BvhStats, SplitCounts};
pub use traverse::TraversalStack;

/// Re-export the geometry types that appear in this crate's API.
pub use prism_math::{Aabb, Interval, Ray, Vec3};
