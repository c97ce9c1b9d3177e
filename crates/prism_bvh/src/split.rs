//! Split evaluators.
//!
//! Both evaluators reorder a range of build references and return the offset
//! at which it should be cut. They are total: for any range of two or more
//! references the offset lies strictly inside the range, falling back to the
//! index midpoint when the heuristic has nothing better to offer.

use crate::BvhConfig;
use prism_math::{Aabb, Vec3};

/// Per-object data cached for the duration of a build.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BuildRef {
    /// Position of the object in the build input.
    pub index: usize,
    pub bbox: Aabb,
    pub centroid: Vec3,
}

/// Which rule produced a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKind {
    /// Surface area heuristic found a split cheaper than a leaf.
    Sah,
    /// Objects separated at the spatial midpoint of the node box.
    Median,
    /// Neither heuristic applied; the range was cut at its index midpoint.
    Midpoint,
}

/// Strategy for one split, picked from the split's ordinal in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitStrategy {
    Sah,
    Median,
}

impl SplitStrategy {
    /// The first `sah_split_budget` splits use SAH, everything after the median.
    pub fn for_ordinal(ordinal: usize, config: &BvhConfig) -> Self {
        if ordinal < config.sah_split_budget {
            SplitStrategy::Sah
        } else {
            SplitStrategy::Median
        }
    }

    pub fn split(
        self,
        refs: &mut [BuildRef],
        bounds: &Aabb,
        config: &BvhConfig,
    ) -> (usize, SplitKind) {
        match self {
            SplitStrategy::Sah => {
                sah_split(refs, bounds, config.cost_traversal, config.cost_intersection)
            }
            SplitStrategy::Median => median_split(refs, bounds),
        }
    }
}

/// Union of the boxes of a range of references.
pub(crate) fn enclose(refs: &[BuildRef]) -> Aabb {
    refs.iter().fold(Aabb::EMPTY, |mut acc, r| {
        acc.extend(&r.bbox);
        acc
    })
}

/// Sort by centroid along `axis`, ties broken by input position so that
/// sorting the same range twice always gives the same order.
fn sort_by_axis(refs: &mut [BuildRef], axis: usize) {
    refs.sort_unstable_by(|a, b| {
        a.centroid[axis]
            .total_cmp(&b.centroid[axis])
            .then_with(|| a.index.cmp(&b.index))
    });
}

#[inline]
fn midpoint(len: usize) -> (usize, SplitKind) {
    (len / 2, SplitKind::Midpoint)
}

/// Split at the spatial midpoint of the node box along its longest axis.
pub(crate) fn median_split(refs: &mut [BuildRef], bounds: &Aabb) -> (usize, SplitKind) {
    let n = refs.len();
    debug_assert!(n >= 2, "cannot split a range of {n} objects");
    if n < 2 {
        return midpoint(n);
    }

    let axis = bounds.longest_axis();
    let mid = bounds.centroid()[axis];
    sort_by_axis(refs, axis);

    // Every centroid on one side of the midpoint
    if refs[0].centroid[axis] > mid || refs[n - 1].centroid[axis] < mid {
        return midpoint(n);
    }

    let split = refs.partition_point(|r| r.centroid[axis] < mid);
    if split == 0 || split == n {
        return midpoint(n);
    }
    (split, SplitKind::Median)
}

/// Split minimising the surface area heuristic over all three axes.
///
/// For `k` objects on the left and `n - k` on the right, the estimated cost
/// is `C_t + (A_l / A_p) * k * C_i + (A_r / A_p) * (n - k) * C_i`. A split is
/// only taken if it is cheaper than testing all `n` objects directly.
pub(crate) fn sah_split(
    refs: &mut [BuildRef],
    bounds: &Aabb,
    cost_traversal: f32,
    cost_intersection: f32,
) -> (usize, SplitKind) {
    let n = refs.len();
    debug_assert!(n >= 2, "cannot split a range of {n} objects");
    if n < 2 {
        return midpoint(n);
    }

    let parent_area = bounds.surface_area();
    if !(parent_area > 0.0 && parent_area.is_finite()) {
        return midpoint(n);
    }

    let leaf_cost = cost_intersection * n as f32;
    let mut best: Option<(f32, usize, usize)> = None;

    // trailing_area[k] is the area of the box around refs[k..]
    let mut trailing_area = vec![0.0f32; n];

    for axis in 0..3 {
        sort_by_axis(refs, axis);

        let mut right = Aabb::EMPTY;
        for k in (1..n).rev() {
            right.extend(&refs[k].bbox);
            trailing_area[k] = right.surface_area();
        }

        let mut left = Aabb::EMPTY;
        for k in 1..n {
            left.extend(&refs[k - 1].bbox);
            let cost = cost_traversal
                + (left.surface_area() / parent_area) * k as f32 * cost_intersection
                + (trailing_area[k] / parent_area) * (n - k) as f32 * cost_intersection;

            let improves = best.map_or(true, |(best_cost, _, _)| cost < best_cost);
            if cost < leaf_cost && improves {
                best = Some((cost, axis, k));
            }
        }
    }

    match best {
        Some((_, axis, k)) => {
            if axis != 2 {
                sort_by_axis(refs, axis);
            }
            (k, SplitKind::Sah)
        }
        None => midpoint(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_ref(index: usize, center: Vec3, half: f32) -> BuildRef {
        let bbox = Aabb::new(center - Vec3::splat(half), center + Vec3::splat(half));
        BuildRef {
            index,
            bbox,
            centroid: bbox.centroid(),
        }
    }

    fn refs_along_x(xs: &[f32]) -> Vec<BuildRef> {
        xs.iter()
            .enumerate()
            .map(|(i, &x)| build_ref(i, Vec3::new(x, 0.0, 0.0), 0.4))
            .collect()
    }

    fn indices(refs: &[BuildRef]) -> Vec<usize> {
        refs.iter().map(|r| r.index).collect()
    }

    #[test]
    fn test_strategy_switches_after_budget() {
        let config = BvhConfig::default();
        assert_eq!(SplitStrategy::for_ordinal(0, &config), SplitStrategy::Sah);
        assert_eq!(SplitStrategy::for_ordinal(2, &config), SplitStrategy::Sah);
        assert_eq!(SplitStrategy::for_ordinal(3, &config), SplitStrategy::Median);

        let no_sah = config.with_sah_split_budget(0);
        assert_eq!(SplitStrategy::for_ordinal(0, &no_sah), SplitStrategy::Median);
    }

    #[test]
    fn test_median_split_separates_at_box_midpoint() {
        let mut refs = refs_along_x(&[9.0, 1.0, 8.0, 2.0, 3.0]);
        let bounds = enclose(&refs);

        let (split, kind) = median_split(&mut refs, &bounds);

        // Midpoint of [0.6, 9.4] is 5.0: three centroids left of it
        assert_eq!(kind, SplitKind::Median);
        assert_eq!(split, 3);
        assert_eq!(indices(&refs), vec![1, 3, 4, 2, 0]);
    }

    #[test]
    fn test_median_split_uses_box_midpoint_not_half_extent() {
        // Box far from the origin: midpoint is 101, half the extent is 1
        let mut refs = refs_along_x(&[100.0, 100.5, 101.5, 102.0]);
        let bounds = Aabb::new(Vec3::new(100.0, -0.5, -0.5), Vec3::new(102.0, 0.5, 0.5));

        let (split, kind) = median_split(&mut refs, &bounds);
        assert_eq!(kind, SplitKind::Median);
        assert_eq!(split, 2);
    }

    #[test]
    fn test_median_split_falls_back_when_all_on_one_side() {
        // Node box is much wider than the objects, all centroids left of its midpoint
        let mut refs = refs_along_x(&[0.0, 0.5, 1.0, 1.5]);
        let bounds = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(20.0, 1.0, 1.0));

        assert_eq!(median_split(&mut refs, &bounds), (2, SplitKind::Midpoint));
    }

    #[test]
    fn test_median_split_falls_back_for_coincident_centroids() {
        let mut refs = refs_along_x(&[3.0, 3.0, 3.0]);
        let bounds = enclose(&refs);

        // All centroids sit exactly on the midpoint, so nothing is strictly left of it
        assert_eq!(median_split(&mut refs, &bounds), (1, SplitKind::Midpoint));
    }

    #[test]
    fn test_median_split_always_interior() {
        for n in 2..12 {
            let xs: Vec<f32> = (0..n).map(|i| (i * i) as f32).collect();
            let mut refs = refs_along_x(&xs);
            let bounds = enclose(&refs).padded(0.5);
            let (split, _) = median_split(&mut refs, &bounds);
            assert!(split > 0 && split < n, "split {split} not inside 0..{n}");
        }
    }

    #[test]
    fn test_sah_split_three_spheres() {
        let mut refs = refs_along_x(&[2.0, -2.0, 0.0]);
        let bounds = enclose(&refs).padded(1e-4);

        let (split, kind) = sah_split(&mut refs, &bounds, 1.0, 10.0);

        // Both cuts cost the same; the first one found wins
        assert_eq!(kind, SplitKind::Sah);
        assert_eq!(split, 1);
        assert_eq!(indices(&refs), vec![1, 2, 0]);
    }

    #[test]
    fn test_sah_split_isolates_distant_cluster() {
        // Tight cluster near the origin plus a pair far away along y
        let mut refs = vec![
            build_ref(0, Vec3::new(0.0, 0.0, 0.0), 0.5),
            build_ref(1, Vec3::new(0.0, 50.0, 0.0), 0.5),
            build_ref(2, Vec3::new(1.0, 0.0, 0.0), 0.5),
            build_ref(3, Vec3::new(0.0, 51.0, 0.0), 0.5),
            build_ref(4, Vec3::new(0.5, 0.5, 0.0), 0.5),
        ];
        let bounds = enclose(&refs);

        let (split, kind) = sah_split(&mut refs, &bounds, 1.0, 10.0);

        assert_eq!(kind, SplitKind::Sah);
        assert_eq!(split, 3);
        let mut left = indices(&refs[..split]);
        left.sort_unstable();
        assert_eq!(left, vec![0, 2, 4]);
    }

    #[test]
    fn test_sah_split_falls_back_when_leaf_is_cheaper() {
        // Heavily overlapping objects with an expensive traversal step
        let mut refs = refs_along_x(&[0.0, 0.01, 0.02, 0.03]);
        let bounds = enclose(&refs);

        assert_eq!(sah_split(&mut refs, &bounds, 1000.0, 1.0), (2, SplitKind::Midpoint));
    }

    #[test]
    fn test_sah_split_falls_back_for_flat_parent() {
        let point = Aabb::new(Vec3::ONE, Vec3::ONE);
        let mut refs: Vec<BuildRef> = (0..5)
            .map(|i| BuildRef {
                index: i,
                bbox: point,
                centroid: Vec3::ONE,
            })
            .collect();

        assert_eq!(sah_split(&mut refs, &point, 1.0, 10.0), (2, SplitKind::Midpoint));
    }

    #[test]
    fn test_sorting_is_deterministic_for_ties() {
        let mut a = refs_along_x(&[1.0, 1.0, 0.0, 1.0]);
        let mut b = a.clone();
        b.reverse();

        sort_by_axis(&mut a, 0);
        sort_by_axis(&mut b, 0);
        assert_eq!(indices(&a), indices(&b));
        assert_eq!(indices(&a), vec![2, 0, 1, 3]);
    }
}
