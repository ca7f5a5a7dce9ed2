//! Deterministic sorting and neighbor consolidation of surface points.
//!
//! Independent providers routinely report the same surface: a terrain system
//! and a road system both emit a point at the same (x, y) with near-identical
//! height and normal. This module collapses those near-duplicates into one
//! canonical point per surface while keeping distinct stacked surfaces (for
//! example terrain below a water plane) separate.
//!
//! # Ordering
//!
//! Points sort ascending by Y, then ascending X, then *descending* Z, with
//! the source id as a final tie-break. Identical XY values end up adjacent
//! with decreasing height, which is both what consolidation needs (only
//! neighbors are compared) and the most useful output order, since callers
//! usually generate query positions as ranges of X within ranges of Y. The
//! source id tie-break guarantees a deterministic total order when two
//! sources emit bit-identical positions, which a single well-behaved source
//! never does but independent sources can.

use crate::config::SurfaceDataConfig;
use crate::geometry::vec3_is_close;
use crate::point::{SurfacePoint, SurfacePointList};
use crate::tag::SurfaceTag;
use std::cmp::Ordering;

/// Sort a point list into canonical order and consolidate near-duplicate
/// neighbors.
///
/// Adjacent points whose positions and normals are both within tolerance
/// merge into the earlier point, whose mask becomes the pointwise maximum of
/// both masks; the later point is discarded. The pass is idempotent: running
/// it on its own output changes nothing.
pub fn combine_and_sort_neighboring_points(
    points: &mut SurfacePointList,
    config: &SurfaceDataConfig,
) {
    // Nothing to sort or combine for 0 or 1 points.
    if points.len() <= 1 {
        return;
    }

    points.sort_by(compare_points);

    points.dedup_by(|later, earlier| {
        if vec3_is_close(later.position, earlier.position, config.position_tolerance)
            && vec3_is_close(later.normal, earlier.normal, config.normal_tolerance)
        {
            earlier.masks.merge_max(&later.masks);
            true
        } else {
            false
        }
    });
}

/// Remove points whose masks do not intersect the desired tags, preserving
/// the relative order of survivors.
///
/// Needed as a post-filter because a provider may be admitted on the promise
/// that a modifier *could* add a desired tag, and the modifier then doesn't.
pub fn filter_points(points: &mut SurfacePointList, desired_tags: &[SurfaceTag]) {
    points.retain(|point| point.masks.has_matching_tags(desired_tags));
}

fn compare_points(a: &SurfacePoint, b: &SurfacePoint) -> Ordering {
    a.position
        .y
        .total_cmp(&b.position.y)
        .then_with(|| a.position.x.total_cmp(&b.position.x))
        .then_with(|| b.position.z.total_cmp(&a.position.z))
        .then_with(|| a.source_id.cmp(&b.source_id))
}
