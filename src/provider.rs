//! Provider and modifier traits, and their registration entries.
//!
//! These traits are the seam between the engine and the systems that
//! actually know about surfaces. A *provider* generates new surface points
//! for a queried position (a terrain height system, for example). A
//! *modifier* annotates points that already exist within its bounds; the
//! common example is a water volume marking contained points "underwater".
//!
//! # Design
//!
//! The engine never stores collaborator state beyond an `Arc` to the trait
//! object, resolved through a handle-keyed table owned by the registry. The
//! bounds and capability tags a collaborator declares live in its
//! [`RegistryEntry`], an immutable-until-replaced snapshot supplied at
//! registration time.
//!
//! # Contract
//!
//! Both callbacks run under the engine's shared registration lock: they must
//! return promptly, must not retain the passed point list beyond the call,
//! and must not re-enter registration (that would deadlock against a pending
//! writer). Modifiers may add or update mask weights on existing points but
//! must not add or remove points.

use crate::geometry::Aabb;
use crate::point::{SourceId, SurfacePointList};
use crate::tag::SurfaceTag;
use glam::Vec3;

/// Generates surface points for a queried position.
pub trait SurfaceDataProvider: Send + Sync {
    /// Append zero or more points for `position` onto `output`.
    fn get_surface_points(&self, position: Vec3, output: &mut SurfacePointList);
}

/// Annotates surface points already generated within its bounds.
pub trait SurfaceDataModifier: Send + Sync {
    /// Add or alter mask weights on the accumulated points for a position.
    fn modify_surface_points(&self, points: &mut SurfacePointList);
}

/// Registration snapshot for a provider or modifier.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// Owner identity, carried into change notifications and surface points.
    pub source_id: SourceId,

    /// Coverage bounds; `None` means unbounded (global) coverage.
    pub bounds: Option<Aabb>,

    /// Capability tags: the surface categories this registration can supply.
    pub tags: Vec<SurfaceTag>,
}

impl RegistryEntry {
    pub fn new(source_id: SourceId, bounds: Option<Aabb>, tags: Vec<SurfaceTag>) -> Self {
        Self {
            source_id,
            bounds,
            tags,
        }
    }

    /// Bounds admission test: unbounded entries admit every position.
    pub fn contains_2d(&self, position: Vec3) -> bool {
        match &self.bounds {
            None => true,
            Some(bounds) => bounds.contains_2d(position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_entry_admits_everything() {
        let entry = RegistryEntry::new(SourceId(1), None, vec![]);

        assert!(entry.contains_2d(Vec3::new(0.0, 0.0, 0.0)));
        assert!(entry.contains_2d(Vec3::new(1.0e9, -1.0e9, f32::MAX)));
    }

    #[test]
    fn test_bounded_entry_uses_2d_test() {
        let bounds = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let entry = RegistryEntry::new(SourceId(1), Some(bounds), vec![]);

        assert!(entry.contains_2d(Vec3::new(0.5, 0.5, 50.0)));
        assert!(!entry.contains_2d(Vec3::new(2.0, 0.5, 0.5)));
    }
}
