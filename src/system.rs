//! The surface data system: registration and query entry points.
//!
//! [`SurfaceDataSystem`] owns the provider/modifier registries behind a
//! single reader/writer lock and answers surface queries by fanning them out
//! to every admitted collaborator, then consolidating the results. Pass the
//! system instance to whoever needs it; there is no process-wide singleton.
//!
//! # Locking
//!
//! Queries hold the read lock for their whole duration, including the calls
//! into providers and modifiers, so queries never block each other.
//! Registration mutations hold the write lock only around the map mutation;
//! the change notification goes out after release (see [`crate::notify`] for
//! the resulting ordering caveat). Providers and modifiers must not call
//! back into registration from inside their callbacks, since that deadlocks
//! against the read lock their own invocation holds.

use crate::config::SurfaceDataConfig;
use crate::error::{Result, SurfaceDataError};
use crate::geometry::Aabb;
use crate::merge::{combine_and_sort_neighboring_points, filter_points};
use crate::notify::{ChangeBroadcaster, SurfaceChangeEvent, SurfaceChangeListener};
use crate::point::SurfacePointList;
use crate::provider::{RegistryEntry, SurfaceDataModifier, SurfaceDataProvider};
use crate::registry::{ModifierHandle, ProviderHandle, SurfaceDataRegistry};
use crate::tag::{has_matching_tags, has_valid_tags, SurfaceTag};
use glam::{Vec2, Vec3};
use parking_lot::RwLock;
use std::sync::Arc;

/// Aggregates surface data from registered providers and modifiers.
pub struct SurfaceDataSystem {
    registry: RwLock<SurfaceDataRegistry>,
    broadcaster: ChangeBroadcaster,
    config: SurfaceDataConfig,
}

impl Default for SurfaceDataSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceDataSystem {
    /// Create a system with default merge tolerances.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(SurfaceDataRegistry::default()),
            broadcaster: ChangeBroadcaster::default(),
            config: SurfaceDataConfig::default(),
        }
    }

    /// Create a system with custom merge tolerances.
    pub fn with_config(config: SurfaceDataConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: RwLock::new(SurfaceDataRegistry::default()),
            broadcaster: ChangeBroadcaster::default(),
            config,
        })
    }

    pub fn config(&self) -> &SurfaceDataConfig {
        &self.config
    }

    /// Subscribe to surface change notifications.
    pub fn add_change_listener(&self, listener: Arc<dyn SurfaceChangeListener>) {
        self.broadcaster.add_listener(listener);
    }

    /// Register a surface point provider. Always succeeds.
    ///
    /// Broadcasts a change event carrying the entry bounds as both old and
    /// new bounds, so listeners dirty exactly the newly covered area.
    pub fn register_provider(
        &self,
        entry: RegistryEntry,
        provider: Arc<dyn SurfaceDataProvider>,
    ) -> ProviderHandle {
        let source = entry.source_id;
        let bounds = entry.bounds;
        let handle = self.registry.write().register_provider(entry, provider);
        tracing::debug!(handle = %handle, source = %source, "Surface data provider registered");
        self.broadcaster.broadcast(&SurfaceChangeEvent {
            source: Some(source),
            old_bounds: bounds,
            new_bounds: bounds,
        });
        handle
    }

    /// Unregister a provider, returning its entry.
    ///
    /// Unknown handles return `None` without emitting a notification;
    /// callers may race unregistration against other teardown.
    pub fn unregister_provider(&self, handle: ProviderHandle) -> Option<RegistryEntry> {
        let removed = self.registry.write().unregister_provider(handle);
        if let Some(entry) = &removed {
            tracing::debug!(handle = %handle, source = %entry.source_id, "Surface data provider unregistered");
            self.broadcaster.broadcast(&SurfaceChangeEvent {
                source: Some(entry.source_id),
                old_bounds: entry.bounds,
                new_bounds: entry.bounds,
            });
        }
        removed
    }

    /// Replace a provider's registration entry in place.
    ///
    /// Returns `false` with no effect for an unknown handle. On success the
    /// change event carries the prior bounds as old and the supplied bounds
    /// as new, so listeners dirty both the vacated and the newly covered
    /// area.
    pub fn update_provider(&self, handle: ProviderHandle, entry: RegistryEntry) -> bool {
        let source = entry.source_id;
        let new_bounds = entry.bounds;
        let prior = self.registry.write().update_provider(handle, entry);
        match prior {
            Some(prior) => {
                self.broadcaster.broadcast(&SurfaceChangeEvent {
                    source: Some(source),
                    old_bounds: prior.bounds,
                    new_bounds,
                });
                true
            }
            None => false,
        }
    }

    /// Register a surface point modifier. Always succeeds.
    ///
    /// The entry's tags are also unioned into the accumulated modifier tag
    /// index used by the query prefilter bypass.
    pub fn register_modifier(
        &self,
        entry: RegistryEntry,
        modifier: Arc<dyn SurfaceDataModifier>,
    ) -> ModifierHandle {
        let source = entry.source_id;
        let bounds = entry.bounds;
        let handle = self.registry.write().register_modifier(entry, modifier);
        tracing::debug!(handle = %handle, source = %source, "Surface data modifier registered");
        self.broadcaster.broadcast(&SurfaceChangeEvent {
            source: Some(source),
            old_bounds: bounds,
            new_bounds: bounds,
        });
        handle
    }

    /// Unregister a modifier, returning its entry.
    ///
    /// Tags the modifier contributed stay in the accumulated tag index.
    pub fn unregister_modifier(&self, handle: ModifierHandle) -> Option<RegistryEntry> {
        let removed = self.registry.write().unregister_modifier(handle);
        if let Some(entry) = &removed {
            tracing::debug!(handle = %handle, source = %entry.source_id, "Surface data modifier unregistered");
            self.broadcaster.broadcast(&SurfaceChangeEvent {
                source: Some(entry.source_id),
                old_bounds: entry.bounds,
                new_bounds: entry.bounds,
            });
        }
        removed
    }

    /// Replace a modifier's registration entry in place.
    pub fn update_modifier(&self, handle: ModifierHandle, entry: RegistryEntry) -> bool {
        let source = entry.source_id;
        let new_bounds = entry.bounds;
        let prior = self.registry.write().update_modifier(handle, entry);
        match prior {
            Some(prior) => {
                self.broadcaster.broadcast(&SurfaceChangeEvent {
                    source: Some(source),
                    old_bounds: prior.bounds,
                    new_bounds,
                });
                true
            }
            None => false,
        }
    }

    /// Announce externally triggered invalidation of an area.
    ///
    /// Broadcasts with no owner identity and the dirty bounds as both old
    /// and new bounds (`None` = everything).
    pub fn refresh_surface_data(&self, dirty_bounds: Option<Aabb>) {
        self.broadcaster.broadcast(&SurfaceChangeEvent {
            source: None,
            old_bounds: dirty_bounds,
            new_bounds: dirty_bounds,
        });
    }

    /// Query the surface points at a single position.
    ///
    /// Every provider admitted by the bounds and tag prefilters appends its
    /// points; every modifier admitted by the bounds test alone annotates
    /// them; the tag post-filter and neighbor consolidation then produce the
    /// canonical result. An empty list is a valid outcome of "no data here".
    ///
    /// A provider whose own tags miss the desired set is still invoked when
    /// any modifier has ever declared one of the desired tags, because that
    /// modifier could add the tag after the fact. Points that end up without
    /// a desired tag are removed by the post-filter.
    pub fn get_surface_points(
        &self,
        position: Vec3,
        desired_tags: &[SurfaceTag],
    ) -> SurfacePointList {
        let use_tag_filters = has_valid_tags(desired_tags);

        let registry = self.registry.read();
        let modifier_tags_overlap =
            use_tag_filters && has_matching_tags(desired_tags, registry.modifier_tags());

        // Gather all intersecting points.
        let mut points = SurfacePointList::new();
        for record in registry.providers() {
            if record.entry.contains_2d(position)
                && (!use_tag_filters
                    || modifier_tags_overlap
                    || has_matching_tags(desired_tags, &record.entry.tags))
            {
                record.provider.get_surface_points(position, &mut points);
            }
        }

        if !points.is_empty() {
            // Modify or annotate reported points. Modifiers see every point
            // within their bounds; there is no tag prefilter here.
            for record in registry.modifiers() {
                if record.entry.contains_2d(position) {
                    record.modifier.modify_surface_points(&mut points);
                }
            }

            if use_tag_filters {
                filter_points(&mut points, desired_tags);
            }
            combine_and_sort_neighboring_points(&mut points, &self.config);
        }

        points
    }

    /// Query surface points on a grid of positions covering `region`.
    ///
    /// The grid is inclusive of the region's minimum corner and exclusive of
    /// its maximum corner on both axes, stepping by `step.x` / `step.y`. The
    /// Z coordinate of each generated position is `f32::MAX`; providers are
    /// expected to ignore or overwrite it.
    pub fn get_surface_points_from_region(
        &self,
        region: Aabb,
        step: Vec2,
        desired_tags: &[SurfaceTag],
    ) -> Result<Vec<SurfacePointList>> {
        if !(step.x.is_finite() && step.x > 0.0 && step.y.is_finite() && step.y > 0.0) {
            return Err(SurfaceDataError::InvalidStep {
                x: step.x,
                y: step.y,
            });
        }

        let expected = (region.x_extent() / step.x).ceil().max(0.0) as usize
            * (region.y_extent() / step.y).ceil().max(0.0) as usize;
        let mut positions = Vec::with_capacity(expected);
        let mut y = region.min.y;
        while y < region.max.y {
            let mut x = region.min.x;
            while x < region.max.x {
                positions.push(Vec3::new(x, y, f32::MAX));
                x += step.x;
            }
            y += step.y;
        }

        Ok(self.get_surface_points_from_list(&positions, desired_tags))
    }

    /// Query surface points for an explicit list of positions.
    ///
    /// Returns one result list per input position, in input order, each
    /// identical to what [`Self::get_surface_points`] would return for that
    /// position. Positions are iterated inside the provider and modifier
    /// loops so each collaborator's entry-level tag check runs once for the
    /// whole batch rather than once per position.
    pub fn get_surface_points_from_list(
        &self,
        positions: &[Vec3],
        desired_tags: &[SurfaceTag],
    ) -> Vec<SurfacePointList> {
        let registry = self.registry.read();

        let mut lists = vec![SurfacePointList::new(); positions.len()];

        let use_tag_filters = has_valid_tags(desired_tags);
        let modifier_tags_overlap =
            use_tag_filters && has_matching_tags(desired_tags, registry.modifier_tags());

        for record in registry.providers() {
            if !use_tag_filters
                || modifier_tags_overlap
                || has_matching_tags(desired_tags, &record.entry.tags)
            {
                for (position, list) in positions.iter().zip(lists.iter_mut()) {
                    if record.entry.contains_2d(*position) {
                        record.provider.get_surface_points(*position, list);
                    }
                }
            }
        }

        for record in registry.modifiers() {
            for (position, list) in positions.iter().zip(lists.iter_mut()) {
                // A position no provider produced points for is skipped;
                // modifiers only annotate, they never create.
                if !list.is_empty() && record.entry.contains_2d(*position) {
                    record.modifier.modify_surface_points(list);
                }
            }
        }

        for list in &mut lists {
            if use_tag_filters {
                filter_points(list, desired_tags);
            }
            combine_and_sort_neighboring_points(list, &self.config);
        }

        lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::{SourceId, SurfacePoint, SurfaceTagWeights};

    #[test]
    fn test_system_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SurfaceDataSystem>();
    }

    struct FlatProvider {
        source_id: SourceId,
        height: f32,
        tags: Vec<(SurfaceTag, f32)>,
    }

    impl SurfaceDataProvider for FlatProvider {
        fn get_surface_points(&self, position: Vec3, output: &mut SurfacePointList) {
            output.push(SurfacePoint {
                source_id: self.source_id,
                position: Vec3::new(position.x, position.y, self.height),
                normal: Vec3::Z,
                masks: self.tags.iter().cloned().collect::<SurfaceTagWeights>(),
            });
        }
    }

    fn flat(source: u64, height: f32, tags: &[(&str, f32)]) -> Arc<FlatProvider> {
        Arc::new(FlatProvider {
            source_id: SourceId(source),
            height,
            tags: tags
                .iter()
                .map(|(name, weight)| (SurfaceTag::new(*name), *weight))
                .collect(),
        })
    }

    #[test]
    fn test_invalid_desired_tags_mean_no_filtering() {
        let system = SurfaceDataSystem::new();
        let entry = RegistryEntry::new(SourceId(1), None, vec![SurfaceTag::new("terrain")]);
        system.register_provider(entry, flat(1, 0.0, &[("terrain", 1.0)]));

        // A set holding only placeholder tags behaves like an empty set.
        let points =
            system.get_surface_points(Vec3::new(0.0, 0.0, 0.0), &[SurfaceTag::new("")]);
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_region_query_rejects_bad_step() {
        let system = SurfaceDataSystem::new();
        let region = Aabb::new(Vec3::ZERO, Vec3::new(4.0, 4.0, 0.0));

        assert!(matches!(
            system.get_surface_points_from_region(region, Vec2::new(0.0, 1.0), &[]),
            Err(SurfaceDataError::InvalidStep { .. })
        ));
        assert!(matches!(
            system.get_surface_points_from_region(region, Vec2::new(1.0, f32::NAN), &[]),
            Err(SurfaceDataError::InvalidStep { .. })
        ));
    }

    #[test]
    fn test_region_query_grid_is_min_inclusive_max_exclusive() {
        let system = SurfaceDataSystem::new();
        let entry = RegistryEntry::new(SourceId(1), None, vec![]);
        system.register_provider(entry, flat(1, 0.0, &[]));

        let region = Aabb::new(Vec3::ZERO, Vec3::new(2.0, 3.0, 0.0));
        let lists = system
            .get_surface_points_from_region(region, Vec2::new(1.0, 1.0), &[])
            .unwrap();

        // 2 x positions (0, 1) by 3 y positions (0, 1, 2).
        assert_eq!(lists.len(), 6);
        assert!(lists.iter().all(|list| list.len() == 1));
        assert_eq!(lists[0][0].position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(lists[5][0].position, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_empty_region_yields_no_positions() {
        let system = SurfaceDataSystem::new();
        let region = Aabb::new(Vec3::new(5.0, 5.0, 0.0), Vec3::new(5.0, 5.0, 0.0));

        let lists = system
            .get_surface_points_from_region(region, Vec2::new(1.0, 1.0), &[])
            .unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_update_unknown_provider_fails_without_effect() {
        let system = SurfaceDataSystem::new();
        let handle = system.register_provider(
            RegistryEntry::new(SourceId(1), None, vec![]),
            flat(1, 0.0, &[]),
        );
        system.unregister_provider(handle);

        let updated = system.update_provider(
            handle,
            RegistryEntry::new(SourceId(1), None, vec![SurfaceTag::new("terrain")]),
        );
        assert!(!updated);
    }
}
