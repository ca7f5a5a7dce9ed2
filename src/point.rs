//! Surface points and their weighted tag masks.
//!
//! A [`SurfacePoint`] is one sample of a surface at a world location: a
//! position, a surface normal, and a mask of weighted tags describing what
//! kind of surface it is. Points are allocated fresh per query and never
//! persisted; providers create them, modifiers annotate them in place.

use crate::tag::SurfaceTag;
use glam::Vec3;
use rustc_hash::FxHashMap;
use std::fmt;

/// Opaque identifier for the owner of a registration or point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weighted tag mask: one weight per tag, weights clamped to [0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceTagWeights(FxHashMap<SurfaceTag, f32>);

impl SurfaceTagWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a tag's weight, replacing any existing weight for that tag.
    /// Weights are clamped to [0, 1].
    pub fn set_weight(&mut self, tag: SurfaceTag, weight: f32) {
        self.0.insert(tag, weight.clamp(0.0, 1.0));
    }

    /// The weight recorded for a tag, if present.
    pub fn weight(&self, tag: &SurfaceTag) -> Option<f32> {
        self.0.get(tag).copied()
    }

    /// Consolidate another mask into this one: for every tag present in
    /// either mask, keep the maximum of the two weights. Tags absent from
    /// one side contribute their existing weight unchanged.
    pub fn merge_max(&mut self, other: &SurfaceTagWeights) {
        for (tag, &weight) in &other.0 {
            self.0
                .entry(tag.clone())
                .and_modify(|existing| *existing = existing.max(weight))
                .or_insert(weight);
        }
    }

    /// True if any of this mask's tags appears in `desired`.
    pub fn has_matching_tags(&self, desired: &[SurfaceTag]) -> bool {
        self.0.keys().any(|tag| desired.contains(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SurfaceTag, f32)> {
        self.0.iter().map(|(tag, &weight)| (tag, weight))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SurfaceTag, f32)> for SurfaceTagWeights {
    fn from_iter<I: IntoIterator<Item = (SurfaceTag, f32)>>(iter: I) -> Self {
        let mut weights = Self::new();
        for (tag, weight) in iter {
            weights.set_weight(tag, weight);
        }
        weights
    }
}

/// One surface sample at a world location.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePoint {
    /// Owner that produced this point.
    pub source_id: SourceId,

    /// World position of the sample.
    pub position: Vec3,

    /// Surface normal at the sample (unit vector).
    pub normal: Vec3,

    /// Weighted tags describing the surface at this sample.
    pub masks: SurfaceTagWeights,
}

/// The working list a query accumulates points into.
pub type SurfacePointList = Vec<SurfacePoint>;
