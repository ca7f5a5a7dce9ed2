//! Runtime surface data aggregation and query engine.
//!
//! This crate answers "what surface properties exist at this world location"
//! by fanning a spatial query out to an open set of independently-registered
//! data sources and merging their results into a single deterministic,
//! deduplicated answer. It supports:
//!
//! - **Dynamic registration** of point providers and point modifiers, each
//!   with coverage bounds and capability tags
//! - **Single-point, region-grid, and batched** surface queries
//! - **Tolerance-based consolidation** of near-duplicate points across
//!   sources, with deterministic output ordering
//! - **Change notifications** for downstream consumers tracking dirty areas
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                         SurfaceDataSystem                          │
//! ├────────────────────────────────────────────────────────────────────┤
//! │  provider registry  │  modifier registry  │  accumulated mod tags  │
//! └────────────────────────────────────────────────────────────────────┘
//!                │                   │
//!                ▼                   │
//!     bounds + tag prefilter         │
//!                │                   │
//!                ▼                   ▼
//!     provider fan-out  ──►  modifier fan-out (bounds only)
//!                                    │
//!                                    ▼
//!                          tag post-filter
//!                                    │
//!                                    ▼
//!              sort + neighbor consolidation (merge engine)
//!                                    │
//!                                    ▼
//!                             query results
//! ```
//!
//! Providers whose own tags miss the desired set are still invoked whenever
//! any modifier has ever declared a desired tag, because the modifier could
//! add that tag after the fact; the post-filter then removes points that
//! never received it. No spatial acceleration structure is used; providers
//! are admitted by a plain bounds test.
//!
//! # Modules
//!
//! - [`config`]: Merge tolerance configuration
//! - [`error`]: Error types
//! - [`tag`]: Surface tags and tag-set utilities
//! - [`geometry`]: Axis-aligned bounds and closeness tests
//! - [`point`]: Surface points and weighted tag masks
//! - [`provider`]: Provider/modifier traits and registration entries
//! - [`registry`]: Handle-keyed provider/modifier registries
//! - [`merge`]: Deterministic sort and neighbor consolidation
//! - [`notify`]: Change events and listeners
//! - [`system`]: The engine itself

pub mod config;
pub mod error;
pub mod geometry;
pub mod merge;
pub mod notify;
pub mod point;
pub mod provider;
mod registry;
pub mod system;
pub mod tag;

// Re-export key types
pub use config::SurfaceDataConfig;
pub use error::{Result, SurfaceDataError};
pub use geometry::Aabb;
pub use notify::{SurfaceChangeEvent, SurfaceChangeListener};
pub use point::{SourceId, SurfacePoint, SurfacePointList, SurfaceTagWeights};
pub use provider::{RegistryEntry, SurfaceDataModifier, SurfaceDataProvider};
pub use registry::{ModifierHandle, ProviderHandle};
pub use system::SurfaceDataSystem;
pub use tag::SurfaceTag;
