//! Provider and modifier registries.
//!
//! Two independent handle-keyed maps, one for providers and one for
//! modifiers, each pairing the registration entry with the trait object it
//! dispatches to. Handles are allocated from per-registry monotonic `u64`
//! counters and are never reused for the life of the registry.
//!
//! The modifier registry additionally maintains an *accumulated* tag index:
//! the union of every tag ever supplied by a modifier register or update
//! call. Tags are intentionally never removed from this index, even when the
//! contributing modifier unregisters: it is a prefilter optimization hint,
//! not an authoritative set of currently active tags. A stale tag can only
//! cause an extra provider invocation; the final per-point tag filter still
//! removes non-matching results.

use crate::provider::{RegistryEntry, SurfaceDataModifier, SurfaceDataProvider};
use crate::tag::SurfaceTag;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;

/// Handle addressing a registered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderHandle(u64);

impl fmt::Display for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle addressing a registered modifier.
///
/// Providers and modifiers have independent handle spaces; the distinct
/// types keep a handle from being used against the wrong registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierHandle(u64);

impl fmt::Display for ModifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct ProviderRecord {
    pub entry: RegistryEntry,
    pub provider: Arc<dyn SurfaceDataProvider>,
}

pub(crate) struct ModifierRecord {
    pub entry: RegistryEntry,
    pub modifier: Arc<dyn SurfaceDataModifier>,
}

/// Registry state guarded by the engine's reader/writer lock.
#[derive(Default)]
pub(crate) struct SurfaceDataRegistry {
    providers: FxHashMap<ProviderHandle, ProviderRecord>,
    modifiers: FxHashMap<ModifierHandle, ModifierRecord>,
    next_provider_handle: u64,
    next_modifier_handle: u64,
    modifier_tags: FxHashSet<SurfaceTag>,
}

impl SurfaceDataRegistry {
    pub fn register_provider(
        &mut self,
        entry: RegistryEntry,
        provider: Arc<dyn SurfaceDataProvider>,
    ) -> ProviderHandle {
        self.next_provider_handle += 1;
        let handle = ProviderHandle(self.next_provider_handle);
        self.providers.insert(handle, ProviderRecord { entry, provider });
        handle
    }

    /// Remove a provider, returning its entry. Unknown handles are a benign
    /// no-op, since callers may race unregistration against other teardown.
    pub fn unregister_provider(&mut self, handle: ProviderHandle) -> Option<RegistryEntry> {
        self.providers.remove(&handle).map(|record| record.entry)
    }

    /// Replace a provider's entry, returning the prior entry on success.
    /// The dispatch target is left untouched.
    pub fn update_provider(
        &mut self,
        handle: ProviderHandle,
        entry: RegistryEntry,
    ) -> Option<RegistryEntry> {
        let record = self.providers.get_mut(&handle)?;
        Some(std::mem::replace(&mut record.entry, entry))
    }

    pub fn register_modifier(
        &mut self,
        entry: RegistryEntry,
        modifier: Arc<dyn SurfaceDataModifier>,
    ) -> ModifierHandle {
        self.next_modifier_handle += 1;
        let handle = ModifierHandle(self.next_modifier_handle);
        self.modifier_tags.extend(entry.tags.iter().cloned());
        self.modifiers.insert(handle, ModifierRecord { entry, modifier });
        handle
    }

    pub fn unregister_modifier(&mut self, handle: ModifierHandle) -> Option<RegistryEntry> {
        // The accumulated tag index is deliberately left alone here.
        self.modifiers.remove(&handle).map(|record| record.entry)
    }

    pub fn update_modifier(
        &mut self,
        handle: ModifierHandle,
        entry: RegistryEntry,
    ) -> Option<RegistryEntry> {
        let record = self.modifiers.get_mut(&handle)?;
        self.modifier_tags.extend(entry.tags.iter().cloned());
        Some(std::mem::replace(&mut record.entry, entry))
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderRecord> {
        self.providers.values()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &ModifierRecord> {
        self.modifiers.values()
    }

    /// The accumulated modifier tag index (see module docs for staleness).
    pub fn modifier_tags(&self) -> &FxHashSet<SurfaceTag> {
        &self.modifier_tags
    }
}
