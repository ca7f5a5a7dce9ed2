//! Surface change notifications.
//!
//! Registration mutations and explicit refreshes broadcast a
//! [`SurfaceChangeEvent`] to every registered listener so that downstream
//! consumers (vegetation placement, navigation, caching layers) can mark the
//! affected area dirty.
//!
//! Events are emitted *after* the registration lock is released, so an
//! observer can race with a further mutation of the same handle performed by
//! another thread. Listeners that need a consistent view must re-query.

use crate::geometry::Aabb;
use crate::point::SourceId;
use parking_lot::RwLock;
use std::sync::Arc;

/// A change to registered surface coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceChangeEvent {
    /// Owner whose coverage changed; `None` for externally triggered
    /// refreshes that have no single owner.
    pub source: Option<SourceId>,

    /// Coverage before the change (`None` = unbounded).
    ///
    /// On register and unregister this carries the entry bounds for both old
    /// and new, so listeners dirty exactly the covered area rather than the
    /// whole world.
    pub old_bounds: Option<Aabb>,

    /// Coverage after the change (`None` = unbounded).
    pub new_bounds: Option<Aabb>,
}

/// Observer of surface coverage changes.
pub trait SurfaceChangeListener: Send + Sync {
    fn on_surface_changed(&self, event: &SurfaceChangeEvent);
}

/// Fan-out of change events to registered listeners.
#[derive(Default)]
pub(crate) struct ChangeBroadcaster {
    listeners: RwLock<Vec<Arc<dyn SurfaceChangeListener>>>,
}

impl ChangeBroadcaster {
    pub fn add_listener(&self, listener: Arc<dyn SurfaceChangeListener>) {
        self.listeners.write().push(listener);
    }

    pub fn broadcast(&self, event: &SurfaceChangeEvent) {
        // Snapshot the listener list so callbacks run without the lock held;
        // a listener may itself add listeners or mutate registrations.
        let listeners: Vec<_> = self.listeners.read().clone();
        for listener in listeners {
            listener.on_surface_changed(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        events: Mutex<Vec<SurfaceChangeEvent>>,
    }

    impl SurfaceChangeListener for Recorder {
        fn on_surface_changed(&self, event: &SurfaceChangeEvent) {
            self.events.lock().push(event.clone());
        }
    }

    #[test]
    fn test_broadcast_reaches_all_listeners() {
        let broadcaster = ChangeBroadcaster::default();
        let a = Arc::new(Recorder {
            events: Mutex::new(Vec::new()),
        });
        let b = Arc::new(Recorder {
            events: Mutex::new(Vec::new()),
        });
        broadcaster.add_listener(a.clone());
        broadcaster.add_listener(b.clone());

        let event = SurfaceChangeEvent {
            source: Some(SourceId(7)),
            old_bounds: None,
            new_bounds: None,
        };
        broadcaster.broadcast(&event);

        assert_eq!(*a.events.lock(), vec![event.clone()]);
        assert_eq!(*b.events.lock(), vec![event]);
    }
}
