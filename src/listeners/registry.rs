//! # Ordered listener registry with snapshot broadcast.
//!
//! [`ListenerRegistry`] stores the listeners of one event kind in an arena
//! keyed by monotonically increasing ids. Ids are never reused, so a
//! [`ListenerHandle`] stays valid (or harmlessly stale) for the registry's
//! whole lifetime.
//!
//! ## Architecture
//! ```text
//! broadcast(ev)
//!     │
//!     ├─ lock → snapshot [(id1, l1), (id2, l2), ...] → unlock
//!     │
//!     └─ for each (id, l) in snapshot:
//!            still registered? ── no ──► skip
//!                 │ yes
//!                 ▼
//!            l.on_event(ev)      (no lock held)
//! ```
//!
//! ## Rules
//! - **Order**: broadcast order is registration order
//! - **No dedup**: the same listener added twice is delivered twice
//! - **Added during broadcast**: not visited by that broadcast
//! - **Removed during broadcast**: skipped if not yet visited; never re-visited
//! - **Re-entrancy**: listeners may add/remove/broadcast on the same registry

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::listeners::Listener;

/// Source of registry identities, so handles cannot cross registries.
static REGISTRY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque identity of a registered listener.
///
/// Returned by [`ListenerRegistry::add`]; only useful for removal. Handles
/// from another registry are ignored by [`ListenerRegistry::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    registry: u64,
    id: u64,
}

struct Slots<E> {
    next_id: u64,
    entries: BTreeMap<u64, Arc<dyn Listener<E>>>,
}

/// Ordered, re-entrancy safe collection of listeners for one payload type.
pub struct ListenerRegistry<E> {
    id: u64,
    slots: Mutex<Slots<E>>,
}

impl<E: 'static> ListenerRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: REGISTRY_SEQ.fetch_add(1, Ordering::Relaxed),
            slots: Mutex::new(Slots {
                next_id: 0,
                entries: BTreeMap::new(),
            }),
        }
    }

    /// Appends a listener; it is delivered after every listener added before it.
    pub fn add<L>(&self, listener: L) -> ListenerHandle
    where
        L: Listener<E>,
    {
        self.add_arc(Arc::new(listener))
    }

    /// Appends a shared listener.
    ///
    /// The same `Arc` may be added several times; each addition is an
    /// independent registration with its own handle.
    pub fn add_arc(&self, listener: Arc<dyn Listener<E>>) -> ListenerHandle {
        let mut slots = self.slots.lock();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.entries.insert(id, listener);
        ListenerHandle {
            registry: self.id,
            id,
        }
    }

    /// Detaches a listener.
    ///
    /// Returns `false` (and does nothing) if the handle was already removed,
    /// was cleared, or belongs to another registry.
    pub fn remove(&self, handle: ListenerHandle) -> bool {
        if handle.registry != self.id {
            return false;
        }
        self.slots.lock().entries.remove(&handle.id).is_some()
    }

    /// Returns `true` if the handle still refers to a registered listener.
    pub fn contains(&self, handle: ListenerHandle) -> bool {
        handle.registry == self.id && self.slots.lock().entries.contains_key(&handle.id)
    }

    /// Delivers `event` to every listener registered when the call started.
    ///
    /// Returns the number of listeners actually invoked.
    pub fn broadcast(&self, event: &E) -> usize {
        let snapshot: Vec<(u64, Arc<dyn Listener<E>>)> = self
            .slots
            .lock()
            .entries
            .iter()
            .map(|(id, l)| (*id, Arc::clone(l)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in snapshot {
            let live = self.slots.lock().entries.contains_key(&id);
            if !live {
                continue;
            }
            listener.on_event(event);
            delivered += 1;
        }
        delivered
    }

    /// Discards every listener without invoking it.
    pub fn clear(&self) {
        self.slots.lock().entries.clear();
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().entries.is_empty()
    }
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Weak;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl Listener<u32> {
        let log = Arc::clone(log);
        move |_: &u32| log.lock().push(name)
    }

    #[test]
    fn test_broadcast_in_registration_order() {
        let reg = ListenerRegistry::<u32>::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        reg.add(recorder(&log, "a"));
        reg.add(recorder(&log, "b"));
        reg.add(recorder(&log, "c"));

        assert_eq!(reg.broadcast(&1), 3);
        assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_same_listener_twice_delivers_twice() {
        let reg = ListenerRegistry::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let shared: Arc<dyn Listener<u32>> = Arc::new(move |_: &u32| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let first = reg.add_arc(Arc::clone(&shared));
        let second = reg.add_arc(shared);
        assert_ne!(first, second);

        reg.broadcast(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_registry_with_owned_payload() {
        let reg: ListenerRegistry<String> = ListenerRegistry::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        reg.add(move |id: &String| s.lock().push(id.clone()));

        assert_eq!(reg.broadcast(&"composite".to_string()), 1);
        assert_eq!(*seen.lock(), vec!["composite".to_string()]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let reg = ListenerRegistry::<u32>::new();
        let handle = reg.add(|_: &u32| {});
        assert!(reg.remove(handle));
        assert!(!reg.remove(handle));
        assert!(reg.is_empty());
        assert_eq!(reg.broadcast(&0), 0);
    }

    #[test]
    fn test_foreign_handle_is_ignored() {
        let a = ListenerRegistry::<u32>::new();
        let b = ListenerRegistry::<u32>::new();
        let ha = a.add(|_: &u32| {});
        b.add(|_: &u32| {});

        assert!(!b.remove(ha));
        assert!(!b.contains(ha));
        assert_eq!(b.len(), 1);
        assert!(a.contains(ha));
    }

    #[test]
    fn test_added_during_broadcast_not_visited() {
        let reg = Arc::new(ListenerRegistry::<u32>::new());
        let late_hits = Arc::new(AtomicUsize::new(0));

        let weak: Weak<ListenerRegistry<u32>> = Arc::downgrade(&reg);
        let hits = Arc::clone(&late_hits);
        reg.add(move |_: &u32| {
            if let Some(reg) = weak.upgrade() {
                let hits = Arc::clone(&hits);
                reg.add(move |_: &u32| {
                    hits.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(reg.broadcast(&0), 1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        assert_eq!(reg.len(), 2);

        // The late listener takes part in the next broadcast.
        reg.broadcast(&0);
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removed_during_broadcast_is_skipped() {
        let reg = Arc::new(ListenerRegistry::<u32>::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&reg);
        let slot = Arc::clone(&victim);
        let l = Arc::clone(&log);
        reg.add(move |_: &u32| {
            l.lock().push("remover");
            if let (Some(reg), Some(h)) = (weak.upgrade(), *slot.lock()) {
                reg.remove(h);
            }
        });
        let h = reg.add(recorder(&log, "victim"));
        *victim.lock() = Some(h);
        reg.add(recorder(&log, "tail"));

        assert_eq!(reg.broadcast(&0), 2);
        assert_eq!(*log.lock(), vec!["remover", "tail"]);
    }

    #[test]
    fn test_self_removal_no_double_delivery() {
        let reg = Arc::new(ListenerRegistry::<u32>::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let own: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&reg);
        let slot = Arc::clone(&own);
        let h = Arc::clone(&hits);
        let handle = reg.add(move |_: &u32| {
            h.fetch_add(1, Ordering::SeqCst);
            if let (Some(reg), Some(me)) = (weak.upgrade(), *slot.lock()) {
                reg.remove(me);
            }
        });
        *own.lock() = Some(handle);

        reg.broadcast(&0);
        reg.broadcast(&0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_clear_does_not_invoke() {
        let reg = ListenerRegistry::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let handle = reg.add(move |_: &u32| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        reg.clear();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!reg.contains(handle));
        assert_eq!(reg.broadcast(&0), 0);
    }
}
