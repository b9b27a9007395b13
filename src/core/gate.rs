//! # Ready gate - one-shot "map ready" state machine.
//!
//! [`ReadyGate`] is the sink normally bound to the dispatcher. It turns the
//! curated forward set into facade notifications and fires the map-ready
//! transition exactly once, draining a queue of one-shot callbacks.
//!
//! ## States
//! ```text
//!            bind(facade)               first DidFinishLoadingStyle
//! Unbound ───────────────► BoundNotReady ───────────────────────────► BoundReady
//!                                                                      (final)
//! ```
//!
//! ## Transitions
//! ```text
//! DidFinishLoadingStyle:
//!   Unbound       → contract violation (panic)
//!   BoundNotReady → BoundReady; pre_map_ready → callbacks (FIFO) → post_map_ready
//!   BoundReady    → ignored
//!
//! DidFinishRenderingFrame{partial}: true → frame; false → frame_fully
//! DidFinishLoadingMap:              camera_change (resync)
//! CameraIsChanging:                 camera_change
//! CameraDidChange{animated}:        true → camera_did_change_animated; false → camera_change
//!   (all four ignored while Unbound)
//! ```
//!
//! ## Ready callbacks
//! - The queue is taken as a whole before the first callback runs; each
//!   callback is invoked once and is gone from the queue by then
//! - Callbacks added during the drain land in a fresh queue that is never
//!   drained, since the transition does not repeat
//! - Callbacks added after the transition are queued and never invoked;
//!   check [`ReadyGate::is_ready`] first

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::core::{MapChangeSink, MapFacade};
use crate::error::DispatchError;
use crate::events::EventKind;

/// Deferred one-shot action run when the map first becomes ready.
pub type ReadyCallback<F> = Box<dyn FnOnce(&Arc<F>) + Send + 'static>;

/// Lifecycle of a [`ReadyGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// No facade bound yet.
    Unbound,
    /// Facade bound; style not loaded yet.
    BoundNotReady,
    /// Map ready; final state.
    BoundReady,
}

enum Phase<F: ?Sized> {
    Unbound,
    NotReady(Arc<F>),
    Ready(Arc<F>),
}

struct GateState<F: ?Sized> {
    phase: Phase<F>,
    callbacks: Vec<ReadyCallback<F>>,
}

/// One-shot map-ready gate driving a [`MapFacade`].
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use mapchange::{MapChangeDispatcher, MapFacade, ReadyGate};
///
/// struct Session;
/// impl MapFacade for Session {
///     fn on_pre_map_ready(&self) {}
///     fn on_post_map_ready(&self) {}
///     fn on_camera_change(&self) {}
///     fn on_camera_did_change_animated(&self) {}
///     fn on_did_finish_rendering_frame(&self) {}
///     fn on_did_finish_rendering_frame_fully(&self) {}
/// }
///
/// let hub = MapChangeDispatcher::new();
/// let gate = Arc::new(ReadyGate::<Session>::new());
/// gate.bind(Arc::new(Session));
/// hub.bind(gate.clone());
///
/// gate.add_on_map_ready(|_session: &Arc<Session>| println!("ready"));
/// hub.on_did_finish_loading_style();
/// assert!(gate.is_ready());
/// ```
pub struct ReadyGate<F: ?Sized = dyn MapFacade> {
    inner: Mutex<GateState<F>>,
}

impl<F: MapFacade + ?Sized> ReadyGate<F> {
    /// Creates an unbound gate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(GateState {
                phase: Phase::Unbound,
                callbacks: Vec::new(),
            }),
        }
    }

    /// Creates a gate already bound to `facade`.
    #[must_use]
    pub fn bound(facade: Arc<F>) -> Self {
        let gate = Self::new();
        gate.bind(facade);
        gate
    }

    /// Binds the facade. Rebinding replaces the facade but never moves the state backwards.
    pub fn bind(&self, facade: Arc<F>) {
        let mut inner = self.inner.lock();
        let phase = std::mem::replace(&mut inner.phase, Phase::Unbound);
        inner.phase = match phase {
            Phase::Unbound | Phase::NotReady(_) => Phase::NotReady(facade),
            Phase::Ready(_) => Phase::Ready(facade),
        };
        debug!(state = ?state_of(&inner.phase), "facade bound");
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ReadyState {
        state_of(&self.inner.lock().phase)
    }

    /// Returns `true` once the map-ready transition happened.
    pub fn is_ready(&self) -> bool {
        self.state() == ReadyState::BoundReady
    }

    /// Returns `true` until the map-ready transition happened.
    pub fn is_initial_load(&self) -> bool {
        !self.is_ready()
    }

    /// Number of queued ready callbacks.
    pub fn pending_callbacks(&self) -> usize {
        self.inner.lock().callbacks.len()
    }

    /// Queues a one-shot ready callback.
    ///
    /// The state is not checked: a callback added once the gate is ready is
    /// kept in the queue but never invoked.
    pub fn add_on_map_ready<C>(&self, callback: C)
    where
        C: FnOnce(&Arc<F>) + Send + 'static,
    {
        let mut inner = self.inner.lock();
        if matches!(inner.phase, Phase::Ready(_)) {
            warn!("ready callback added after map ready; it will not run");
        }
        inner.callbacks.push(Box::new(callback));
    }

    /// Drops every queued ready callback without invoking it.
    pub fn clear_on_map_ready(&self) {
        self.inner.lock().callbacks.clear();
    }

    /// Handles the style-loaded event.
    ///
    /// Returns `Ok(true)` if this call performed the map-ready transition,
    /// `Ok(false)` if the gate was already ready, and
    /// [`DispatchError::NotBound`] if no facade is bound.
    pub fn try_on_did_finish_loading_style(&self) -> Result<bool, DispatchError> {
        let (facade, callbacks) = {
            let mut inner = self.inner.lock();
            let facade = match &inner.phase {
                Phase::Unbound => {
                    return Err(DispatchError::NotBound {
                        event: EventKind::DidFinishLoadingStyle,
                    })
                }
                Phase::Ready(_) => return Ok(false),
                Phase::NotReady(facade) => Arc::clone(facade),
            };
            inner.phase = Phase::Ready(Arc::clone(&facade));
            (facade, std::mem::take(&mut inner.callbacks))
        };

        debug!(callbacks = callbacks.len(), "map ready");
        facade.on_pre_map_ready();
        for callback in callbacks {
            callback(&facade);
        }
        facade.on_post_map_ready();
        Ok(true)
    }

    /// Returns the bound facade, if any.
    fn facade(&self, kind: EventKind) -> Option<Arc<F>> {
        match &self.inner.lock().phase {
            Phase::Unbound => {
                trace!(%kind, "no facade bound; event dropped");
                None
            }
            Phase::NotReady(facade) | Phase::Ready(facade) => Some(Arc::clone(facade)),
        }
    }
}

impl<F: MapFacade + ?Sized> Default for ReadyGate<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: MapFacade + ?Sized> MapChangeSink for ReadyGate<F> {
    fn on_camera_is_changing(&self) {
        if let Some(facade) = self.facade(EventKind::CameraIsChanging) {
            facade.on_camera_change();
        }
    }

    fn on_camera_did_change(&self, animated: bool) {
        if let Some(facade) = self.facade(EventKind::CameraDidChange) {
            if animated {
                facade.on_camera_did_change_animated();
            } else {
                facade.on_camera_change();
            }
        }
    }

    fn on_did_finish_loading_map(&self) {
        // Resync camera state in case no camera event fired before the load completed.
        if let Some(facade) = self.facade(EventKind::DidFinishLoadingMap) {
            facade.on_camera_change();
        }
    }

    fn on_did_finish_rendering_frame(&self, partial: bool) {
        if let Some(facade) = self.facade(EventKind::DidFinishRenderingFrame) {
            if partial {
                facade.on_did_finish_rendering_frame();
            } else {
                facade.on_did_finish_rendering_frame_fully();
            }
        }
    }

    fn on_did_finish_loading_style(&self) {
        if let Err(err) = self.try_on_did_finish_loading_style() {
            error!(error = err.as_label(), "{}", err.as_message());
            panic!("ready gate: {err}");
        }
    }
}

fn state_of<F: ?Sized>(phase: &Phase<F>) -> ReadyState {
    match phase {
        Phase::Unbound => ReadyState::Unbound,
        Phase::NotReady(_) => ReadyState::BoundNotReady,
        Phase::Ready(_) => ReadyState::BoundReady,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapChangeDispatcher;
    use crate::events::ChangeCode;

    /// Facade recording every notification in order.
    #[derive(Default)]
    struct RecordingFacade {
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingFacade {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }

        fn count(&self, name: &str) -> usize {
            self.calls.lock().iter().filter(|c| **c == name).count()
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().push(name);
        }
    }

    impl MapFacade for RecordingFacade {
        fn on_pre_map_ready(&self) {
            self.record("pre_map_ready");
        }
        fn on_post_map_ready(&self) {
            self.record("post_map_ready");
        }
        fn on_camera_change(&self) {
            self.record("camera_change");
        }
        fn on_camera_did_change_animated(&self) {
            self.record("camera_did_change_animated");
        }
        fn on_did_finish_rendering_frame(&self) {
            self.record("frame");
        }
        fn on_did_finish_rendering_frame_fully(&self) {
            self.record("frame_fully");
        }
    }

    fn bound_gate() -> (Arc<ReadyGate<RecordingFacade>>, Arc<RecordingFacade>) {
        let facade = Arc::new(RecordingFacade::default());
        let gate = Arc::new(ReadyGate::bound(Arc::clone(&facade)));
        (gate, facade)
    }

    #[test]
    fn test_initial_state() {
        let gate = ReadyGate::<RecordingFacade>::new();
        assert_eq!(gate.state(), ReadyState::Unbound);
        assert!(gate.is_initial_load());

        gate.bind(Arc::new(RecordingFacade::default()));
        assert_eq!(gate.state(), ReadyState::BoundNotReady);
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_style_loaded_fires_once() {
        let (gate, facade) = bound_gate();
        let f = Arc::clone(&facade);
        gate.add_on_map_ready(move |_: &Arc<RecordingFacade>| f.record("callback_1"));
        let f = Arc::clone(&facade);
        gate.add_on_map_ready(move |_: &Arc<RecordingFacade>| f.record("callback_2"));

        assert_eq!(gate.try_on_did_finish_loading_style(), Ok(true));
        assert_eq!(
            facade.calls(),
            vec!["pre_map_ready", "callback_1", "callback_2", "post_map_ready"]
        );
        assert_eq!(gate.state(), ReadyState::BoundReady);
        assert_eq!(gate.pending_callbacks(), 0);

        assert_eq!(gate.try_on_did_finish_loading_style(), Ok(false));
        gate.on_did_finish_loading_style();
        assert_eq!(facade.count("pre_map_ready"), 1);
        assert_eq!(facade.count("post_map_ready"), 1);
        assert_eq!(facade.count("callback_1"), 1);
    }

    #[test]
    fn test_callback_receives_bound_facade() {
        let (gate, facade) = bound_gate();
        let expected = Arc::clone(&facade);
        gate.add_on_map_ready(move |f: &Arc<RecordingFacade>| {
            assert!(Arc::ptr_eq(f, &expected));
            f.record("callback");
        });

        gate.on_did_finish_loading_style();
        assert_eq!(facade.count("callback"), 1);
    }

    #[test]
    #[should_panic(expected = "before a facade was bound")]
    fn test_style_loaded_while_unbound_panics() {
        let gate = ReadyGate::<RecordingFacade>::new();
        gate.on_did_finish_loading_style();
    }

    #[test]
    fn test_try_style_loaded_while_unbound_errors() {
        let gate = ReadyGate::<RecordingFacade>::new();
        let err = gate.try_on_did_finish_loading_style().unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(gate.state(), ReadyState::Unbound);
    }

    #[test]
    fn test_callback_added_during_drain_does_not_run() {
        let (gate, facade) = bound_gate();
        let weak = Arc::downgrade(&gate);
        gate.add_on_map_ready(move |f: &Arc<RecordingFacade>| {
            f.record("outer");
            if let Some(gate) = weak.upgrade() {
                // The outer callback is already out of the queue.
                assert_eq!(gate.pending_callbacks(), 0);
                gate.add_on_map_ready(|f: &Arc<RecordingFacade>| f.record("inner"));
            }
        });

        gate.on_did_finish_loading_style();
        gate.on_did_finish_loading_style();
        assert_eq!(facade.count("outer"), 1);
        assert_eq!(facade.count("inner"), 0);
        assert_eq!(gate.pending_callbacks(), 1);
    }

    #[test]
    fn test_late_registration_is_never_invoked() {
        let (gate, facade) = bound_gate();
        gate.on_did_finish_loading_style();

        gate.add_on_map_ready(|f: &Arc<RecordingFacade>| f.record("late"));
        gate.on_did_finish_loading_style();
        assert_eq!(facade.count("late"), 0);
        assert_eq!(gate.pending_callbacks(), 1);
    }

    #[test]
    fn test_clear_on_map_ready_discards_without_invoking() {
        let (gate, facade) = bound_gate();
        gate.add_on_map_ready(|f: &Arc<RecordingFacade>| f.record("cleared"));
        gate.clear_on_map_ready();

        gate.on_did_finish_loading_style();
        assert_eq!(facade.count("cleared"), 0);
        assert_eq!(facade.calls(), vec!["pre_map_ready", "post_map_ready"]);
    }

    #[test]
    fn test_unbound_events_are_ignored() {
        let gate = ReadyGate::<RecordingFacade>::new();
        gate.on_camera_is_changing();
        gate.on_camera_did_change(true);
        gate.on_camera_did_change(false);
        gate.on_did_finish_loading_map();
        gate.on_did_finish_rendering_frame(true);
        assert_eq!(gate.state(), ReadyState::Unbound);
    }

    #[test]
    fn test_rendering_frame_forwarding() {
        let (gate, facade) = bound_gate();
        gate.on_did_finish_rendering_frame(true);
        assert_eq!(facade.calls(), vec!["frame"]);
        gate.on_did_finish_rendering_frame(false);
        assert_eq!(facade.calls(), vec!["frame", "frame_fully"]);
    }

    #[test]
    fn test_camera_did_change_forwards_while_bound() {
        let (gate, facade) = bound_gate();
        gate.on_camera_did_change(true);
        assert_eq!(facade.calls(), vec!["camera_did_change_animated"]);
        gate.on_camera_did_change(false);
        assert_eq!(
            facade.calls(),
            vec!["camera_did_change_animated", "camera_change"]
        );
    }

    #[test]
    fn test_map_loaded_resyncs_camera() {
        let (gate, facade) = bound_gate();
        gate.on_did_finish_loading_map();
        assert_eq!(facade.calls(), vec!["camera_change"]);
    }

    #[test]
    fn test_rebind_keeps_ready_state() {
        let (gate, first) = bound_gate();
        gate.on_did_finish_loading_style();

        let second = Arc::new(RecordingFacade::default());
        gate.bind(Arc::clone(&second));
        assert_eq!(gate.state(), ReadyState::BoundReady);

        gate.on_did_finish_loading_style();
        gate.on_camera_is_changing();
        assert_eq!(first.calls(), vec!["pre_map_ready", "post_map_ready"]);
        assert_eq!(second.calls(), vec!["camera_change"]);
    }

    #[test]
    fn test_works_as_trait_object_facade() {
        let facade = Arc::new(RecordingFacade::default());
        let gate: ReadyGate = ReadyGate::bound(facade.clone() as Arc<dyn MapFacade>);
        gate.add_on_map_ready(|f: &Arc<dyn MapFacade>| f.on_camera_change());

        gate.on_did_finish_loading_style();
        assert_eq!(
            facade.calls(),
            vec!["pre_map_ready", "camera_change", "post_map_ready"]
        );
    }

    // ---- Wired through the dispatcher ----

    fn wired() -> (
        Arc<MapChangeDispatcher>,
        Arc<ReadyGate<RecordingFacade>>,
        Arc<RecordingFacade>,
        Arc<Mutex<Vec<ChangeCode>>>,
    ) {
        let hub = Arc::new(MapChangeDispatcher::new());
        let (gate, facade) = bound_gate();
        hub.bind(gate.clone());
        let codes = Arc::new(Mutex::new(Vec::new()));
        let c = Arc::clone(&codes);
        hub.add_map_changed_listener(move |code: &ChangeCode| c.lock().push(*code));
        (hub, gate, facade, codes)
    }

    #[test]
    fn test_dispatcher_camera_did_change() {
        let (hub, _gate, facade, codes) = wired();

        hub.on_camera_did_change(true);
        assert_eq!(facade.count("camera_did_change_animated"), 1);
        assert_eq!(*codes.lock(), vec![ChangeCode::RegionDidChangeAnimated]);

        hub.on_camera_did_change(false);
        assert_eq!(facade.count("camera_change"), 1);
        assert_eq!(
            *codes.lock(),
            vec![ChangeCode::RegionDidChangeAnimated, ChangeCode::RegionDidChange]
        );
    }

    #[test]
    fn test_dispatcher_rendering_frame() {
        let (hub, _gate, facade, codes) = wired();

        hub.on_did_finish_rendering_frame(true);
        hub.on_did_finish_rendering_frame(false);
        assert_eq!(facade.calls(), vec!["frame", "frame_fully"]);
        assert_eq!(
            *codes.lock(),
            vec![
                ChangeCode::DidFinishRenderingFrame,
                ChangeCode::DidFinishRenderingFrameFullyRendered
            ]
        );
    }

    #[test]
    fn test_dispatcher_map_ready_flow() {
        let (hub, gate, facade, codes) = wired();
        let f = Arc::clone(&facade);
        gate.add_on_map_ready(move |_: &Arc<RecordingFacade>| f.record("callback"));

        hub.on_will_start_loading_map();
        hub.on_did_finish_loading_style();
        hub.on_did_finish_loading_map();
        hub.on_did_finish_loading_style();

        assert_eq!(
            facade.calls(),
            vec!["pre_map_ready", "callback", "post_map_ready", "camera_change"]
        );
        assert_eq!(
            *codes.lock(),
            vec![
                ChangeCode::WillStartLoadingMap,
                ChangeCode::DidFinishLoadingStyle,
                ChangeCode::DidFinishLoadingMap,
                ChangeCode::DidFinishLoadingStyle
            ]
        );
    }

    #[test]
    fn test_dispatcher_catch_all_sees_style_before_ready() {
        let (hub, gate, _facade, _codes) = wired();
        let observed = Arc::new(Mutex::new(None));

        let o = Arc::clone(&observed);
        let weak = Arc::downgrade(&gate);
        hub.add_map_changed_listener(move |code: &ChangeCode| {
            if *code == ChangeCode::DidFinishLoadingStyle {
                *o.lock() = weak.upgrade().map(|g| g.state());
            }
        });

        hub.on_did_finish_loading_style();
        assert_eq!(*observed.lock(), Some(ReadyState::BoundNotReady));
        assert!(gate.is_ready());
    }
}
