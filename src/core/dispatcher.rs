//! # Map change dispatcher - fan-out hub for engine events.
//!
//! [`MapChangeDispatcher`] owns one [`ListenerRegistry`] per event kind, one
//! registry of catch-all [`ChangeCode`] listeners, and a single optional
//! [`MapChangeSink`] slot.
//!
//! ## Architecture
//! ```text
//! engine ──► on_*(..) / emit(payload) / dispatch(MapEvent)
//!               │
//!               ├─1─► ListenerRegistry<P>::broadcast(&payload)       typed listeners
//!               ├─2─► ListenerRegistry<ChangeCode>::broadcast(&code) catch-all listeners
//!               └─3─► sink.on_*(..)       only for the curated forward set, only if bound
//! ```
//!
//! ## Rules
//! - Steps run in the order above for every event; catch-all listeners never
//!   observe state changed by the sink for the same event
//! - `bind` replaces the sink (last bind wins); `unbind` clears it
//! - Binding never replays past events; events with no sink are dropped
//! - No lock is held while listeners or the sink run, so they may re-enter
//!   the dispatcher (add/remove listeners, bind/unbind, emit)

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::core::MapChangeSink;
use crate::events::{
    CameraDidChange, CameraIsChanging, CameraWillChange, ChangeCode, DidFailLoadingMap,
    DidFinishLoadingMap, DidFinishLoadingStyle, DidFinishRenderingFrame, DidFinishRenderingMap,
    MapEvent, Payload, SourceChanged, WillStartLoadingMap, WillStartRenderingFrame,
    WillStartRenderingMap,
};
use crate::listeners::{Listener, ListenerHandle, ListenerRegistry};

/// Typed registries, one per event kind.
#[derive(Default)]
pub struct Registries {
    pub(crate) camera_will_change: ListenerRegistry<CameraWillChange>,
    pub(crate) camera_is_changing: ListenerRegistry<CameraIsChanging>,
    pub(crate) camera_did_change: ListenerRegistry<CameraDidChange>,
    pub(crate) will_start_loading_map: ListenerRegistry<WillStartLoadingMap>,
    pub(crate) did_finish_loading_map: ListenerRegistry<DidFinishLoadingMap>,
    pub(crate) did_fail_loading_map: ListenerRegistry<DidFailLoadingMap>,
    pub(crate) will_start_rendering_frame: ListenerRegistry<WillStartRenderingFrame>,
    pub(crate) did_finish_rendering_frame: ListenerRegistry<DidFinishRenderingFrame>,
    pub(crate) will_start_rendering_map: ListenerRegistry<WillStartRenderingMap>,
    pub(crate) did_finish_rendering_map: ListenerRegistry<DidFinishRenderingMap>,
    pub(crate) did_finish_loading_style: ListenerRegistry<DidFinishLoadingStyle>,
    pub(crate) source_changed: ListenerRegistry<SourceChanged>,
}

impl Registries {
    fn clear(&self) {
        self.camera_will_change.clear();
        self.camera_is_changing.clear();
        self.camera_did_change.clear();
        self.will_start_loading_map.clear();
        self.did_finish_loading_map.clear();
        self.did_fail_loading_map.clear();
        self.will_start_rendering_frame.clear();
        self.did_finish_rendering_frame.clear();
        self.will_start_rendering_map.clear();
        self.did_finish_rendering_map.clear();
        self.did_finish_loading_style.clear();
        self.source_changed.clear();
    }
}

/// Fan-out hub between the rendering engine and map change observers.
///
/// Created once per map session; every method takes `&self`, so the
/// dispatcher is usually shared as `Arc<MapChangeDispatcher>`.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use mapchange::{ChangeCode, DidFailLoadingMap, MapChangeDispatcher};
///
/// let hub = MapChangeDispatcher::new();
/// let failures = Arc::new(AtomicUsize::new(0));
///
/// let f = Arc::clone(&failures);
/// let handle = hub.add_listener::<DidFailLoadingMap>(move |ev: &DidFailLoadingMap| {
///     assert_eq!(ev.message, "net error");
///     f.fetch_add(1, Ordering::SeqCst);
/// });
/// hub.add_map_changed_listener(|code: &ChangeCode| {
///     assert_eq!(*code, ChangeCode::DidFailLoadingMap);
/// });
///
/// hub.on_did_fail_loading_map("net error");
/// hub.remove_listener::<DidFailLoadingMap>(handle);
/// hub.on_did_fail_loading_map("net error");
/// assert_eq!(failures.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct MapChangeDispatcher {
    registries: Registries,
    map_changed: ListenerRegistry<ChangeCode>,
    sink: Mutex<Option<Arc<dyn MapChangeSink>>>,
}

impl MapChangeDispatcher {
    /// Creates a dispatcher with no listeners and no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Sink slot ----

    /// Binds the sink receiving the curated forward set, replacing any previous one.
    pub fn bind(&self, sink: Arc<dyn MapChangeSink>) {
        let replaced = self.sink.lock().replace(sink).is_some();
        debug!(replaced, "sink bound");
    }

    /// Clears the sink slot; forwarded events are dropped until the next `bind`.
    pub fn unbind(&self) {
        if self.sink.lock().take().is_some() {
            debug!("sink unbound");
        }
    }

    /// Returns `true` if a sink is bound.
    pub fn is_bound(&self) -> bool {
        self.sink.lock().is_some()
    }

    // ---- Listener management ----

    /// Registers a typed listener for payload `P`.
    ///
    /// ```rust
    /// # use mapchange::{CameraDidChange, MapChangeDispatcher};
    /// let hub = MapChangeDispatcher::new();
    /// hub.add_listener::<CameraDidChange>(|ev: &CameraDidChange| println!("animated={}", ev.animated));
    /// ```
    pub fn add_listener<P: Payload>(&self, listener: impl Listener<P>) -> ListenerHandle {
        P::registry(&self.registries).add(listener)
    }

    /// Registers a shared typed listener for payload `P`.
    pub fn add_listener_arc<P: Payload>(&self, listener: Arc<dyn Listener<P>>) -> ListenerHandle {
        P::registry(&self.registries).add_arc(listener)
    }

    /// Removes a typed listener; `false` if it was not registered for `P`.
    pub fn remove_listener<P: Payload>(&self, handle: ListenerHandle) -> bool {
        P::registry(&self.registries).remove(handle)
    }

    /// Number of typed listeners registered for `P`.
    pub fn listener_count<P: Payload>(&self) -> usize {
        P::registry(&self.registries).len()
    }

    /// Registers a catch-all listener receiving the derived [`ChangeCode`] of every event.
    pub fn add_map_changed_listener(&self, listener: impl Listener<ChangeCode>) -> ListenerHandle {
        self.map_changed.add(listener)
    }

    /// Registers a shared catch-all listener.
    pub fn add_map_changed_listener_arc(
        &self,
        listener: Arc<dyn Listener<ChangeCode>>,
    ) -> ListenerHandle {
        self.map_changed.add_arc(listener)
    }

    /// Removes a catch-all listener; `false` if it was not registered.
    pub fn remove_map_changed_listener(&self, handle: ListenerHandle) -> bool {
        self.map_changed.remove(handle)
    }

    /// Number of catch-all listeners.
    pub fn map_changed_listener_count(&self) -> usize {
        self.map_changed.len()
    }

    /// Drops every typed and catch-all listener without invoking them.
    ///
    /// The sink stays bound.
    pub fn clear(&self) {
        self.registries.clear();
        self.map_changed.clear();
        debug!("listeners cleared");
    }

    // ---- Emission ----

    /// Emits one event: typed listeners, then catch-all listeners, then the sink.
    pub fn emit<P: Payload>(&self, payload: P) {
        let kind = P::KIND;
        let code = payload.change_code();
        let typed = P::registry(&self.registries).broadcast(&payload);
        let generic = self.map_changed.broadcast(&code);
        trace!(%kind, %code, typed, generic, "dispatched");

        if !kind.is_forwarded() {
            return;
        }
        let sink = self.sink.lock().clone();
        match sink {
            Some(sink) => payload.forward(sink.as_ref()),
            None => trace!(%kind, "no sink bound; forward dropped"),
        }
    }

    /// Emits a tagged event (see [`emit`](Self::emit)).
    pub fn dispatch(&self, event: MapEvent) {
        match event {
            MapEvent::CameraWillChange(p) => self.emit(p),
            MapEvent::CameraIsChanging(p) => self.emit(p),
            MapEvent::CameraDidChange(p) => self.emit(p),
            MapEvent::WillStartLoadingMap(p) => self.emit(p),
            MapEvent::DidFinishLoadingMap(p) => self.emit(p),
            MapEvent::DidFailLoadingMap(p) => self.emit(p),
            MapEvent::WillStartRenderingFrame(p) => self.emit(p),
            MapEvent::DidFinishRenderingFrame(p) => self.emit(p),
            MapEvent::WillStartRenderingMap(p) => self.emit(p),
            MapEvent::DidFinishRenderingMap(p) => self.emit(p),
            MapEvent::DidFinishLoadingStyle(p) => self.emit(p),
            MapEvent::SourceChanged(p) => self.emit(p),
        }
    }

    // ---- Engine entry points ----

    /// Engine entry point for [`CameraWillChange`].
    pub fn on_camera_will_change(&self, animated: bool) {
        self.emit(CameraWillChange { animated });
    }

    /// Engine entry point for [`CameraIsChanging`].
    pub fn on_camera_is_changing(&self) {
        self.emit(CameraIsChanging);
    }

    /// Engine entry point for [`CameraDidChange`].
    pub fn on_camera_did_change(&self, animated: bool) {
        self.emit(CameraDidChange { animated });
    }

    /// Engine entry point for [`WillStartLoadingMap`].
    pub fn on_will_start_loading_map(&self) {
        self.emit(WillStartLoadingMap);
    }

    /// Engine entry point for [`DidFinishLoadingMap`].
    pub fn on_did_finish_loading_map(&self) {
        self.emit(DidFinishLoadingMap);
    }

    /// Engine entry point for [`DidFailLoadingMap`].
    pub fn on_did_fail_loading_map(&self, message: impl Into<String>) {
        self.emit(DidFailLoadingMap {
            message: message.into(),
        });
    }

    /// Engine entry point for [`WillStartRenderingFrame`].
    pub fn on_will_start_rendering_frame(&self) {
        self.emit(WillStartRenderingFrame);
    }

    /// Engine entry point for [`DidFinishRenderingFrame`].
    pub fn on_did_finish_rendering_frame(&self, partial: bool) {
        self.emit(DidFinishRenderingFrame { partial });
    }

    /// Engine entry point for [`WillStartRenderingMap`].
    pub fn on_will_start_rendering_map(&self) {
        self.emit(WillStartRenderingMap);
    }

    /// Engine entry point for [`DidFinishRenderingMap`].
    pub fn on_did_finish_rendering_map(&self, fully_rendered: bool) {
        self.emit(DidFinishRenderingMap { fully_rendered });
    }

    /// Engine entry point for [`DidFinishLoadingStyle`].
    pub fn on_did_finish_loading_style(&self) {
        self.emit(DidFinishLoadingStyle);
    }

    /// Engine entry point for [`SourceChanged`].
    pub fn on_source_changed(&self, source_id: impl Into<String>) {
        self.emit(SourceChanged {
            source_id: source_id.into(),
        });
    }
}
