//! # Map change events emitted by the rendering engine.
//!
//! The engine reports a fixed catalogue of lifecycle and rendering signals.
//! Each signal has its own payload type (e.g. [`CameraDidChange`]) so typed
//! listeners receive exactly the data that event carries, and [`MapEvent`]
//! wraps all of them into one tagged value for transport (see the engine
//! bridge in `core::pump`).
//!
//! [`EventKind`] is the field-less classification of the same catalogue. It is
//! used for labels in logs and for the **curated forward set**: the subset of
//! kinds the dispatcher hands to its bound sink.
//!
//! ## Catalogue
//! ```text
//! camera:     CameraWillChange{animated}  CameraIsChanging  CameraDidChange{animated}
//! map load:   WillStartLoadingMap  DidFinishLoadingMap  DidFailLoadingMap{message}
//! frame:      WillStartRenderingFrame  DidFinishRenderingFrame{partial}
//! map render: WillStartRenderingMap  DidFinishRenderingMap{fully_rendered}
//! style:      DidFinishLoadingStyle
//! source:     SourceChanged{source_id}
//! ```
//!
//! ## Example
//! ```rust
//! use mapchange::{ChangeCode, DidFinishRenderingFrame, EventKind, MapEvent};
//!
//! let ev = MapEvent::from(DidFinishRenderingFrame { partial: false });
//! assert_eq!(ev.kind(), EventKind::DidFinishRenderingFrame);
//! assert_eq!(ev.change_code(), ChangeCode::DidFinishRenderingFrameFullyRendered);
//! assert!(ev.kind().is_forwarded());
//! ```

use std::fmt;

use crate::core::{MapChangeSink, Registries};
use crate::events::ChangeCode;
use crate::listeners::ListenerRegistry;

/// Classification of engine events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Camera ===
    /// Camera is about to move.
    CameraWillChange,
    /// Camera moved during an ongoing transition.
    CameraIsChanging,
    /// Camera finished moving.
    CameraDidChange,

    // === Map loading ===
    /// Engine started loading the map.
    WillStartLoadingMap,
    /// Map finished loading (all resources for the current viewport).
    DidFinishLoadingMap,
    /// Map failed to load.
    DidFailLoadingMap,

    // === Rendering ===
    /// A frame is about to render.
    WillStartRenderingFrame,
    /// A frame finished rendering.
    DidFinishRenderingFrame,
    /// The map is about to render.
    WillStartRenderingMap,
    /// The map finished rendering.
    DidFinishRenderingMap,

    // === Style / sources ===
    /// The style finished loading.
    DidFinishLoadingStyle,
    /// A style source changed.
    SourceChanged,
}

impl EventKind {
    /// Every kind, in catalogue order.
    pub const ALL: [EventKind; 12] = [
        EventKind::CameraWillChange,
        EventKind::CameraIsChanging,
        EventKind::CameraDidChange,
        EventKind::WillStartLoadingMap,
        EventKind::DidFinishLoadingMap,
        EventKind::DidFailLoadingMap,
        EventKind::WillStartRenderingFrame,
        EventKind::DidFinishRenderingFrame,
        EventKind::WillStartRenderingMap,
        EventKind::DidFinishRenderingMap,
        EventKind::DidFinishLoadingStyle,
        EventKind::SourceChanged,
    ];

    /// Returns `true` if events of this kind are forwarded to the bound sink.
    pub fn is_forwarded(self) -> bool {
        matches!(
            self,
            EventKind::CameraIsChanging
                | EventKind::CameraDidChange
                | EventKind::DidFinishLoadingMap
                | EventKind::DidFinishRenderingFrame
                | EventKind::DidFinishLoadingStyle
        )
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            EventKind::CameraWillChange => "camera_will_change",
            EventKind::CameraIsChanging => "camera_is_changing",
            EventKind::CameraDidChange => "camera_did_change",
            EventKind::WillStartLoadingMap => "will_start_loading_map",
            EventKind::DidFinishLoadingMap => "did_finish_loading_map",
            EventKind::DidFailLoadingMap => "did_fail_loading_map",
            EventKind::WillStartRenderingFrame => "will_start_rendering_frame",
            EventKind::DidFinishRenderingFrame => "did_finish_rendering_frame",
            EventKind::WillStartRenderingMap => "will_start_rendering_map",
            EventKind::DidFinishRenderingMap => "did_finish_rendering_map",
            EventKind::DidFinishLoadingStyle => "did_finish_loading_style",
            EventKind::SourceChanged => "source_changed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// The camera is about to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraWillChange {
    /// `true` if the change is an animated transition.
    pub animated: bool,
}

/// The camera is changing (emitted repeatedly during a transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraIsChanging;

/// The camera finished changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraDidChange {
    /// `true` if the change was an animated transition.
    pub animated: bool,
}

/// The engine started loading the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WillStartLoadingMap;

/// The map finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DidFinishLoadingMap;

/// The map failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidFailLoadingMap {
    /// Engine-provided failure description.
    pub message: String,
}

/// A frame is about to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WillStartRenderingFrame;

/// A frame finished rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DidFinishRenderingFrame {
    /// `true` if more frames are needed before the map is fully rendered.
    pub partial: bool,
}

/// The map is about to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WillStartRenderingMap;

/// The map finished rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DidFinishRenderingMap {
    /// `true` if every tile of the viewport is rendered.
    pub fully_rendered: bool,
}

/// The style finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DidFinishLoadingStyle;

/// A source of the current style changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChanged {
    /// Identifier of the changed source.
    pub source_id: String,
}

/// Any engine event, tagged with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapEvent {
    CameraWillChange(CameraWillChange),
    CameraIsChanging(CameraIsChanging),
    CameraDidChange(CameraDidChange),
    WillStartLoadingMap(WillStartLoadingMap),
    DidFinishLoadingMap(DidFinishLoadingMap),
    DidFailLoadingMap(DidFailLoadingMap),
    WillStartRenderingFrame(WillStartRenderingFrame),
    DidFinishRenderingFrame(DidFinishRenderingFrame),
    WillStartRenderingMap(WillStartRenderingMap),
    DidFinishRenderingMap(DidFinishRenderingMap),
    DidFinishLoadingStyle(DidFinishLoadingStyle),
    SourceChanged(SourceChanged),
}

impl MapEvent {
    /// Returns the classification of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::CameraWillChange(_) => EventKind::CameraWillChange,
            MapEvent::CameraIsChanging(_) => EventKind::CameraIsChanging,
            MapEvent::CameraDidChange(_) => EventKind::CameraDidChange,
            MapEvent::WillStartLoadingMap(_) => EventKind::WillStartLoadingMap,
            MapEvent::DidFinishLoadingMap(_) => EventKind::DidFinishLoadingMap,
            MapEvent::DidFailLoadingMap(_) => EventKind::DidFailLoadingMap,
            MapEvent::WillStartRenderingFrame(_) => EventKind::WillStartRenderingFrame,
            MapEvent::DidFinishRenderingFrame(_) => EventKind::DidFinishRenderingFrame,
            MapEvent::WillStartRenderingMap(_) => EventKind::WillStartRenderingMap,
            MapEvent::DidFinishRenderingMap(_) => EventKind::DidFinishRenderingMap,
            MapEvent::DidFinishLoadingStyle(_) => EventKind::DidFinishLoadingStyle,
            MapEvent::SourceChanged(_) => EventKind::SourceChanged,
        }
    }

    /// Derives the coarse change code delivered to catch-all listeners.
    pub fn change_code(&self) -> ChangeCode {
        match self {
            MapEvent::CameraWillChange(p) => p.change_code(),
            MapEvent::CameraIsChanging(p) => p.change_code(),
            MapEvent::CameraDidChange(p) => p.change_code(),
            MapEvent::WillStartLoadingMap(p) => p.change_code(),
            MapEvent::DidFinishLoadingMap(p) => p.change_code(),
            MapEvent::DidFailLoadingMap(p) => p.change_code(),
            MapEvent::WillStartRenderingFrame(p) => p.change_code(),
            MapEvent::DidFinishRenderingFrame(p) => p.change_code(),
            MapEvent::WillStartRenderingMap(p) => p.change_code(),
            MapEvent::DidFinishRenderingMap(p) => p.change_code(),
            MapEvent::DidFinishLoadingStyle(p) => p.change_code(),
            MapEvent::SourceChanged(p) => p.change_code(),
        }
    }
}

pub(crate) mod sealed {
    use super::*;

    /// Routing glue between a payload type and the dispatcher internals.
    pub trait Routed: Sized {
        /// The registry of the dispatcher holding listeners for this payload.
        fn registry(registries: &Registries) -> &ListenerRegistry<Self>;

        /// Forwards the payload to the sink if its kind is in the forward set.
        fn forward(&self, _sink: &dyn MapChangeSink) {}
    }
}

/// A typed engine event payload.
///
/// Implemented for every payload struct in the catalogue and nothing else
/// (the trait is sealed). The dispatcher is generic over it:
/// `dispatcher.add_listener::<CameraDidChange>(..)`, `dispatcher.emit(CameraDidChange { .. })`.
pub trait Payload:
    sealed::Routed + Into<MapEvent> + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Kind of event this payload describes.
    const KIND: EventKind;

    /// Derives the coarse change code for this payload.
    fn change_code(&self) -> ChangeCode;
}

impl sealed::Routed for CameraWillChange {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.camera_will_change
    }
}

impl Payload for CameraWillChange {
    const KIND: EventKind = EventKind::CameraWillChange;

    fn change_code(&self) -> ChangeCode {
        if self.animated {
            ChangeCode::RegionWillChangeAnimated
        } else {
            ChangeCode::RegionWillChange
        }
    }
}

impl sealed::Routed for CameraIsChanging {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.camera_is_changing
    }

    fn forward(&self, sink: &dyn MapChangeSink) {
        sink.on_camera_is_changing();
    }
}

impl Payload for CameraIsChanging {
    const KIND: EventKind = EventKind::CameraIsChanging;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::RegionIsChanging
    }
}

impl sealed::Routed for CameraDidChange {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.camera_did_change
    }

    fn forward(&self, sink: &dyn MapChangeSink) {
        sink.on_camera_did_change(self.animated);
    }
}

impl Payload for CameraDidChange {
    const KIND: EventKind = EventKind::CameraDidChange;

    fn change_code(&self) -> ChangeCode {
        if self.animated {
            ChangeCode::RegionDidChangeAnimated
        } else {
            ChangeCode::RegionDidChange
        }
    }
}

impl sealed::Routed for WillStartLoadingMap {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.will_start_loading_map
    }
}

impl Payload for WillStartLoadingMap {
    const KIND: EventKind = EventKind::WillStartLoadingMap;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::WillStartLoadingMap
    }
}

impl sealed::Routed for DidFinishLoadingMap {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.did_finish_loading_map
    }

    fn forward(&self, sink: &dyn MapChangeSink) {
        sink.on_did_finish_loading_map();
    }
}

impl Payload for DidFinishLoadingMap {
    const KIND: EventKind = EventKind::DidFinishLoadingMap;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::DidFinishLoadingMap
    }
}

impl sealed::Routed for DidFailLoadingMap {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.did_fail_loading_map
    }
}

impl Payload for DidFailLoadingMap {
    const KIND: EventKind = EventKind::DidFailLoadingMap;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::DidFailLoadingMap
    }
}

impl sealed::Routed for WillStartRenderingFrame {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.will_start_rendering_frame
    }
}

impl Payload for WillStartRenderingFrame {
    const KIND: EventKind = EventKind::WillStartRenderingFrame;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::WillStartRenderingFrame
    }
}

impl sealed::Routed for DidFinishRenderingFrame {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.did_finish_rendering_frame
    }

    fn forward(&self, sink: &dyn MapChangeSink) {
        sink.on_did_finish_rendering_frame(self.partial);
    }
}

impl Payload for DidFinishRenderingFrame {
    const KIND: EventKind = EventKind::DidFinishRenderingFrame;

    fn change_code(&self) -> ChangeCode {
        if self.partial {
            ChangeCode::DidFinishRenderingFrame
        } else {
            ChangeCode::DidFinishRenderingFrameFullyRendered
        }
    }
}

impl sealed::Routed for WillStartRenderingMap {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.will_start_rendering_map
    }
}

impl Payload for WillStartRenderingMap {
    const KIND: EventKind = EventKind::WillStartRenderingMap;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::WillStartRenderingMap
    }
}

impl sealed::Routed for DidFinishRenderingMap {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.did_finish_rendering_map
    }
}

impl Payload for DidFinishRenderingMap {
    const KIND: EventKind = EventKind::DidFinishRenderingMap;

    fn change_code(&self) -> ChangeCode {
        if self.fully_rendered {
            ChangeCode::DidFinishRenderingMapFullyRendered
        } else {
            ChangeCode::DidFinishRenderingMap
        }
    }
}

impl sealed::Routed for DidFinishLoadingStyle {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.did_finish_loading_style
    }

    fn forward(&self, sink: &dyn MapChangeSink) {
        sink.on_did_finish_loading_style();
    }
}

impl Payload for DidFinishLoadingStyle {
    const KIND: EventKind = EventKind::DidFinishLoadingStyle;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::DidFinishLoadingStyle
    }
}

impl sealed::Routed for SourceChanged {
    fn registry(r: &Registries) -> &ListenerRegistry<Self> {
        &r.source_changed
    }
}

impl Payload for SourceChanged {
    const KIND: EventKind = EventKind::SourceChanged;

    fn change_code(&self) -> ChangeCode {
        ChangeCode::SourceDidChange
    }
}

impl From<CameraWillChange> for MapEvent {
    fn from(p: CameraWillChange) -> Self {
        MapEvent::CameraWillChange(p)
    }
}

impl From<CameraIsChanging> for MapEvent {
    fn from(p: CameraIsChanging) -> Self {
        MapEvent::CameraIsChanging(p)
    }
}

impl From<CameraDidChange> for MapEvent {
    fn from(p: CameraDidChange) -> Self {
        MapEvent::CameraDidChange(p)
    }
}

impl From<WillStartLoadingMap> for MapEvent {
    fn from(p: WillStartLoadingMap) -> Self {
        MapEvent::WillStartLoadingMap(p)
    }
}

impl From<DidFinishLoadingMap> for MapEvent {
    fn from(p: DidFinishLoadingMap) -> Self {
        MapEvent::DidFinishLoadingMap(p)
    }
}

impl From<DidFailLoadingMap> for MapEvent {
    fn from(p: DidFailLoadingMap) -> Self {
        MapEvent::DidFailLoadingMap(p)
    }
}

impl From<WillStartRenderingFrame> for MapEvent {
    fn from(p: WillStartRenderingFrame) -> Self {
        MapEvent::WillStartRenderingFrame(p)
    }
}

impl From<DidFinishRenderingFrame> for MapEvent {
    fn from(p: DidFinishRenderingFrame) -> Self {
        MapEvent::DidFinishRenderingFrame(p)
    }
}

impl From<WillStartRenderingMap> for MapEvent {
    fn from(p: WillStartRenderingMap) -> Self {
        MapEvent::WillStartRenderingMap(p)
    }
}

impl From<DidFinishRenderingMap> for MapEvent {
    fn from(p: DidFinishRenderingMap) -> Self {
        MapEvent::DidFinishRenderingMap(p)
    }
}

impl From<DidFinishLoadingStyle> for MapEvent {
    fn from(p: DidFinishLoadingStyle) -> Self {
        MapEvent::DidFinishLoadingStyle(p)
    }
}

impl From<SourceChanged> for MapEvent {
    fn from(p: SourceChanged) -> Self {
        MapEvent::SourceChanged(p)
    }
}
