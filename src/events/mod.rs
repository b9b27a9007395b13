//! Engine events: catalogue and derived change codes.
//!
//! This module groups the event **data model** consumed by the dispatcher.
//!
//! ## Contents
//! - [`MapEvent`], [`EventKind`] and one payload struct per kind
//! - [`Payload`] the sealed trait the dispatcher is generic over
//! - [`ChangeCode`] coarse codes delivered to catch-all listeners
//!
//! ## Quick reference
//! - **Producers**: the rendering engine, directly through
//!   `MapChangeDispatcher::on_*` or through `EngineEvents` (engine bridge).
//! - **Consumers**: typed listeners, catch-all listeners, the bound sink.
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod change;
mod event;

pub use change::ChangeCode;
pub(crate) use event::sealed;
pub use event::{
    CameraDidChange, CameraIsChanging, CameraWillChange, DidFailLoadingMap, DidFinishLoadingMap,
    DidFinishLoadingStyle, DidFinishRenderingFrame, DidFinishRenderingMap, EventKind, MapEvent,
    Payload, SourceChanged, WillStartLoadingMap, WillStartRenderingFrame, WillStartRenderingMap,
};
