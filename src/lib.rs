//! # mapchange
//!
//! **mapchange** is an in-process event dispatch hub that sits between a
//! native map rendering engine and application-level observers.
//!
//! The engine reports a fixed catalogue of lifecycle and rendering events
//! (style loaded, frame rendered, camera moved, map loaded/failed). The hub
//! fans them out to typed listener sets, derives a coarse [`ChangeCode`] for
//! catch-all observers, and forwards a curated subset to a [`ReadyGate`] that
//! fires the "map ready" transition exactly once.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ render thread│   │ loader thread│   │  ui thread   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            └──────────────────┼──────────────────┘
//!                               ▼
//!                EngineEvents ──► EventPump        (optional; one owner)
//!                               │
//!                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  MapChangeDispatcher                                              │
//! │  - ListenerRegistry<P> per event kind (typed listeners)           │
//! │  - ListenerRegistry<ChangeCode> (catch-all listeners)             │
//! │  - sink slot (single, optional)                                   │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼ 1                ▼ 2                ▼ 3 (forward set only)
//!  Listener<P>        Listener<ChangeCode>   ReadyGate
//!  on_event(&p)       on_event(&code)          │
//!                                              ▼
//!                                          MapFacade
//!                                  pre_map_ready / callbacks / post_map_ready
//!                                  camera_change / frame / frame_fully ...
//! ```
//!
//! ### Ready gate lifecycle
//! ```text
//! Unbound ──bind(facade)──► BoundNotReady ──DidFinishLoadingStyle──► BoundReady
//!    │                                                                   │
//!    └─ DidFinishLoadingStyle → panic (integration fault)                └─ further style events ignored
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                          |
//! |-------------------|------------------------------------------------------------------|---------------------------------------------|
//! | **Events**        | Closed catalogue of engine events and derived change codes.      | [`MapEvent`], [`EventKind`], [`ChangeCode`] |
//! | **Listeners**     | Typed and catch-all listeners, snapshot broadcast.               | [`Listener`], [`ListenerRegistry`]          |
//! | **Dispatch**      | Fan-out hub with ordered delivery and a single sink slot.        | [`MapChangeDispatcher`], [`MapChangeSink`]  |
//! | **Ready gate**    | One-shot map-ready transition and deferred callbacks.            | [`ReadyGate`], [`MapFacade`]                |
//! | **Engine bridge** | Serialises multi-threaded engine events onto one owner.          | [`EngineEvents`], [`EventPump`]             |
//! | **Errors**        | Typed errors for contract violations and the bridge.             | [`DispatchError`]                           |
//! | **Configuration** | Engine bridge settings.                                          | [`PumpConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use mapchange::{ChangeCode, MapChangeDispatcher, MapFacade, ReadyGate};
//!
//! struct Session;
//!
//! impl MapFacade for Session {
//!     fn on_pre_map_ready(&self) {}
//!     fn on_post_map_ready(&self) { println!("map ready"); }
//!     fn on_camera_change(&self) {}
//!     fn on_camera_did_change_animated(&self) {}
//!     fn on_did_finish_rendering_frame(&self) {}
//!     fn on_did_finish_rendering_frame_fully(&self) {}
//! }
//!
//! let hub = MapChangeDispatcher::new();
//! hub.add_map_changed_listener(|code: &ChangeCode| println!("changed: {code}"));
//!
//! let gate = Arc::new(ReadyGate::bound(Arc::new(Session)));
//! gate.add_on_map_ready(|_: &Arc<Session>| println!("first ready callback"));
//! hub.bind(gate.clone());
//!
//! hub.on_will_start_loading_map();
//! hub.on_did_finish_loading_style();
//! assert!(gate.is_ready());
//! ```
mod core;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use crate::core::{
    channel, EngineEvents, EventPump, MapChangeDispatcher, MapChangeSink, MapFacade, PumpConfig,
    ReadyCallback, ReadyGate, ReadyState,
};
pub use error::DispatchError;
pub use events::{
    CameraDidChange, CameraIsChanging, CameraWillChange, ChangeCode, DidFailLoadingMap,
    DidFinishLoadingMap, DidFinishLoadingStyle, DidFinishRenderingFrame, DidFinishRenderingMap,
    EventKind, MapEvent, Payload, SourceChanged, WillStartLoadingMap, WillStartRenderingFrame,
    WillStartRenderingMap,
};
pub use listeners::{Listener, ListenerHandle, ListenerRegistry};

// Optional: expose a simple built-in logger listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogWriter;
