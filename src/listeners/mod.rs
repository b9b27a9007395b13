//! # Listener interfaces and registries.
//!
//! This module provides the [`Listener`] trait and the [`ListenerRegistry`]
//! the dispatcher keeps one of per event kind (plus one for the catch-all
//! [`ChangeCode`](crate::ChangeCode) listeners).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   engine ── on_*(payload) ──► MapChangeDispatcher
//!                                   │
//!                                   ├──► ListenerRegistry<P>           (typed)
//!                                   │        └──► Listener<P>::on_event(&payload)
//!                                   │
//!                                   └──► ListenerRegistry<ChangeCode>  (catch-all)
//!                                            └──► Listener<ChangeCode>::on_event(&code)
//!                                                    │
//!                                               ┌────┴────┬────────┐
//!                                               ▼         ▼        ▼
//!                                            LogWriter  Metrics  Custom
//! ```
//!
//! ## Implementing custom listeners
//! ```no_run
//! use mapchange::{ChangeCode, Listener, MapChangeDispatcher};
//!
//! struct FrameCounter;
//!
//! impl Listener<ChangeCode> for FrameCounter {
//!     fn on_event(&self, code: &ChangeCode) {
//!         if *code == ChangeCode::DidFinishRenderingFrameFullyRendered {
//!             // count frame
//!         }
//!     }
//! }
//!
//! let hub = MapChangeDispatcher::new();
//! hub.add_map_changed_listener(FrameCounter);
//! ```

mod embedded;
mod listener;
mod registry;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use listener::Listener;
pub use registry::{ListenerHandle, ListenerRegistry};
