//! Dispatch core: hub, sink, ready gate and engine bridge.
//!
//! ## Wiring
//! ```text
//!                     EngineEvents ──► EventPump (optional, multi-threaded hosts)
//!                                          │
//! engine ──► MapChangeDispatcher ◄─────────┘
//!               ├──► typed listeners
//!               ├──► catch-all listeners (ChangeCode)
//!               └──► MapChangeSink (bound slot) = ReadyGate ──► MapFacade
//! ```
//!
//! Internal modules:
//! - [`dispatcher`]: per-kind registries, catch-all registry, sink slot;
//! - [`gate`]: one-shot map-ready state machine and facade notifications;
//! - [`sink`] / [`facade`]: the two seams the hub and gate call out through;
//! - [`pump`]: bounded queue serialising engine threads onto one owner;
//! - [`config`]: pump settings.

mod config;
mod dispatcher;
mod facade;
mod gate;
mod pump;
mod sink;

pub use config::PumpConfig;
pub use dispatcher::{MapChangeDispatcher, Registries};
pub use facade::MapFacade;
pub use gate::{ReadyCallback, ReadyGate, ReadyState};
pub use pump::{channel, EngineEvents, EventPump};
pub use sink::MapChangeSink;
