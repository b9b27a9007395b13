//! # Core listener trait
//!
//! `Listener<E>` is the extension point for observing map change events. One
//! trait covers every typed listener interface (`Listener<CameraDidChange>`,
//! `Listener<DidFailLoadingMap>`, ...) and the catch-all interface
//! (`Listener<ChangeCode>`).
//!
//! ## Contract
//! - Called synchronously on the thread that emits the event; implementations
//!   must not block.
//! - A listener may call back into the dispatcher (add/remove listeners, emit
//!   further events). Registries never hold a lock while a listener runs.
//!
//! ## Example
//! ```rust
//! use mapchange::{CameraDidChange, Listener};
//!
//! struct Audit;
//!
//! impl Listener<CameraDidChange> for Audit {
//!     fn on_event(&self, ev: &CameraDidChange) {
//!         let _ = ev.animated;
//!     }
//! }
//! ```
//!
//! Closures implement the trait directly:
//! ```rust
//! use mapchange::{ChangeCode, Listener};
//!
//! let l = |code: &ChangeCode| println!("{code}");
//! l.on_event(&ChangeCode::RegionIsChanging);
//! ```

/// Contract for event listeners.
pub trait Listener<E>: Send + Sync + 'static {
    /// Handle a single event.
    ///
    /// # Parameters
    /// - `event`: Reference to the payload (does not transfer ownership)
    fn on_event(&self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: Fn(&E) + Send + Sync + 'static,
{
    #[inline]
    fn on_event(&self, event: &E) {
        self(event)
    }
}
