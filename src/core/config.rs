//! # Engine bridge configuration.
//!
//! Provides [`PumpConfig`], the settings of the bounded queue between engine
//! threads and the single thread that owns a
//! [`MapChangeDispatcher`](crate::MapChangeDispatcher).
//!
//! The capacity only bounds memory while events wait for the owning thread;
//! it is not a flow-control setting.
//!
//! ## Sentinel values
//! - `capacity = 0` → clamped to 1 (a zero-capacity queue cannot be built)

/// Configuration of the engine bridge.
///
/// ## Field semantics
/// - `capacity`: Maximum number of queued, not yet dispatched events (min 1)
/// - `drain_on_shutdown`: Dispatch already queued events after cancellation
#[derive(Clone, Debug)]
pub struct PumpConfig {
    /// Capacity of the event queue.
    ///
    /// When full, `EngineEvents::try_publish` fails with `PumpFull` and
    /// `publish` / `blocking_publish` wait for room.
    pub capacity: usize,

    /// Whether events queued before cancellation are still dispatched.
    ///
    /// - `true` = the pump closes the queue, dispatches what is left, then returns
    /// - `false` = queued events are dropped
    pub drain_on_shutdown: bool,
}

impl PumpConfig {
    /// Returns a capacity clamped to a minimum of 1.
    #[inline]
    pub fn capacity_clamped(&self) -> usize {
        self.capacity.max(1)
    }
}

impl Default for PumpConfig {
    /// Default configuration:
    ///
    /// - `capacity = 1024`
    /// - `drain_on_shutdown = true`
    fn default() -> Self {
        Self {
            capacity: 1024,
            drain_on_shutdown: true,
        }
    }
}
