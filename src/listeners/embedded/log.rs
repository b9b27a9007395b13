//! # LogWriter: simple change logger
//!
//! A minimal catch-all listener that writes every [`ChangeCode`] to `tracing`.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! DEBUG mapchange: [map-changed] code=WILL_START_LOADING_MAP raw=5
//! DEBUG mapchange: [map-changed] code=DID_FINISH_LOADING_STYLE raw=14
//!  WARN mapchange: [map-failed] message="net error"
//! ```
//!
//! Register it as a catch-all listener, and optionally as a
//! [`DidFailLoadingMap`] listener to get the failure message too.

use tracing::{debug, warn};

use crate::events::{ChangeCode, DidFailLoadingMap};
use crate::listeners::Listener;

/// Change code writer listener.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Listener<ChangeCode> for LogWriter {
    fn on_event(&self, code: &ChangeCode) {
        debug!(target: "mapchange", "[map-changed] code={} raw={}", code, code.as_raw());
    }
}

impl Listener<DidFailLoadingMap> for LogWriter {
    fn on_event(&self, ev: &DidFailLoadingMap) {
        warn!(target: "mapchange", "[map-failed] message={:?}", ev.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapChangeDispatcher;

    #[test]
    fn test_log_writer_registers_as_both_listener_kinds() {
        let hub = MapChangeDispatcher::new();
        hub.add_map_changed_listener(LogWriter::new());
        hub.add_listener::<DidFailLoadingMap>(LogWriter::new());

        hub.on_did_fail_loading_map("net error");
        assert_eq!(hub.map_changed_listener_count(), 1);
        assert_eq!(hub.listener_count::<DidFailLoadingMap>(), 1);
    }
}
