//! Error types used by the dispatcher, the ready gate and the engine bridge.
//!
//! [`DispatchError`] covers every recoverable failure of this crate. Contract
//! violations (a style event reaching an unbound [`ReadyGate`](crate::ReadyGate))
//! are also described by it, but the sink entry point turns them into a panic.
//!
//! Like the rest of the crate's errors it provides `as_label` / `as_message`
//! helpers for logs.

use thiserror::Error;

use crate::events::EventKind;

/// # Errors produced by the dispatch hub.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An event that requires a bound facade arrived before one was bound.
    #[error("{event} received before a facade was bound")]
    NotBound {
        /// Kind of the offending event.
        event: EventKind,
    },

    /// The engine bridge is shut down; the event was not queued.
    #[error("event pump closed")]
    PumpClosed,

    /// The engine bridge queue is full; the event was not queued.
    #[error("event pump queue full")]
    PumpFull,

    /// An integer does not name any change code.
    #[error("unknown change code {raw}")]
    UnknownChangeCode {
        /// The rejected value.
        raw: u8,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use mapchange::{DispatchError, EventKind};
    ///
    /// let err = DispatchError::NotBound { event: EventKind::DidFinishLoadingStyle };
    /// assert_eq!(err.as_label(), "not_bound");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::NotBound { .. } => "not_bound",
            DispatchError::PumpClosed => "pump_closed",
            DispatchError::PumpFull => "pump_full",
            DispatchError::UnknownChangeCode { .. } => "unknown_change_code",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::NotBound { event } => {
                format!("contract violation: {event} before bind")
            }
            DispatchError::PumpClosed => "pump closed".to_string(),
            DispatchError::PumpFull => "pump queue full".to_string(),
            DispatchError::UnknownChangeCode { raw } => format!("unknown change code: {raw}"),
        }
    }

    /// Indicates whether the error is an integration fault rather than a runtime condition.
    ///
    /// # Example
    /// ```
    /// use mapchange::{DispatchError, EventKind};
    ///
    /// assert!(DispatchError::NotBound { event: EventKind::DidFinishLoadingStyle }.is_contract_violation());
    /// assert!(!DispatchError::PumpFull.is_contract_violation());
    /// ```
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, DispatchError::NotBound { .. })
    }
}
