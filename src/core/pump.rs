//! # Engine bridge - serialises events from engine threads onto one owner.
//!
//! The dispatcher assumes a single caller at a time. Hosts whose engine
//! reports events from several threads push them through [`EngineEvents`]
//! into a bounded queue; one [`EventPump`] task drains the queue and calls
//! [`MapChangeDispatcher::dispatch`] for each event, in arrival order.
//!
//! The queue exists to serialise delivery, not to shed or throttle load:
//! [`EngineEvents::publish`] and [`EngineEvents::blocking_publish`] are the
//! expected paths, and [`EngineEvents::try_publish`] is for callers that must
//! never wait.
//!
//! ## Architecture
//! ```text
//! Engine threads (many):               Owner (one):
//!   render thread ──┐
//!   loader thread ──┼── EngineEvents ──► [mpsc queue] ──► EventPump::run ──► MapChangeDispatcher
//!   ui thread     ──┘   (cloneable)       (bounded)        (one at a time)
//! ```
//!
//! ## Rules
//! - **Order**: events from one sender are dispatched in send order
//! - **Exit**: `run` returns when the token is cancelled or every sender is dropped
//! - **Drain**: with `drain_on_shutdown`, events queued before cancellation are still dispatched
//! - **No replay**: events published after the pump stopped fail with `PumpClosed`

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::{MapChangeDispatcher, PumpConfig};
use crate::error::DispatchError;
use crate::events::MapEvent;

/// Creates a connected sender/pump pair for `hub`.
pub fn channel(hub: Arc<MapChangeDispatcher>, config: PumpConfig) -> (EngineEvents, EventPump) {
    let (tx, rx) = mpsc::channel(config.capacity_clamped());
    (EngineEvents { tx }, EventPump { rx, hub, config })
}

/// Engine-side handle publishing events to an [`EventPump`].
///
/// Cheap to clone; every clone feeds the same queue.
#[derive(Clone, Debug)]
pub struct EngineEvents {
    tx: mpsc::Sender<MapEvent>,
}

impl EngineEvents {
    /// Queues an event, waiting for room if the queue is full.
    pub async fn publish(&self, event: impl Into<MapEvent>) -> Result<(), DispatchError> {
        self.tx
            .send(event.into())
            .await
            .map_err(|_| DispatchError::PumpClosed)
    }

    /// Queues an event without waiting.
    pub fn try_publish(&self, event: impl Into<MapEvent>) -> Result<(), DispatchError> {
        self.tx.try_send(event.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DispatchError::PumpFull,
            mpsc::error::TrySendError::Closed(_) => DispatchError::PumpClosed,
        })
    }

    /// Queues an event from a plain (non-async) thread, blocking while the queue is full.
    ///
    /// # Panics
    /// Panics if called from within an async runtime (see
    /// [`tokio::sync::mpsc::Sender::blocking_send`]).
    pub fn blocking_publish(&self, event: impl Into<MapEvent>) -> Result<(), DispatchError> {
        self.tx
            .blocking_send(event.into())
            .map_err(|_| DispatchError::PumpClosed)
    }

    /// Returns `true` once the pump has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single owner of a dispatcher, fed by [`EngineEvents`].
pub struct EventPump {
    rx: mpsc::Receiver<MapEvent>,
    hub: Arc<MapChangeDispatcher>,
    config: PumpConfig,
}

impl EventPump {
    /// Dispatches queued events until `token` is cancelled or every sender is dropped.
    ///
    /// Returns the number of events dispatched.
    pub async fn run(mut self, token: CancellationToken) -> usize {
        let mut dispatched = 0;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(ev) => {
                        self.hub.dispatch(ev);
                        dispatched += 1;
                    }
                    None => {
                        debug!(dispatched, "engine senders dropped; pump stopped");
                        return dispatched;
                    }
                }
            }
        }

        self.rx.close();
        if self.config.drain_on_shutdown {
            while let Ok(ev) = self.rx.try_recv() {
                self.hub.dispatch(ev);
                dispatched += 1;
            }
        }
        debug!(dispatched, "pump cancelled");
        dispatched
    }
}
