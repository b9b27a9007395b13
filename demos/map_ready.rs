//! # Example: map_ready
//!
//! Wires a dispatcher, a ready gate and the engine bridge together, then
//! replays a typical map start-up sequence from a simulated engine thread.
//!
//! Demonstrates how to:
//! - Register typed and catch-all listeners (including the built-in `LogWriter`)
//! - Queue one-shot ready callbacks on a `ReadyGate`
//! - Feed engine events through `EngineEvents` / `EventPump`
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example map_ready --features logging
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mapchange::{
    CameraDidChange, ChangeCode, DidFailLoadingMap, DidFinishLoadingMap, DidFinishLoadingStyle,
    DidFinishRenderingFrame, LogWriter, MapChangeDispatcher, MapFacade, PumpConfig, ReadyGate,
    SourceChanged, WillStartLoadingMap,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Application-side map session counting what the gate tells it.
#[derive(Default)]
struct Session {
    camera_syncs: AtomicU64,
    full_frames: AtomicU64,
}

impl Session {
    fn print_stats(&self) {
        println!();
        println!("Session:");
        println!(" ├─► Camera syncs: {}", self.camera_syncs.load(Ordering::Relaxed));
        println!(" └─► Full frames:  {}", self.full_frames.load(Ordering::Relaxed));
    }
}

impl MapFacade for Session {
    fn on_pre_map_ready(&self) {
        println!("[session] pre map ready");
    }
    fn on_post_map_ready(&self) {
        println!("[session] post map ready");
    }
    fn on_camera_change(&self) {
        self.camera_syncs.fetch_add(1, Ordering::Relaxed);
    }
    fn on_camera_did_change_animated(&self) {
        println!("[session] animated camera transition finished");
    }
    fn on_did_finish_rendering_frame(&self) {}
    fn on_did_finish_rendering_frame_fully(&self) {
        self.full_frames.fetch_add(1, Ordering::Relaxed);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let hub = Arc::new(MapChangeDispatcher::new());
    hub.add_map_changed_listener(LogWriter::new());
    hub.add_listener::<DidFailLoadingMap>(LogWriter::new());
    hub.add_listener::<SourceChanged>(|ev: &SourceChanged| {
        println!("[listener] source changed: {}", ev.source_id);
    });
    hub.add_map_changed_listener(|code: &ChangeCode| {
        if *code == ChangeCode::DidFinishRenderingFrameFullyRendered {
            println!("[listener] fully rendered frame");
        }
    });

    let session = Arc::new(Session::default());
    let gate = Arc::new(ReadyGate::bound(Arc::clone(&session)));
    gate.add_on_map_ready(|_: &Arc<Session>| println!("[ready] add layers"));
    gate.add_on_map_ready(|_: &Arc<Session>| println!("[ready] restore camera"));
    hub.bind(gate.clone());

    let (events, pump) = mapchange::channel(Arc::clone(&hub), PumpConfig::default());
    let token = CancellationToken::new();
    let pump = tokio::spawn(pump.run(token.clone()));

    let engine = tokio::task::spawn_blocking(move || -> Result<(), mapchange::DispatchError> {
        events.blocking_publish(WillStartLoadingMap)?;
        events.blocking_publish(DidFinishLoadingStyle)?;
        events.blocking_publish(SourceChanged {
            source_id: "composite".into(),
        })?;
        events.blocking_publish(DidFinishRenderingFrame { partial: true })?;
        events.blocking_publish(DidFinishRenderingFrame { partial: false })?;
        events.blocking_publish(DidFinishLoadingMap)?;
        events.blocking_publish(CameraDidChange { animated: true })?;
        events.blocking_publish(DidFailLoadingMap {
            message: "tile request failed".into(),
        })?;
        Ok(())
    });
    engine.await??;

    token.cancel();
    let dispatched = pump.await?;
    println!("dispatched {dispatched} events; ready={}", gate.is_ready());
    session.print_stats();
    Ok(())
}
