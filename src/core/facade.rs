//! # Map facade notified by the ready gate.
//!
//! The facade is the application-side map session object. It never returns
//! anything to the gate; every call is fire-and-forget and must not block.

/// Application-side receiver of derived map lifecycle notifications.
pub trait MapFacade: Send + Sync + 'static {
    /// The map is about to become ready (before ready callbacks run).
    fn on_pre_map_ready(&self);

    /// The map became ready (after every ready callback ran).
    fn on_post_map_ready(&self);

    /// Camera state must be re-read (non-animated change, ongoing change or resync).
    fn on_camera_change(&self);

    /// An animated camera transition finished.
    fn on_camera_did_change_animated(&self);

    /// A partial frame finished rendering.
    fn on_did_finish_rendering_frame(&self);

    /// A frame finished rendering and the map is fully rendered.
    fn on_did_finish_rendering_frame_fully(&self);
}
