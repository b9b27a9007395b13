//! # Internal sink for the curated forward set.
//!
//! The dispatcher forwards five event kinds to at most one bound
//! [`MapChangeSink`] after typed and catch-all listeners ran. The usual sink
//! is a [`ReadyGate`](crate::ReadyGate).
//!
//! ```text
//! CameraIsChanging         ──► on_camera_is_changing()
//! CameraDidChange{a}       ──► on_camera_did_change(a)
//! DidFinishLoadingMap      ──► on_did_finish_loading_map()
//! DidFinishRenderingFrame{p} ► on_did_finish_rendering_frame(p)
//! DidFinishLoadingStyle    ──► on_did_finish_loading_style()
//! ```

/// Receiver of the curated forward set.
///
/// Called synchronously on the emitting thread, after every listener of the
/// event has been notified.
pub trait MapChangeSink: Send + Sync + 'static {
    /// The camera is changing.
    fn on_camera_is_changing(&self);

    /// The camera finished changing.
    fn on_camera_did_change(&self, animated: bool);

    /// The map finished loading.
    fn on_did_finish_loading_map(&self);

    /// A frame finished rendering; `partial` is `true` if more frames follow.
    fn on_did_finish_rendering_frame(&self, partial: bool);

    /// The style finished loading.
    fn on_did_finish_loading_style(&self);
}
