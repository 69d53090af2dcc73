//! The renderer seam.
//!
//! The core treats the rendering surface purely as a sink: it issues
//! reset-and-play / stop calls against bound actions and forwards the
//! per-frame advance, and never reads rendering state back.

/// Playback sink implemented by the host's rendering adapter.
pub trait Mixer {
    /// Rewind an action to its first frame and start playing it.
    fn reset_and_play(&mut self, action: &str);

    /// Stop an action.
    fn stop(&mut self, action: &str);

    /// Advance active playback by elapsed wall time. High-frequency and
    /// read-mostly on the host side; the engine never gates it on its own
    /// decision logic.
    fn advance(&mut self, delta_ms: f64);
}
