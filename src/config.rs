//! Core configuration for avatar-animation-core.

use serde::{Deserialize, Serialize};

/// Engine tunables. Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Delay between the engine becoming ready and a pre-ready greeting
    /// request actually playing. Gives the rendering surface time to
    /// stabilize so the first visible transition does not pop.
    pub settle_delay_ms: f64,

    /// Emotion played by the one-shot greeting trigger.
    pub greeting_emotion: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000.0,
            greeting_emotion: "greeting".to_string(),
        }
    }
}
