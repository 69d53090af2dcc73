//! Imperative control surface.
//!
//! Holders of an avatar handle get `play_animation` / `stop_animation`, plus
//! two declarative inputs the surrounding UI drives reactively: an `emotion`
//! value and a one-shot `greeting` trigger. The surface funnels both into
//! the playback engine, deduplicating so that re-applying an unchanged input
//! never produces a duplicate transition.

use serde::{Deserialize, Serialize};

use crate::engine::PlaybackEngine;
use crate::mixer::Mixer;

/// Declarative inputs sampled from the host UI, applied once per tick.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Desired emotion. Forwarded only when it differs from the engine's
    /// current emotion and the engine is ready — idempotent by design.
    #[serde(default)]
    pub emotion: Option<String>,
    /// Greeting trigger; each false-to-true edge plays one greeting.
    #[serde(default)]
    pub greeting: bool,
}

/// Threads declarative inputs into a [`PlaybackEngine`].
#[derive(Debug, Default)]
pub struct ControlSurface {
    last_greeting: bool,
}

impl ControlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one sample of declarative inputs.
    pub fn apply(
        &mut self,
        engine: &mut PlaybackEngine,
        mixer: &mut dyn Mixer,
        inputs: &ControlInputs,
    ) {
        if inputs.greeting && !self.last_greeting {
            engine.request_greeting(mixer);
        }
        self.last_greeting = inputs.greeting;

        if let Some(emotion) = inputs.emotion.as_deref() {
            if engine.is_ready() && emotion != engine.current_emotion() {
                engine.play_animation(mixer, emotion);
            }
        }
    }

    /// Imperative pass-through for direct handle holders.
    pub fn play_animation(
        &mut self,
        engine: &mut PlaybackEngine,
        mixer: &mut dyn Mixer,
        emotion: &str,
    ) {
        engine.play_animation(mixer, emotion);
    }

    /// Imperative pass-through for direct handle holders.
    pub fn stop_animation(&mut self, engine: &mut PlaybackEngine, mixer: &mut dyn Mixer) {
        engine.stop_animation(mixer);
    }
}
