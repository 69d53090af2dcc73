//! Playback engine: per-avatar state machine over emotion-driven clip
//! playback.
//!
//! Owns the `PlaybackState`, binds requests against the published action
//! table, and enforces the temporal policies: requests are dropped until the
//! table is published, the latest request always supersedes any active clip
//! and any pending deadline, non-looping clips auto-revert to idle when
//! their duration elapses, and a greeting requested before readiness plays
//! once after a settle delay. All timing is expressed as deadlines against
//! an internal clock advanced by the host's per-frame tick, so there is
//! nothing to race with and nothing left running after teardown.

use serde::{Deserialize, Serialize};

use crate::binding::ActionTable;
use crate::config::Config;
use crate::error::AvatarError;
use crate::events::{TransitionCause, TransitionEvent, TransitionListener};
use crate::mixer::Mixer;
use crate::registry::EmotionRegistry;
use crate::Result;

/// Coarse engine phase derived from [`PlaybackState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnginePhase {
    /// Action table not published yet (or load failed); requests are dropped.
    NotReady,
    /// Ready, idle clip active (or nothing played yet).
    Idle,
    /// A non-idle clip is active.
    Playing,
}

impl EnginePhase {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotReady => "not-ready",
            Self::Idle => "idle",
            Self::Playing => "playing",
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        !matches!(self, Self::NotReady)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

/// Mutable playback state for one avatar instance. Mutated exclusively by
/// the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_emotion: String,
    pub active_clip: Option<String>,
    pub is_animating: bool,
    pub mixer_ready: bool,
}

/// Per-instance playback engine.
pub struct PlaybackEngine {
    registry: EmotionRegistry,
    cfg: Config,
    table: Option<ActionTable>,
    state: PlaybackState,
    now_ms: f64,
    revert_deadline_ms: Option<f64>,
    greeting_deadline_ms: Option<f64>,
    greeting_requested: bool,
    released: bool,
    listener: Option<TransitionListener>,
}

impl PlaybackEngine {
    pub fn new(registry: EmotionRegistry, cfg: Config) -> Self {
        let state = PlaybackState {
            current_emotion: registry.idle_emotion().to_string(),
            active_clip: None,
            is_animating: false,
            mixer_ready: false,
        };
        Self {
            registry,
            cfg,
            table: None,
            state,
            now_ms: 0.0,
            revert_deadline_ms: None,
            greeting_deadline_ms: None,
            greeting_requested: false,
            released: false,
            listener: None,
        }
    }

    /// Register the transition observer. At most one; replaces any previous.
    pub fn set_transition_listener(&mut self, listener: TransitionListener) {
        self.listener = Some(listener);
    }

    #[inline]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[inline]
    pub fn current_emotion(&self) -> &str {
        &self.state.current_emotion
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.mixer_ready && !self.released
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    pub fn phase(&self) -> EnginePhase {
        if !self.is_ready() {
            EnginePhase::NotReady
        } else if self.state.is_animating {
            EnginePhase::Playing
        } else {
            EnginePhase::Idle
        }
    }

    /// Time until the pending auto-revert fires, if one is armed. Test and
    /// tooling hook; playback logic never reads it.
    pub fn pending_revert_in_ms(&self) -> Option<f64> {
        self.revert_deadline_ms.map(|d| d - self.now_ms)
    }

    /// Accept the finished action table and become ready.
    ///
    /// The idle clip must be present — without it there is nothing safe to
    /// degrade to, so the table is rejected and the engine stays not-ready.
    /// The ready edge happens at most once; later tables are ignored. If a
    /// greeting was requested before readiness, it is scheduled to play
    /// `settle_delay_ms` from now.
    pub fn publish_table(&mut self, table: ActionTable) -> Result<()> {
        if self.released {
            return Err(AvatarError::EngineNotReady);
        }
        if self.state.mixer_ready {
            log::warn!("action table already published, ignoring repeat publish");
            return Ok(());
        }
        let idle_clip = self.registry.idle_clip();
        if !table.contains(idle_clip) {
            return Err(AvatarError::MissingClip {
                clip: idle_clip.to_string(),
            });
        }
        log::info!("action table published with {} clips, engine ready", table.len());
        self.table = Some(table);
        self.state.mixer_ready = true;
        if self.greeting_requested {
            self.greeting_requested = false;
            self.greeting_deadline_ms = Some(self.now_ms + self.cfg.settle_delay_ms);
        }
        Ok(())
    }

    /// Play the clip mapped to `emotion`. Failures degrade to a logged
    /// no-op; the avatar never ends up unrenderable because of a bad
    /// request.
    pub fn play_animation(&mut self, mixer: &mut dyn Mixer, emotion: &str) {
        if let Err(err) = self.try_play(mixer, emotion, TransitionCause::Request) {
            log::warn!("animation request '{emotion}' dropped: {err}");
        }
    }

    /// Cancel pending deadlines, stop the active clip, and go idle.
    /// Idempotent: stopping an already-idle engine is a silent no-op.
    pub fn stop_animation(&mut self, mixer: &mut dyn Mixer) {
        if !self.is_ready() {
            return;
        }
        let had_pending = self.revert_deadline_ms.is_some() || self.greeting_deadline_ms.is_some();
        self.revert_deadline_ms = None;
        self.greeting_deadline_ms = None;
        if !self.state.is_animating && !had_pending {
            return;
        }
        let idle = self.registry.idle_emotion().to_string();
        if let Err(err) = self.try_play(mixer, &idle, TransitionCause::Request) {
            log::warn!("stop could not return to idle: {err}");
        }
    }

    /// One-shot greeting trigger. Plays immediately when ready; otherwise
    /// remembered and played once, settle-delayed, after the table arrives.
    pub fn request_greeting(&mut self, mixer: &mut dyn Mixer) {
        if self.released {
            return;
        }
        if self.state.mixer_ready {
            let greeting = self.cfg.greeting_emotion.clone();
            if let Err(err) = self.try_play(mixer, &greeting, TransitionCause::Greeting) {
                log::warn!("greeting dropped: {err}");
            }
        } else {
            self.greeting_requested = true;
        }
    }

    /// Per-frame tick: advance the engine clock, forward the mixer tick,
    /// then fire any expired deadlines. The mixer forward happens first and
    /// unconditionally — decision logic never blocks it.
    pub fn advance(&mut self, mixer: &mut dyn Mixer, delta_ms: f64) {
        if self.released {
            return;
        }
        self.now_ms += delta_ms;
        mixer.advance(delta_ms);

        if let Some(deadline) = self.greeting_deadline_ms {
            if deadline <= self.now_ms {
                self.greeting_deadline_ms = None;
                let greeting = self.cfg.greeting_emotion.clone();
                if let Err(err) = self.try_play(mixer, &greeting, TransitionCause::Greeting) {
                    log::warn!("scheduled greeting dropped: {err}");
                }
            }
        }
        if let Some(deadline) = self.revert_deadline_ms {
            if deadline <= self.now_ms {
                self.revert_deadline_ms = None;
                let idle = self.registry.idle_emotion().to_string();
                if let Err(err) = self.try_play(mixer, &idle, TransitionCause::AutoRevert) {
                    log::warn!("auto-revert to idle failed: {err}");
                }
            }
        }
    }

    /// Instance teardown: cancel every pending deadline and stop the active
    /// action so nothing fires against a destroyed instance. The engine is
    /// inert afterwards.
    pub fn release(&mut self, mixer: &mut dyn Mixer) {
        self.revert_deadline_ms = None;
        self.greeting_deadline_ms = None;
        self.greeting_requested = false;
        if let (Some(clip), Some(table)) = (&self.state.active_clip, &self.table) {
            if let Some(handle) = table.get(clip) {
                mixer.stop(handle);
            }
        }
        self.state.active_clip = None;
        self.state.is_animating = false;
        self.released = true;
    }

    fn try_play(
        &mut self,
        mixer: &mut dyn Mixer,
        emotion: &str,
        cause: TransitionCause,
    ) -> Result<()> {
        if !self.is_ready() {
            return Err(AvatarError::EngineNotReady);
        }
        // Unknown emotions are recovered by resolving to idle, not refused.
        let resolved_emotion = if self.registry.is_known_emotion(emotion) {
            emotion.to_string()
        } else {
            log::debug!("unknown emotion '{emotion}', falling back to idle");
            self.registry.idle_emotion().to_string()
        };
        let clip = self.registry.resolve_clip(&resolved_emotion).to_string();

        // Table lookup happens before any cancellation: a failed request
        // must leave the active clip and its pending revert untouched.
        let table = self.table.as_ref().ok_or(AvatarError::EngineNotReady)?;
        let handle = table
            .get(&clip)
            .ok_or_else(|| AvatarError::MissingClip { clip: clip.clone() })?
            .clone();

        // Supersession: at most one active action, and a deadline armed for
        // the previous clip must never outlive it.
        self.revert_deadline_ms = None;
        if let Some(previous) = self.state.active_clip.take() {
            if previous != clip {
                if let Some(prev_handle) = table.get(&previous) {
                    mixer.stop(prev_handle);
                }
            }
        }
        mixer.reset_and_play(&handle);

        let is_idle = resolved_emotion == self.registry.idle_emotion();
        self.state.current_emotion = resolved_emotion.clone();
        self.state.active_clip = Some(clip.clone());
        self.state.is_animating = !is_idle;

        let meta = self.registry.metadata_of(&clip);
        if !is_idle && meta.auto_reverts() {
            self.revert_deadline_ms = Some(self.now_ms + f64::from(meta.duration_ms));
        }

        let event = TransitionEvent {
            emotion: resolved_emotion,
            clip,
            cause,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
        Ok(())
    }
}
