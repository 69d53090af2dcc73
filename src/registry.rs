//! Emotion registry: static mapping from semantic emotion identifiers to
//! clip identifiers and clip metadata.
//!
//! Pure, stateless lookup. Several emotions may alias the same clip, and an
//! unrecognized emotion always resolves to the idle clip — resolution never
//! fails.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Duration assumed for clips the registry has no metadata for. Lenient on
/// purpose: a missing pipeline entry degrades to a 2s one-shot instead of
/// bricking the avatar, and the fallback is logged so it stays visible.
pub const FALLBACK_CLIP_DURATION_MS: u32 = 2000;

/// Metadata for one concrete animation clip.
///
/// `duration_ms == 0` means "loop indefinitely, no auto-revert"; clips with
/// `looped` set never arm the idle-reversion deadline either way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipMetadata {
    pub clip: String,
    pub duration_ms: u32,
    pub looped: bool,
}

impl ClipMetadata {
    pub fn new(clip: impl Into<String>, duration_ms: u32, looped: bool) -> Self {
        Self {
            clip: clip.into(),
            duration_ms,
            looped,
        }
    }

    /// Whether playing this clip schedules an auto-revert to idle.
    #[inline]
    pub fn auto_reverts(&self) -> bool {
        !self.looped && self.duration_ms > 0
    }
}

/// Emotion -> clip aliasing plus per-clip metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmotionRegistry {
    idle_emotion: String,
    emotions: HashMap<String, String>,
    clips: HashMap<String, ClipMetadata>,
}

impl EmotionRegistry {
    /// Create a registry with only the idle mapping. The idle emotion is
    /// always mapped; it is the fallback target for everything unknown.
    pub fn new(idle_emotion: impl Into<String>, idle_clip: ClipMetadata) -> Self {
        let idle_emotion = idle_emotion.into();
        let mut emotions = HashMap::new();
        emotions.insert(idle_emotion.clone(), idle_clip.clip.clone());
        let mut clips = HashMap::new();
        clips.insert(idle_clip.clip.clone(), idle_clip);
        Self {
            idle_emotion,
            emotions,
            clips,
        }
    }

    /// Map an emotion to a clip id. Re-mapping an emotion overwrites.
    pub fn insert_emotion(&mut self, emotion: impl Into<String>, clip: impl Into<String>) {
        self.emotions.insert(emotion.into(), clip.into());
    }

    /// Register metadata for a clip id.
    pub fn insert_clip(&mut self, meta: ClipMetadata) {
        self.clips.insert(meta.clip.clone(), meta);
    }

    #[inline]
    pub fn idle_emotion(&self) -> &str {
        &self.idle_emotion
    }

    /// Clip id the idle emotion maps to.
    #[inline]
    pub fn idle_clip(&self) -> &str {
        // Present by construction.
        &self.emotions[&self.idle_emotion]
    }

    /// Resolve an emotion to its clip id, falling back to the idle clip for
    /// unrecognized emotions. Never fails.
    pub fn resolve_clip(&self, emotion: &str) -> &str {
        match self.emotions.get(emotion) {
            Some(clip) => clip,
            None => {
                log::debug!("unknown emotion '{emotion}', resolving to idle clip");
                self.idle_clip()
            }
        }
    }

    /// Membership test for callers that want to validate input up front.
    #[inline]
    pub fn is_known_emotion(&self, emotion: &str) -> bool {
        self.emotions.contains_key(emotion)
    }

    /// Stored metadata for a clip, or the lenient fallback for clips the
    /// registry does not know about.
    pub fn metadata_of(&self, clip: &str) -> ClipMetadata {
        match self.clips.get(clip) {
            Some(meta) => meta.clone(),
            None => {
                log::warn!(
                    "no metadata for clip '{clip}', assuming {FALLBACK_CLIP_DURATION_MS}ms one-shot"
                );
                ClipMetadata::new(clip, FALLBACK_CLIP_DURATION_MS, false)
            }
        }
    }

    /// All registered emotion identifiers.
    pub fn emotions(&self) -> impl Iterator<Item = &str> {
        self.emotions.keys().map(|s| s.as_str())
    }
}

impl Default for EmotionRegistry {
    /// Built-in emotion set of the avatar platform.
    fn default() -> Self {
        let mut reg = Self::new("idle", ClipMetadata::new("Idle", 0, true));
        reg.insert_clip(ClipMetadata::new("Dance", 3000, false));
        reg.insert_clip(ClipMetadata::new("Jump", 2500, false));
        reg.insert_clip(ClipMetadata::new("Sad", 3000, false));
        reg.insert_clip(ClipMetadata::new("Wave", 2000, false));
        reg.insert_clip(ClipMetadata::new("Walk", 0, true));
        reg.insert_emotion("happy", "Dance");
        // "fun" aliases the happy clip on purpose; not every emotion gets
        // its own sequence from the pipeline.
        reg.insert_emotion("fun", "Dance");
        reg.insert_emotion("excited", "Jump");
        reg.insert_emotion("sad", "Sad");
        reg.insert_emotion("greeting", "Wave");
        reg.insert_emotion("walking", "Walk");
        reg
    }
}
