//! Public API: parse avatar-manifest JSON into an [`EmotionRegistry`] plus
//! an [`AssetLoader`].
//!
//! Notes:
//! - Durations are provided in milliseconds and kept as milliseconds.
//! - Bundle order in the JSON is the merge order (later wins on collision).
//! - `durationMs` may be omitted: looping clips default to 0 (loop forever),
//!   one-shots to the registry's lenient fallback duration.

use serde::Deserialize;

use crate::error::AvatarError;
use crate::loader::{AssetLoader, SourceList};
use crate::registry::{ClipMetadata, EmotionRegistry, FALLBACK_CLIP_DURATION_MS};
use crate::Result;

/// Validated avatar declaration.
#[derive(Clone, Debug)]
pub struct AvatarManifest {
    pub name: String,
    pub sources: SourceList,
    pub registry: EmotionRegistry,
}

impl AvatarManifest {
    /// Split into the pieces the engine and host need.
    pub fn into_parts(self) -> (EmotionRegistry, AssetLoader) {
        (self.registry, AssetLoader::new(self.sources))
    }
}

/// Parse and validate one avatar manifest.
pub fn parse_avatar_manifest_json(s: &str) -> Result<AvatarManifest> {
    let raw: RawManifest = serde_json::from_str(s)?;

    if raw.base_model.is_empty() {
        return Err(AvatarError::InvalidManifest {
            reason: "baseModel must not be empty".to_string(),
        });
    }
    if raw.bundles.iter().any(|b| b.is_empty()) {
        return Err(AvatarError::InvalidManifest {
            reason: "bundle sources must not be empty".to_string(),
        });
    }

    let idle_emotion = raw.idle_emotion.as_deref().unwrap_or("idle");
    let idle = raw
        .emotions
        .iter()
        .find(|e| e.emotion == idle_emotion)
        .ok_or_else(|| AvatarError::InvalidManifest {
            reason: format!("idle emotion '{idle_emotion}' is not mapped to a clip"),
        })?;

    let mut registry = EmotionRegistry::new(idle_emotion, to_metadata(idle));
    for entry in &raw.emotions {
        if entry.emotion == idle_emotion {
            continue;
        }
        registry.insert_clip(to_metadata(entry));
        registry.insert_emotion(entry.emotion.clone(), entry.clip.clone());
    }

    Ok(AvatarManifest {
        name: raw.name,
        sources: SourceList {
            base_model: raw.base_model,
            bundles: raw.bundles,
        },
        registry,
    })
}

fn to_metadata(entry: &RawEmotion) -> ClipMetadata {
    let duration_ms = match entry.duration_ms {
        Some(ms) => ms,
        None if entry.looped => 0,
        None => FALLBACK_CLIP_DURATION_MS,
    };
    ClipMetadata::new(entry.clip.clone(), duration_ms, entry.looped)
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawManifest {
    pub name: String,
    #[serde(rename = "baseModel")]
    pub base_model: String,
    #[serde(default)]
    pub bundles: Vec<String>,
    #[serde(default, rename = "idleEmotion")]
    pub idle_emotion: Option<String>,
    pub emotions: Vec<RawEmotion>,
}

#[derive(Debug, Deserialize)]
struct RawEmotion {
    pub emotion: String,
    pub clip: String,
    #[serde(default, rename = "durationMs")]
    pub duration_ms: Option<u32>,
    #[serde(default, rename = "loop")]
    pub looped: bool,
}
