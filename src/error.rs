//! Error types for the avatar animation core.

use serde::{Deserialize, Serialize};

/// Error type covering every failure class in the animation subsystem.
///
/// Only `AssetLoad`, `InvalidManifest`, and `LoadProtocol` are terminal;
/// everything else is recovered locally by degrading to "stay idle" or
/// "ignore the request".
// Not a `thiserror` derive: the derive unconditionally treats a field named
// `source` as the std error source, which does not type-check for a `String`
// field, and the `AssetLoad { source, reason }` shape is fixed by the spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AvatarError {
    /// An asset source failed to fetch or decode; the avatar stays not-ready.
    AssetLoad { source: String, reason: String },

    /// Emotion identifier not present in the registry.
    UnknownEmotion { emotion: String },

    /// Resolved clip id has no bound action in the action table.
    MissingClip { clip: String },

    /// A playback request arrived before the action table was published.
    EngineNotReady,

    /// Avatar manifest failed to parse or validate.
    InvalidManifest { reason: String },

    /// Loader driven out of protocol (bad index, duplicate completion, ...).
    LoadProtocol { reason: String },
}

impl std::fmt::Display for AvatarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AssetLoad { source, reason } => {
                write!(f, "asset source '{source}' failed to load: {reason}")
            }
            Self::UnknownEmotion { emotion } => write!(f, "unknown emotion: {emotion}"),
            Self::MissingClip { clip } => write!(f, "clip not present in action table: {clip}"),
            Self::EngineNotReady => {
                write!(f, "engine not ready: action table has not been published")
            }
            Self::InvalidManifest { reason } => write!(f, "invalid avatar manifest: {reason}"),
            Self::LoadProtocol { reason } => write!(f, "load protocol violation: {reason}"),
        }
    }
}

impl std::error::Error for AvatarError {}

impl AvatarError {
    /// Check if this error is recovered locally by the engine (no-op with a
    /// warning) rather than surfaced to the host.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownEmotion { .. } | Self::MissingClip { .. } | Self::EngineNotReady
        )
    }

    /// Get error category for logging/metrics.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::AssetLoad { .. } | Self::LoadProtocol { .. } => "load",
            Self::UnknownEmotion { .. } | Self::MissingClip { .. } => "lookup",
            Self::EngineNotReady => "state",
            Self::InvalidManifest { .. } => "manifest",
        }
    }
}

impl From<serde_json::Error> for AvatarError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidManifest {
            reason: err.to_string(),
        }
    }
}
