//! Avatar Animation Core (renderer-agnostic)
//!
//! Maps abstract emotional states to named animation clips and owns the
//! playback state machine for one avatar instance: readiness gating on asset
//! load, request supersession, auto-revert-to-idle deadlines, and transition
//! events. The host drives everything: it reports asset-source completions,
//! applies control inputs, and calls `advance` once per frame. No threads,
//! no real timers, no rendering — the renderer sits behind the [`Mixer`]
//! trait as a pure sink.

pub mod binding;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod events;
pub mod loader;
pub mod manifest;
pub mod mixer;
pub mod registry;

// Re-exports for consumers (adapters)
pub use binding::{ActionHandle, ActionResolver, ActionTable};
pub use config::Config;
pub use control::{ControlInputs, ControlSurface};
pub use engine::{EnginePhase, PlaybackEngine, PlaybackState};
pub use error::AvatarError;
pub use events::{TransitionCause, TransitionEvent};
pub use loader::{AssetLoader, LoadProgress, SourceList};
pub use manifest::{parse_avatar_manifest_json, AvatarManifest};
pub use mixer::Mixer;
pub use registry::{ClipMetadata, EmotionRegistry};

/// Crate-wide result type.
pub type Result<T> = core::result::Result<T, AvatarError>;
