use avatar_animation_core::{
    parse_avatar_manifest_json, ActionHandle, ActionResolver, AvatarError, Config, LoadProgress,
    Mixer, PlaybackEngine,
};

const MANIFEST: &str = r#"{
    "name": "mascot",
    "baseModel": "models/mascot.glb",
    "bundles": ["anims/emotes.glb", "anims/dances.fbx"],
    "emotions": [
        { "emotion": "idle", "clip": "Idle", "loop": true },
        { "emotion": "happy", "clip": "Dance", "durationMs": 3000 },
        { "emotion": "fun", "clip": "Dance", "durationMs": 3000 },
        { "emotion": "greeting", "clip": "Wave", "durationMs": 2000 },
        { "emotion": "sad", "clip": "Sad" },
        { "emotion": "walking", "clip": "Walk", "loop": true }
    ]
}"#;

struct TaggingResolver;

impl ActionResolver for TaggingResolver {
    fn resolve(&mut self, source: &str, clip: &str) -> Option<ActionHandle> {
        Some(format!("{source}#{clip}"))
    }
}

struct NullMixer;

impl Mixer for NullMixer {
    fn reset_and_play(&mut self, _action: &str) {}
    fn stop(&mut self, _action: &str) {}
    fn advance(&mut self, _delta_ms: f64) {}
}

/// it should parse a manifest into a registry with aliasing and defaults
#[test]
fn parse_manifest_registry() {
    let manifest = parse_avatar_manifest_json(MANIFEST).unwrap();
    assert_eq!(manifest.name, "mascot");
    assert_eq!(manifest.sources.base_model, "models/mascot.glb");
    assert_eq!(manifest.sources.bundles.len(), 2);

    let reg = &manifest.registry;
    assert_eq!(reg.idle_emotion(), "idle");
    assert_eq!(reg.resolve_clip("fun"), "Dance");
    // Looping clip without durationMs loops forever.
    let walk = reg.metadata_of("Walk");
    assert_eq!(walk.duration_ms, 0);
    assert!(walk.looped);
    assert!(!walk.auto_reverts());
    // One-shot without durationMs gets the lenient fallback.
    let sad = reg.metadata_of("Sad");
    assert_eq!(sad.duration_ms, 2000);
    assert!(sad.auto_reverts());
}

/// it should drive manifest sources through the loader into a ready engine
#[test]
fn manifest_to_ready_engine() {
    let (registry, mut loader) = parse_avatar_manifest_json(MANIFEST).unwrap().into_parts();
    let mut resolver = TaggingResolver;

    let mut table = None;
    for (idx, clips) in [
        (0usize, vec!["Idle".to_string(), "Walk".to_string()]),
        (1, vec!["Wave".to_string(), "Sad".to_string()]),
        (2, vec!["Dance".to_string()]),
    ] {
        if let LoadProgress::Ready(t) = loader.resolve_source(idx, clips, &mut resolver).unwrap() {
            table = Some(t);
        }
    }

    let mut engine = PlaybackEngine::new(registry, Config::default());
    engine.publish_table(table.expect("all sources resolved")).unwrap();

    let mut mixer = NullMixer;
    engine.play_animation(&mut mixer, "happy");
    assert_eq!(engine.current_emotion(), "happy");
    assert_eq!(engine.state().active_clip.as_deref(), Some("Dance"));
}

/// it should reject a manifest whose idle emotion is unmapped
#[test]
fn manifest_requires_idle_mapping() {
    let json = r#"{
        "name": "mascot",
        "baseModel": "models/mascot.glb",
        "emotions": [ { "emotion": "happy", "clip": "Dance" } ]
    }"#;
    let err = parse_avatar_manifest_json(json).unwrap_err();
    assert!(matches!(err, AvatarError::InvalidManifest { .. }));
}

/// it should honor an idleEmotion override
#[test]
fn manifest_idle_emotion_override() {
    let json = r#"{
        "name": "mascot",
        "baseModel": "models/mascot.glb",
        "idleEmotion": "rest",
        "emotions": [ { "emotion": "rest", "clip": "Breathe", "loop": true } ]
    }"#;
    let manifest = parse_avatar_manifest_json(json).unwrap();
    assert_eq!(manifest.registry.idle_emotion(), "rest");
    assert_eq!(manifest.registry.resolve_clip("anything-else"), "Breathe");
}

/// it should map malformed JSON and empty sources to InvalidManifest
#[test]
fn manifest_validation_errors() {
    let err = parse_avatar_manifest_json("{ not json").unwrap_err();
    assert!(matches!(err, AvatarError::InvalidManifest { .. }));

    let json = r#"{
        "name": "mascot",
        "baseModel": "",
        "emotions": [ { "emotion": "idle", "clip": "Idle", "loop": true } ]
    }"#;
    let err = parse_avatar_manifest_json(json).unwrap_err();
    assert!(matches!(err, AvatarError::InvalidManifest { .. }));
}
