use std::collections::HashSet;

use avatar_animation_core::{
    ActionHandle, ActionResolver, AssetLoader, AvatarError, LoadProgress, SourceList,
};

/// Binds every clip, tagging the handle with the source it came from so the
/// merge order is observable.
struct TaggingResolver;

impl ActionResolver for TaggingResolver {
    fn resolve(&mut self, source: &str, clip: &str) -> Option<ActionHandle> {
        Some(format!("{source}#{clip}"))
    }
}

/// Refuses to bind the named clips.
struct SkippingResolver(HashSet<String>);

impl ActionResolver for SkippingResolver {
    fn resolve(&mut self, source: &str, clip: &str) -> Option<ActionHandle> {
        if self.0.contains(clip) {
            None
        } else {
            Some(format!("{source}#{clip}"))
        }
    }
}

fn avatar_sources() -> SourceList {
    SourceList {
        base_model: "avatar.glb".to_string(),
        bundles: vec!["emotes.glb".to_string(), "dances.glb".to_string()],
    }
}

/// it should merge bundles in declaration order with last-write-wins on
/// clip id collisions, independent of completion order
#[test]
fn merge_is_declaration_ordered_last_write_wins() {
    let mut loader = AssetLoader::new(avatar_sources());
    let mut resolver = TaggingResolver;

    // Completions arrive out of order on purpose.
    let p = loader
        .resolve_source(2, vec!["Wave".to_string()], &mut resolver)
        .unwrap();
    assert_eq!(p, LoadProgress::Pending { remaining: 2 });

    let p = loader
        .resolve_source(
            0,
            vec!["Idle".to_string(), "Wave".to_string()],
            &mut resolver,
        )
        .unwrap();
    assert_eq!(p, LoadProgress::Pending { remaining: 1 });

    let table = match loader
        .resolve_source(
            1,
            vec!["Dance".to_string(), "Wave".to_string()],
            &mut resolver,
        )
        .unwrap()
    {
        LoadProgress::Ready(table) => table,
        other => panic!("expected Ready, got {other:?}"),
    };
    assert!(loader.is_ready());
    assert_eq!(table.len(), 3);
    assert_eq!(table.get("Idle").unwrap().as_str(), "avatar.glb#Idle");
    assert_eq!(table.get("Dance").unwrap().as_str(), "emotes.glb#Dance");
    // "Wave" appears in all three sources; the last-declared bundle wins.
    assert_eq!(table.get("Wave").unwrap().as_str(), "dances.glb#Wave");
}

/// it should reject completions after the ready signal fired
#[test]
fn ready_fires_at_most_once() {
    let mut loader = AssetLoader::new(SourceList {
        base_model: "avatar.glb".to_string(),
        bundles: vec![],
    });
    let mut resolver = TaggingResolver;

    let p = loader
        .resolve_source(0, vec!["Idle".to_string()], &mut resolver)
        .unwrap();
    assert!(matches!(p, LoadProgress::Ready(_)));

    let err = loader
        .resolve_source(0, vec!["Idle".to_string()], &mut resolver)
        .unwrap_err();
    assert!(matches!(err, AvatarError::LoadProtocol { .. }));
}

/// it should reject duplicate and out-of-range completions
#[test]
fn protocol_misuse_is_rejected() {
    let mut loader = AssetLoader::new(avatar_sources());
    let mut resolver = TaggingResolver;

    loader
        .resolve_source(1, vec!["Dance".to_string()], &mut resolver)
        .unwrap();
    let dup = loader
        .resolve_source(1, vec!["Dance".to_string()], &mut resolver)
        .unwrap_err();
    assert!(matches!(dup, AvatarError::LoadProtocol { .. }));

    let oob = loader.resolve_source(7, vec![], &mut resolver).unwrap_err();
    assert!(matches!(oob, AvatarError::LoadProtocol { .. }));
    assert!(matches!(
        loader.fail_source(7, "nope").unwrap_err(),
        AvatarError::LoadProtocol { .. }
    ));
}

/// it should treat any source failure as terminal and discard later
/// completions
#[test]
fn failure_is_terminal() {
    let mut loader = AssetLoader::new(avatar_sources());
    let mut resolver = TaggingResolver;

    loader
        .resolve_source(0, vec!["Idle".to_string()], &mut resolver)
        .unwrap();
    let err = loader.fail_source(1, "HTTP 404").unwrap_err();
    assert_eq!(
        err,
        AvatarError::AssetLoad {
            source: "emotes.glb".to_string(),
            reason: "HTTP 404".to_string(),
        }
    );
    assert!(loader.is_failed());
    assert_eq!(loader.error(), Some(&err));

    // Late completions and repeat failures are discarded, never retried.
    let p = loader
        .resolve_source(2, vec!["Wave".to_string()], &mut resolver)
        .unwrap();
    assert_eq!(p, LoadProgress::Halted);
    assert!(loader.fail_source(2, "also failed").is_ok());
    assert!(!loader.is_ready());
}

/// it should make late completions no-ops after cancellation
#[test]
fn cancel_discards_in_flight_load() {
    let mut loader = AssetLoader::new(avatar_sources());
    let mut resolver = TaggingResolver;

    loader
        .resolve_source(0, vec!["Idle".to_string()], &mut resolver)
        .unwrap();
    loader.cancel();

    let p = loader
        .resolve_source(1, vec!["Dance".to_string()], &mut resolver)
        .unwrap();
    assert_eq!(p, LoadProgress::Halted);
    let p = loader
        .resolve_source(2, vec!["Wave".to_string()], &mut resolver)
        .unwrap();
    assert_eq!(p, LoadProgress::Halted);
    assert!(!loader.is_ready());
    assert!(!loader.is_failed());
}

/// it should skip clips the resolver cannot bind and keep the rest
#[test]
fn unbindable_clips_are_skipped() {
    let mut loader = AssetLoader::new(SourceList {
        base_model: "avatar.glb".to_string(),
        bundles: vec![],
    });
    let mut resolver = SkippingResolver(HashSet::from(["Ghost".to_string()]));

    let table = match loader
        .resolve_source(
            0,
            vec!["Idle".to_string(), "Ghost".to_string()],
            &mut resolver,
        )
        .unwrap()
    {
        LoadProgress::Ready(table) => table,
        other => panic!("expected Ready, got {other:?}"),
    };
    assert!(table.contains("Idle"));
    assert!(!table.contains("Ghost"));
}

/// it should expose the declared sources with the base model first
#[test]
fn sources_keep_declaration_order() {
    let loader = AssetLoader::new(avatar_sources());
    assert_eq!(loader.source_count(), 3);
    assert_eq!(loader.sources()[0], "avatar.glb");
    assert_eq!(loader.sources()[2], "dances.glb");
}
