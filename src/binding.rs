//! Action table and resolver traits.
//!
//! Small string keys serve as action handles. Hosts implement
//! [`ActionResolver`] to bind each loaded clip to a playable action over the
//! model's skeleton; the loader populates one [`ActionTable`] per avatar
//! instance from those bindings and hands it to the engine as an immutable
//! snapshot.

use std::collections::HashMap;

/// Opaque handle to a bound, playable clip-action (small string key).
pub type ActionHandle = String;

/// Trait for binding loaded clips to playable actions.
///
/// `source` is the asset source the clip came from; a clip appearing in more
/// than one source binds once per source, and declaration-order merging
/// decides which binding wins.
pub trait ActionResolver {
    fn resolve(&mut self, source: &str, clip: &str) -> Option<ActionHandle>;
}

/// Merged runtime mapping from clip id to its bound action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionTable {
    rows: HashMap<String, ActionHandle>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the bound action for a clip id.
    #[inline]
    pub fn get(&self, clip: &str) -> Option<&ActionHandle> {
        self.rows.get(clip)
    }

    #[inline]
    pub fn contains(&self, clip: &str) -> bool {
        self.rows.contains_key(clip)
    }

    /// Insert or overwrite the binding for a clip id (last write wins).
    pub fn upsert(&mut self, clip: impl Into<String>, handle: ActionHandle) {
        self.rows.insert(clip.into(), handle);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All bound clip ids.
    pub fn clip_ids(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|s| s.as_str())
    }
}
