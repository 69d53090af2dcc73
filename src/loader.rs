//! Clip asset loader: tracks one base-model source plus N clip-bundle
//! sources and publishes a single merged [`ActionTable`] once all of them
//! have resolved.
//!
//! The loader never fetches anything itself. The host fetches sources
//! concurrently however it likes and reports each outcome here; the loader
//! is the completion tracker that enforces the load protocol: declaration-
//! order merging with last-write-wins, a ready signal that fires at most
//! once per avatar instance, terminal failure, and cancellation on teardown.

use serde::{Deserialize, Serialize};

use crate::binding::{ActionResolver, ActionTable};
use crate::error::AvatarError;
use crate::Result;

/// Result of reporting a source completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadProgress {
    /// Some sources are still outstanding.
    Pending { remaining: usize },
    /// The last source resolved; here is the merged table. Fires once.
    Ready(ActionTable),
    /// The loader already failed or was cancelled; the completion was
    /// discarded so nothing acts on a dead instance.
    Halted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum LoadPhase {
    Loading,
    Ready,
    Failed(AvatarError),
    Cancelled,
}

/// Declared asset sources for one avatar, in merge order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceList {
    /// Base skinned model. May itself carry clips; merges first.
    pub base_model: String,
    /// Clip bundles, merged in declaration order after the base model.
    pub bundles: Vec<String>,
}

/// Host-driven load tracker for one avatar instance.
#[derive(Debug)]
pub struct AssetLoader {
    sources: Vec<String>,
    resolved: Vec<Option<Vec<String>>>,
    phase: LoadPhase,
}

impl AssetLoader {
    /// Declare the base model plus clip bundles. Index 0 is the base model;
    /// bundle indices follow in declaration order.
    pub fn new(sources: SourceList) -> Self {
        let mut all = Vec::with_capacity(1 + sources.bundles.len());
        all.push(sources.base_model);
        all.extend(sources.bundles);
        let resolved = vec![None; all.len()];
        Self {
            sources: all,
            resolved,
            phase: LoadPhase::Loading,
        }
    }

    #[inline]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Declared source locations, base model first.
    #[inline]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self.phase, LoadPhase::Failed(_))
    }

    /// Terminal load error, if any.
    pub fn error(&self) -> Option<&AvatarError> {
        match &self.phase {
            LoadPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn remaining(&self) -> usize {
        self.resolved.iter().filter(|r| r.is_none()).count()
    }

    /// Report that a source finished loading, carrying the clip ids it
    /// produced. When the last outstanding source resolves, every merged
    /// clip is bound through `resolver` and the finished table is returned.
    pub fn resolve_source(
        &mut self,
        index: usize,
        clips: Vec<String>,
        resolver: &mut dyn ActionResolver,
    ) -> Result<LoadProgress> {
        match self.phase {
            LoadPhase::Failed(_) | LoadPhase::Cancelled => return Ok(LoadProgress::Halted),
            LoadPhase::Ready => {
                return Err(AvatarError::LoadProtocol {
                    reason: format!("source completion at index {index} after ready"),
                })
            }
            LoadPhase::Loading => {}
        }
        let slot = self
            .resolved
            .get_mut(index)
            .ok_or_else(|| AvatarError::LoadProtocol {
                reason: format!(
                    "source index {index} out of range ({} declared)",
                    self.sources.len()
                ),
            })?;
        if slot.is_some() {
            return Err(AvatarError::LoadProtocol {
                reason: format!("duplicate completion for source '{}'", self.sources[index]),
            });
        }
        *slot = Some(clips);

        let remaining = self.remaining();
        if remaining > 0 {
            return Ok(LoadProgress::Pending { remaining });
        }

        // All sources in: merge in declaration order, last write wins, and
        // bind each surviving clip to its action.
        let mut table = ActionTable::new();
        for (source, clips) in self.sources.iter().zip(self.resolved.iter()) {
            for clip in clips.as_ref().expect("all sources resolved") {
                match resolver.resolve(source, clip) {
                    Some(handle) => table.upsert(clip.clone(), handle),
                    None => {
                        log::warn!("clip '{clip}' from '{source}' has no bindable action, skipped")
                    }
                }
            }
        }
        self.phase = LoadPhase::Ready;
        log::info!(
            "action table ready: {} clips from {} sources",
            table.len(),
            self.sources.len()
        );
        Ok(LoadProgress::Ready(table))
    }

    /// Report an irrecoverable fetch failure for a source. Terminal: the
    /// table is never published and the error is returned for the host to
    /// surface. Later completions are discarded, not retried.
    pub fn fail_source(&mut self, index: usize, reason: impl Into<String>) -> Result<()> {
        if index >= self.sources.len() {
            return Err(AvatarError::LoadProtocol {
                reason: format!(
                    "source index {index} out of range ({} declared)",
                    self.sources.len()
                ),
            });
        }
        match self.phase {
            LoadPhase::Failed(_) | LoadPhase::Cancelled => Ok(()),
            LoadPhase::Ready => {
                log::debug!("failure report for '{}' after ready, ignored", self.sources[index]);
                Ok(())
            }
            LoadPhase::Loading => {
                let err = AvatarError::AssetLoad {
                    source: self.sources[index].clone(),
                    reason: reason.into(),
                };
                log::warn!("{err}; avatar stays not-ready");
                self.phase = LoadPhase::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Instance teardown: drop the in-flight load so late completions
    /// become no-ops.
    pub fn cancel(&mut self) {
        if self.phase == LoadPhase::Loading {
            self.phase = LoadPhase::Cancelled;
        }
    }
}
