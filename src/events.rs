//! Transition events.
//!
//! Every committed transition produces exactly one event, delivered
//! synchronously to the single optional listener — no batching, no drops.

use serde::{Deserialize, Serialize};

/// Who initiated a committed transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionCause {
    /// A caller asked for it (imperative call or the declarative emotion
    /// input, including explicit stops).
    Request,
    /// The one-shot greeting, played by the engine after the settle delay.
    Greeting,
    /// Engine-initiated revert to idle when a clip's duration elapsed.
    AutoRevert,
}

/// Payload delivered on every committed transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEvent {
    /// Resolved emotion identifier (unknown requests arrive here as idle).
    pub emotion: String,
    /// Clip id that started playing.
    pub clip: String,
    pub cause: TransitionCause,
}

/// Observer callback registered on the engine.
pub type TransitionListener = Box<dyn FnMut(&TransitionEvent)>;
