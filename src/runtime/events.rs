//! Runtime event stream payloads.

use std::time::Duration;

use serde::Serialize;

use crate::types::{ContestantId, Generation, Group, WallMs};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RaceEvent {
    /// A contestant registered.
    Registered {
        /// New contestant token.
        id: ContestantId,
        /// Chosen group.
        group: Group,
    },
    /// The race clock started.
    Started {
        /// Wall-clock start.
        started_at_ms: WallMs,
    },
    /// A first finish scan stored a time.
    Finished {
        /// Contestant token.
        id: ContestantId,
        /// Recorded elapsed time.
        finish_time: Duration,
    },
    /// Everything was cleared.
    Reset {
        /// Generation now in effect.
        generation: Generation,
        /// Contestants dropped.
        cleared: usize,
    },
}
