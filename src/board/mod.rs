//! Leaderboard rows and the consistent race snapshot handed to readers.

/// Sorting and row construction.
pub mod projector;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::types::{ContestantId, Generation, Group, WallMs};

/// Display status of a leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// A finish time is recorded.
    Finished,
    /// Still running, or the race has not started.
    InProgress,
}

impl RowStatus {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            RowStatus::Finished => "finished",
            RowStatus::InProgress => "in progress or not started",
        }
    }
}

/// One contestant as shown on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    /// 1-based place among finishers; `None` while unfinished.
    pub rank: Option<usize>,
    /// Contestant token.
    pub id: ContestantId,
    /// Display name.
    pub name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Start group.
    pub group: Group,
    /// Recorded elapsed time.
    pub finish_time: Option<Duration>,
    /// `MM:SS.CC`, or the unfinished sentinel.
    pub time: String,
    /// Derived display status.
    pub status: RowStatus,
}

/// Point-in-time view of the whole race.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Reset counter the rows belong to.
    pub generation: Generation,
    /// Whether the race clock is running.
    pub running: bool,
    /// Wall-clock race start.
    pub started_at_ms: Option<WallMs>,
    /// Monotonic race start, for live elapsed displays.
    #[serde(skip)]
    pub started_at: Option<Instant>,
    /// Finishers fastest first, then everyone else in registration order.
    pub rows: Vec<LeaderboardRow>,
}

impl BoardSnapshot {
    /// Row for `id`, if registered.
    pub fn row(&self, id: &str) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|r| r.id.as_str() == id)
    }

    /// Number of rows with a finish time.
    pub fn finished_count(&self) -> usize {
        self.rows.iter().take_while(|r| r.finish_time.is_some()).count()
    }

    /// True when no contestant is registered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Elapsed race time at `now`; `None` before the start.
    pub fn elapsed_at(&self, now: Instant) -> Option<Duration> {
        self.started_at.map(|start| now.saturating_duration_since(start))
    }
}
