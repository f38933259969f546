//! Contestant live-timer view.
//!
//! A contestant's screen polls the published snapshot on a fixed interval,
//! shows the running race time, and freezes once its own finish appears.

use std::time::{Duration, Instant};

use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::{
    board::BoardSnapshot,
    format::{NOT_STARTED_DISPLAY, format_elapsed},
    types::ContestantId,
};

use super::handle::RaceHandle;

/// Where the contestant's timer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivePhase {
    /// Race clock not started.
    Waiting,
    /// Clock running, no finish yet.
    Running,
    /// Own finish recorded.
    Finished,
}

/// One rendered frame of the live timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveTick {
    /// Timer phase.
    pub phase: LivePhase,
    /// Elapsed time shown; `None` while waiting.
    pub elapsed: Option<Duration>,
    /// `MM:SS.CC` text to display.
    pub display: String,
}

/// Why a live view stopped polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveEnd {
    /// Own finish observed; carries the recorded time.
    Finished(Duration),
    /// Contestant is not part of the current generation.
    Removed,
    /// The race runtime shut down.
    Closed,
}

/// Frame for contestant `id` at `now`; `None` if not registered.
pub fn live_tick(board: &BoardSnapshot, id: &str, now: Instant) -> Option<LiveTick> {
    let row = board.row(id)?;
    let tick = if let Some(finish) = row.finish_time {
        LiveTick {
            phase: LivePhase::Finished,
            elapsed: Some(finish),
            display: format_elapsed(finish),
        }
    } else if let Some(elapsed) = board.elapsed_at(now) {
        LiveTick {
            phase: LivePhase::Running,
            elapsed: Some(elapsed),
            display: format_elapsed(elapsed),
        }
    } else {
        LiveTick {
            phase: LivePhase::Waiting,
            elapsed: None,
            display: NOT_STARTED_DISPLAY.to_string(),
        }
    };
    Some(tick)
}

/// Polls every [`RaceHandle::poll_interval`] and hands each frame to `on_tick`
/// until the contestant's finish is observed.
///
/// A reset that drops the contestant ends the loop with [`LiveEnd::Removed`].
pub async fn follow_contestant<F>(handle: &RaceHandle, id: &ContestantId, mut on_tick: F) -> LiveEnd
where
    F: FnMut(&LiveTick),
{
    let clock = handle.clock();
    let generation = handle.snapshot().generation;
    let mut interval = tokio::time::interval(handle.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let board = handle.snapshot();
        if board.generation != generation {
            debug!(%id, "live view ended by reset");
            return LiveEnd::Removed;
        }
        let Some(tick) = live_tick(&board, id.as_str(), clock.now()) else {
            debug!(%id, "live view for unknown contestant");
            return LiveEnd::Removed;
        };

        on_tick(&tick);

        if let (LivePhase::Finished, Some(finish)) = (tick.phase, tick.elapsed) {
            return LiveEnd::Finished(finish);
        }
        if handle.is_closed() {
            return LiveEnd::Closed;
        }
    }
}
