use std::{sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::{
    board::BoardSnapshot,
    clock::Clock,
    config::RaceConfig,
    contestant::{Contestant, Registration},
    core::store::{FinishError, FinishOutcome, RaceStore, ResetSummary, StartOutcome, StoreError},
    types::ContestantId,
};

use super::events::RaceEvent;

/// Failures surfaced through [`RaceHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Registration rejected by the store.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Finish scan rejected by the store.
    #[error(transparent)]
    Finish(#[from] FinishError),
    /// The writer task has stopped.
    #[error("race runtime is not running")]
    ChannelClosed,
}

/// Writer-loop tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Pending commands before callers wait.
    pub command_queue_bound: usize,
    /// Events buffered per subscriber before it lags.
    pub event_capacity: usize,
    /// Live-view poll period.
    pub poll_interval_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
            poll_interval_ms: 100,
        }
    }
}

/// Cloneable access to a race store owned by a single writer task.
///
/// Mutations are queued to the writer and applied one at a time. Reads go
/// through the last published [`BoardSnapshot`] and never wait on writers.
pub struct RaceHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<RaceEvent>,
    board_rx: watch::Receiver<Arc<BoardSnapshot>>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl Clone for RaceHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
            board_rx: self.board_rx.clone(),
            clock: Arc::clone(&self.clock),
            poll_interval: self.poll_interval,
        }
    }
}

enum Command {
    Register {
        reg: Registration,
        resp: oneshot::Sender<Result<ContestantId, RuntimeError>>,
    },
    Start {
        resp: oneshot::Sender<StartOutcome>,
    },
    Reset {
        resp: oneshot::Sender<ResetSummary>,
    },
    Finish {
        token: String,
        resp: oneshot::Sender<Result<FinishOutcome, RuntimeError>>,
    },
    Get {
        id: String,
        resp: oneshot::Sender<Option<Contestant>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` into a writer task on the current tokio runtime.
pub fn spawn_race(store: RaceStore, config: RuntimeConfig) -> RaceHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<RaceEvent>(config.event_capacity.max(1));
    let (board_tx, board_rx) = watch::channel(Arc::new(store.snapshot()));
    let clock = store.clock();

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &events_tx_loop, &board_tx) {
                break;
            }
        }
        debug!(generation = store.generation(), "race writer stopped");
    });

    RaceHandle {
        cmd_tx,
        events_tx,
        board_rx,
        clock,
        poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
    }
}

/// Builds a store from `config` and spawns its writer task.
pub fn spawn_configured(config: &RaceConfig) -> RaceHandle {
    spawn_race(
        RaceStore::from_policy(config.registration.clone()),
        config.runtime.clone(),
    )
}

impl RaceHandle {
    /// Pushed race events.
    pub fn subscribe(&self) -> broadcast::Receiver<RaceEvent> {
        self.events_tx.subscribe()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn watch_board(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.board_rx.clone()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.board_rx.borrow().clone()
    }

    /// Time source shared with the store.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Live-view poll period.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// True once the writer task has stopped.
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    /// Registers a contestant and returns its token.
    pub async fn register(&self, reg: Registration) -> Result<ContestantId, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Register { reg, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Starts the race clock; a second call leaves the first start in place.
    pub async fn start_race(&self) -> Result<StartOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Clears every contestant and stops the clock.
    pub async fn reset_race(&self) -> Result<ResetSummary, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Reset { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Records a finish scan for `token`.
    pub async fn record_finish(&self, token: impl Into<String>) -> Result<FinishOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Finish {
                token: token.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Reads one contestant through the writer.
    pub async fn get(&self, id: impl Into<String>) -> Result<Option<Contestant>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Get { id: id.into(), resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the writer task. State is dropped with it.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    store: &mut RaceStore,
    events_tx: &broadcast::Sender<RaceEvent>,
    board_tx: &watch::Sender<Arc<BoardSnapshot>>,
) -> bool {
    match cmd {
        Command::Register { reg, resp } => {
            let group = reg.group;
            let res = store.register(reg).map_err(RuntimeError::from);
            match &res {
                Ok(id) => {
                    info!(%id, %group, "contestant registered");
                    publish(store, board_tx);
                    let _ = events_tx.send(RaceEvent::Registered { id: id.clone(), group });
                }
                Err(err) => debug!(%err, "registration rejected"),
            }
            let _ = resp.send(res);
        }
        Command::Start { resp } => {
            let out = store.start_race();
            match out {
                StartOutcome::Started(start) => {
                    info!(started_at_ms = start.wall_ms, "race started");
                    publish(store, board_tx);
                    let _ = events_tx.send(RaceEvent::Started {
                        started_at_ms: start.wall_ms,
                    });
                }
                StartOutcome::AlreadyRunning(start) => {
                    debug!(started_at_ms = start.wall_ms, "start ignored, race already running");
                }
            }
            let _ = resp.send(out);
        }
        Command::Reset { resp } => {
            let summary = store.reset_race();
            warn!(
                cleared = summary.cleared,
                generation = summary.generation,
                "race reset, all results dropped"
            );
            publish(store, board_tx);
            let _ = events_tx.send(RaceEvent::Reset {
                generation: summary.generation,
                cleared: summary.cleared,
            });
            let _ = resp.send(summary);
        }
        Command::Finish { token, resp } => {
            let res = store.record_finish(&token).map_err(RuntimeError::from);
            match &res {
                Ok(FinishOutcome::Recorded(rec)) => {
                    info!(id = %rec.id, elapsed_ms = rec.finish_time.as_millis() as u64, "finish recorded");
                    publish(store, board_tx);
                    let _ = events_tx.send(RaceEvent::Finished {
                        id: rec.id.clone(),
                        finish_time: rec.finish_time,
                    });
                }
                Ok(FinishOutcome::AlreadyFinished(rec)) => {
                    debug!(id = %rec.id, "repeat finish scan");
                }
                Err(err) => warn!(%err, token = %token.trim(), "finish scan rejected"),
            }
            let _ = resp.send(res);
        }
        Command::Get { id, resp } => {
            let _ = resp.send(store.get_cloned(&id));
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn publish(store: &RaceStore, board_tx: &watch::Sender<Arc<BoardSnapshot>>) {
    board_tx.send_replace(Arc::new(store.snapshot()));
}
