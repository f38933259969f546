use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use hashbrown::HashMap;

use crate::{
    board::{BoardSnapshot, projector},
    clock::{Clock, SystemClock},
    config::RegistrationPolicy,
    contestant::{Contestant, Registration},
    types::{ContestantId, Generation, Group, WallMs},
};

use super::ids::IdGenerator;

/// Registration input that fails policy checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Name empty after trimming.
    #[error("name is required")]
    MissingName,
    /// Phone required by policy but absent or blank.
    #[error("phone number is required")]
    MissingPhone,
    /// Group outside `1..=group_count`.
    #[error("unknown group {0}")]
    UnknownGroup(Group),
}

/// Failures of `register`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Input rejected; nothing was stored.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Every token in the id space belongs to a live contestant.
    #[error("all {capacity} contestant ids are in use")]
    IdSpaceExhausted {
        /// Size of the id space.
        capacity: u64,
    },
}

/// Finish scans that record nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinishError {
    /// No live contestant carries this token.
    #[error("no contestant with id {0}")]
    InvalidId(ContestantId),
    /// The race clock has not been started.
    #[error("race has not started")]
    RaceNotStarted,
}

/// Identity and time carried by a finish outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishRecord {
    /// Contestant token.
    pub id: ContestantId,
    /// Contestant name.
    pub name: String,
    /// Elapsed time from race start.
    pub finish_time: Duration,
}

/// Successful finish scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// First scan; the time was stored now.
    Recorded(FinishRecord),
    /// Repeat scan; carries the time stored earlier, unchanged.
    AlreadyFinished(FinishRecord),
}

impl FinishOutcome {
    /// The record regardless of variant.
    pub fn record(&self) -> &FinishRecord {
        match self {
            FinishOutcome::Recorded(r) | FinishOutcome::AlreadyFinished(r) => r,
        }
    }

    /// True only for the scan that stored the time.
    pub fn is_recorded(&self) -> bool {
        matches!(self, FinishOutcome::Recorded(_))
    }
}

/// Moment the race clock started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceStart {
    /// Monotonic start, the origin of every finish time.
    pub at: Instant,
    /// Wall-clock start, for display.
    pub wall_ms: WallMs,
}

/// Result of `start_race`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The clock started now.
    Started(RaceStart),
    /// The clock was already running; nothing changed.
    AlreadyRunning(RaceStart),
}

impl StartOutcome {
    /// The start in effect after the call.
    pub fn start(&self) -> RaceStart {
        match self {
            StartOutcome::Started(s) | StartOutcome::AlreadyRunning(s) => *s,
        }
    }
}

/// Result of `reset_race`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSummary {
    /// Contestants dropped.
    pub cleared: usize,
    /// Generation now in effect.
    pub generation: Generation,
}

/// Authoritative race state: contestants plus the race clock.
///
/// All mutation goes through `&mut self`; share it across tasks through
/// [`crate::runtime::handle::RaceHandle`].
pub struct RaceStore {
    contestants: HashMap<ContestantId, Contestant>,
    order: Vec<ContestantId>,
    started: Option<RaceStart>,
    generation: Generation,
    ids: IdGenerator,
    policy: RegistrationPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaceStore")
            .field("contestants", &self.contestants.len())
            .field("started", &self.started)
            .field("generation", &self.generation)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Default for RaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceStore {
    /// Store with the default policy and the system clock.
    pub fn new() -> Self {
        Self::from_policy(RegistrationPolicy::default())
    }

    /// Store with the given policy and the system clock.
    pub fn from_policy(policy: RegistrationPolicy) -> Self {
        Self {
            contestants: HashMap::new(),
            order: Vec::new(),
            started: None,
            generation: 0,
            ids: IdGenerator::new(policy.id_digits, policy.id_max_attempts),
            policy,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the token generator, e.g. with a seeded one.
    pub fn with_id_generator(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// Shared handle to the store's time source.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Registration rules in force.
    pub fn policy(&self) -> &RegistrationPolicy {
        &self.policy
    }

    /// Validates `reg`, assigns a fresh token and stores the contestant.
    pub fn register(&mut self, reg: Registration) -> Result<ContestantId, StoreError> {
        let name = reg.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName.into());
        }

        let phone = reg
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        if self.policy.phone_required && phone.is_none() {
            return Err(ValidationError::MissingPhone.into());
        }

        if reg.group.number() > self.policy.group_count {
            return Err(ValidationError::UnknownGroup(reg.group).into());
        }

        let contestants = &self.contestants;
        let id = self
            .ids
            .generate(|candidate| contestants.contains_key(candidate))
            .ok_or(StoreError::IdSpaceExhausted {
                capacity: self.ids.capacity(),
            })?;

        let contestant = Contestant {
            id: id.clone(),
            name: name.to_string(),
            phone,
            group: reg.group,
            finish_time: None,
            registered_at_ms: self.clock.wall_ms(),
        };
        self.contestants.insert(id.clone(), contestant);
        self.order.push(id.clone());
        Ok(id)
    }

    /// Starts the race clock unless it is already running.
    pub fn start_race(&mut self) -> StartOutcome {
        if let Some(start) = self.started {
            return StartOutcome::AlreadyRunning(start);
        }
        let start = RaceStart {
            at: self.clock.now(),
            wall_ms: self.clock.wall_ms(),
        };
        self.started = Some(start);
        StartOutcome::Started(start)
    }

    /// Drops every contestant and stops the clock. Irreversible.
    pub fn reset_race(&mut self) -> ResetSummary {
        let cleared = self.contestants.len();
        self.contestants.clear();
        self.order.clear();
        self.started = None;
        self.generation += 1;
        ResetSummary {
            cleared,
            generation: self.generation,
        }
    }

    /// Records the finish for `token` at most once.
    ///
    /// Surrounding whitespace in `token` is ignored.
    pub fn record_finish(&mut self, token: &str) -> Result<FinishOutcome, FinishError> {
        let token = token.trim();
        let rec = self
            .contestants
            .get_mut(token)
            .ok_or_else(|| FinishError::InvalidId(ContestantId::from(token)))?;
        let start = self.started.ok_or(FinishError::RaceNotStarted)?;

        if let Some(finish_time) = rec.finish_time {
            return Ok(FinishOutcome::AlreadyFinished(FinishRecord {
                id: rec.id.clone(),
                name: rec.name.clone(),
                finish_time,
            }));
        }

        let finish_time = self.clock.now().saturating_duration_since(start.at);
        rec.finish_time = Some(finish_time);
        Ok(FinishOutcome::Recorded(FinishRecord {
            id: rec.id.clone(),
            name: rec.name.clone(),
            finish_time,
        }))
    }

    /// Consistent leaderboard view of the current generation.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            generation: self.generation,
            running: self.is_running(),
            started_at_ms: self.started.map(|s| s.wall_ms),
            started_at: self.started.map(|s| s.at),
            rows: projector::project(self.registered()),
        }
    }

    /// Contestants in registration order.
    pub fn registered(&self) -> impl Iterator<Item = &Contestant> {
        self.order.iter().filter_map(|id| self.contestants.get(id))
    }

    /// Looks up one contestant.
    pub fn get(&self, id: &str) -> Option<&Contestant> {
        self.contestants.get(id)
    }

    /// Cloned lookup.
    pub fn get_cloned(&self, id: &str) -> Option<Contestant> {
        self.get(id).cloned()
    }

    /// True while the race clock runs.
    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Start in effect, if running.
    pub fn started(&self) -> Option<RaceStart> {
        self.started
    }

    /// Reset counter.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Registered contestant count.
    pub fn len(&self) -> usize {
        self.contestants.len()
    }

    /// True with no contestants registered.
    pub fn is_empty(&self) -> bool {
        self.contestants.is_empty()
    }
}
