//! Contestant record and registration draft types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ContestantId, Group, WallMs};

/// Authoritative contestant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    /// Token printed on the contestant's scannable code.
    pub id: ContestantId,
    /// Display name, trimmed.
    pub name: String,
    /// Contact phone, if one was given.
    pub phone: Option<String>,
    /// Start group.
    pub group: Group,
    /// Elapsed time from race start, set once by the first finish scan.
    pub finish_time: Option<Duration>,
    /// Registration wall-clock time.
    pub registered_at_ms: WallMs,
}

impl Contestant {
    /// True once a finish time has been recorded.
    pub fn is_finished(&self) -> bool {
        self.finish_time.is_some()
    }
}

/// Registration payload used to create a new [`Contestant`].
///
/// Fields arrive as typed by the user; the store trims and validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Start group.
    pub group: Group,
}

impl Registration {
    /// Builds a registration without a phone number.
    pub fn new(name: impl Into<String>, group: Group) -> Self {
        Self {
            name: name.into(),
            phone: None,
            group,
        }
    }

    /// Attaches a phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}
