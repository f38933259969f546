//! Shared-password admin gate and the controls it unlocks.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    board::BoardSnapshot,
    config::RaceConfig,
    core::store::{ResetSummary, StartOutcome},
    runtime::handle::{RaceHandle, RuntimeError},
    scan::{ScanOutcome, TokenDecoder, scan_finish},
};

/// Refused admin logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No admin password is configured.
    #[error("admin access is disabled")]
    Disabled,
    /// Wrong password.
    #[error("wrong admin password")]
    Rejected,
}

/// Checks the single static admin password.
#[derive(Clone)]
pub struct AdminGate {
    password: Option<String>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("enabled", &self.password.is_some())
            .finish()
    }
}

impl AdminGate {
    /// Gate for `password`; `None` refuses everyone.
    pub fn new(password: Option<String>) -> Self {
        Self { password }
    }

    /// Gate configured from [`RaceConfig::admin_password`].
    pub fn from_config(config: &RaceConfig) -> Self {
        Self::new(config.admin_password.clone())
    }

    /// Checks `attempt` against the configured password.
    pub fn verify(&self, attempt: &str) -> Result<(), AuthError> {
        let Some(expected) = self.password.as_deref() else {
            warn!("admin login attempted while admin access is disabled");
            return Err(AuthError::Disabled);
        };
        if constant_time_eq(expected.as_bytes(), attempt.as_bytes()) {
            info!("admin login accepted");
            Ok(())
        } else {
            warn!("admin login rejected");
            Err(AuthError::Rejected)
        }
    }

    /// Verifies `attempt` and opens a console on `handle`.
    pub fn login(&self, attempt: &str, handle: &RaceHandle) -> Result<AdminConsole, AuthError> {
        self.verify(attempt)?;
        Ok(AdminConsole {
            handle: handle.clone(),
        })
    }
}

/// Byte comparison whose running time depends only on the longer input.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let diff = (0..a.len().max(b.len())).fold(a.len() ^ b.len(), |acc, i| {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        acc | usize::from(x ^ y)
    });
    diff == 0
}

/// Race controls available after a successful login.
#[derive(Clone)]
pub struct AdminConsole {
    handle: RaceHandle,
}

impl AdminConsole {
    /// Starts the race clock.
    pub async fn start_race(&self) -> Result<StartOutcome, RuntimeError> {
        self.handle.start_race().await
    }

    /// Drops every contestant and result.
    pub async fn reset_race(&self) -> Result<ResetSummary, RuntimeError> {
        self.handle.reset_race().await
    }

    /// Records a finish for a token typed or decoded elsewhere.
    pub async fn record_finish(&self, token: &str) -> Result<ScanOutcome, RuntimeError> {
        ScanOutcome::from_finish(self.handle.record_finish(token).await)
    }

    /// Decodes a capture and records the finish it names.
    pub async fn scan(&self, decoder: &dyn TokenDecoder, image: &[u8]) -> Result<ScanOutcome, RuntimeError> {
        scan_finish(&self.handle, decoder, image).await
    }

    /// Current leaderboard.
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.handle.snapshot()
    }
}
