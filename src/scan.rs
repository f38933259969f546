//! Finish-line scan pipeline: captured image to token to finish record.
//!
//! Image decoding lives outside the crate behind [`TokenDecoder`]. A capture
//! with no readable code never reaches the store, so the operator can tell
//! "no code found" apart from "code not registered".

use tracing::{debug, warn};

use crate::{
    core::store::{FinishError, FinishOutcome, FinishRecord},
    format::format_elapsed,
    runtime::handle::{RaceHandle, RuntimeError},
    types::ContestantId,
};

/// Extracts a token from captured image bytes.
pub trait TokenDecoder: Send + Sync {
    /// Decoded text, or `None` when no code is visible.
    fn decode(&self, image: &[u8]) -> Option<String>;
}

impl<F> TokenDecoder for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn decode(&self, image: &[u8]) -> Option<String> {
        self(image)
    }
}

/// Operator-facing result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Nothing decodable in the capture; the store was not consulted.
    NoCode,
    /// First scan for this contestant.
    Recorded(FinishRecord),
    /// Repeat scan; shows the time stored earlier.
    AlreadyFinished(FinishRecord),
    /// Token is not a registered contestant.
    InvalidId(ContestantId),
    /// The race clock has not started, nothing was recorded.
    RaceNotStarted,
}

impl ScanOutcome {
    /// Folds a finish result into an outcome; only a stopped runtime stays an error.
    pub fn from_finish(res: Result<FinishOutcome, RuntimeError>) -> Result<Self, RuntimeError> {
        match res {
            Ok(FinishOutcome::Recorded(rec)) => Ok(Self::Recorded(rec)),
            Ok(FinishOutcome::AlreadyFinished(rec)) => Ok(Self::AlreadyFinished(rec)),
            Err(RuntimeError::Finish(FinishError::InvalidId(id))) => Ok(Self::InvalidId(id)),
            Err(RuntimeError::Finish(FinishError::RaceNotStarted)) => Ok(Self::RaceNotStarted),
            Err(other) => Err(other),
        }
    }

    /// Short message for the scanning operator.
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::NoCode => "no code found, hold the code closer and retry".to_string(),
            ScanOutcome::Recorded(rec) => {
                format!("recorded: {} in {}", rec.name, format_elapsed(rec.finish_time))
            }
            ScanOutcome::AlreadyFinished(rec) => format!(
                "already recorded: {} in {}",
                rec.name,
                format_elapsed(rec.finish_time)
            ),
            ScanOutcome::InvalidId(_) => "invalid code".to_string(),
            ScanOutcome::RaceNotStarted => "race has not started, nothing recorded".to_string(),
        }
    }
}

/// Decodes `image` and, if a token is found, records the finish.
pub async fn scan_finish(
    handle: &RaceHandle,
    decoder: &dyn TokenDecoder,
    image: &[u8],
) -> Result<ScanOutcome, RuntimeError> {
    let token = decoder
        .decode(image)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        warn!(bytes = image.len(), "no code found in capture");
        return Ok(ScanOutcome::NoCode);
    };

    debug!(%token, "decoded finish token");
    ScanOutcome::from_finish(handle.record_finish(token).await)
}
