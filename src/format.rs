//! `MM:SS.CC` rendering for race times.

use std::time::Duration;

/// Shown where no finish time exists yet.
pub const UNFINISHED_DISPLAY: &str = "--:--.--";
/// Shown by live timers before the race clock starts.
pub const NOT_STARTED_DISPLAY: &str = "00:00.00";

/// Renders `elapsed` as zero-padded `MM:SS.CC`, truncating below a centisecond.
///
/// Minutes keep counting past 59 and widen beyond two digits if needed.
pub fn format_elapsed(elapsed: Duration) -> String {
    let centis = elapsed.as_millis() / 10;
    let minutes = centis / 6_000;
    let seconds = (centis / 100) % 60;
    let cc = centis % 100;
    format!("{minutes:02}:{seconds:02}.{cc:02}")
}

/// Renders a recorded finish, or [`UNFINISHED_DISPLAY`] when there is none.
pub fn format_finish(finish: Option<Duration>) -> String {
    match finish {
        Some(elapsed) => format_elapsed(elapsed),
        None => UNFINISHED_DISPLAY.to_string(),
    }
}

/// Renders fractional seconds; negative or non-finite input renders as zero.
pub fn format_seconds(secs: f64) -> String {
    format_elapsed(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
}
