//! Single-writer async runtime, event stream and live views.

/// Event stream types emitted by the runtime.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
/// Contestant live-timer polling.
pub mod live;
