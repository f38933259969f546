//! In-memory race-timing registry with at-most-once finish recording.
//!
//! # Examples
//!
//! Direct use of [`core::store::RaceStore`]:
//! ```
//! use racetime::{
//!     contestant::Registration,
//!     core::store::{FinishError, RaceStore},
//!     types::Group,
//! };
//!
//! let mut store = RaceStore::new();
//! let group = Group::new(1).expect("group");
//! let id = store
//!     .register(Registration::new("Alice", group).with_phone("5550100"))
//!     .expect("register");
//! assert_eq!(store.record_finish(id.as_str()), Err(FinishError::RaceNotStarted));
//!
//! store.start_race();
//! let outcome = store.record_finish(id.as_str()).expect("finish");
//! assert!(outcome.is_recorded());
//! assert_eq!(store.snapshot().rows[0].rank, Some(1));
//! ```
//!
//! Shared use through the single-writer runtime:
//! ```no_run
//! use racetime::{
//!     contestant::Registration,
//!     core::store::RaceStore,
//!     runtime::handle::{spawn_race, RuntimeConfig},
//!     types::Group,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_race(RaceStore::new(), RuntimeConfig::default());
//! let id = handle
//!     .register(Registration::new("Bob", Group::new(2).expect("group")).with_phone("5550101"))
//!     .await
//!     .expect("register");
//! handle.start_race().await.expect("start");
//! let _ = handle.record_finish(id.as_str()).await;
//! println!("{:?}", handle.snapshot().rows);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Admin password gate and race controls.
pub mod admin;
/// Leaderboard rows and snapshots.
pub mod board;
/// Monotonic and wall-clock time sources.
pub mod clock;
/// Deployment configuration.
pub mod config;
/// Contestant records and registration drafts.
pub mod contestant;
/// Core in-memory store and token generation.
pub mod core;
/// Race time text rendering.
pub mod format;
/// Single-writer runtime handle, events and live views.
pub mod runtime;
/// Finish-line scan pipeline.
pub mod scan;
/// Shared primitive types.
pub mod types;
