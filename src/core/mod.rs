//! In-memory authoritative store and token generation.

/// Random contestant tokens with a live-uniqueness check.
pub mod ids;
/// Authoritative race store.
pub mod store;
