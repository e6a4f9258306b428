//! In-memory tournament store.

/// In-memory store backend and snapshot model.
pub mod store;
