//! Ranking and round-pairing computations.

/// Adjacent-pair generation over ranked standings.
pub mod pairing;
/// Aggregation of match records into ranked standings.
pub mod standings;
