//! Swiss-system tournament standings and round pairing over a pluggable store.
//!
//! # Examples
//!
//! In-memory usage with [`tournament::Tournament`]:
//! ```
//! use swisspair::tournament::Tournament;
//!
//! let mut t = Tournament::in_memory();
//! let a = t.register_player("Ada").expect("register");
//! let b = t.register_player("Bea").expect("register");
//! let c = t.register_player("Cal").expect("register");
//! let d = t.register_player("Dee").expect("register");
//!
//! t.report_match(a, b).expect("report");
//! t.report_match(c, d).expect("report");
//!
//! let pairs: Vec<_> = t
//!     .generate_pairings()
//!     .expect("pairings")
//!     .iter()
//!     .map(|p| p.ids())
//!     .collect();
//! assert_eq!(pairs, vec![(a, c), (b, d)]);
//! ```
//!
//! SQLite-backed usage:
//! ```no_run
//! use swisspair::tournament::Tournament;
//!
//! let mut t = Tournament::open("tournament.db").expect("open sqlite");
//! let id = t.register_player("Ada").expect("register");
//! for entry in t.compute_standings().expect("standings") {
//!     println!("{} {} {}/{}", entry.id, entry.name, entry.wins, entry.matches);
//! }
//! # let _ = id;
//! t.close().expect("close");
//! ```
#![deny(missing_docs)]

/// In-memory store backend.
pub mod core;
/// Standings aggregation and pairing generation.
pub mod engine;
/// Store contract and SQLite implementation.
pub mod persist;
/// Player, match record, standing, and pairing types.
pub mod player;
/// Tournament facade that owns a store.
pub mod tournament;
/// Shared primitive types and enums.
pub mod types;
