//! Cache maintenance tools.
//!
//! This module provides tools for inspecting and pruning the SQLite cache.

pub mod purge;
pub mod stats;

pub use purge::{CachePurgeOutput, CachePurgeParams, purge_impl};
pub use stats::{CacheStatsOutput, stats_impl};
