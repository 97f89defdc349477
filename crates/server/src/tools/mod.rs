//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-strips server.
#![allow(unused_imports)]

pub mod cache;
pub mod strip_get;
pub mod strip_latest;
pub mod strip_random;

pub use cache::{CachePurgeOutput, CachePurgeParams, CacheStatsOutput};
pub use strip_get::{StripGetParams, StripOutput};
