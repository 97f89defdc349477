//! Core types and shared functionality for strips-mcp.
//!
//! This crate provides:
//! - Comic cache implementation with SQLite backend
//! - Date parsing, normalization, and neighbor derivation
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod dates;
pub mod error;

pub use cache::{CacheDb, ComicRecord};
pub use config::AppConfig;
pub use error::Error;
