//! SQLite-backed cache for resolved comic strips.
//!
//! This module provides a persistent, date-keyed cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - One row per strip, keyed by canonical date
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - A hard entry bound enforced by LRU eviction

pub mod comics;
pub mod connection;
pub mod migrations;

pub use crate::Error;

pub use comics::ComicRecord;
pub use connection::CacheDb;
