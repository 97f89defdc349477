//! Client code for strips-mcp.
//!
//! This crate provides the strip page fetcher with its latest-date
//! probe, page field extraction, and the resolution engine shared by
//! the server and CLI.

pub mod fetch;
pub mod resolve;
pub mod scrape;

pub use fetch::{FetchClient, FetchConfig, StripFetcher};
pub use resolve::{Resolver, ResolverConfig};
pub use scrape::{ScrapedStrip, scrape_strip};
