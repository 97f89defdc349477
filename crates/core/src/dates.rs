//! Strip date handling.
//!
//! Strips are keyed by calendar date. Requests carry either a date in
//! `YYYY-MM-DD` form or the literal `latest`; both normalize to a single
//! date inside the published range before the cache or the network is
//! consulted. Source pages print the date in a long display form
//! (`Sunday April 28, 2019`), which parses back with [`parse_display_date`].

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, NaiveDate, Utc};

use crate::error::Error;

/// Date format used in strip URLs and as the cache key.
pub const URL_DATE_FMT: &str = "%Y-%m-%d";

/// Date format printed on strip pages.
pub const DISPLAY_DATE_FMT: &str = "%A %B %d, %Y";

/// Identifier that resolves to the most recent strip.
pub const LATEST: &str = "latest";

/// A parsed strip identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    /// The most recent published strip.
    Latest,
    /// A specific calendar date.
    Day(NaiveDate),
}

impl DateSpec {
    /// Parses an identifier: `latest` or a strict `YYYY-MM-DD` date.
    ///
    /// The date must round-trip exactly, so `2019-4-2`, padded variants,
    /// and trailing garbage are all rejected rather than silently accepted.
    pub fn parse(identifier: &str) -> Result<Self, Error> {
        let trimmed = identifier.trim();
        if trimmed == LATEST {
            return Ok(Self::Latest);
        }
        let date = NaiveDate::parse_from_str(trimmed, URL_DATE_FMT)
            .map_err(|_| Error::InvalidDate(identifier.to_string()))?;
        if date.format(URL_DATE_FMT).to_string() != trimmed {
            return Err(Error::InvalidDate(identifier.to_string()));
        }
        Ok(Self::Day(date))
    }

    /// Normalizes to a cache key inside `[first, today]`.
    ///
    /// Returns the key and whether this was a latest request. `Latest` maps
    /// to today's date, a placeholder that the resolver corrects once the
    /// true latest date is known.
    pub fn normalize(&self, first: NaiveDate, today: NaiveDate) -> (NaiveDate, bool) {
        match *self {
            Self::Latest => (today, true),
            Self::Day(date) => (date.max(first).min(today), false),
        }
    }
}

/// Current date in UTC. All range checks are against UTC, not local time.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parses the display date printed on a strip page.
///
/// Weekday and month names are accepted in full or abbreviated form, so
/// `Sun April 28, 2019` and `Sunday April 28, 2019` both parse. A weekday
/// that contradicts the rest of the date fails.
pub fn parse_display_date(text: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(text.trim(), DISPLAY_DATE_FMT)
        .map_err(|e| Error::MalformedPage(format!("unparseable display date {text:?}: {e}")))
}

/// Previous and next strip dates around `actual`, clamped to the
/// published range. At the boundaries the neighbor collapses onto the
/// boundary itself.
pub fn neighbors(actual: NaiveDate, first: NaiveDate, latest: NaiveDate) -> (NaiveDate, NaiveDate) {
    let left = (actual - Duration::days(1)).max(first);
    let right = (actual + Duration::days(1)).min(latest);
    (left, right)
}

/// Uniformly random date in `[first, last]`, seeded from the clock.
///
/// Statistical quality does not matter here; a strong RNG dependency is
/// not worth it for picking a strip.
pub fn random_date_between(first: NaiveDate, last: NaiveDate) -> NaiveDate {
    if last <= first {
        return first;
    }
    let span = (last - first).num_days() as u64 + 1;
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    first + Duration::days((pseudo_rand_u64(seed) % span) as i64)
}

// xorshift* step. Good enough for date picking, no state to carry.
fn pseudo_rand_u64(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}
