//! Strip resolution: normalize, consult the cache, fetch on a miss.
//!
//! A request identifier normalizes to a single date key. A fresh cache
//! row answers the request outright; otherwise the target page and the
//! latest-date probe are fetched concurrently, the page fields are
//! scraped, navigation dates derived, and the row persisted under the
//! date the page itself reports. That page date is authoritative: when
//! the source redirects a request elsewhere, the row lands under the
//! redirect target, not under the requested key.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use strips_core::config::{AppConfig, InvalidDatePolicy};
use strips_core::dates::{self, DateSpec};
use strips_core::{CacheDb, ComicRecord, Error};

use crate::fetch::StripFetcher;
use crate::scrape;

/// Resolution knobs, usually derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Date of the first published strip.
    pub first_date: NaiveDate,
    /// How long a cached row stays fresh.
    pub cache_refresh: chrono::Duration,
    /// Maximum number of cached rows.
    pub cache_limit: usize,
    /// Policy for identifiers that fail to parse.
    pub on_invalid: InvalidDatePolicy,
}

impl ResolverConfig {
    pub fn from_app(config: &AppConfig) -> Self {
        Self {
            first_date: config.first_date,
            cache_refresh: config.cache_refresh(),
            cache_limit: config.cache_limit,
            on_invalid: config.on_invalid,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::from_app(&AppConfig::default())
    }
}

/// Resolves strip identifiers to cached records.
pub struct Resolver {
    db: CacheDb,
    fetcher: Arc<dyn StripFetcher>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(db: CacheDb, fetcher: Arc<dyn StripFetcher>, config: ResolverConfig) -> Self {
        Self { db, fetcher, config }
    }

    /// Get reference to the resolution configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve an identifier (`YYYY-MM-DD` or `latest`) to a strip record.
    ///
    /// Out-of-range dates clamp to the published range. An unparseable
    /// identifier is an error under [`InvalidDatePolicy::Reject`] and a
    /// latest request under [`InvalidDatePolicy::Latest`].
    pub async fn resolve(&self, identifier: &str) -> Result<ComicRecord, Error> {
        let spec = match DateSpec::parse(identifier) {
            Ok(spec) => spec,
            Err(err) => match self.config.on_invalid {
                InvalidDatePolicy::Reject => return Err(err),
                InvalidDatePolicy::Latest => {
                    tracing::warn!("invalid identifier {identifier:?}, resolving the latest strip instead");
                    DateSpec::Latest
                }
            },
        };
        self.resolve_spec(spec).await
    }

    /// Resolve the most recent published strip.
    pub async fn resolve_latest(&self) -> Result<ComicRecord, Error> {
        self.resolve_spec(DateSpec::Latest).await
    }

    async fn resolve_spec(&self, spec: DateSpec) -> Result<ComicRecord, Error> {
        let today = dates::today_utc();
        let (key, is_latest) = spec.normalize(self.config.first_date, today);
        let now = Utc::now();

        if let Some(entry) = self.db.get_comic(key).await? {
            if now.signed_duration_since(entry.last_used) < self.config.cache_refresh {
                tracing::debug!("cache hit for {key}");
                self.db.touch_comic(key, now).await?;
                return Ok(entry);
            }
            tracing::debug!("cache entry for {key} is stale, refreshing");
        }

        let (mut html, probed_latest) = self.fetcher.fetch_with_probe(key).await?;
        if is_latest && probed_latest != key {
            // The concurrent fetch targeted today's placeholder; the probe
            // says the newest strip lives at another date.
            tracing::debug!("latest strip is {probed_latest}, refetching past placeholder {key}");
            html = self.fetcher.fetch_strip(probed_latest).await?;
        }

        let scraped = scrape::scrape_strip(&html)?;
        let actual_date = dates::parse_display_date(&scraped.date_str)?;
        // A page dated past the probe result means a strip was published
        // mid-request; the page wins.
        let latest_date = probed_latest.max(actual_date);
        let (left_date, right_date) = dates::neighbors(actual_date, self.config.first_date, latest_date);

        let record = ComicRecord {
            comic_date: actual_date,
            last_used: Utc::now(),
            actual_date,
            date_str: scraped.date_str,
            img_url: scraped.img_url,
            title: scraped.title,
            left_date,
            right_date,
            latest_date,
        };
        self.db.upsert_comic(&record, self.config.cache_limit).await?;

        tracing::info!("resolved strip {actual_date} (latest {latest_date})");
        Ok(record)
    }
}
