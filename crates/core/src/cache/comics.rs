//! Comic record CRUD operations and bounded eviction.
//!
//! One row per strip, keyed by canonical date. Rows carry the scraped
//! page fields plus derived navigation dates, and a `last_used`
//! timestamp that drives both freshness checks and LRU eviction.
//!
//! Dates are stored as `YYYY-MM-DD` TEXT and timestamps as fixed-width
//! RFC 3339 TEXT, so lexicographic comparison in SQL is chronological.

use super::connection::CacheDb;
use crate::Error;
use crate::dates::URL_DATE_FMT;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached, fully resolved strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ComicRecord {
    /// Canonical date the strip is stored under.
    pub comic_date: NaiveDate,
    /// Last access or refresh time.
    pub last_used: DateTime<Utc>,
    /// Date scraped from the page itself; always equals `comic_date`.
    pub actual_date: NaiveDate,
    /// Display date as printed on the page, e.g. `Sunday April 28, 2019`.
    pub date_str: String,
    /// Strip image URL.
    pub img_url: String,
    /// Strip title; empty when the strip has none.
    pub title: String,
    /// Previous strip date, clamped to the first published strip.
    pub left_date: NaiveDate,
    /// Next strip date, clamped to the latest published strip.
    pub right_date: NaiveDate,
    /// Latest published date observed when this row was written.
    pub latest_date: NaiveDate,
}

impl ComicRecord {
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            comic_date: parse_date_col(0, &row.get::<_, String>(0)?)?,
            last_used: parse_timestamp_col(1, &row.get::<_, String>(1)?)?,
            actual_date: parse_date_col(2, &row.get::<_, String>(2)?)?,
            date_str: row.get(3)?,
            img_url: row.get(4)?,
            title: row.get(5)?,
            left_date: parse_date_col(6, &row.get::<_, String>(6)?)?,
            right_date: parse_date_col(7, &row.get::<_, String>(7)?)?,
            latest_date: parse_date_col(8, &row.get::<_, String>(8)?)?,
        })
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format(URL_DATE_FMT).to_string()
}

fn parse_date_col(idx: usize, text: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(text, URL_DATE_FMT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn timestamp_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp_col(idx: usize, text: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

impl CacheDb {
    /// Get the cached strip for a date.
    ///
    /// Returns None if the date has no entry.
    pub async fn get_comic(&self, date: NaiveDate) -> Result<Option<ComicRecord>, Error> {
        let key = date_text(date);
        self.conn
            .call(move |conn| -> Result<Option<ComicRecord>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT
                        comic_date, last_used, actual_date, date_str, img_url, title,
                        left_date, right_date, latest_date
                    FROM comics WHERE comic_date = ?1",
                )?;

                match stmt.query_row(params![key], ComicRecord::from_row) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Mark a strip as used at `now`.
    ///
    /// Timestamps share a fixed-width format, so the TEXT comparison in
    /// the guard is chronological; it keeps `last_used` monotonic when
    /// touches land out of order. Touching a missing date is a no-op.
    pub async fn touch_comic(&self, date: NaiveDate, now: DateTime<Utc>) -> Result<(), Error> {
        let key = date_text(date);
        let ts = timestamp_text(now);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "UPDATE comics SET last_used = ?2 WHERE comic_date = ?1 AND last_used < ?2",
                    params![key, ts],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or refresh a strip, then enforce the entry bound.
    ///
    /// Uses UPSERT semantics keyed on `comic_date`: inserting an existing
    /// date updates every other field in place. If the table then holds
    /// more than `cache_limit` rows, the rows with the oldest `last_used`
    /// are evicted until the bound holds again. Both steps run in one
    /// transaction on the connection's single worker thread, so a
    /// concurrent upsert cannot observe the cache above its bound.
    pub async fn upsert_comic(&self, record: &ComicRecord, cache_limit: usize) -> Result<(), Error> {
        let record = record.clone();
        let limit = cache_limit as i64;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO comics (
                        comic_date, last_used, actual_date, date_str, img_url, title,
                        left_date, right_date, latest_date
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(comic_date) DO UPDATE SET
                        last_used = excluded.last_used,
                        actual_date = excluded.actual_date,
                        date_str = excluded.date_str,
                        img_url = excluded.img_url,
                        title = excluded.title,
                        left_date = excluded.left_date,
                        right_date = excluded.right_date,
                        latest_date = excluded.latest_date",
                    params![
                        date_text(record.comic_date),
                        timestamp_text(record.last_used),
                        date_text(record.actual_date),
                        &record.date_str,
                        &record.img_url,
                        &record.title,
                        date_text(record.left_date),
                        date_text(record.right_date),
                        date_text(record.latest_date),
                    ],
                )?;

                let count: i64 = tx.query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))?;
                if count > limit {
                    // Ties on last_used break on comic_date so the eviction
                    // candidate is deterministic.
                    tx.execute(
                        "DELETE FROM comics WHERE comic_date IN (
                            SELECT comic_date FROM comics
                            ORDER BY last_used ASC, comic_date ASC
                            LIMIT ?1
                        )",
                        params![count - limit],
                    )?;
                }

                tx.commit().map_err(Error::from)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached strips.
    pub async fn count_comics(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge least-recently-used entries until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_lru_comics(&self, max_entries: usize) -> Result<u64, Error> {
        let max = max_entries as i64;
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM comics WHERE comic_date IN (
                        SELECT comic_date FROM comics
                        ORDER BY last_used ASC, comic_date ASC
                        LIMIT ?1
                    )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every cached strip.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_all_comics(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let deleted = conn.execute("DELETE FROM comics", [])?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DISPLAY_DATE_FMT;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, URL_DATE_FMT).unwrap()
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn make_record(date: &str, last_used: DateTime<Utc>) -> ComicRecord {
        let date = d(date);
        ComicRecord {
            comic_date: date,
            last_used,
            actual_date: date,
            date_str: date.format(DISPLAY_DATE_FMT).to_string(),
            img_url: format!("https://assets.example.com/strips/{date}.gif"),
            title: String::new(),
            left_date: date - chrono::Duration::days(1),
            right_date: date + chrono::Duration::days(1),
            latest_date: date,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get_roundtrip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let record = make_record("2019-04-28", ts(1000));

        db.upsert_comic(&record, 10).await.unwrap();

        let retrieved = db.get_comic(d("2019-04-28")).await.unwrap().unwrap();
        assert_eq!(retrieved, record);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get_comic(d("2019-04-28")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_updates_in_place() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_comic(&make_record("2019-04-28", ts(1000)), 10).await.unwrap();

        let mut updated = make_record("2019-04-28", ts(2000));
        updated.img_url = "https://assets.example.com/strips/replacement.gif".into();
        updated.title = "Rerun".into();
        db.upsert_comic(&updated, 10).await.unwrap();

        assert_eq!(db.count_comics().await.unwrap(), 1);
        let retrieved = db.get_comic(d("2019-04-28")).await.unwrap().unwrap();
        assert_eq!(retrieved.img_url, updated.img_url);
        assert_eq!(retrieved.title, "Rerun");
        assert_eq!(retrieved.last_used, ts(2000));
    }

    #[tokio::test]
    async fn test_upsert_enforces_entry_bound() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let dates = ["2019-04-01", "2019-04-02", "2019-04-03", "2019-04-04", "2019-04-05"];
        for (i, date) in dates.iter().enumerate() {
            db.upsert_comic(&make_record(date, ts(1000 + i as i64)), 3).await.unwrap();
        }

        assert_eq!(db.count_comics().await.unwrap(), 3);
        assert!(db.get_comic(d("2019-04-01")).await.unwrap().is_none());
        assert!(db.get_comic(d("2019-04-02")).await.unwrap().is_none());
        for date in &dates[2..] {
            assert!(db.get_comic(d(date)).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_eviction_picks_oldest_last_used_not_insertion_order() {
        let db = CacheDb::open_in_memory().await.unwrap();
        // Insertion order differs from last_used order on purpose.
        db.upsert_comic(&make_record("2019-04-10", ts(3000)), 3).await.unwrap();
        db.upsert_comic(&make_record("2019-04-11", ts(1000)), 3).await.unwrap();
        db.upsert_comic(&make_record("2019-04-12", ts(2000)), 3).await.unwrap();

        db.upsert_comic(&make_record("2019-04-13", ts(4000)), 3).await.unwrap();

        assert_eq!(db.count_comics().await.unwrap(), 3);
        assert!(db.get_comic(d("2019-04-11")).await.unwrap().is_none());
        for date in ["2019-04-10", "2019-04-12", "2019-04-13"] {
            let kept = db.get_comic(d(date)).await.unwrap().unwrap();
            assert!(kept.last_used > ts(1000));
        }
    }

    #[tokio::test]
    async fn test_touch_advances_last_used() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_comic(&make_record("2019-04-28", ts(1000)), 10).await.unwrap();

        db.touch_comic(d("2019-04-28"), ts(5000)).await.unwrap();

        let touched = db.get_comic(d("2019-04-28")).await.unwrap().unwrap();
        assert_eq!(touched.last_used, ts(5000));
    }

    #[tokio::test]
    async fn test_touch_never_moves_backwards() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_comic(&make_record("2019-04-28", ts(5000)), 10).await.unwrap();

        db.touch_comic(d("2019-04-28"), ts(1000)).await.unwrap();

        let untouched = db.get_comic(d("2019-04-28")).await.unwrap().unwrap();
        assert_eq!(untouched.last_used, ts(5000));
    }

    #[tokio::test]
    async fn test_touch_missing_date_is_noop() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.touch_comic(d("2019-04-28"), ts(1000)).await.unwrap();
        assert_eq!(db.count_comics().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_lru() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_comic(&make_record("2019-04-01", ts(1000)), 10).await.unwrap();
        db.upsert_comic(&make_record("2019-04-02", ts(2000)), 10).await.unwrap();

        let deleted = db.purge_lru_comics(1).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_comic(d("2019-04-01")).await.unwrap().is_none());
        assert!(db.get_comic(d("2019-04-02")).await.unwrap().is_some());

        let deleted = db.purge_lru_comics(10).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_purge_all() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.upsert_comic(&make_record("2019-04-01", ts(1000)), 10).await.unwrap();
        db.upsert_comic(&make_record("2019-04-02", ts(2000)), 10).await.unwrap();

        let deleted = db.purge_all_comics().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(db.count_comics().await.unwrap(), 0);
    }
}
