//! cache_purge tool implementation.
//!
//! Purges cached strips entirely or trims down to a bound.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strips_core::{CacheDb, Error};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Delete every cached strip.
    pub all: Option<bool>,

    /// Keep only the most recently used N entries (LRU purge).
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let purge_all = params.all.unwrap_or(false);
    if !purge_all && params.max_entries.is_none() {
        return Err(Error::InvalidInput("Either all=true or max_entries must be specified".to_string()).into());
    }

    let mut deleted_total = 0u64;

    if purge_all {
        deleted_total += cache.purge_all_comics().await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += cache.purge_lru_comics(max_entries).await?;
    }

    let output = CachePurgeOutput { deleted: deleted_total };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{make_test_comic, parse_output};

    #[tokio::test]
    async fn test_purge_all() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-27", 1000), 10).await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-28", 2000), 10).await.unwrap();

        let params = CachePurgeParams { all: Some(true), max_entries: None };

        let result = purge_impl(&cache, params).await.unwrap();
        let output: CachePurgeOutput = parse_output(&result);
        assert_eq!(output.deleted, 2);
        assert_eq!(cache.count_comics().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_purge_lru_keeps_most_recent() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-27", 1000), 10).await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-28", 2000), 10).await.unwrap();

        let params = CachePurgeParams { all: None, max_entries: Some(1) };

        let result = purge_impl(&cache, params).await.unwrap();
        let output: CachePurgeOutput = parse_output(&result);
        assert_eq!(output.deleted, 1);

        let survivor = cache
            .get_comic(chrono::NaiveDate::from_ymd_opt(2019, 4, 28).unwrap())
            .await
            .unwrap();
        assert!(survivor.is_some());
    }

    #[tokio::test]
    async fn test_purge_no_params() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let params = CachePurgeParams { all: None, max_entries: None };

        let result = purge_impl(&cache, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_purge_all_false_without_bound() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let params = CachePurgeParams { all: Some(false), max_entries: None };

        let result = purge_impl(&cache, params).await;
        assert!(result.is_err());
    }
}
