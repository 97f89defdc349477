//! cache_stats tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strips_core::{CacheDb, Error};

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsOutput {
    /// Number of cached strips.
    pub entries: u64,
    /// Configured entry bound.
    pub limit: u64,
}

/// Implementation of the cache_stats tool.
pub async fn stats_impl(cache: &CacheDb, cache_limit: usize) -> Result<CallToolResult, McpError> {
    let entries = cache.count_comics().await?;

    let output = CacheStatsOutput { entries, limit: cache_limit as u64 };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{make_test_comic, parse_output};

    #[tokio::test]
    async fn test_stats_empty_cache() {
        let cache = CacheDb::open_in_memory().await.unwrap();

        let result = stats_impl(&cache, 9000).await.unwrap();
        let output: CacheStatsOutput = parse_output(&result);

        assert_eq!(output.entries, 0);
        assert_eq!(output.limit, 9000);
    }

    #[tokio::test]
    async fn test_stats_counts_entries() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-27", 1000), 10).await.unwrap();
        cache.upsert_comic(&make_test_comic("2019-04-28", 2000), 10).await.unwrap();

        let result = stats_impl(&cache, 10).await.unwrap();
        let output: CacheStatsOutput = parse_output(&result);

        assert_eq!(output.entries, 2);
    }
}
