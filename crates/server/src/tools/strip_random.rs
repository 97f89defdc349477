//! strip_random tool implementation.
//!
//! Picks a uniformly random date in the published range and resolves it.
//! Dates the source never published redirect to a nearby strip, so the
//! returned strip may differ from the picked date.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use strips_client::Resolver;
use strips_core::dates;

use super::strip_get::strip_result;

/// Implementation of the strip_random tool.
pub async fn random_impl(resolver: &Resolver, base_url: &str) -> Result<CallToolResult, McpError> {
    let first = resolver.config().first_date;
    let picked = dates::random_date_between(first, dates::today_utc());
    tracing::debug!("random strip pick: {picked}");

    let record = resolver.resolve(&picked.to_string()).await?;
    strip_result(&record, base_url, first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::StripOutput;
    use crate::tools::testing::{parse_output, test_resolver};

    #[tokio::test]
    async fn test_random_stays_in_published_range() {
        let today = dates::today_utc().to_string();
        let (resolver, _db) = test_resolver(&today).await;
        let first = resolver.config().first_date;

        for _ in 0..8 {
            let result = random_impl(&resolver, "https://dilbert.com/strip/").await.unwrap();
            let output: StripOutput = parse_output(&result);
            assert!(output.date >= first);
            assert!(output.date <= dates::today_utc());
        }
    }
}
