//! strip_latest tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use strips_client::Resolver;

use super::strip_get::strip_result;

/// Implementation of the strip_latest tool.
pub async fn latest_impl(resolver: &Resolver, base_url: &str) -> Result<CallToolResult, McpError> {
    let record = resolver.resolve_latest().await?;
    strip_result(&record, base_url, resolver.config().first_date)
}
