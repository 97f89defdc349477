//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use strips_client::Resolver;
use strips_core::{AppConfig, CacheDb};

use crate::tools::{CachePurgeParams, StripGetParams, cache, strip_get, strip_latest, strip_random};

/// The main MCP server handler for mcp-strips.
#[derive(Clone)]
pub struct StripsServer {
    config: Arc<AppConfig>,
    db: CacheDb,
    resolver: Arc<Resolver>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl StripsServer {
    /// Create a new server handler.
    pub fn new(config: AppConfig, db: CacheDb, resolver: Resolver) -> Self {
        Self { config: Arc::new(config), db, resolver: Arc::new(resolver), tool_router: Self::tool_router() }
    }

    /// Resolve one strip by date or `latest`.
    ///
    /// Served from the cache when fresh; otherwise fetched, scraped, and cached.
    #[tool(
        description = "Resolve the strip for a date (YYYY-MM-DD) or \"latest\". Returns the image URL, title, display date, and neighboring dates for navigation."
    )]
    async fn strip_get(&self, params: Parameters<StripGetParams>) -> Result<CallToolResult, McpError> {
        strip_get::get_impl(&self.resolver, &self.config.base_url, params.0).await
    }

    #[tool(description = "Resolve the most recently published strip.")]
    async fn strip_latest(&self) -> Result<CallToolResult, McpError> {
        strip_latest::latest_impl(&self.resolver, &self.config.base_url).await
    }

    #[tool(description = "Resolve a uniformly random strip from the published range.")]
    async fn strip_random(&self) -> Result<CallToolResult, McpError> {
        strip_random::random_impl(&self.resolver, &self.config.base_url).await
    }

    #[tool(description = "Report the number of cached strips and the configured bound.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        cache::stats_impl(&self.db, self.config.cache_limit).await
    }

    #[tool(
        description = "Purge cached strips: all=true clears everything, max_entries trims to the most recently used N."
    )]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        cache::purge_impl(&self.db, params.0).await
    }
}

impl ServerHandler for StripsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-strips".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
