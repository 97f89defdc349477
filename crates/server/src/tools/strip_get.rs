//! strip_get tool implementation.
//!
//! Resolves a date or `latest` to a strip record and renders the
//! navigation payload shared by all strip tools.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strips_client::Resolver;
use strips_core::{ComicRecord, Error};

/// Parameters for the strip_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StripGetParams {
    /// Strip date as YYYY-MM-DD, or the literal "latest".
    pub date: String,
}

/// A resolved strip as returned by the strip tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StripOutput {
    /// Canonical strip date.
    pub date: chrono::NaiveDate,
    /// Display date as printed on the source page.
    pub date_str: String,
    /// Strip image URL.
    pub img_url: String,
    /// Strip title; empty when the strip is untitled.
    pub title: String,
    /// Permalink to the strip page on the source.
    pub permalink: String,
    /// Previous strip date, for navigation.
    pub left_date: chrono::NaiveDate,
    /// Next strip date, for navigation.
    pub right_date: chrono::NaiveDate,
    /// Latest published strip date.
    pub latest_date: chrono::NaiveDate,
    /// Whether this is the first published strip.
    pub is_first: bool,
    /// Whether this is the latest published strip.
    pub is_latest: bool,
}

impl StripOutput {
    pub fn from_record(record: &ComicRecord, base_url: &str, first_date: chrono::NaiveDate) -> Self {
        Self {
            date: record.actual_date,
            date_str: record.date_str.clone(),
            img_url: record.img_url.clone(),
            title: record.title.clone(),
            permalink: format!("{base_url}{}", record.actual_date),
            left_date: record.left_date,
            right_date: record.right_date,
            latest_date: record.latest_date,
            is_first: record.actual_date == first_date,
            is_latest: record.actual_date == record.latest_date,
        }
    }
}

/// Render a resolved record as a tool result.
pub fn strip_result(
    record: &ComicRecord, base_url: &str, first_date: chrono::NaiveDate,
) -> Result<CallToolResult, McpError> {
    let output = StripOutput::from_record(record, base_url, first_date);
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the strip_get tool.
pub async fn get_impl(resolver: &Resolver, base_url: &str, params: StripGetParams) -> Result<CallToolResult, McpError> {
    if params.date.trim().is_empty() {
        return Err(Error::InvalidInput("date must not be empty".to_string()).into());
    }

    let record = resolver.resolve(&params.date).await?;
    strip_result(&record, base_url, resolver.config().first_date)
}
