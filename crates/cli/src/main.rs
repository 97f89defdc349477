//! One-shot strip resolver.
//!
//! Resolves a single strip through the same cache and engine as the
//! server, then prints the record as JSON on stdout. Diagnostics go to
//! stderr. Configuration comes from the usual STRIPS_* environment.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use strips_client::fetch::{FetchClient, FetchConfig};
use strips_client::resolve::{Resolver, ResolverConfig};
use strips_core::dates;
use strips_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

/// Resolve a comic strip by date and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "strips", version, about)]
struct Cli {
    /// Strip to resolve: a YYYY-MM-DD date, "latest", or "random".
    #[arg(default_value = "latest")]
    strip: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let db = CacheDb::open(&config.db_path).await?;
    let fetcher = FetchClient::new(FetchConfig {
        base_url: config.base_url.clone(),
        user_agent: config.user_agent.clone(),
        timeout: config.timeout(),
        max_redirects: config.max_redirects,
    })?;
    let resolver = Resolver::new(db, Arc::new(fetcher), ResolverConfig::from_app(&config));

    let identifier = if cli.strip == "random" {
        let picked = dates::random_date_between(config.first_date, dates::today_utc());
        tracing::debug!("random strip pick: {picked}");
        picked.to_string()
    } else {
        cli.strip
    };

    let record = resolver.resolve(&identifier).await?;
    let output = serde_json::json!({
        "date": record.actual_date,
        "date_str": record.date_str,
        "img_url": record.img_url,
        "title": record.title,
        "permalink": format!("{}{}", config.base_url, record.actual_date),
        "left_date": record.left_date,
        "right_date": record.right_date,
        "latest_date": record.latest_date,
        "is_first": record.actual_date == config.first_date,
        "is_latest": record.actual_date == record.latest_date,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
