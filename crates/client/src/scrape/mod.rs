//! Strip page field extraction.
//!
//! Pages are semi-structured HTML; the three fields we need are pulled
//! out with patterns matching the source's long-stable markup rather
//! than a full DOM parse. Image and display date are required and their
//! absence is a malformed page. The title is optional and defaults to
//! empty, since many strips are untitled.

use std::sync::LazyLock;

use regex::Regex;
use strips_core::Error;

static IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]*class="img-[^>]*src="([^"]+)"[^>]*>"#).expect("hardcoded pattern")
});

// The display date is split across two spans: weekday/month/day in the
// first, the copyright year in the second. itemProp casing has varied.
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<date class="comic-title-date" item[pP]rop="datePublished">[^<]*"#,
        r#"<span>([^<]*)</span>[^<]*"#,
        r#"<span item[pP]rop="copyrightYear">([^<]+)</span>"#,
    ))
    .expect("hardcoded pattern")
});

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="comic-title-name">([^<]+)</span>"#).expect("hardcoded pattern"));

/// Fields extracted from a strip page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedStrip {
    /// Strip image URL.
    pub img_url: String,
    /// Display date, the two span texts joined by a single space.
    pub date_str: String,
    /// Strip title; empty when the page has none.
    pub title: String,
}

/// Extract the image URL, display date, and title from a strip page.
pub fn scrape_strip(html: &str) -> Result<ScrapedStrip, Error> {
    let img_url = IMG_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::MalformedPage("no strip image matched".into()))?;

    let date_str = DATE_RE
        .captures(html)
        .map(|caps| format!("{} {}", &caps[1], &caps[2]))
        .ok_or_else(|| Error::MalformedPage("no publication date matched".into()))?;

    let title = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()))
        .unwrap_or_default();

    Ok(ScrapedStrip { img_url, date_str, title })
}

// Decodes the named and numeric entities that actually occur in titles.
// &amp; goes last so already-decoded sequences are not decoded twice.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
