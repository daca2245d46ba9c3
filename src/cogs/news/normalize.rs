use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::warn;
use url::Url;

use super::api::{Article, RawResponse};
use crate::util::{clip, web_url};

/// Most articles shown for one command, however many the API returns.
pub const MAX_ARTICLES: usize = 15;

// discord's embed limits
const TITLE_LIMIT: usize = 256;
const AUTHOR_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;

/// One article, ready to be rendered as a card.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub title: String,
    pub body: String,
    pub image_url: Option<Url>,
    pub link: Option<Url>,
    pub byline: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub index: usize,
    pub total: usize,
}

impl DisplayItem {
    pub fn footer(&self) -> String {
        format!("Article {}/{}", self.index, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeError {
    EmptyResult,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyResult => write!(f, "No results found."),
        }
    }
}

impl std::error::Error for NormalizeError {}

pub fn normalize(response: RawResponse) -> Result<Vec<DisplayItem>, NormalizeError> {
    if response.total_results == 0 || response.articles.is_empty() {
        return Err(NormalizeError::EmptyResult);
    }

    let total = response.articles.len().min(MAX_ARTICLES);
    Ok(response
        .articles
        .into_iter()
        .take(MAX_ARTICLES)
        .enumerate()
        .map(|(i, article)| display_item(article, i + 1, total))
        .collect())
}

/// RFC 3339, or an ISO-8601 date-time without an offset, read as UTC.
fn parse_timestamp(raw: &str) -> chrono::ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).or_else(|e| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc().fixed_offset())
            .map_err(|_| e)
    })
}

fn display_item(article: Article, index: usize, total: usize) -> DisplayItem {
    let source = article.source.name.unwrap_or_default();
    let byline = match article.author.as_deref().map(str::trim) {
        Some(author) if !author.is_empty() => format!("{author} - {source}"),
        _ => source,
    };

    let timestamp = article.published_at.as_deref().and_then(|raw| {
        parse_timestamp(raw)
            .inspect_err(|e| warn!(index, "Unparseable publishedAt {raw:?}: {e}"))
            .ok()
    });

    DisplayItem {
        title: clip(article.title.unwrap_or_default(), TITLE_LIMIT),
        body: clip(article.description.unwrap_or_default(), DESCRIPTION_LIMIT),
        image_url: article.url_to_image.as_deref().and_then(web_url),
        link: article.url.as_deref().and_then(web_url),
        byline: clip(byline, AUTHOR_LIMIT),
        timestamp,
        index,
        total,
    }
}
