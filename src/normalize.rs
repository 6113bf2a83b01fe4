//! Turning one feed item into an [`Article`].
//!
//! Field rules:
//!
//! 1. `title` and `link` are copied as plain text.
//! 2. `pubDate` is parsed as an RFC 2822 date. A missing or blank date falls
//!    back to the current time; a present but unreadable one is an error.
//! 3. The body comes from the outlet's [`BodyExtractor`](crate::body::BodyExtractor)
//!    and is cut to [`MAX_SNIPPET_CHARS`] characters.
//! 4. `last_updated` mirrors the publication date and `is_important` starts
//!    out `false`.

use crate::body::BodyRules;
use crate::error::{Result, ScrapeError};
use crate::feed::FeedItem;
use crate::models::{Article, MAX_SNIPPET_CHARS};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::debug;

/// Date and time after the weekday and before the zone. `%B` also accepts
/// abbreviated month names when parsing.
const LENIENT_FORMAT: &str = "%d %B %Y %H:%M:%S";

/// Normalizes items using a fixed set of [`BodyRules`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: BodyRules,
}

impl Normalizer {
    pub fn new(rules: BodyRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BodyRules {
        &self.rules
    }

    /// Build the [`Article`] for `item` as published by `outlet_name`.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::DateParse`] when `pubDate` is present but unreadable.
    pub fn normalize(&self, item: &FeedItem, outlet_name: &str) -> Result<Article> {
        let title = item.text("title").to_string();
        let url = item.text("link").to_string();

        let publication_date = match parse_pub_date(item.text("pubDate"))? {
            Some(date) => date,
            None => {
                debug!(%title, "Item has no pubDate; using current time");
                Utc::now()
            }
        };

        let body = self.rules.for_outlet(outlet_name).extract_body(item);
        let snippet = truncate_snippet(body);

        Ok(Article {
            title,
            url,
            source_name: outlet_name.to_string(),
            snippet,
            publication_date,
            last_updated: publication_date,
            is_important: false,
        })
    }
}

/// [`Normalizer::normalize`] with the built-in outlet rules.
pub fn normalize(item: &FeedItem, outlet_name: &str) -> Result<Article> {
    Normalizer::default().normalize(item, outlet_name)
}

/// Parse a feed `pubDate`.
///
/// Strict RFC 2822 first. Failing that, the weekday is ignored (feeds often
/// get it wrong), full month names are allowed, and the zone may be
/// `GMT`/`UT`/`UTC`/`Z`, a US zone name or a numeric offset.
///
/// Returns `Ok(None)` for a blank value so the caller can pick a fallback.
pub fn parse_pub_date(raw: &str) -> Result<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match DateTime::parse_from_rfc2822(raw) {
        Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
        Err(source) => parse_lenient(raw)
            .map(Some)
            .ok_or_else(|| ScrapeError::DateParse {
                value: raw.to_string(),
                source,
            }),
    }
}

fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    let rest = match raw.split_once(',') {
        Some((_weekday, rest)) => rest.trim(),
        None => raw,
    };
    let (datetime, zone) = rest.rsplit_once(char::is_whitespace)?;
    let offset = zone_offset_secs(zone.trim())?;
    let naive = NaiveDateTime::parse_from_str(datetime.trim(), LENIENT_FORMAT).ok()?;
    Some(naive.and_utc() - Duration::seconds(offset))
}

/// Offset east of UTC, in seconds, for a zone token.
fn zone_offset_secs(zone: &str) -> Option<i64> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return numeric_offset_secs(zone),
    };
    Some(hours * 3600)
}

/// `+0200`, `-05:00`, `+02`.
fn numeric_offset_secs(zone: &str) -> Option<i64> {
    let sign = match zone.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = zone[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hh, mm) = match digits.len() {
        2 => (digits.parse::<i64>().ok()?, 0),
        4 => (digits[..2].parse::<i64>().ok()?, digits[2..].parse::<i64>().ok()?),
        _ => return None,
    };
    if hh > 23 || mm > 59 {
        return None;
    }
    Some(sign * (hh * 3600 + mm * 60))
}

/// Keep at most [`MAX_SNIPPET_CHARS`] characters of `body`.
///
/// Counts characters, not bytes, so multi-byte text is never split
/// mid-character. No ellipsis is added.
pub fn truncate_snippet(mut body: String) -> String {
    if let Some((idx, _)) = body.char_indices().nth(MAX_SNIPPET_CHARS) {
        body.truncate(idx);
    }
    body
}
