//! Normalization of Gmail API messages into [`EmailRecord`]s.
//!
//! Only the fields the board needs are read from a `users.messages.get`
//! response (`format=full`): `id`, `labelIds`, `snippet`, the `Subject`,
//! `From` and `Date` headers, and `internalDate` as a date fallback.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::model::{EmailId, EmailRecord};

/// Subject used when a message has none.
pub const NO_SUBJECT: &str = "No Subject";

/// Sender used when a message has no `From` header.
pub const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Timestamp used when no usable date is present.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// A Gmail API message, reduced to what normalization reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmailMessage {
    pub id: String,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub payload: GmailPayload,
    /// Milliseconds since the Unix epoch, as a string.
    #[serde(default)]
    pub internal_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmailPayload {
    #[serde(default)]
    pub headers: Vec<GmailHeader>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailHeader {
    pub name: String,
    pub value: String,
}

/// Turn a Gmail message into a normalized record.
pub fn normalize(message: &GmailMessage, now: DateTime<Utc>) -> EmailRecord {
    let headers = &message.payload.headers;
    let subject = non_empty(header(headers, "Subject")).unwrap_or(NO_SUBJECT);
    let from = non_empty(header(headers, "From")).unwrap_or(UNKNOWN_SENDER);

    let date = non_empty(header(headers, "Date"))
        .and_then(parse_date)
        .or_else(|| message.internal_date.as_deref().and_then(parse_epoch_millis));

    EmailRecord {
        id: EmailId::new(message.id.clone()),
        subject: subject.trim().to_string(),
        from: extract_address(from),
        preview: decode_entities(message.snippet.as_deref().unwrap_or_default()),
        timestamp: relative_timestamp(date, now),
        is_read: !message.label_ids.iter().any(|l| l == "UNREAD"),
        labels: message.label_ids.clone(),
    }
}

/// Case-insensitive header lookup; the first match wins.
pub fn header<'a>(headers: &'a [GmailHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// `"Name <user@host>"` → `"user@host"`; anything without brackets is kept.
pub fn extract_address(from: &str) -> String {
    let trimmed = from.trim();
    if let (Some(start), Some(end)) = (trimmed.find('<'), trimmed.rfind('>')) {
        if end > start + 1 {
            let inner = trimmed[start + 1..end].trim();
            if !inner.is_empty() {
                return inner.to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Parse a `Date` header value.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // Trailing comments such as "(UTC)" or "(PDT)"
    if let Some(idx) = trimmed.rfind(" (") {
        if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed[..idx].trim()) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_epoch_millis(raw: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = raw.trim().parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Render `date` relative to `now`: "Just now", "N hours ago", "N days ago",
/// then a plain `M/D/YYYY` date after a week.
pub fn relative_timestamp(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(date) = date else {
        return UNKNOWN_DATE.to_string();
    };
    let hours = (now - date).num_hours();
    let days = hours / 24;
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours} hour{} ago", plural(hours))
    } else if days < 7 {
        format!("{days} day{} ago", plural(days))
    } else {
        date.format("%-m/%-d/%Y").to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Gmail snippets arrive HTML-escaped.
fn decode_entities(snippet: &str) -> String {
    snippet
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
