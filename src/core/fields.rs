//! Column extractors for post records.
//!
//! Every extractor reads one record and produces one column value. Optional
//! paths that are missing or of the wrong shape collapse to an empty string;
//! only `text`, `urls` and `tweet_url` fail, because a post without them is
//! not a usable row.

use crate::core::path::{resolve, Lookup};
use crate::domain::model::TweetType;
use crate::utils::error::{EtlError, Result};
use chrono::DateTime;
use serde_json::Value;
use std::collections::HashSet;

const TWEET_URL_BASE: &str = "https://twitter.com";
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";
const PARSED_CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Truthiness as the export's consumers see it: null, false, zero and empty
/// containers are all "not set".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Renders a pass-through value as a CSV cell.
pub fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn found_string(lookup: Lookup<'_>) -> String {
    lookup.value().map(scalar_string).unwrap_or_default()
}

fn truthy_string(lookup: Lookup<'_>) -> Option<String> {
    lookup
        .value()
        .filter(|value| is_truthy(value))
        .map(scalar_string)
}

fn required_string(record: &Value, path: &[&str]) -> Result<String> {
    resolve(record, path)
        .value()
        .map(scalar_string)
        .ok_or_else(|| EtlError::missing_field(&path.join(".")))
}

fn resolve_under<'a>(record: &'a Value, root: &str, path: &[&str]) -> Lookup<'a> {
    match resolve(record, &[root]) {
        Lookup::Found(status) => resolve(status, path),
        Lookup::NotFound => Lookup::NotFound,
    }
}

/// Retweeted status first, then quoted status.
fn shared_status_field(record: &Value, path: &[&str]) -> String {
    let lookup = resolve_under(record, "retweeted_status", path)
        .or_else(|| resolve_under(record, "quoted_status", path));
    found_string(lookup)
}

fn expanded_url(entity: &Value) -> Option<&str> {
    entity.get("expanded_url").and_then(Value::as_str)
}

pub fn text(record: &Value) -> Result<String> {
    if let Some(full) = truthy_string(resolve(record, &["full_text"])) {
        return Ok(full);
    }
    if let Some(extended) = truthy_string(resolve(record, &["extended_tweet", "full_text"])) {
        return Ok(extended);
    }
    required_string(record, &["text"])
}

pub fn extended_text(record: &Value) -> String {
    let lookup = resolve(record, &["extended_tweet", "full_text"])
        .or_else(|| resolve_under(record, "retweeted_status", &["extended_tweet", "full_text"]))
        .or_else(|| resolve_under(record, "quoted_status", &["extended_tweet", "full_text"]));
    found_string(lookup)
}

pub fn quote_text(record: &Value) -> String {
    found_string(resolve(record, &["quoted_status", "text"]))
}

/// `[longitude, latitude]` printed with six decimals.
pub fn coordinates(record: &Value) -> String {
    let pair = resolve(record, &["coordinates", "coordinates"])
        .value()
        .and_then(Value::as_array)
        .map(Vec::as_slice);

    match pair {
        Some([lon, lat]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => format!("{:.6} {:.6}", lon, lat),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

pub fn place(record: &Value) -> String {
    found_string(resolve(record, &["place", "full_name"]))
}

fn hashtag_text(tag: &Value) -> Option<String> {
    match tag {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => tag.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Extended entities win over the truncated ones when both are present.
fn status_hashtags(status: &Value) -> Option<Vec<String>> {
    resolve(status, &["extended_tweet", "entities", "hashtags"])
        .value()
        .and_then(Value::as_array)
        .or_else(|| {
            resolve(status, &["entities", "hashtags"])
                .value()
                .and_then(Value::as_array)
        })
        .map(|tags| tags.iter().filter_map(hashtag_text).collect())
}

/// The post's own hashtags; shared posts are not included.
pub fn hashtags(record: &Value) -> String {
    status_hashtags(record)
        .map(|tags| tags.join(" "))
        .unwrap_or_default()
}

pub fn quoted_or_retweeted_hashtags(record: &Value) -> String {
    ["retweeted_status", "quoted_status"]
        .iter()
        .find_map(|root| resolve(record, &[*root]).value().and_then(status_hashtags))
        .map(|tags| tags.join(" "))
        .unwrap_or_default()
}

/// Own, retweeted and quoted hashtags in that order, each tag once.
pub fn all_hashtags(record: &Value) -> String {
    let statuses = [
        Some(record),
        resolve(record, &["retweeted_status"]).value(),
        resolve(record, &["quoted_status"]).value(),
    ];

    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for status in statuses.into_iter().flatten() {
        for tag in status_hashtags(status).unwrap_or_default() {
            if seen.insert(tag.clone()) {
                tags.push(tag);
            }
        }
    }
    tags.join(" ")
}

/// A media list with an entry lacking `expanded_url` is unusable as a whole,
/// and the next list is tried.
pub fn media(record: &Value) -> String {
    [["extended_entities", "media"], ["entities", "media"]]
        .iter()
        .filter_map(|path| resolve(record, path).value().and_then(Value::as_array))
        .filter(|items| !items.is_empty())
        .find_map(|items| {
            items
                .iter()
                .map(expanded_url)
                .collect::<Option<Vec<_>>>()
                .map(|urls| urls.join(" "))
        })
        .unwrap_or_default()
}

pub fn urls(record: &Value) -> Result<String> {
    let items = match resolve(record, &["entities", "urls"]) {
        Lookup::Found(Value::Array(items)) => items,
        Lookup::Found(_) => {
            return Err(EtlError::UnexpectedType {
                path: "entities.urls".to_string(),
                expected: "a list",
            })
        }
        Lookup::NotFound => return Err(EtlError::missing_field("entities.urls")),
    };

    Ok(items
        .iter()
        .map(|url| expanded_url(url).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" "))
}

pub fn retweet_id(record: &Value) -> String {
    shared_status_field(record, &["id_str"])
}

pub fn retweet_screen_name(record: &Value) -> String {
    shared_status_field(record, &["user", "screen_name"])
}

pub fn retweet_user_id(record: &Value) -> String {
    shared_status_field(record, &["user", "id_str"])
}

pub fn tweet_url(record: &Value) -> Result<String> {
    let screen_name = required_string(record, &["user", "screen_name"])?;
    let id = required_string(record, &["id_str"])?;
    Ok(format!("{}/{}/status/{}", TWEET_URL_BASE, screen_name, id))
}

pub fn user_urls(record: &Value) -> String {
    resolve(record, &["user", "entities", "url", "urls"])
        .value()
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(expanded_url)
                .filter(|url| !url.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

pub fn tweet_type(record: &Value) -> TweetType {
    if resolve(record, &["in_reply_to_status_id"])
        .value()
        .is_some_and(is_truthy)
    {
        TweetType::Reply
    } else if resolve(record, &["retweeted_status"]).is_found() {
        TweetType::Retweet
    } else if resolve(record, &["quoted_status"]).is_found() {
        TweetType::Quote
    } else {
        TweetType::Original
    }
}

/// `created_at` re-rendered as an ISO-like timestamp with offset.
pub fn parsed_created_at(record: &Value) -> String {
    resolve(record, &["created_at"])
        .value()
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_str(raw, CREATED_AT_FORMAT).ok())
        .map(|parsed| parsed.format(PARSED_CREATED_AT_FORMAT).to_string())
        .unwrap_or_default()
}
