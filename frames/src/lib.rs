//! Shared frame model and JSON codec for the live search channel.
//!
//! This crate owns the text-frame representation used by every host. Outbound
//! frames are tagged by `action` (`search`, `ping`); inbound frames carry a
//! single `responses` array of per-query results.
//!
//! Inbound payloads are decoded leniently: readability metrics may arrive as
//! numbers or two-decimal strings, and unknown fields are ignored.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Error returned by [`decode_batch`] and [`decode_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON, or does not match the expected schema.
    #[error("failed to decode frame JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The frame is a JSON value without a `responses` array.
    #[error("frame is missing the `responses` array")]
    MissingResponses,
}

/// Error returned when a search term cannot become a [`SearchQuery`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The term is empty or whitespace only.
    #[error("search query must not be empty")]
    Empty,
}

/// A validated, non-empty search term.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim `raw` and wrap it as a query.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Empty`] when nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SearchQuery {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SearchQuery> for String {
    fn from(value: SearchQuery) -> Self {
        value.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A client-to-server frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Ask the server to search for `query` and stream results back.
    Search { query: SearchQuery },
    /// Keepalive; carries no payload.
    Ping,
}

/// One inbound frame: the server's current results, newest query first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultBatch {
    /// Per-query results in the order the server sent them.
    ///
    /// `null` entries (queries the server has not answered yet) are skipped.
    #[serde(deserialize_with = "deserialize_responses")]
    pub responses: Vec<SearchResponse>,
}

/// Results for a single query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// The query these results answer.
    pub query: String,
    /// Overall sentiment of the result descriptions, if computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Mean Flesch-Kincaid grade level across `items`.
    #[serde(default, deserialize_with = "deserialize_metric", skip_serializing_if = "Option::is_none")]
    pub flesch_kincaid_grade_level_avg: Option<f64>,
    /// Mean Flesch reading-ease score across `items`.
    #[serde(default, deserialize_with = "deserialize_metric", skip_serializing_if = "Option::is_none")]
    pub flesch_reading_score_avg: Option<f64>,
    /// Matching videos in ranking order.
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

impl SearchResponse {
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// A single video result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: VideoId,
    pub snippet: Snippet,
    /// Flesch-Kincaid grade level of the description.
    #[serde(default, deserialize_with = "deserialize_metric", skip_serializing_if = "Option::is_none")]
    pub flesch_kincaid_grade_level: Option<f64>,
    /// Flesch reading-ease score of the description.
    #[serde(default, deserialize_with = "deserialize_metric", skip_serializing_if = "Option::is_none")]
    pub flesch_reading_score: Option<f64>,
}

impl VideoItem {
    #[must_use]
    pub fn video_id(&self) -> &str {
        &self.id.video_id
    }

    /// Public watch page for this video.
    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id.video_id)
    }

    /// Public page of the channel that uploaded this video.
    #[must_use]
    pub fn channel_url(&self) -> String {
        format!("https://www.youtube.com/channel/{}", self.snippet.channel_id)
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.snippet.thumbnails.default.as_ref().map(|t| t.url.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoId {
    pub video_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Overall mood of a result set, sent by the server as an emoticon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Happy,
    Sad,
    Neutral,
    /// Any value the client does not recognize, kept verbatim.
    Other(String),
}

impl Sentiment {
    /// Wire form of the sentiment.
    #[must_use]
    pub fn emoticon(&self) -> &str {
        match self {
            Self::Happy => ":-)",
            Self::Sad => ":-(",
            Self::Neutral => ":-|",
            Self::Other(raw) => raw,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "positive",
            Self::Sad => "negative",
            Self::Neutral => "neutral",
            Self::Other(_) => "unknown",
        }
    }
}

impl From<String> for Sentiment {
    fn from(value: String) -> Self {
        match value.as_str() {
            ":-)" => Self::Happy,
            ":-(" => Self::Sad,
            ":-|" => Self::Neutral,
            _ => Self::Other(value),
        }
    }
}

impl From<Sentiment> for String {
    fn from(value: Sentiment) -> Self {
        match value {
            Sentiment::Other(raw) => raw,
            known => known.emoticon().to_owned(),
        }
    }
}

/// Format an optional metric to two decimals, or `"n/a"` when absent.
#[must_use]
pub fn metric_label(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_owned(), |v| format!("{v:.2}"))
}

/// Encode an outbound message as a JSON text frame.
#[must_use]
pub fn encode_message(message: &ClientMessage) -> String {
    // Every field is a plain string, so serialization cannot fail.
    serde_json::to_string(message).unwrap_or_default()
}

/// Decode a client-to-server message, as the serving side does.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed text, unknown actions, or an
/// empty search query.
pub fn decode_message(text: &str) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode a result batch as a JSON text frame.
#[must_use]
pub fn encode_batch(batch: &ResultBatch) -> String {
    serde_json::to_string(batch).unwrap_or_default()
}

/// Decode an inbound text frame into a [`ResultBatch`].
///
/// # Errors
///
/// Returns [`CodecError::Json`] for invalid JSON or a malformed response, and
/// [`CodecError::MissingResponses`] when the frame has no `responses` array.
pub fn decode_batch(text: &str) -> Result<ResultBatch, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.get("responses").is_some_and(Value::is_array) {
        return Err(CodecError::MissingResponses);
    }
    Ok(serde_json::from_value(value)?)
}

fn deserialize_responses<'de, D>(deserializer: D) -> Result<Vec<SearchResponse>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<Option<SearchResponse>>::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().collect())
}

fn deserialize_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64().filter(|v| v.is_finite())),
        Value::String(text) => Ok(text.trim().parse::<f64>().ok().filter(|v| v.is_finite())),
        other => Err(D::Error::custom(format!("expected number or numeric string, got {other}"))),
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
