use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned note identifier.
///
/// The server decides the representation; numbers and strings are both
/// accepted and sent back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Number(n) => write!(f, "{}", n),
            NoteId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for NoteId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // "007" stays text so it can still match a string id.
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => NoteId::Number(n),
            _ => NoteId::Text(s.to_string()),
        })
    }
}

impl NoteId {
    /// Whether both ids name the same note. An id typed as `7` matches a
    /// server id of either `7` or `"7"`.
    pub fn refers_to(&self, other: &NoteId) -> bool {
        self == other || self.to_string() == other.to_string()
    }
}

impl From<i64> for NoteId {
    fn from(n: i64) -> Self {
        NoteId::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
}

impl Note {
    /// Case-insensitive substring match against title, content and tags.
    ///
    /// Tags are matched in their space-joined form, so a query may span
    /// two adjacent tags. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&needle)
            || self.content.to_lowercase().contains(&needle)
            || self.tags.join(" ").to_lowercase().contains(&needle)
    }

    /// Tags as shown to the user and as loaded back into the edit form.
    pub fn tags_label(&self) -> String {
        self.tags.join(", ")
    }
}

/// A note as sent on create/update: everything but the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: NaiveDate,
}

/// Split a comma-separated tag field into trimmed tags, keeping order.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Filter notes by a search query, preserving list order.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    notes.iter().filter(|n| n.matches(query)).collect()
}

/// Accepts `YYYY-MM-DD` or anything starting with it (ISO timestamps).
/// Missing, null, non-string or unparseable values become `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(|s| {
        let prefix = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }))
}
