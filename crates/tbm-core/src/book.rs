//! Book records as stored in the remote `buku` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable record identifier.
///
/// The table may hand out integer or text keys; both render the same way
/// and compare by their rendered text.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Int(i64),
    Text(String),
}

impl BookId {
    /// Rendered form used in URLs and comparisons.
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for BookId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BookId::Int(a), BookId::Int(b)) => a == b,
            (BookId::Text(a), BookId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl std::hash::Hash for BookId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Int(n) => write!(f, "{n}"),
            BookId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => BookId::Int(n),
            Err(_) => BookId::Text(s.to_string()),
        })
    }
}

impl From<i64> for BookId {
    fn from(n: i64) -> Self {
        BookId::Int(n)
    }
}

impl From<i32> for BookId {
    fn from(n: i32) -> Self {
        BookId::Int(i64::from(n))
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId::Text(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        BookId::Text(s)
    }
}

/// One catalog entry for a physical book held at a reading room.
///
/// Field names follow the table's column names on the wire. Records are
/// read-only snapshots; nothing in the catalog mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: BookId,

    #[serde(rename = "judul_buku", default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(rename = "penulis_buku", default, deserialize_with = "null_as_empty")]
    pub author: String,

    /// Genre ("aliran"), e.g. "Fiksi" or "Nonfiksi".
    #[serde(rename = "aliran_buku", default, deserialize_with = "null_as_empty")]
    pub genre: String,

    /// Book type ("jenis"), e.g. "Buku Anak-Anak".
    #[serde(rename = "jenis_buku", default, deserialize_with = "null_as_empty")]
    pub kind: String,

    /// Reading-room site holding the book.
    #[serde(rename = "lokasi_buku", default, deserialize_with = "null_as_empty")]
    pub location: String,

    #[serde(rename = "sinopsis_buku", default, skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,

    #[serde(rename = "penerbit_buku", default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(rename = "ilustrator_buku", default, skip_serializing_if = "Option::is_none")]
    pub illustrator: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    /// Create a record with the required display fields.
    pub fn new(
        id: impl Into<BookId>,
        title: impl Into<String>,
        author: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            genre: String::new(),
            kind: String::new(),
            location: location.into(),
            synopsis: None,
            publisher: None,
            illustrator: None,
            isbn: None,
            created_at: None,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
