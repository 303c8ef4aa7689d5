//! Query state types: location scope, category filters, and sort order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::book::BookRecord;

// =============================================================================
// Location Filter
// =============================================================================

/// Location scope for the book list.
///
/// Either a canonical reading-room name or the unfiltered sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum LocationFilter {
    /// Every location. Travels as `"all"`.
    #[default]
    All,
    /// Exactly one reading room.
    Site(String),
}

impl LocationFilter {
    /// Sentinel string meaning "no location filter".
    pub const ALL: &'static str = "all";

    /// Build from a canonical location string or the sentinel.
    ///
    /// Empty strings are treated as unfiltered.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(Self::ALL) {
            LocationFilter::All
        } else {
            LocationFilter::Site(value.to_string())
        }
    }

    /// Canonical site name, if filtered.
    pub fn site(&self) -> Option<&str> {
        match self {
            LocationFilter::All => None,
            LocationFilter::Site(site) => Some(site),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LocationFilter::All => Self::ALL,
            LocationFilter::Site(site) => site,
        }
    }
}

impl fmt::Display for LocationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LocationFilter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sortable string fields of a book record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Genre,
    Type,
    Location,
    Publisher,
    Illustrator,
    Isbn,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Title,
        SortKey::Author,
        SortKey::Genre,
        SortKey::Type,
        SortKey::Location,
        SortKey::Publisher,
        SortKey::Illustrator,
        SortKey::Isbn,
    ];

    /// The record's value for this key. Missing values read as empty.
    pub fn value_of<'a>(&self, book: &'a BookRecord) -> &'a str {
        match self {
            SortKey::Title => &book.title,
            SortKey::Author => &book.author,
            SortKey::Genre => &book.genre,
            SortKey::Type => &book.kind,
            SortKey::Location => &book.location,
            SortKey::Publisher => book.publisher.as_deref().unwrap_or(""),
            SortKey::Illustrator => book.illustrator.as_deref().unwrap_or(""),
            SortKey::Isbn => book.isbn.as_deref().unwrap_or(""),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Author => "author",
            SortKey::Genre => "genre",
            SortKey::Type => "type",
            SortKey::Location => "location",
            SortKey::Publisher => "publisher",
            SortKey::Illustrator => "illustrator",
            SortKey::Isbn => "isbn",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts the English key names and the table's Indonesian labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" | "judul" => Ok(SortKey::Title),
            "author" | "penulis" => Ok(SortKey::Author),
            "genre" | "aliran" => Ok(SortKey::Genre),
            "type" | "jenis" => Ok(SortKey::Type),
            "location" | "lokasi" => Ok(SortKey::Location),
            "publisher" | "penerbit" => Ok(SortKey::Publisher),
            "illustrator" | "ilustrator" => Ok(SortKey::Illustrator),
            "isbn" => Ok(SortKey::Isbn),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

// =============================================================================
// Query State
// =============================================================================

/// The engine's current search, filter, and sort parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub genre_filter: Option<String>,
    pub type_filter: Option<String>,
    pub location_filter: LocationFilter,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl QueryState {
    /// True when a text search or a category filter is active.
    pub fn has_search_criteria(&self) -> bool {
        !self.search_term.is_empty() || self.genre_filter.is_some() || self.type_filter.is_some()
    }
}
