//! The search predicate.
//!
//! Search text matches case-insensitively as a substring of any searchable
//! field (OR). Category and location filters match exactly and are ANDed
//! with the text match.

use crate::book::BookRecord;
use crate::query::{LocationFilter, QueryState};

/// Fields consulted by text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
    Type,
    Location,
}

impl SearchField {
    pub const ALL: [SearchField; 5] = [
        SearchField::Title,
        SearchField::Author,
        SearchField::Genre,
        SearchField::Type,
        SearchField::Location,
    ];

    pub fn value_of<'a>(&self, book: &'a BookRecord) -> &'a str {
        match self {
            SearchField::Title => &book.title,
            SearchField::Author => &book.author,
            SearchField::Genre => &book.genre,
            SearchField::Type => &book.kind,
            SearchField::Location => &book.location,
        }
    }

    /// Column name in the remote table.
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Title => "judul_buku",
            SearchField::Author => "penulis_buku",
            SearchField::Genre => "aliran_buku",
            SearchField::Type => "jenis_buku",
            SearchField::Location => "lokasi_buku",
        }
    }
}

/// Exact-match filters passed alongside a search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub genre: Option<String>,
    pub kind: Option<String>,
    pub location: LocationFilter,
}

impl SearchFilters {
    pub fn from_query(query: &QueryState) -> Self {
        Self {
            genre: query.genre_filter.clone(),
            kind: query.type_filter.clone(),
            location: query.location_filter.clone(),
        }
    }
}

/// Case-insensitive substring match over the searchable fields.
///
/// An empty term matches everything.
pub fn matches_search(book: &BookRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    SearchField::ALL
        .iter()
        .any(|field| field.value_of(book).to_lowercase().contains(&needle))
}

/// Exact match on every supplied filter.
pub fn matches_filters(book: &BookRecord, filters: &SearchFilters) -> bool {
    let genre_ok = filters.genre.as_deref().map_or(true, |g| book.genre == g);
    let kind_ok = filters.kind.as_deref().map_or(true, |k| book.kind == k);
    let location_ok = filters.location.site().map_or(true, |l| book.location == l);
    genre_ok && kind_ok && location_ok
}

pub fn matches(book: &BookRecord, term: &str, filters: &SearchFilters) -> bool {
    matches_search(book, term) && matches_filters(book, filters)
}
