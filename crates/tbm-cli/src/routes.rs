//! Route tokens for the catalog pages.
//!
//! The sidebar links each reading room by a short token. Tokens that are
//! not in the table fall back to the full catalog.

use tbm_core::LocationFilter;

/// Token for the unfiltered catalog.
pub const ALL_BOOKS_TOKEN: &str = "semua-buku";

/// Page title for the unfiltered catalog.
pub const ALL_BOOKS_TITLE: &str = "Semua Buku";

/// Route token to canonical location name.
pub const ROUTES: &[(&str, &str)] = &[
    ("tbm-rw-01", "TBM RW 01"),
    ("tbm-rw-02", "TBM RW 02"),
    ("tbm-rw-03", "TBM RW 03"),
    ("tbm-rw-04", "TBM RW 04"),
    ("tbm-rw-05", "TBM RW 05"),
    ("tbm-rw-06", "TBM RW 06"),
    ("tbm-rw-07", "TBM RW 07"),
    ("tbm-pendopo", "TBM Pendopo Kelurahan"),
    ("tbm-kantor", "TBM Kantor Kelurahan"),
    ("tbm-joglo", "TBM Joglo Mutiara"),
];

/// Resolve a route token or canonical location name.
///
/// Matching is case-insensitive. Anything unrecognised means all books.
pub fn resolve_route(token: &str) -> LocationFilter {
    let token = token.trim();
    if token.is_empty()
        || token.eq_ignore_ascii_case(ALL_BOOKS_TOKEN)
        || token.eq_ignore_ascii_case(LocationFilter::ALL)
    {
        return LocationFilter::All;
    }

    let found = ROUTES.iter().find(|(route, location)| {
        token.eq_ignore_ascii_case(route) || token.eq_ignore_ascii_case(location)
    });

    match found {
        Some((_, location)) => LocationFilter::Site((*location).to_string()),
        None => {
            tracing::warn!("Unknown route {:?}; showing all books", token);
            LocationFilter::All
        }
    }
}

/// Heading shown above the list.
pub fn page_title(location: &LocationFilter) -> &str {
    location.site().unwrap_or(ALL_BOOKS_TITLE)
}
