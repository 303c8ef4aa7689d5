//! Deriving the display list from the working set.

use std::cmp::Reverse;

use tbm_core::{
    matches, BookRecord, FilterPolicy, QueryState, SearchFilters, SortDirection, SortKey,
};

/// Stable, case-insensitive sort by `key`.
///
/// Missing values compare as the empty string, so they lead in ascending
/// order and trail in descending order. Ties keep their incoming order.
pub fn sort_records(records: &mut [BookRecord], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Asc => records.sort_by_cached_key(|b| key.value_of(b).to_lowercase()),
        SortDirection::Desc => {
            records.sort_by_cached_key(|b| Reverse(key.value_of(b).to_lowercase()))
        }
    }
}

/// The ordered view of `working_set` for `query`.
///
/// The remote policy trusts the store to have filtered already; the local
/// policy applies the search predicate here.
pub fn derive_view(
    working_set: &[BookRecord],
    query: &QueryState,
    policy: FilterPolicy,
) -> Vec<BookRecord> {
    let mut records: Vec<BookRecord> = match policy {
        FilterPolicy::Remote => working_set.to_vec(),
        FilterPolicy::Local => {
            let filters = SearchFilters::from_query(query);
            working_set
                .iter()
                .filter(|book| matches(book, &query.search_term, &filters))
                .cloned()
                .collect()
        }
    };
    sort_records(&mut records, query.sort_key, query.sort_direction);
    records
}

/// Distinct non-empty values of a field, in first-seen order.
pub fn distinct_values<F>(records: &[BookRecord], field: F) -> Vec<String>
where
    F: Fn(&BookRecord) -> &str,
{
    let mut values: Vec<String> = Vec::new();
    for book in records {
        let value = field(book);
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbm_core::LocationFilter;

    fn titles(books: &[BookRecord]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    fn shelf() -> Vec<BookRecord> {
        let mut with_publisher = BookRecord::new(3, "animal farm", "George Orwell", "TBM RW 02");
        with_publisher.publisher = Some("Bentang".to_string());
        vec![
            BookRecord::new(1, "Laskar Pelangi", "Andrea Hirata", "TBM RW 01").with_genre("Fiksi"),
            BookRecord::new(2, "Bumi Manusia", "Pramoedya", "TBM RW 01").with_genre("Fiksi"),
            with_publisher.with_genre("Fiksi"),
            BookRecord::new(4, "Atlas Indonesia", "Tim", "TBM RW 03").with_genre("Nonfiksi"),
        ]
    }

    #[test]
    fn test_sort_ascending_is_case_insensitive() {
        let mut books = shelf();
        sort_records(&mut books, SortKey::Title, SortDirection::Asc);
        assert_eq!(
            titles(&books),
            vec!["animal farm", "Atlas Indonesia", "Bumi Manusia", "Laskar Pelangi"]
        );
    }

    #[test]
    fn test_adjacent_pairs_are_ordered() {
        for key in SortKey::ALL {
            let mut books = shelf();
            sort_records(&mut books, key, SortDirection::Asc);
            for pair in books.windows(2) {
                let a = key.value_of(&pair[0]).to_lowercase();
                let b = key.value_of(&pair[1]).to_lowercase();
                assert!(a <= b, "{key}: {a:?} > {b:?}");
            }

            sort_records(&mut books, key, SortDirection::Desc);
            for pair in books.windows(2) {
                let a = key.value_of(&pair[0]).to_lowercase();
                let b = key.value_of(&pair[1]).to_lowercase();
                assert!(a >= b, "{key}: {a:?} < {b:?}");
            }
        }
    }

    #[test]
    fn test_ties_keep_incoming_order() {
        let mut books = shelf();
        sort_records(&mut books, SortKey::Location, SortDirection::Asc);
        let ids: Vec<String> = books.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        sort_records(&mut books, SortKey::Genre, SortDirection::Desc);
        let ids: Vec<String> = books.iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_missing_values_lead_then_trail() {
        let mut books = shelf();
        sort_records(&mut books, SortKey::Publisher, SortDirection::Asc);
        assert_eq!(books.last().unwrap().id.to_string(), "3");

        sort_records(&mut books, SortKey::Publisher, SortDirection::Desc);
        assert_eq!(books.first().unwrap().id.to_string(), "3");
    }

    #[test]
    fn test_derive_local_filters_then_sorts() {
        let query = QueryState {
            genre_filter: Some("Fiksi".to_string()),
            location_filter: LocationFilter::parse("TBM RW 01"),
            sort_direction: SortDirection::Desc,
            ..QueryState::default()
        };
        let view = derive_view(&shelf(), &query, FilterPolicy::Local);
        assert_eq!(titles(&view), vec!["Laskar Pelangi", "Bumi Manusia"]);
    }

    #[test]
    fn test_derive_remote_only_sorts() {
        let query = QueryState {
            search_term: "zzz".to_string(),
            ..QueryState::default()
        };
        let view = derive_view(&shelf(), &query, FilterPolicy::Remote);
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_distinct_values() {
        let genres = distinct_values(&shelf(), |b| b.genre.as_str());
        assert_eq!(genres, vec!["Fiksi", "Nonfiksi"]);

        let kinds = distinct_values(&shelf(), |b| b.kind.as_str());
        assert!(kinds.is_empty());
    }
}
