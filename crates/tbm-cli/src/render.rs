//! Plain-text rendering of catalog pages.
//!
//! Everything here returns a `String` so output can be snapshot-tested.

use tbm_core::BookRecord;
use tbm_engine::{CountSource, DetailStatus, EngineSnapshot, FetchStatus, LandingStats};

pub const EMPTY_LIST: &str = "Tidak ada data";
pub const NOT_AVAILABLE: &str = "Tidak tersedia";
pub const NO_SYNOPSIS: &str = "Sinopsis tidak tersedia.";
pub const NOT_FOUND: &str = "Buku tidak ditemukan";
pub const LOADING: &str = "Memuat data...";

const COLUMN_GAP: &str = "  ";
const HEADERS: [&str; 6] = ["No", "Judul", "Penulis", "Aliran", "Jenis", "Lokasi"];

// =============================================================================
// Landing
// =============================================================================

pub fn render_count(stats: &LandingStats) -> String {
    match stats.source {
        CountSource::Live => format!("Koleksi buku: {}", stats.count),
        CountSource::Fallback => format!("Koleksi buku: {} (perkiraan)", stats.count),
    }
}

// =============================================================================
// List
// =============================================================================

/// The list page: title, status line, then table.
///
/// `retry_hint` follows the error message when the last fetch failed.
pub fn render_list(title: &str, snapshot: &EngineSnapshot, retry_hint: &str) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    match &snapshot.status {
        FetchStatus::Loading => {
            out.push_str(LOADING);
            out.push('\n');
            return out;
        }
        FetchStatus::Error(message) => {
            out.push_str(&format!("Gagal memuat data: {message}\n"));
            out.push_str(retry_hint);
            out.push('\n');
            if snapshot.view.is_empty() {
                return out;
            }
        }
        FetchStatus::Ready => {}
    }

    if snapshot.view.is_empty() {
        out.push_str(EMPTY_LIST);
        out.push('\n');
    } else {
        out.push_str(&render_table(&snapshot.view));
        out.push_str(&format!("Menampilkan {} buku\n", snapshot.view.len()));
    }
    out
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn render_table(books: &[BookRecord]) -> String {
    let rows: Vec<[String; 6]> = books
        .iter()
        .enumerate()
        .map(|(index, book)| {
            [
                (index + 1).to_string(),
                or_dash(&book.title),
                or_dash(&book.author),
                or_dash(&book.genre),
                or_dash(&book.kind),
                or_dash(&book.location),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&table_line(HEADERS.iter().copied(), &widths));
    for row in &rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let fill = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect();
    format!("{}\n", padded.join(COLUMN_GAP).trim_end())
}

/// Selector options for one facet.
pub fn render_options(label: &str, values: &[String]) -> String {
    if values.is_empty() {
        format!("{label}: {EMPTY_LIST}\n")
    } else {
        format!("{label}: {}\n", values.join(", "))
    }
}

// =============================================================================
// Detail
// =============================================================================

fn field_line(label: &str, value: Option<&str>) -> String {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE);
    format!("{label:<11}: {value}\n")
}

pub fn render_detail(status: &DetailStatus, retry_hint: &str) -> String {
    match status {
        DetailStatus::Loading => format!("{LOADING}\n"),
        DetailStatus::NotFound => format!("{NOT_FOUND}\n"),
        DetailStatus::Error(message) => {
            format!("Gagal memuat buku: {message}\n{retry_hint}\n")
        }
        DetailStatus::Found(book) => {
            let mut out = String::new();
            out.push_str(if book.title.is_empty() {
                NOT_AVAILABLE
            } else {
                book.title.as_str()
            });
            out.push('\n');
            out.push_str(&field_line("Penulis", Some(&book.author)));
            out.push_str(&field_line("Aliran", Some(&book.genre)));
            out.push_str(&field_line("Jenis", Some(&book.kind)));
            out.push_str(&field_line("Lokasi", Some(&book.location)));
            out.push_str(&field_line("Penerbit", book.publisher.as_deref()));
            out.push_str(&field_line("Ilustrator", book.illustrator.as_deref()));
            out.push_str(&field_line("ISBN", book.isbn.as_deref()));
            out.push_str("\nSinopsis\n");
            let synopsis = book
                .synopsis
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NO_SYNOPSIS);
            out.push_str(synopsis);
            out.push('\n');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tbm_core::QueryState;

    fn snapshot(view: Vec<BookRecord>, status: FetchStatus) -> EngineSnapshot {
        EngineSnapshot {
            query: QueryState::default(),
            view: Arc::new(view),
            status,
            generation: 1,
        }
    }

    fn shelf() -> Vec<BookRecord> {
        vec![
            BookRecord::new(1, "Laskar Pelangi", "Andrea Hirata", "TBM RW 01")
                .with_genre("Fiksi")
                .with_kind("Novel"),
            BookRecord::new(2, "Bumi Manusia", "Pramoedya", "TBM RW 02").with_genre("Fiksi"),
        ]
    }

    #[test]
    fn test_render_table() {
        let output = render_list("Semua Buku", &snapshot(shelf(), FetchStatus::Ready), "");
        insta::assert_snapshot!(output, @r"
        Semua Buku
        No  Judul           Penulis        Aliran  Jenis  Lokasi
        1   Laskar Pelangi  Andrea Hirata  Fiksi   Novel  TBM RW 01
        2   Bumi Manusia    Pramoedya      Fiksi   -      TBM RW 02
        Menampilkan 2 buku
        ");
    }

    #[test]
    fn test_render_empty_list() {
        let output = render_list("TBM RW 05", &snapshot(Vec::new(), FetchStatus::Ready), "");
        insta::assert_snapshot!(output, @r"
        TBM RW 05
        Tidak ada data
        ");
    }

    #[test]
    fn test_render_error_with_hint() {
        let status = FetchStatus::Error("Transport error: offline".to_string());
        let output = render_list("Semua Buku", &snapshot(Vec::new(), status), "Ketik `ulang`.");
        insta::assert_snapshot!(output, @r"
        Semua Buku
        Gagal memuat data: Transport error: offline
        Ketik `ulang`.
        ");
    }

    #[test]
    fn test_render_error_keeps_previous_rows() {
        let status = FetchStatus::Error("Store returned 503: busy".to_string());
        let output = render_list("Semua Buku", &snapshot(shelf(), status), "Coba lagi.");
        assert!(output.contains("Gagal memuat data"));
        assert!(output.contains("Laskar Pelangi"));
    }

    #[test]
    fn test_render_detail_missing_fields() {
        let mut book = BookRecord::new(7, "Si Kancil", "Anonim", "TBM Joglo Mutiara")
            .with_genre("Fiksi");
        book.publisher = Some("Balai Pustaka".to_string());
        let output = render_detail(&DetailStatus::Found(book), "");
        insta::assert_snapshot!(output, @r"
        Si Kancil
        Penulis    : Anonim
        Aliran     : Fiksi
        Jenis      : Tidak tersedia
        Lokasi     : TBM Joglo Mutiara
        Penerbit   : Balai Pustaka
        Ilustrator : Tidak tersedia
        ISBN       : Tidak tersedia

        Sinopsis
        Sinopsis tidak tersedia.
        ");
    }

    #[test]
    fn test_render_not_found() {
        assert_eq!(render_detail(&DetailStatus::NotFound, ""), "Buku tidak ditemukan\n");
    }

    #[test]
    fn test_render_count() {
        let stats = LandingStats {
            count: 738,
            source: CountSource::Fallback,
        };
        assert_eq!(render_count(&stats), "Koleksi buku: 738 (perkiraan)");
    }
}
