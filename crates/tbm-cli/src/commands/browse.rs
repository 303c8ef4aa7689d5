//! Browse command - interactive session over one list page.
//!
//! Each input line is one command. The engine fetches in the background;
//! the session waits for it to settle before printing the page.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use tbm_core::{LocationFilter, SortKey};
use tbm_engine::{DetailLookup, DetailRequest, EngineOptions, ListQueryEngine};

use crate::render::{render_detail, render_list, render_options};
use crate::routes::{page_title, resolve_route};
use crate::App;

const RETRY_HINT: &str = "Ketik `ulang` untuk mencoba lagi.";

const HELP: &str = "\
Perintah:
  cari [TEKS]        cari judul, penulis, aliran, jenis, atau lokasi
  aliran [NILAI]     saring aliran; tanpa nilai tampilkan pilihan, `semua` hapus
  jenis [NILAI]      saring jenis; tanpa nilai tampilkan pilihan, `semua` hapus
  lokasi RUTE        pindah lokasi (mis. tbm-rw-01, semua-buku)
  urut KOLOM         urutkan; kolom yang sama membalik arah
  lihat NO           detail buku pada baris NO
  ulang              muat ulang data
  bantuan            tampilkan bantuan ini
  keluar             selesai
";

const CLEAR_FILTER: &str = "semua";

/// Arguments for the browse command.
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Route token (e.g. `tbm-rw-01`) or location name. Defaults to all books.
    #[arg()]
    pub route: Option<String>,
}

// =============================================================================
// Session Commands
// =============================================================================

/// Facet a filter command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Genre,
    Type,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Search(String),
    /// `None` lists the available values.
    Filter(Facet, Option<FilterValue>),
    Location(LocationFilter),
    Sort(SortKey),
    /// 1-based row number in the current view.
    Show(usize),
    Refetch,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Clear,
    Exact(String),
}

impl SessionCommand {
    /// Parse one line. Empty lines parse to `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "cari" => SessionCommand::Search(rest.to_string()),
            "aliran" => SessionCommand::Filter(Facet::Genre, filter_value(rest)),
            "jenis" => SessionCommand::Filter(Facet::Type, filter_value(rest)),
            "lokasi" => {
                if rest.is_empty() {
                    return Err("lokasi membutuhkan rute, mis. `lokasi tbm-rw-01`".to_string());
                }
                SessionCommand::Location(resolve_route(rest))
            }
            "urut" => SessionCommand::Sort(rest.parse()?),
            "lihat" => {
                let row = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|row| *row > 0)
                    .ok_or_else(|| format!("nomor baris tidak valid: {rest:?}"))?;
                SessionCommand::Show(row)
            }
            "ulang" => SessionCommand::Refetch,
            "bantuan" | "help" | "?" => SessionCommand::Help,
            "keluar" | "exit" | "quit" => SessionCommand::Quit,
            other => return Err(format!("perintah tidak dikenal: {other}")),
        };
        Ok(Some(command))
    }
}

fn filter_value(rest: &str) -> Option<FilterValue> {
    if rest.is_empty() {
        None
    } else if rest.eq_ignore_ascii_case(CLEAR_FILTER) {
        Some(FilterValue::Clear)
    } else {
        Some(FilterValue::Exact(rest.to_string()))
    }
}

// =============================================================================
// Session
// =============================================================================

/// What the loop should do after a command.
enum Step {
    /// Print the page once the engine settles.
    Page,
    Print(String),
    Quit,
}

struct Session {
    engine: ListQueryEngine,
    lookup: DetailLookup,
}

impl Session {
    async fn apply(&self, command: SessionCommand) -> Step {
        match command {
            SessionCommand::Search(term) => {
                self.engine.set_search_term(term);
                Step::Page
            }
            SessionCommand::Filter(facet, None) => {
                let (label, values) = match facet {
                    Facet::Genre => ("Aliran", self.engine.available_genres()),
                    Facet::Type => ("Jenis", self.engine.available_types()),
                };
                Step::Print(render_options(label, &values))
            }
            SessionCommand::Filter(facet, Some(value)) => {
                let value = match value {
                    FilterValue::Clear => None,
                    FilterValue::Exact(v) => Some(v),
                };
                match facet {
                    Facet::Genre => self.engine.set_genre_filter(value),
                    Facet::Type => self.engine.set_type_filter(value),
                }
                Step::Page
            }
            SessionCommand::Location(location) => {
                self.engine.navigate_location(location);
                Step::Page
            }
            SessionCommand::Sort(key) => {
                self.engine.toggle_sort(key);
                Step::Page
            }
            SessionCommand::Show(row) => Step::Print(self.detail(row).await),
            SessionCommand::Refetch => {
                self.engine.refetch();
                Step::Page
            }
            SessionCommand::Help => Step::Print(HELP.to_string()),
            SessionCommand::Quit => Step::Quit,
        }
    }

    async fn page(&self) -> String {
        let snapshot = self.engine.settled().await;
        let title = page_title(&snapshot.query.location_filter);
        render_list(title, &snapshot, RETRY_HINT)
    }

    async fn detail(&self, row: usize) -> String {
        let view = self.engine.derived_view();
        match view.get(row - 1) {
            Some(book) => {
                let status = self.lookup.resolve(DetailRequest::with_record(book.clone())).await;
                render_detail(&status, RETRY_HINT)
            }
            None => format!("Tidak ada baris {row}\n"),
        }
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Execute the browse command.
///
/// # Errors
///
/// Returns an error if the engine cannot be started or stdin fails.
pub async fn execute(args: BrowseArgs, app: &App) -> Result<()> {
    let options = EngineOptions::from_config(&app.config);
    let session = Session {
        engine: ListQueryEngine::new(Arc::clone(&app.store), options),
        lookup: DetailLookup::new(Arc::clone(&app.store), options.timeout),
    };

    let location = resolve_route(args.route.as_deref().unwrap_or_default());
    session.engine.initialize(location)?;
    print!("{}", session.page().await);
    println!("Ketik `bantuan` untuk daftar perintah.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match SessionCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match session.apply(command).await {
                Step::Page => print!("{}", session.page().await),
                Step::Print(text) => print!("{text}"),
                Step::Quit => break,
            },
            Err(message) => println!("{message}"),
        }
        prompt()?;
    }

    session.engine.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tbm_core::{BookRecord, StoreError};
    use tbm_store::MemoryStore;

    fn parse(line: &str) -> SessionCommand {
        SessionCommand::parse(line).unwrap().unwrap()
    }

    fn catalog() -> MemoryStore {
        MemoryStore::new(vec![
            BookRecord::new(1, "Laskar Pelangi", "Andrea Hirata", "TBM RW 01").with_genre("Fiksi"),
            BookRecord::new(2, "Atlas Dunia", "Tim Redaksi", "TBM RW 02").with_genre("Nonfiksi"),
            BookRecord::new(3, "Bumi Manusia", "Pramoedya", "TBM RW 01").with_genre("Fiksi"),
        ])
    }

    async fn started(store: &MemoryStore) -> Session {
        let store: Arc<MemoryStore> = Arc::new(store.clone());
        let session = Session {
            engine: ListQueryEngine::new(store.clone(), EngineOptions::default()),
            lookup: DetailLookup::new(store, Duration::from_secs(1)),
        };
        session.engine.initialize(LocationFilter::All).unwrap();
        session.engine.settled().await;
        session
    }

    #[test]
    fn test_parse_search_keeps_spaces() {
        assert_eq!(
            parse("cari  laskar pelangi "),
            SessionCommand::Search("laskar pelangi".to_string())
        );
        assert_eq!(parse("cari"), SessionCommand::Search(String::new()));
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(parse("aliran"), SessionCommand::Filter(Facet::Genre, None));
        assert_eq!(
            parse("aliran Fiksi"),
            SessionCommand::Filter(Facet::Genre, Some(FilterValue::Exact("Fiksi".to_string())))
        );
        assert_eq!(
            parse("jenis semua"),
            SessionCommand::Filter(Facet::Type, Some(FilterValue::Clear))
        );
    }

    #[test]
    fn test_parse_location_uses_routes() {
        assert_eq!(
            parse("lokasi tbm-rw-04"),
            SessionCommand::Location(LocationFilter::Site("TBM RW 04".to_string()))
        );
        assert!(SessionCommand::parse("lokasi").is_err());
    }

    #[test]
    fn test_parse_sort_and_rows() {
        assert_eq!(parse("urut penulis"), SessionCommand::Sort(SortKey::Author));
        assert!(SessionCommand::parse("urut rating").is_err());
        assert_eq!(parse("lihat 3"), SessionCommand::Show(3));
        assert!(SessionCommand::parse("lihat 0").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(parse("ULANG"), SessionCommand::Refetch);
        assert_eq!(parse("keluar"), SessionCommand::Quit);
        assert!(SessionCommand::parse("hapus").is_err());
    }

    #[tokio::test]
    async fn test_clear_filter_restores_full_list() {
        let session = started(&catalog()).await;

        session.apply(parse("aliran Fiksi")).await;
        let page = session.page().await;
        assert!(page.contains("Menampilkan 2 buku"), "{page}");
        assert_eq!(session.engine.query().genre_filter.as_deref(), Some("Fiksi"));

        session.apply(parse("aliran semua")).await;
        let page = session.page().await;
        assert!(page.contains("Menampilkan 3 buku"), "{page}");
        assert_eq!(session.engine.query().genre_filter, None);
    }

    #[tokio::test]
    async fn test_filter_without_value_lists_options() {
        let session = started(&catalog()).await;

        let Step::Print(text) = session.apply(parse("aliran")).await else {
            panic!("expected options");
        };
        assert_eq!(text, "Aliran: Fiksi, Nonfiksi\n");
    }

    #[tokio::test]
    async fn test_location_change_resets_search_and_filters() {
        let session = started(&catalog()).await;
        session.apply(parse("cari bumi")).await;
        session.apply(parse("jenis Novel")).await;
        session.page().await;

        session.apply(parse("lokasi tbm-rw-01")).await;
        let page = session.page().await;
        let query = session.engine.query();
        assert_eq!(query.search_term, "");
        assert_eq!(query.type_filter, None);
        assert_eq!(query.location_filter, LocationFilter::Site("TBM RW 01".to_string()));
        assert!(page.starts_with("TBM RW 01\n"), "{page}");
        assert!(page.contains("Menampilkan 2 buku"), "{page}");
    }

    #[tokio::test]
    async fn test_show_row_uses_listed_record() {
        let store = catalog();
        let session = started(&store).await;

        // Any store call now fails, so a found book must be the carried row.
        store.fail_with(StoreError::Transport("offline".to_string()));
        let Step::Print(detail) = session.apply(parse("lihat 1")).await else {
            panic!("expected detail");
        };
        assert!(detail.starts_with("Atlas Dunia\n"), "{detail}");
        assert!(detail.contains("Tim Redaksi"));

        let detail = session.detail(9).await;
        assert_eq!(detail, "Tidak ada baris 9\n");
    }
}
