//! List command - one catalog page.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use tbm_core::{SortDirection, SortKey};
use tbm_engine::{EngineOptions, ListQueryEngine};

use crate::render::{render_list, render_options};
use crate::routes::{page_title, resolve_route};
use crate::App;

const RETRY_HINT: &str = "Jalankan perintah ini lagi untuk mencoba ulang.";

/// Arguments for the list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Route token (e.g. `tbm-rw-01`) or location name. Defaults to all books.
    #[arg()]
    pub route: Option<String>,

    /// Text matched against title, author, genre, type, and location.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Exact genre ("aliran").
    #[arg(long)]
    pub genre: Option<String>,

    /// Exact book type ("jenis").
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Sort key (`judul`, `penulis`, `aliran`, `jenis`, `lokasi`, ...).
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Sort descending.
    #[arg(long)]
    pub desc: bool,

    /// Also list the genres and types present on the page.
    #[arg(long)]
    pub facets: bool,
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the engine cannot be started.
pub async fn execute(args: ListArgs, app: &App) -> Result<()> {
    let options = EngineOptions::from_config(&app.config);
    let engine = ListQueryEngine::new(Arc::clone(&app.store), options);

    if let Some(term) = args.search {
        engine.set_search_term(term);
    }
    engine.set_genre_filter(args.genre);
    engine.set_type_filter(args.kind);

    let key = args.sort.unwrap_or(options.sort_key);
    let direction = if args.desc {
        SortDirection::Desc
    } else if args.sort.is_some() {
        SortDirection::Asc
    } else {
        options.sort_direction
    };
    engine.set_sort(key, direction);

    let location = resolve_route(args.route.as_deref().unwrap_or_default());
    engine.initialize(location)?;

    let snapshot = engine.settled().await;
    let title = page_title(&snapshot.query.location_filter);
    print!("{}", render_list(title, &snapshot, RETRY_HINT));

    if args.facets {
        print!("{}", render_options("Aliran", &engine.available_genres()));
        print!("{}", render_options("Jenis", &engine.available_types()));
    }
    Ok(())
}
