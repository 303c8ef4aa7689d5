//! Show command - detail page for one book.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;

use tbm_core::BookId;
use tbm_engine::{DetailLookup, DetailRequest};

use crate::render::render_detail;
use crate::App;

const RETRY_HINT: &str = "Jalankan perintah ini lagi untuk mencoba ulang.";

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Book id.
    #[arg()]
    pub id: BookId,
}

/// Execute the show command.
///
/// # Errors
///
/// Never fails; lookup problems are rendered.
pub async fn execute(args: ShowArgs, app: &App) -> Result<()> {
    let lookup = DetailLookup::new(Arc::clone(&app.store), app.config.store.timeout());
    let status = lookup.resolve(DetailRequest::by_id(args.id)).await;
    print!("{}", render_detail(&status, RETRY_HINT));
    Ok(())
}
