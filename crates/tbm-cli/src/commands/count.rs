//! Count command - landing page statistic.

use anyhow::Result;

use tbm_engine::load_landing_stats;

use crate::render::render_count;
use crate::App;

/// Execute the count command.
///
/// # Errors
///
/// Never fails; an unreachable store falls back to the configured count.
pub async fn execute(app: &App) -> Result<()> {
    let stats = load_landing_stats(
        app.store.as_ref(),
        app.config.catalog.fallback_count,
        app.config.store.timeout(),
    )
    .await;
    println!("{}", render_count(&stats));
    Ok(())
}
