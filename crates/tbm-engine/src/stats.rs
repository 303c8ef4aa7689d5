//! Landing-page book count.

use std::time::Duration;

use tbm_core::StoreError;
use tbm_store::RecordStore;

/// Where the displayed count came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingStats {
    pub count: u64,
    pub source: CountSource,
}

/// Count the catalog, substituting `fallback` if the store fails.
///
/// Never an error: the count is decorative.
pub async fn load_landing_stats(
    store: &dyn RecordStore,
    fallback: u64,
    timeout: Duration,
) -> LandingStats {
    let outcome = tokio::time::timeout(timeout, store.count())
        .await
        .unwrap_or(Err(StoreError::Timeout { duration: timeout }));

    match outcome {
        Ok(count) => LandingStats {
            count,
            source: CountSource::Live,
        },
        Err(e) => {
            tracing::warn!("Book count unavailable ({}); showing {}", e, fallback);
            LandingStats {
                count: fallback,
                source: CountSource::Fallback,
            }
        }
    }
}
