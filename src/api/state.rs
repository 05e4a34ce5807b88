use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    services::{
        providers::{
            build_http_client, AvailabilityProvider, MetadataProvider, TmdbProvider,
            WatchmodeProvider,
        },
        AvailabilityResolver, ContentResolver, InMemoryWatchlist, WatchlistStore,
    },
};

/// Shared application state
///
/// Every dependency is injected, so tests can swap providers and the
/// watchlist backend without touching handlers.
#[derive(Clone)]
pub struct AppState {
    pub content: ContentResolver,
    pub availability: AvailabilityResolver,
    pub watchlist: Arc<dyn WatchlistStore>,
}

impl AppState {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        availability: Arc<dyn AvailabilityProvider>,
        region: &str,
        watchlist: Arc<dyn WatchlistStore>,
    ) -> Self {
        let content = ContentResolver::new(metadata);
        let availability = AvailabilityResolver::new(content.clone(), availability, region);

        Self {
            content,
            availability,
            watchlist,
        }
    }

    /// Wires the real TMDB and Watchmode clients with an empty in-memory watchlist
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = build_http_client(config.http_timeout())?;

        let metadata = Arc::new(TmdbProvider::new(
            http_client.clone(),
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ));
        let availability = Arc::new(WatchmodeProvider::new(
            http_client,
            config.watchmode_api_key.clone(),
            config.watchmode_api_url.clone(),
        ));

        let mut state = Self::new(
            metadata,
            availability,
            &config.region,
            Arc::new(InMemoryWatchlist::new()),
        );
        state.availability = state
            .availability
            .with_detail_lookup(config.detail_lookup);

        tracing::info!(
            region = %config.region,
            detail_lookup = ?config.detail_lookup,
            timeout_secs = config.http_timeout_secs,
            "Application state initialized"
        );

        Ok(state)
    }
}
