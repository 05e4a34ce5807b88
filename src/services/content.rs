use crate::{
    error::{AppError, AppResult},
    models::{MediaType, Title},
    services::providers::MetadataProvider,
};
use std::sync::Arc;

/// Resolves free text and ids into normalized [`Title`]s
///
/// Thin layer over the configured [`MetadataProvider`]: validates input and
/// logs. Provider errors propagate unchanged; nothing is retried.
#[derive(Clone)]
pub struct ContentResolver {
    provider: Arc<dyn MetadataProvider>,
}

impl ContentResolver {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<Title>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let titles = self.provider.search_multi(query).await?;

        tracing::debug!(
            query = %query,
            results = titles.len(),
            provider = self.provider.name(),
            "Content search resolved"
        );

        Ok(titles)
    }

    pub async fn get_details(&self, id: &str, media_type: MediaType) -> AppResult<Title> {
        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::InvalidInput("Title id cannot be empty".to_string()));
        }

        self.provider.fetch_details(id, media_type).await
    }
}
