/// Upstream provider abstraction
///
/// Two REST providers feed the app: a metadata provider (TMDB) that knows what a
/// title is, and an availability provider (Watchmode) that knows where it can be
/// watched. Each sits behind its own trait so the resolvers can be exercised
/// without the network.
use crate::{
    error::{AppError, AppResult},
    models::{AvailabilitySource, MediaType, ProviderMatch, Title, TitleLookup},
};

pub mod tmdb;
pub mod watchmode;

pub use tmdb::TmdbProvider;
pub use watchmode::WatchmodeProvider;

/// Trait for title metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Searches movies and TV shows by free text, adult content excluded
    async fn search_multi(&self, query: &str) -> AppResult<Vec<Title>>;

    /// Fetches the full record of one title
    async fn fetch_details(&self, id: &str, media_type: MediaType) -> AppResult<Title>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for streaming availability providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Finds the provider's own entries for a title by name, year and type
    async fn search_by_name(&self, lookup: &TitleLookup) -> AppResult<Vec<ProviderMatch>>;

    /// Lists every source for one provider-native title id in a region
    async fn fetch_sources(
        &self,
        provider_title_id: u64,
        region: &str,
    ) -> AppResult<Vec<AvailabilitySource>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Builds the HTTP client shared by every provider
pub fn build_http_client(timeout: Option<std::time::Duration>) -> AppResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))
}

/// Turns a non-2xx response into an `ExternalApi` error carrying status and body
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(
        provider = provider,
        status = %status,
        body = %body,
        "External API request failed"
    );
    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        provider, status, body
    )))
}

/// Takes the array stored under `field`, or an empty list when it is missing
///
/// Providers occasionally answer 200 with an unexpected shape; that is logged
/// and treated as "no results" rather than failing the request.
pub(crate) fn array_field(
    provider: &str,
    body: &serde_json::Value,
    field: Option<&str>,
) -> Vec<serde_json::Value> {
    let value = match field {
        Some(field) => &body[field],
        None => body,
    };

    match value.as_array() {
        Some(items) => items.clone(),
        None => {
            tracing::warn!(
                provider = provider,
                field = field.unwrap_or("<root>"),
                "Malformed response: expected an array, treating as empty"
            );
            Vec::new()
        }
    }
}
