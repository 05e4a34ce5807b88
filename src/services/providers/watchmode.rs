/// Watchmode API provider
///
/// Watchmode keeps its own title ids, so availability takes two calls.
///
/// API Flow:
/// 1. Title Search: /search/?search_field=name → Watchmode ID candidates
/// 2. Sources: /title/{watchmode_id}/sources/?country= → every streaming source
use crate::{
    error::AppResult,
    models::{AvailabilitySource, ProviderMatch, TitleLookup},
    services::providers::{array_field, ensure_success, AvailabilityProvider},
};
use reqwest::Client as HttpClient;

const PROVIDER: &str = "watchmode";

#[derive(Clone)]
pub struct WatchmodeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl WatchmodeProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Query parameters of a name search; `year` is left out when unknown
    fn search_params(lookup: &TitleLookup) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("search_field", "name".to_string()),
            ("search_value", lookup.title.clone()),
            ("content_type", lookup.media_type.content_type().to_string()),
        ];
        if let Some(year) = lookup.year {
            params.push(("year", year.to_string()));
        }
        params
    }

    fn decode_all<T: serde::de::DeserializeOwned>(items: Vec<serde_json::Value>) -> Vec<T> {
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!(error = %e, item = %item, "Skipping undecodable Watchmode record");
                    None
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl AvailabilityProvider for WatchmodeProvider {
    async fn search_by_name(&self, lookup: &TitleLookup) -> AppResult<Vec<ProviderMatch>> {
        let url = format!("{}/search/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(&Self::search_params(lookup))
            .send()
            .await?;

        let response = ensure_success(PROVIDER, response).await?;
        let body: serde_json::Value = response.json().await?;
        tracing::debug!(response = %body, "Raw Watchmode search response");

        let matches: Vec<ProviderMatch> =
            Self::decode_all(array_field(PROVIDER, &body, Some("title_results")));

        tracing::info!(
            title = %lookup.title,
            year = ?lookup.year,
            content_type = lookup.media_type.content_type(),
            results = matches.len(),
            provider = PROVIDER,
            "Title search completed"
        );

        Ok(matches)
    }

    async fn fetch_sources(
        &self,
        provider_title_id: u64,
        region: &str,
    ) -> AppResult<Vec<AvailabilitySource>> {
        let url = format!("{}/title/{}/sources/", self.api_url, provider_title_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str()), ("country", region)])
            .send()
            .await?;

        let response = ensure_success(PROVIDER, response).await?;
        let body: serde_json::Value = response.json().await?;
        tracing::debug!(response = %body, "Raw Watchmode sources response");

        // The sources endpoint answers with a bare array
        let sources: Vec<AvailabilitySource> = Self::decode_all(array_field(PROVIDER, &body, None));

        tracing::info!(
            watchmode_id = provider_title_id,
            region = %region,
            sources = sources.len(),
            provider = PROVIDER,
            "Sources fetched"
        );

        Ok(sources)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::MediaType;
    use crate::services::providers::stub;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn provider_for(
        status: StatusCode,
        body: serde_json::Value,
    ) -> (WatchmodeProvider, stub::Requests) {
        let (base_url, requests) = stub::serve(status, body).await;
        let provider = WatchmodeProvider::new(stub::client(), "wm-key".to_string(), base_url);
        (provider, requests)
    }

    #[tokio::test]
    async fn test_search_by_name_over_http() {
        let (provider, requests) = provider_for(
            StatusCode::OK,
            json!({
                "title_results": [
                    { "id": 3173903, "name": "Inception", "type": "movie", "year": 2010 }
                ],
                "people_results": []
            }),
        )
        .await;

        let matches = provider
            .search_by_name(&lookup(Some(2010), MediaType::Movie))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 3173903);

        let requests = requests.lock().unwrap();
        let (path, params) = &requests[0];
        assert_eq!(path, "/search/");
        assert_eq!(params.get("apiKey").map(String::as_str), Some("wm-key"));
        assert_eq!(params.get("search_field").map(String::as_str), Some("name"));
        assert_eq!(params.get("search_value").map(String::as_str), Some("Inception"));
        assert_eq!(params.get("content_type").map(String::as_str), Some("movie"));
        assert_eq!(params.get("year").map(String::as_str), Some("2010"));
    }

    #[tokio::test]
    async fn test_search_by_name_omits_unknown_year() {
        let (provider, requests) =
            provider_for(StatusCode::OK, json!({ "title_results": [] })).await;

        let matches = provider
            .search_by_name(&lookup(None, MediaType::Show))
            .await
            .unwrap();
        assert!(matches.is_empty());

        let requests = requests.lock().unwrap();
        let params = &requests[0].1;
        assert!(!params.contains_key("year"));
        assert_eq!(params.get("content_type").map(String::as_str), Some("tv"));
    }

    #[tokio::test]
    async fn test_search_by_name_missing_results_is_empty() {
        let (provider, _) = provider_for(StatusCode::OK, json!({ "people_results": [] })).await;
        let matches = provider
            .search_by_name(&lookup(Some(2010), MediaType::Movie))
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sources_over_http() {
        let (provider, requests) = provider_for(
            StatusCode::OK,
            json!([
                { "source_id": 203, "name": "Netflix", "type": "sub", "region": "US", "web_url": "https://netflix.com/x", "format": "HD" },
                { "source_id": 24, "name": "iTunes", "type": "rent", "region": "US", "web_url": "https://itunes.apple.com/x", "format": "SD", "price": 2.99 }
            ]),
        )
        .await;

        let sources = provider.fetch_sources(3173903, "US").await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].format.as_deref(), Some("HD"));
        assert_eq!(sources[1].price, Some(2.99));

        let requests = requests.lock().unwrap();
        let (path, params) = &requests[0];
        assert_eq!(path, "/title/3173903/sources/");
        assert_eq!(params.get("apiKey").map(String::as_str), Some("wm-key"));
        assert_eq!(params.get("country").map(String::as_str), Some("US"));
    }

    #[tokio::test]
    async fn test_fetch_sources_non_array_body_is_empty() {
        let (provider, _) = provider_for(
            StatusCode::OK,
            json!({ "success": false, "statusMessage": "unexpected" }),
        )
        .await;

        let sources = provider.fetch_sources(3173903, "US").await.unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sources_error_status() {
        let (provider, _) = provider_for(
            StatusCode::UNAUTHORIZED,
            json!({ "success": false, "statusCode": 401, "statusMessage": "Invalid API key" }),
        )
        .await;

        let err = provider.fetch_sources(3173903, "US").await.unwrap_err();
        assert!(matches!(&err, AppError::ExternalApi(msg) if msg.contains("401")));
    }

    fn lookup(year: Option<i32>, media_type: MediaType) -> TitleLookup {
        TitleLookup {
            title: "Inception".to_string(),
            year,
            media_type,
            region: "US".to_string(),
        }
    }

    #[test]
    fn test_search_params_with_year() {
        let params = WatchmodeProvider::search_params(&lookup(Some(2010), MediaType::Movie));
        assert_eq!(
            params,
            vec![
                ("search_field", "name".to_string()),
                ("search_value", "Inception".to_string()),
                ("content_type", "movie".to_string()),
                ("year", "2010".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_without_year() {
        let params = WatchmodeProvider::search_params(&lookup(None, MediaType::Show));
        assert!(params.iter().all(|(key, _)| *key != "year"));
        assert!(params.contains(&("content_type", "tv".to_string())));
    }

    #[test]
    fn test_decode_all_skips_bad_records() {
        let items = vec![
            serde_json::json!({ "id": 12345, "name": "Inception", "type": "movie", "year": 2010 }),
            serde_json::json!({ "name": "no id" }),
        ];
        let matches: Vec<ProviderMatch> = WatchmodeProvider::decode_all(items);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, 12345);
    }

    #[test]
    fn test_decode_sources() {
        let items = vec![
            serde_json::json!({ "source_id": 203, "name": "Netflix", "type": "sub", "region": "US", "web_url": "https://netflix.com/x" }),
            serde_json::json!({ "source_id": 349, "name": "iTunes", "type": "rent", "region": "US", "web_url": "https://itunes.apple.com/x", "price": 3.99 }),
        ];
        let sources: Vec<AvailabilitySource> = WatchmodeProvider::decode_all(items);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].price, Some(3.99));
    }
}
