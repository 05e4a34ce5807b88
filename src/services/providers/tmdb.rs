/// TMDB (The Movie Database) metadata provider
///
/// API Flow:
/// 1. Search: /search/multi → mixed movies, TV shows and people
/// 2. Details: /{movie|tv}/{id} → one full record
///
/// Movies carry `title`/`release_date`, TV shows carry `name`/`first_air_date`;
/// both are folded into a single [`Title`].
use crate::{
    error::{AppError, AppResult},
    models::{MediaType, Title},
    services::providers::{array_field, ensure_success, MetadataProvider},
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

const PROVIDER: &str = "tmdb";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> AppResult<serde_json::Value> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let response = ensure_success(PROVIDER, response).await?;
        let body: serde_json::Value = response.json().await?;
        tracing::debug!(path = %path, response = %body, "Raw TMDB response");

        Ok(body)
    }
}

/// A search hit or detail record as TMDB returns it
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbResult {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl TmdbResult {
    /// Maps to a [`Title`], using `media_type` when the record has no tag of its own
    ///
    /// Returns `None` for records that are not movies or shows.
    pub fn into_title(self, media_type: Option<MediaType>) -> Option<Title> {
        let media_type = match self.media_type.as_deref() {
            Some(tag) => MediaType::from_provider_tag(tag)?,
            None => media_type?,
        };

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        Some(Title {
            id: self.id.to_string(),
            title: non_empty(self.title)
                .or_else(|| non_empty(self.name))
                .unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            release_date: non_empty(self.release_date).or_else(|| non_empty(self.first_air_date)),
            media_type,
            rating: self.vote_average,
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_multi(&self, query: &str) -> AppResult<Vec<Title>> {
        let body = self
            .get(
                "/search/multi",
                &[("query", query), ("include_adult", "false")],
            )
            .await?;

        let titles: Vec<Title> = array_field(PROVIDER, &body, Some("results"))
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<TmdbResult>(item) {
                Ok(result) => {
                    let id = result.id;
                    let title = result.into_title(None);
                    if title.is_none() {
                        tracing::debug!(tmdb_id = id, "Skipping non-title search result");
                    }
                    title
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable TMDB search result");
                    None
                }
            })
            .collect();

        tracing::info!(
            query = %query,
            results = titles.len(),
            provider = PROVIDER,
            "Title search completed"
        );

        Ok(titles)
    }

    async fn fetch_details(&self, id: &str, media_type: MediaType) -> AppResult<Title> {
        let path = format!("/{}/{}", media_type.path_segment(), id);
        let body = self.get(&path, &[]).await?;

        let result: TmdbResult = serde_json::from_value(body).map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse TMDB details response: {}", e))
        })?;

        // Detail records carry no media_type tag of their own
        let title = TmdbResult {
            media_type: None,
            ..result
        }
        .into_title(Some(media_type))
        .ok_or_else(|| AppError::NotFound(format!("{} {}", media_type, id)))?;

        tracing::info!(
            title_id = %title.id,
            media_type = %media_type,
            provider = PROVIDER,
            "Title details fetched"
        );

        Ok(title)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::stub;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn provider_for(status: StatusCode, body: serde_json::Value) -> (TmdbProvider, stub::Requests) {
        let (base_url, requests) = stub::serve(status, body).await;
        let provider = TmdbProvider::new(stub::client(), "tmdb-key".to_string(), base_url);
        (provider, requests)
    }

    #[tokio::test]
    async fn test_search_multi_over_http() {
        let (provider, requests) = provider_for(
            StatusCode::OK,
            json!({
                "page": 1,
                "results": [
                    { "id": 27205, "media_type": "movie", "title": "Inception", "release_date": "2010-07-15" },
                    { "id": 6193, "media_type": "person", "name": "Leonardo DiCaprio" },
                    { "id": 1396, "media_type": "tv", "name": "Breaking Bad", "first_air_date": "2008-01-20" }
                ]
            }),
        )
        .await;

        let titles = provider.search_multi("inception").await.unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].title, "Inception");
        assert_eq!(titles[1].media_type, MediaType::Show);

        let requests = requests.lock().unwrap();
        let (path, params) = &requests[0];
        assert_eq!(path, "/search/multi");
        assert_eq!(params.get("api_key").map(String::as_str), Some("tmdb-key"));
        assert_eq!(params.get("query").map(String::as_str), Some("inception"));
        assert_eq!(params.get("include_adult").map(String::as_str), Some("false"));
    }

    #[tokio::test]
    async fn test_search_multi_missing_results_is_empty() {
        let (provider, _) = provider_for(StatusCode::OK, json!({ "page": 1 })).await;
        let titles = provider.search_multi("inception").await.unwrap();
        assert!(titles.is_empty());
    }

    #[tokio::test]
    async fn test_search_multi_error_status() {
        let (provider, _) = provider_for(
            StatusCode::UNAUTHORIZED,
            json!({ "status_message": "Invalid API key: You must be granted a valid key." }),
        )
        .await;

        let err = provider.search_multi("inception").await.unwrap_err();
        assert!(matches!(&err, AppError::ExternalApi(msg) if msg.contains("401")));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_fetch_details_over_http() {
        let (provider, requests) = provider_for(
            StatusCode::OK,
            json!({ "id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20", "vote_average": 8.9 }),
        )
        .await;

        let title = provider.fetch_details("1396", MediaType::Show).await.unwrap();
        assert_eq!(title.id, "1396");
        assert_eq!(title.title, "Breaking Bad");
        assert_eq!(title.media_type, MediaType::Show);

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].0, "/tv/1396");
        assert_eq!(requests[0].1.get("api_key").map(String::as_str), Some("tmdb-key"));
    }

    #[tokio::test]
    async fn test_fetch_details_not_found_status() {
        let (provider, _) = provider_for(
            StatusCode::NOT_FOUND,
            json!({ "status_code": 34, "status_message": "The resource you requested could not be found." }),
        )
        .await;

        let err = provider
            .fetch_details("999999999", MediaType::Movie)
            .await
            .unwrap_err();
        assert!(matches!(&err, AppError::ExternalApi(msg) if msg.contains("404")));
    }

    fn parse(json: &str) -> TmdbResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_movie_search_result() {
        let result = parse(
            r#"{
                "id": 27205,
                "media_type": "movie",
                "title": "Inception",
                "overview": "Cobb, a skilled thief...",
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                "release_date": "2010-07-15",
                "vote_average": 8.369
            }"#,
        );

        let title = result.into_title(None).unwrap();
        assert_eq!(title.id, "27205");
        assert_eq!(title.title, "Inception");
        assert_eq!(title.media_type, MediaType::Movie);
        assert_eq!(title.release_date.as_deref(), Some("2010-07-15"));
        assert_eq!(title.rating, Some(8.369));
    }

    #[test]
    fn test_show_uses_name_and_first_air_date() {
        let result = parse(
            r#"{
                "id": 1396,
                "media_type": "tv",
                "name": "Breaking Bad",
                "overview": "Walter White...",
                "first_air_date": "2008-01-20"
            }"#,
        );

        let title = result.into_title(None).unwrap();
        assert_eq!(title.title, "Breaking Bad");
        assert_eq!(title.media_type, MediaType::Show);
        assert_eq!(title.release_date.as_deref(), Some("2008-01-20"));
        assert_eq!(title.release_year(), Some(2008));
        assert_eq!(title.rating, None);
    }

    #[test]
    fn test_movie_with_only_name_field() {
        let result = parse(r#"{ "id": 1, "media_type": "movie", "name": "Alias" }"#);
        assert_eq!(result.into_title(None).unwrap().title, "Alias");
    }

    #[test]
    fn test_title_preferred_over_name() {
        let result = parse(r#"{ "id": 1, "media_type": "tv", "title": "T", "name": "N" }"#);
        assert_eq!(result.into_title(None).unwrap().title, "T");
    }

    #[test]
    fn test_person_result_skipped() {
        let result = parse(r#"{ "id": 6193, "media_type": "person", "name": "Leonardo DiCaprio" }"#);
        assert!(result.into_title(None).is_none());
    }

    #[test]
    fn test_detail_record_takes_requested_type() {
        let result = parse(r#"{ "id": 1396, "name": "Breaking Bad" }"#);
        let title = result.into_title(Some(MediaType::Show)).unwrap();
        assert_eq!(title.media_type, MediaType::Show);
        assert_eq!(title.overview, "");
    }

    #[test]
    fn test_untagged_result_without_fallback_skipped() {
        let result = parse(r#"{ "id": 1, "title": "Mystery" }"#);
        assert!(result.into_title(None).is_none());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let provider = TmdbProvider::new(
            reqwest::Client::new(),
            "key".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
        );
        assert_eq!(provider.api_url, "https://api.themoviedb.org/3");
        assert_eq!(provider.name(), "tmdb");
    }
}
