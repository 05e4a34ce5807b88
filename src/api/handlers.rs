use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{AvailabilityRecord, MediaType, Title},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Poster size used for `posterUrl` in title responses
const POSTER_SIZE: &str = "w500";

/// A title as returned to clients, with its poster resolved to a full URL
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleView {
    #[serde(flatten)]
    pub title: Title,
    pub poster_url: Option<String>,
}

impl From<Title> for TitleView {
    fn from(title: Title) -> Self {
        let poster_url = title.poster_url(POSTER_SIZE);
        Self { title, poster_url }
    }
}

fn views(titles: Vec<Title>) -> Vec<TitleView> {
    titles.into_iter().map(TitleView::from).collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WatchlistMembership {
    pub id: String,
    pub member: bool,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search movies and TV shows by free text
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<TitleView>>> {
    tracing::info!(request_id = %request_id, query = %params.q, "Processing search request");

    let titles = state.content.search(&params.q).await?;
    Ok(Json(views(titles)))
}

/// Full record of one title
pub async fn get_title(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(MediaType, String)>,
) -> AppResult<Json<TitleView>> {
    let title = state.content.get_details(&id, media_type).await?;
    Ok(Json(title.into()))
}

/// Where a title can be streamed, rented or bought
///
/// The lookup is tied to this request: if the client disconnects, axum drops
/// the handler future, the guard cancels the token and nothing further runs.
pub async fn get_availability(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path((media_type, id)): Path<(MediaType, String)>,
) -> AppResult<Json<AvailabilityRecord>> {
    tracing::info!(
        request_id = %request_id,
        title_id = %id,
        media_type = %media_type,
        "Processing availability request"
    );

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let record = state
        .availability
        .resolve_with_cancel(&id, media_type, &cancel)
        .await?;

    Ok(Json(record))
}

/// Current watchlist in insertion order
pub async fn get_watchlist(State(state): State<AppState>) -> Json<Vec<TitleView>> {
    Json(views(state.watchlist.entries()))
}

/// Add a title to the watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(title): Json<Title>,
) -> (StatusCode, Json<TitleView>) {
    let inserted = state.watchlist.add(title.clone());
    let status = if inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    tracing::info!(
        title_id = %title.id,
        inserted,
        size = state.watchlist.len(),
        "Watchlist add"
    );

    (status, Json(title.into()))
}

/// Whether a title id is on the watchlist
pub async fn watchlist_membership(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<WatchlistMembership> {
    let member = state.watchlist.is_member(&id);
    Json(WatchlistMembership { id, member })
}

/// Remove a title from the watchlist; absent ids are not an error
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> StatusCode {
    state.watchlist.remove(&id);
    StatusCode::NO_CONTENT
}
