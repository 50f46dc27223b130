//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::cookies;
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use summaries_core::domain::{Chapter, NavigationDirection, NewSummary, Summary};
use summaries_core::ports::PortError;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_summary_handler,
        list_summaries_handler,
        get_summary_handler,
        first_chapter_handler,
        next_chapter_handler,
        previous_chapter_handler,
        current_chapter_handler,
        finish_summary_handler,
        all_cookies_handler,
    ),
    components(
        schemas(
            NewSummaryRequest,
            NewChapterRequest,
            ChapterResponse,
            SummaryResponse,
            SummaryOverviewResponse
        )
    ),
    tags(
        (name = "Reading Summaries API", description = "API endpoints for creating summaries and paging through their chapters.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// The payload for creating a new summary.
#[derive(Deserialize, ToSchema)]
pub struct NewSummaryRequest {
    title: String,
    /// Chapter contents in reading order.
    chapters: Vec<NewChapterRequest>,
}

#[derive(Deserialize, ToSchema)]
pub struct NewChapterRequest {
    content: String,
}

/// One chapter of a summary.
#[derive(Serialize, ToSchema)]
pub struct ChapterResponse {
    position: u32,
    content: String,
}

impl From<&Chapter> for ChapterResponse {
    fn from(chapter: &Chapter) -> Self {
        Self {
            position: chapter.position,
            content: chapter.content.clone(),
        }
    }
}

/// A full summary with every chapter.
#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    chapters: Vec<ChapterResponse>,
}

impl From<&Summary> for SummaryResponse {
    fn from(summary: &Summary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            created_at: summary.created_at,
            chapters: summary.chapters.iter().map(ChapterResponse::from).collect(),
        }
    }
}

/// The listing projection: a summary reduced to its first chapter.
#[derive(Serialize, ToSchema)]
pub struct SummaryOverviewResponse {
    id: Uuid,
    title: String,
    first_chapter: Option<ChapterResponse>,
}

impl From<&Summary> for SummaryOverviewResponse {
    fn from(summary: &Summary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            first_chapter: summary.first_chapter().map(ChapterResponse::from),
        }
    }
}

/// Query parameters for the next/previous chapter endpoints.
#[derive(Deserialize)]
pub struct NavigationParams {
    #[serde(rename = "currentChapter")]
    current_chapter: i32,
}

/// Query parameters for the finish endpoint.
#[derive(Deserialize)]
pub struct FinishParams {
    #[serde(rename = "currentPage")]
    current_page: i32,
}

//=========================================================================================
// Shared Handler Helpers
//=========================================================================================

/// Maps a store failure onto the HTTP boundary: unknown ids become 404,
/// anything else is logged and surfaced as a 500.
fn store_error(err: PortError) -> (StatusCode, String) {
    match err {
        PortError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        other => {
            error!("Summary store failure: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal storage error".to_string(),
            )
        }
    }
}

/// The shared next/previous flow: load the summary, resolve one step, and
/// refresh the reading cookie with the resolved chapter's ordinal.
async fn navigate_summary(
    state: Arc<AppState>,
    summary_id: Uuid,
    current_chapter: i32,
    direction: NavigationDirection,
) -> Result<Response, (StatusCode, String)> {
    let summary = state
        .store
        .get_summary_by_id(summary_id)
        .await
        .map_err(store_error)?;

    let chapter = match direction.resolve(&summary.chapters, current_chapter) {
        Some(chapter) => chapter,
        None => return Err((StatusCode::NOT_FOUND, "No such chapter".to_string())),
    };

    let cookie = cookies::build_cookie(cookies::READING_COOKIE, &chapter.position.to_string());
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ChapterResponse::from(chapter)),
    )
        .into_response())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new summary.
///
/// The chapters arrive in reading order; their 1-based positions are
/// assigned from that order.
#[utoipa::path(
    post,
    path = "/api/summaries",
    request_body = NewSummaryRequest,
    responses(
        (status = 201, description = "Summary created; Location points at the new resource"),
        (status = 400, description = "Invalid payload (blank title or no chapters)"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_summary_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewSummaryRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the payload.
    if request.title.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Summary title must not be blank".to_string(),
        ));
    }
    if request.chapters.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "A summary needs at least one chapter".to_string(),
        ));
    }

    // 2. Persist and point the client at the new resource.
    let new_summary = NewSummary {
        title: request.title,
        chapters: request.chapters.into_iter().map(|c| c.content).collect(),
    };
    let summary = state
        .store
        .create_summary(new_summary)
        .await
        .map_err(store_error)?;

    let location = format!("/api/summaries/{}", summary.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// List every summary, projected to its first chapter.
#[utoipa::path(
    get,
    path = "/api/summaries",
    responses(
        (status = 200, description = "All summaries with their first chapters", body = [SummaryOverviewResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_summaries_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summaries = state.store.list_summaries().await.map_err(store_error)?;
    let overview: Vec<SummaryOverviewResponse> = summaries
        .iter()
        .map(SummaryOverviewResponse::from)
        .collect();
    Ok(Json(overview))
}

/// Fetch one summary with all of its chapters.
#[utoipa::path(
    get,
    path = "/api/summaries/{id}",
    params(
        ("id" = Uuid, Path, description = "The summary identifier")
    ),
    responses(
        (status = 200, description = "The full summary", body = SummaryResponse),
        (status = 404, description = "Unknown summary id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = state
        .store
        .get_summary_by_id(summary_id)
        .await
        .map_err(store_error)?;
    Ok(Json(SummaryResponse::from(&summary)))
}

/// The first chapter of a summary, where reading starts.
#[utoipa::path(
    get,
    path = "/api/summary/{id}/chapter",
    params(
        ("id" = Uuid, Path, description = "The summary identifier")
    ),
    responses(
        (status = 200, description = "The first chapter", body = ChapterResponse),
        (status = 404, description = "Unknown summary id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn first_chapter_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = state
        .store
        .get_summary_by_id(summary_id)
        .await
        .map_err(store_error)?;
    let chapter = summary
        .first_chapter()
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Summary has no chapters".to_string()))?;
    Ok(Json(ChapterResponse::from(chapter)))
}

/// Advance one chapter and refresh the reading cookie.
#[utoipa::path(
    post,
    path = "/api/summary/{id}/next-chapter",
    params(
        ("id" = Uuid, Path, description = "The summary identifier"),
        ("currentChapter" = i32, Query, description = "The chapter the reader is on")
    ),
    responses(
        (status = 200, description = "The next chapter; the chapter cookie now records it", body = ChapterResponse),
        (status = 404, description = "Unknown summary id, or no next chapter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn next_chapter_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
    Query(params): Query<NavigationParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    navigate_summary(
        state,
        summary_id,
        params.current_chapter,
        NavigationDirection::Next,
    )
    .await
}

/// Step back one chapter and refresh the reading cookie.
#[utoipa::path(
    post,
    path = "/api/summary/{id}/previous-chapter",
    params(
        ("id" = Uuid, Path, description = "The summary identifier"),
        ("currentChapter" = i32, Query, description = "The chapter the reader is on")
    ),
    responses(
        (status = 200, description = "The previous chapter; the chapter cookie now records it", body = ChapterResponse),
        (status = 404, description = "Unknown summary id, or no previous chapter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn previous_chapter_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
    Query(params): Query<NavigationParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    navigate_summary(
        state,
        summary_id,
        params.current_chapter,
        NavigationDirection::Previous,
    )
    .await
}

/// Resume reading: the chapter recorded in the cookie, or the first
/// chapter when no cookie is present.
#[utoipa::path(
    get,
    path = "/api/summary/{id}/current",
    params(
        ("id" = Uuid, Path, description = "The summary identifier")
    ),
    responses(
        (status = 200, description = "The recorded chapter marker, or the first chapter when no cookie was sent", body = ChapterResponse),
        (status = 404, description = "Unknown summary id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn current_chapter_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, String)> {
    let summary = state
        .store
        .get_summary_by_id(summary_id)
        .await
        .map_err(store_error)?;

    match cookies::cookie_value(&headers, cookies::READING_COOKIE) {
        // First visit: serve the first chapter and record it.
        None => {
            let chapter = summary
                .first_chapter()
                .ok_or_else(|| (StatusCode::NOT_FOUND, "Summary has no chapters".to_string()))?;
            let cookie =
                cookies::build_cookie(cookies::READING_COOKIE, &chapter.position.to_string());
            Ok((
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(ChapterResponse::from(chapter)),
            )
                .into_response())
        }
        // The recorded marker is echoed verbatim. It is not validated
        // against the summary's chapter range.
        Some(marker) => Ok(marker.to_string().into_response()),
    }
}

/// Finish a summary. Only a reader who has paged past the last chapter may
/// finish; the response then serves the first chapter again.
#[utoipa::path(
    post,
    path = "/api/summary/{id}/finish",
    params(
        ("id" = Uuid, Path, description = "The summary identifier"),
        ("currentPage" = i32, Query, description = "The page the reader is on")
    ),
    responses(
        (status = 200, description = "The page overran the chapter count; the first chapter is served again", body = ChapterResponse),
        (status = 400, description = "The reader has not overrun the chapter count"),
        (status = 404, description = "Unknown summary id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn finish_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(summary_id): Path<Uuid>,
    Query(params): Query<FinishParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let summary = state
        .store
        .get_summary_by_id(summary_id)
        .await
        .map_err(store_error)?;

    if i64::from(params.current_page) > summary.chapters.len() as i64 {
        let chapter = summary
            .first_chapter()
            .ok_or_else(|| (StatusCode::NOT_FOUND, "Summary has no chapters".to_string()))?;
        return Ok(Json(ChapterResponse::from(chapter)));
    }
    Err((StatusCode::BAD_REQUEST, "cannot finish summary".to_string()))
}

/// Debug endpoint: every cookie the request carried, as `name=value` pairs.
#[utoipa::path(
    get,
    path = "/all-cookies",
    responses(
        (status = 200, description = "The request cookies, or the literal string 'No cookies'", body = String)
    )
)]
pub async fn all_cookies_handler(headers: HeaderMap) -> String {
    cookies::format_all(&headers).unwrap_or_else(|| "No cookies".to_string())
}

//=========================================================================================
// Handler Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryAdapter;
    use crate::config::{Config, StoreKind};
    use axum::body::to_bytes;
    use axum::http::HeaderValue;
    use tracing::Level;

    fn test_config() -> Config {
        Config {
            bind_address: ([127, 0, 0, 1], 0).into(),
            store: StoreKind::Memory,
            database_url: None,
            log_level: Level::INFO,
            cors_allowed_origin: "http://localhost:3000".to_string(),
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            store: Arc::new(MemoryAdapter::new()),
            config: Arc::new(test_config()),
        })
    }

    async fn seed_summary(state: &Arc<AppState>, title: &str, chapter_count: usize) -> Summary {
        let chapters = (1..=chapter_count).map(|n| format!("chapter {n}")).collect();
        state
            .store
            .create_summary(NewSummary {
                title: title.to_string(),
                chapters,
            })
            .await
            .unwrap()
    }

    fn into_response<T: IntoResponse, E: IntoResponse>(result: Result<T, E>) -> Response {
        match result {
            Ok(value) => value.into_response(),
            Err(err) => err.into_response(),
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie_of(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn create_summary_reports_the_new_location() {
        let state = test_state();
        let request = NewSummaryRequest {
            title: "dune".to_string(),
            chapters: vec![NewChapterRequest {
                content: "arrakis".to_string(),
            }],
        };

        let response =
            into_response(create_summary_handler(State(state.clone()), Json(request)).await);
        assert_eq!(response.status(), StatusCode::CREATED);

        // The Location header dereferences to the stored aggregate.
        let location = response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(location.starts_with("/api/summaries/"));
        let id: Uuid = location.rsplit('/').next().unwrap().parse().unwrap();
        let loaded = state.store.get_summary_by_id(id).await.unwrap();
        assert_eq!(loaded.title, "dune");
    }

    #[tokio::test]
    async fn create_summary_rejects_invalid_payloads() {
        let state = test_state();

        let blank_title = NewSummaryRequest {
            title: "   ".to_string(),
            chapters: vec![NewChapterRequest {
                content: "x".to_string(),
            }],
        };
        let response =
            into_response(create_summary_handler(State(state.clone()), Json(blank_title)).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let no_chapters = NewSummaryRequest {
            title: "dune".to_string(),
            chapters: Vec::new(),
        };
        let response =
            into_response(create_summary_handler(State(state), Json(no_chapters)).await);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_projects_each_summary_to_its_first_chapter() {
        let state = test_state();
        seed_summary(&state, "first", 3).await;
        seed_summary(&state, "second", 2).await;

        let response = into_response(list_summaries_handler(State(state)).await);
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        for entry in entries {
            assert_eq!(entry["first_chapter"]["position"], 1);
            assert!(entry.get("chapters").is_none());
        }
    }

    #[tokio::test]
    async fn get_summary_returns_the_full_aggregate() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 2).await;

        let response = into_response(get_summary_handler(State(state), Path(summary.id)).await);
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "dune");
        assert_eq!(body["chapters"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn first_chapter_of_unknown_summary_is_not_found() {
        let state = test_state();
        let response =
            into_response(first_chapter_handler(State(state), Path(Uuid::new_v4())).await);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn next_chapter_advances_and_records_the_cookie() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            next_chapter_handler(
                State(state),
                Path(summary.id),
                Query(NavigationParams { current_chapter: 1 }),
            )
            .await,
        );
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie_of(&response).unwrap();
        assert!(cookie.starts_with("chapter=2"));

        let body = body_json(response).await;
        assert_eq!(body["position"], 2);
        assert_eq!(body["content"], "chapter 2");
    }

    #[tokio::test]
    async fn next_chapter_past_the_end_is_not_found() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            next_chapter_handler(
                State(state),
                Path(summary.id),
                Query(NavigationParams { current_chapter: 3 }),
            )
            .await,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn previous_chapter_steps_back_and_records_the_cookie() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            previous_chapter_handler(
                State(state),
                Path(summary.id),
                Query(NavigationParams { current_chapter: 3 }),
            )
            .await,
        );
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie_of(&response).unwrap();
        assert!(cookie.starts_with("chapter=2"));

        let body = body_json(response).await;
        assert_eq!(body["position"], 2);
    }

    #[tokio::test]
    async fn previous_chapter_before_the_start_is_not_found() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            previous_chapter_handler(
                State(state),
                Path(summary.id),
                Query(NavigationParams { current_chapter: 1 }),
            )
            .await,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn current_without_cookie_serves_and_records_the_first_chapter() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            current_chapter_handler(State(state), Path(summary.id), HeaderMap::new()).await,
        );
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = set_cookie_of(&response).unwrap();
        assert!(cookie.starts_with("chapter=1"));

        let body = body_json(response).await;
        assert_eq!(body["position"], 1);
    }

    #[tokio::test]
    async fn current_echoes_the_recorded_marker_verbatim() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        // Markers are trusted as-is, even when they fall outside the
        // summary's chapter range.
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("chapter=7"));

        let response =
            into_response(current_chapter_handler(State(state), Path(summary.id), headers).await);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie_of(&response).is_none());
        assert_eq!(body_string(response).await, "7");
    }

    #[tokio::test]
    async fn current_of_unknown_summary_is_not_found() {
        let state = test_state();
        let response = into_response(
            current_chapter_handler(State(state), Path(Uuid::new_v4()), HeaderMap::new()).await,
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn finish_serves_the_first_chapter_only_on_overrun() {
        let state = test_state();
        let summary = seed_summary(&state, "dune", 3).await;

        let response = into_response(
            finish_summary_handler(
                State(state.clone()),
                Path(summary.id),
                Query(FinishParams { current_page: 5 }),
            )
            .await,
        );
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["position"], 1);

        // Pages inside the chapter count cannot finish, the last page
        // included.
        for page in [2, 3] {
            let response = into_response(
                finish_summary_handler(
                    State(state.clone()),
                    Path(summary.id),
                    Query(FinishParams { current_page: page }),
                )
                .await,
            );
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn all_cookies_dumps_the_request_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("chapter=2; session=abc"),
        );
        assert_eq!(all_cookies_handler(headers).await, "chapter=2, session=abc");

        assert_eq!(all_cookies_handler(HeaderMap::new()).await, "No cookies");
    }
}
