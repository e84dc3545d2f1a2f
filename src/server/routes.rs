use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::{
    cache::MatchCache,
    error::{AppError, AppResult},
    favorites::FavoriteSet,
    query::{annotate_favorites, find_by_title, parse_page, query, MatchFilter},
    types::{AboutPageData, DetailPageData, ListPageData, Match},
};

const NO_VIDEO_HTML: &str =
    r#"<p style="padding: 20px; text-align: center; color: #666;">No video available for this match.</p>"#;

// ── Application state shared across all routes ─────────────────────────────────

#[derive(Clone)]
pub struct ApiState {
    pub cache: Arc<MatchCache>,
    pub page_size: usize,
    pub home_limit: usize,
}

// ── Query param structs ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CollectionQuery {
    q: Option<String>,
    category: Option<String>,
    page: Option<String>,
}

#[derive(Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    page: Option<String>,
}

#[derive(Deserialize)]
struct TitleQuery {
    title: Option<String>,
}

#[derive(Deserialize)]
struct ToggleQuery {
    title: Option<String>,
    redirect: Option<String>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn load_matches_with_favorites(
    state: &ApiState,
    jar: &CookieJar,
) -> AppResult<Vec<Match>> {
    let mut matches = state.cache.get().await?;
    annotate_favorites(&mut matches, &FavoriteSet::from_jar(jar));
    Ok(matches)
}

/// `"champions league"` -> `"Champions League"`.
pub fn category_label(raw: &str) -> String {
    raw.to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Only same-site paths are accepted as redirect targets.
fn safe_redirect(target: Option<&str>) -> &str {
    match target.map(str::trim) {
        Some(t) if t.starts_with('/') && !t.starts_with("//") && !t.starts_with("/\\") => t,
        _ => "/favorites",
    }
}

async fn collection(
    state: &ApiState,
    jar: &CookieJar,
    q: &str,
    category: &str,
    page: usize,
) -> AppResult<ListPageData> {
    let records = state.cache.get().await?;
    let favorites = FavoriteSet::from_jar(jar);
    let filter = MatchFilter::new(q, category);
    let result = query(records, &filter, page, state.page_size, &favorites);

    let title = if !q.is_empty() {
        format!("Results for \"{q}\"")
    } else if !category.is_empty() {
        format!("Category: {}", category_label(category))
    } else {
        "All highlights".to_string()
    };

    Ok(ListPageData {
        title,
        matches: result.items,
        query: q.to_string(),
        category: category.to_string(),
        category_name: category_label(category),
        current_page: result.current_page,
        total_pages: result.total_pages,
        prev_page: result.prev_page,
        next_page: result.next_page,
    })
}

// ── Route handlers ────────────────────────────────────────────────────────────

async fn handle_home(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Json<ListPageData>> {
    let mut matches = load_matches_with_favorites(&state, &jar).await?;
    matches.truncate(state.home_limit);

    Ok(Json(ListPageData {
        title: "Latest videos".to_string(),
        matches,
        ..Default::default()
    }))
}

async fn handle_collection(
    Query(q): Query<CollectionQuery>,
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Json<ListPageData>> {
    let text = q.q.unwrap_or_default();
    let category = q.category.unwrap_or_default();
    let page = parse_page(q.page.as_deref());

    collection(&state, &jar, text.trim(), category.trim(), page)
        .await
        .map(Json)
}

async fn handle_category(
    Query(q): Query<CategoryQuery>,
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let category = q.category.unwrap_or_default();
    let category = category.trim();
    if category.is_empty() {
        return Ok(Redirect::to("/matches").into_response());
    }

    let data = collection(&state, &jar, "", category, 1).await?;
    Ok(Json(data).into_response())
}

async fn handle_search(
    Query(q): Query<SearchQuery>,
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Response> {
    let text = q.q.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Ok(Redirect::to("/matches").into_response());
    }

    let page = parse_page(q.page.as_deref());
    let data = collection(&state, &jar, text, "", page).await?;
    Ok(Json(data).into_response())
}

async fn handle_favorites(
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Json<ListPageData>> {
    let matches = load_matches_with_favorites(&state, &jar)
        .await?
        .into_iter()
        .filter(|m| m.is_favorite)
        .collect();

    Ok(Json(ListPageData {
        title: "My favorites".to_string(),
        matches,
        ..Default::default()
    }))
}

async fn handle_detail(
    Query(q): Query<TitleQuery>,
    State(state): State<ApiState>,
    jar: CookieJar,
) -> AppResult<Json<DetailPageData>> {
    let Some(raw) = q.title.filter(|t| !t.is_empty()) else {
        return Err(AppError::BadRequest("missing title".to_string()));
    };

    let title = urlencoding::decode(&raw)
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|_| raw.trim().to_string());

    let matches = load_matches_with_favorites(&state, &jar).await?;
    let found = find_by_title(&matches, &title).inspect_err(|_| {
        warn!(title = %title, raw = %raw, "match not found");
    })?;

    let embed_html = match found.videos.first() {
        Some(video) => video.embed_html.clone(),
        None => {
            warn!(title = %found.title, "no video for match");
            NO_VIDEO_HTML.to_string()
        }
    };

    Ok(Json(DetailPageData {
        record: found.clone(),
        embed_html,
    }))
}

async fn handle_toggle_favorite(
    Query(q): Query<ToggleQuery>,
    jar: CookieJar,
) -> AppResult<Response> {
    let title = q.title.unwrap_or_default();
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("missing title".to_string()));
    }

    let mut favorites = FavoriteSet::from_jar(&jar);
    favorites.toggle(title);

    let target = safe_redirect(q.redirect.as_deref());
    Ok((jar.add(favorites.to_cookie()), Redirect::to(target)).into_response())
}

async fn handle_about() -> impl IntoResponse {
    Json(AboutPageData {
        title: "About".to_string(),
    })
}

// ── Router factory ────────────────────────────────────────────────────────────

pub fn build_router(state: ApiState, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/", get(handle_home))
        .route("/matches", get(handle_collection))
        .route("/match", get(handle_detail))
        .route("/favorites", get(handle_favorites))
        .route("/fav-toggle", get(handle_toggle_favorite))
        .route("/search", get(handle_search))
        .route("/category", get(handle_category))
        .route("/about", get(handle_about))
        .with_state(state);

    if let Some(dir) = static_dir.filter(|d| d.exists()) {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http())
}
