use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use sha2::{Digest as _, Sha256};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::cli::ServeArgs;
use crate::render::{render_not_found, render_route};
use crate::routes::{LEARN_ROOT, Route};

#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = Catalog::load_configured(args.catalog.as_deref()).context("load catalog")?;
    let stats = catalog.stats();
    tracing::info!(
        sections = stats.sections,
        chapters = stats.chapters,
        lessons = stats.lessons,
        "catalog loaded"
    );

    let app = router(Arc::new(catalog));

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    tracing::info!("server stopped");
    Ok(())
}

pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::permanent(LEARN_ROOT) }))
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/learn", get(hub_page))
        .route("/learn/:section", get(section_page))
        .route("/learn/:section/:chapter", get(chapter_page))
        .route("/learn/:section/:chapter/:lesson", get(lesson_page))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { catalog })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

async fn hub_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    page_response(&state, &headers, &Route::Hub)
}

async fn section_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(section): Path<String>,
) -> Response {
    page_response(&state, &headers, &Route::section(&section))
}

async fn chapter_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((section, chapter)): Path<(String, String)>,
) -> Response {
    page_response(&state, &headers, &Route::chapter(&section, &chapter))
}

async fn lesson_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((section, chapter, lesson)): Path<(String, String, String)>,
) -> Response {
    page_response(
        &state,
        &headers,
        &Route::lesson(&section, &chapter, &lesson),
    )
}

/// Redirects trailing-slash variants of catalog routes to the canonical path so
/// the typed routes above decode the segments; everything else is 404.
async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if let Some(canonical) = path.strip_suffix('/')
        && Route::parse(path).is_some()
    {
        return Redirect::permanent(canonical).into_response();
    }
    not_found(&state, path)
}

fn page_response(state: &AppState, headers: &HeaderMap, route: &Route) -> Response {
    match render_route(&state.catalog, route) {
        Ok(html) => html_response(headers, html),
        Err(err) => {
            tracing::debug!(%err, route = %route.path(), "route not found");
            not_found(state, &route.path())
        }
    }
}

fn not_found(state: &AppState, path: &str) -> Response {
    let html = render_not_found(&state.catalog, Some(path));
    let mut resp = (StatusCode::NOT_FOUND, html).into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    resp
}

fn html_response(headers: &HeaderMap, html: String) -> Response {
    let etag = etag_for(&html);
    let Ok(etag_value) = HeaderValue::from_str(&etag) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    if if_none_match(headers, &etag) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        resp.headers_mut().insert(header::ETAG, etag_value);
        return resp;
    }

    let mut resp = html.into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    resp.headers_mut().insert(header::ETAG, etag_value);
    resp
}

pub fn etag_for(body: &str) -> String {
    let digest = Sha256::digest(body.as_bytes());
    format!("\"{}\"", hex::encode(digest))
}

fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().trim_start_matches("W/"))
        .any(|v| v == "*" || v == etag)
}
