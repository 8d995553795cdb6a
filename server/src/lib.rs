use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderName, Method};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{AllowOrigin, CorsLayer};

use poisk_core::query::normalize_query;
use poisk_core::{Hit, SearchEngine};

pub mod audit;
pub mod config;

use audit::{AuditLog, LogRecord};

/// Shared per-process state: the frozen engine and the audit collector.
pub struct AppState {
    pub engine: SearchEngine,
    pub audit: AuditLog,
}

/// Assemble the router: a single search endpoint at `/` plus the CORS layer
/// echoing the caller's origin with credentials allowed.
pub fn build_app(engine: SearchEngine, audit: AuditLog) -> Router {
    let state = Arc::new(AppState { engine, audit });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            HeaderName::from_static("access-control-allow-headers"),
            header::ACCEPT_ENCODING,
            header::AUTHORIZATION,
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
        ]);
    Router::new()
        .route("/", get(search_handler))
        .with_state(state)
        .layer(cors)
}

/// GET `/` — the search endpoint. `search` is required and its first value
/// wins; `category` and `tags` repeat. Query problems are not errors: the
/// response is an empty JSON array either way.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    params: Option<Query<Vec<(String, String)>>>,
) -> Json<Vec<Hit>> {
    let started = Instant::now();
    let request_time = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    let mut search = None;
    let mut category: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    if let Some(Query(pairs)) = params {
        for (key, value) in pairs {
            match key.as_str() {
                "search" if search.is_none() => search = Some(value),
                "category" => category.push(value),
                "tags" => tags.push(value),
                _ => {}
            }
        }
    }
    let Some(search) = search else {
        return Json(Vec::new());
    };

    let hits = state.engine.search(&search, &category, &tags);

    let host = connect.map_or_else(|| "-".to_string(), |ConnectInfo(addr)| addr.to_string());
    state.audit.append(LogRecord {
        request_time,
        request_host: host,
        search_request: normalize_query(&search).join(" "),
        search_category: category,
        search_tags: tags,
        search_time: format!("{:?}", started.elapsed()),
    });
    Json(hits)
}
