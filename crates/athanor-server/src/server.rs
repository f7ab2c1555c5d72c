//! HTTP server setup and routing.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::Result;
use athanor::{Algorithm, Engine, FindQuery, SearchStep, TreeReply};
use athanor_core::Catalog;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::scrape;

/// Catalog file name below the data directory.
pub const CATALOG_FILE: &str = "recipe.json";
/// Every find result is also echoed to this file for inspection.
const QUERY_ECHO_FILE: &str = "query_result.json";

/// Shared server state: the swappable engine handle plus the raw catalog
/// bytes served on `/api/recipes`.
pub struct AppState {
    engine: RwLock<Arc<Engine>>,
    raw_catalog: RwLock<String>,
    data_dir: PathBuf,
}

impl AppState {
    /// Create the state around an initial engine.
    pub fn new(engine: Engine, raw_catalog: String, data_dir: PathBuf) -> Self {
        Self {
            engine: RwLock::new(Arc::new(engine)),
            raw_catalog: RwLock::new(raw_catalog),
            data_dir,
        }
    }

    /// Clone the current engine handle.
    fn engine(&self) -> Arc<Engine> {
        match self.engine.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Persist a freshly scraped catalog and swap in a new engine.
    ///
    /// Returns the element count of the new catalog.
    fn install_catalog(&self, catalog: Catalog) -> Result<usize> {
        let engine = Engine::new(catalog);
        let raw = engine.catalog().to_json_pretty()?;
        let element_count = engine.catalog().element_count();

        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::write(self.data_dir.join(CATALOG_FILE), &raw)?;

        match self.engine.write() {
            Ok(mut guard) => *guard = Arc::new(engine),
            Err(poisoned) => *poisoned.into_inner() = Arc::new(engine),
        }
        match self.raw_catalog.write() {
            Ok(mut guard) => *guard = raw,
            Err(poisoned) => *poisoned.into_inner() = raw,
        }
        Ok(element_count)
    }

    /// Write the query echo file; failures only warn.
    fn persist_query_echo(&self, response: &FindResponse) {
        let echo = match serde_json::to_string_pretty(response) {
            Ok(echo) => echo,
            Err(err) => {
                warn!("cannot serialize query echo: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::create_dir_all(&self.data_dir)
            .and_then(|()| std::fs::write(self.data_dir.join(QUERY_ECHO_FILE), echo))
        {
            warn!("cannot write query echo: {err}");
        }
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/api/find", get(find_handler))
        .route("/api/recipes", get(recipes_handler))
        .route("/api/scrape", post(scrape_handler))
        .route("/api/atlas", get(atlas_handler))
        .nest_service("/svgs", ServeDir::new(state.data_dir.join("svgs")))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Raw query parameters of `/api/find`.
///
/// Values are kept as strings and parsed leniently: anything malformed
/// falls back to its default rather than erroring.
#[derive(Debug, Default, Deserialize)]
struct FindParams {
    target: Option<String>,
    #[serde(rename = "maxPaths")]
    max_paths: Option<String>,
    multi: Option<String>,
    algorithm: Option<String>,
}

impl FindParams {
    fn to_query(&self, target: String) -> FindQuery {
        let mut query = FindQuery::new(target);
        if let Some(algorithm) = self.algorithm.as_deref() {
            query = query.with_algorithm(Algorithm::from_param(algorithm));
        }
        if let Some(max_paths) = self.max_paths.as_deref() {
            if let Ok(n) = max_paths.parse::<usize>() {
                query = query.with_max_paths(n);
            }
        }
        if let Some(multi) = self.multi.as_deref() {
            if multi != "true" {
                query = query.single_path();
            }
        }
        query
    }
}

/// Wire shape of a find result.
#[derive(Debug, Serialize)]
struct FindResponse {
    tree: TreeReply,
    duration_ms: f64,
    algorithm: String,
    nodes_visited: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    search_steps: Vec<SearchStep>,
}

async fn find_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FindParams>,
) -> Response {
    let Some(target) = params.target.clone().filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing ?target=").into_response();
    };
    let query = params.to_query(target);
    let algorithm = query.algorithm;

    let engine = state.engine();
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || engine.find(&query)).await;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    let result = match result {
        Ok(result) => result,
        Err(err) => {
            warn!("find task failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "search failed").into_response();
        }
    };

    let response = FindResponse {
        tree: result.tree,
        duration_ms,
        algorithm: algorithm.as_str().to_owned(),
        nodes_visited: result.nodes_visited,
        search_steps: result.search_steps,
    };
    state.persist_query_echo(&response);
    Json(response).into_response()
}

async fn recipes_handler(State(state): State<Arc<AppState>>) -> Response {
    let raw = match state.raw_catalog.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    ([(header::CONTENT_TYPE, "application/json")], raw).into_response()
}

#[derive(Serialize)]
struct ScrapeResponse {
    status: &'static str,
    message: String,
    elements_count: usize,
}

async fn scrape_handler(State(state): State<Arc<AppState>>) -> Response {
    info!("scrape requested via API");

    let scraped = tokio::task::spawn_blocking(scrape::scrape_catalog).await;
    let catalog = match scraped {
        Ok(Ok(catalog)) => catalog,
        Ok(Err(err)) => {
            warn!("API scrape failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to scrape data: {err}"))
                .into_response();
        }
        Err(err) => {
            warn!("scrape task failed: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "scrape task failed").into_response();
        }
    };

    match state.install_catalog(catalog) {
        Ok(elements_count) => Json(ScrapeResponse {
            status: "success",
            message: "scraping completed successfully".to_owned(),
            elements_count,
        })
        .into_response(),
        Err(err) => {
            warn!("failed to save scraped data: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to save scraped data").into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AtlasParams {
    target: Option<String>,
}

async fn atlas_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AtlasParams>,
) -> Response {
    let Some(target) = params.target.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing ?target=").into_response();
    };

    let engine = state.engine();
    let tree = tokio::task::spawn_blocking(move || engine.atlas(&target)).await;
    match tree {
        Ok(tree) => Json(tree).into_response(),
        Err(err) => {
            warn!("atlas task failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "atlas failed").into_response()
        }
    }
}
