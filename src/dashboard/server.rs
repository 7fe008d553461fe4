//! HTTP server implementation for the web dashboard.
//!
//! This module provides the axum-based HTTP server that serves the full
//! pages and the htmx fragments they refresh.

use anyhow::Context;
use axum::{
    Router,
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Json},
    routing::get,
};
use chrono::Local;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::pages::{self, Page, PageData, ViewRequest};
use super::templates;
use crate::config::Config;
use crate::db::Database;
use crate::error::{DashboardError, DashboardResult};

/// Dashboard server state shared across handlers.
#[derive(Clone)]
pub struct DashboardServer {
    config: Arc<Config>,
    /// Location of the reporting database; connections are opened per query.
    db: Database,
}

impl DashboardServer {
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        Self { config, db }
    }

    /// State for `config`, reading the database it names.
    pub fn from_config(config: Config) -> Self {
        let db = Database::from_config(&config.database);
        Self::new(Arc::new(config), db)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load a page view on the blocking pool.
    pub async fn load(&self, page: Page, request: &ViewRequest) -> DashboardResult<PageData> {
        let db = self.db.clone();
        let request = request.clone();
        let window_days = self.config.dashboard.window_days;
        let now = Local::now().naive_local();

        let data = tokio::task::spawn_blocking(move || {
            pages::load(&db, page, &request, now, window_days)
        })
        .await??;
        Ok(data)
    }

    fn page_size(&self, page: Page) -> usize {
        self.config.dashboard.page_size(page.slug())
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

fn resolve_page(slug: &str) -> DashboardResult<Page> {
    Page::from_slug(slug).ok_or_else(|| DashboardError::page_not_found(slug))
}

/// Home page listing every dashboard page.
async fn home() -> Html<String> {
    Html(templates::render_base(
        "Home",
        &pages::render_nav(None),
        &pages::render_home(),
    ))
}

/// Decoded query pairs, repeated keys kept in order.
pub type QueryPairs = Query<Vec<(String, String)>>;

/// Full page: layout, filters and the first view.
pub async fn page_view(
    state: DashboardServer,
    page: Page,
    pairs: Vec<(String, String)>,
) -> DashboardResult<Html<String>> {
    let request = ViewRequest::from_pairs(page, &pairs)?;
    let data = state.load(page, &request).await?;
    let body = pages::render_body(page, &data, &request, state.page_size(page));
    Ok(Html(templates::render_base(
        page.title(),
        &pages::render_nav(Some(page)),
        &body,
    )))
}

/// Table and charts fragment, requested when a filter changes.
pub async fn api_view(
    State(state): State<DashboardServer>,
    Path(slug): Path<String>,
    Query(pairs): QueryPairs,
) -> DashboardResult<Html<String>> {
    let page = resolve_page(&slug)?;
    let request = ViewRequest::from_pairs(page, &pairs)?;
    let data = state.load(page, &request).await?;
    Ok(Html(pages::render_view(
        page,
        &data,
        &request,
        state.page_size(page),
    )))
}

/// Cascading dropdown fragment, requested when a parent dropdown changes.
pub async fn api_filters(
    State(state): State<DashboardServer>,
    Path(slug): Path<String>,
    Query(pairs): QueryPairs,
) -> DashboardResult<Html<String>> {
    let page = resolve_page(&slug)?;
    if page.cascade().is_none() {
        return Err(DashboardError::invalid_value(
            "page",
            &format!("{} has no cascading filter", slug),
        ));
    }
    let request = ViewRequest::from_pairs(page, &pairs)?;
    let data = state.load(page, &request).await?;
    Ok(Html(pages::render_cascade(page, &data, &request)))
}

/// Health check endpoint.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API root - returns available endpoints.
async fn api_root() -> impl IntoResponse {
    let pages: Vec<_> = Page::all()
        .iter()
        .map(|page| {
            serde_json::json!({
                "title": page.title(),
                "path": page.path(),
                "view": format!("/api/{}/view", page.slug()),
                "filters": page.cascade().map(|_| format!("/api/{}/filters", page.slug())),
            })
        })
        .collect();

    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "pages": pages,
        }
    }))
}

async fn not_found(uri: Uri) -> DashboardError {
    DashboardError::page_not_found(uri.path())
}

/// Build the router with all routes.
pub fn build_router(state: DashboardServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new().route("/", get(home));
    for page in Page::all() {
        router = router.route(
            page.path(),
            get(
                move |State(state): State<DashboardServer>, Query(pairs): QueryPairs| {
                    page_view(state, page, pairs)
                },
            ),
        );
    }

    router
        // htmx fragment routes
        .route("/api/{page}/view", get(api_view))
        .route("/api/{page}/filters", get(api_filters))
        // API routes
        .route("/api", get(api_root))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.task.await;
    }
}

/// Bind the configured address and serve in the background.
pub async fn start_server(state: DashboardServer) -> anyhow::Result<ServerHandle> {
    let host = state.config().server.host.clone();
    let port = state.config().server.port;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("binding {}:{}", host, port))?;
    let addr = listener.local_addr()?;

    info!("Dashboard server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Dashboard server shutting down");
            })
            .await
        {
            tracing::error!("Dashboard server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Serve until Ctrl-C.
pub async fn serve(state: DashboardServer) -> anyhow::Result<()> {
    let handle = start_server(state).await?;
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    handle.shutdown().await;
    Ok(())
}
