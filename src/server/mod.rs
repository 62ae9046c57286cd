//! Development server
//!
//! Serves the raw documents under the viewer mount, the rendered viewer
//! pages, and the catalog pages and JSON API.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::catalog::{search, search_json, CatalogKind, QueryState, SearchPolicy};
use crate::content::loader::ContentLoader;
use crate::content::{Fetcher, MarkdownRenderer};
use crate::helpers::{encode_path, url_for};
use crate::templates;
use crate::viewer::DocumentViewer;
use crate::Handbook;

/// Shared state for all handlers
pub struct ServerState {
    handbook: Handbook,
    fetcher: Fetcher,
    renderer: Arc<MarkdownRenderer>,
    policy: SearchPolicy,
}

impl ServerState {
    pub fn new(handbook: &Handbook) -> Result<Self> {
        Ok(Self {
            handbook: handbook.clone(),
            fetcher: handbook.fetcher()?,
            renderer: handbook.renderer(),
            policy: handbook.search_policy(),
        })
    }
}

/// Query string of the catalog routes: `?q=text&category=a,b`
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    q: Option<String>,
    category: Option<String>,
}

impl CatalogParams {
    fn to_query(&self) -> QueryState {
        let mut query = QueryState::new().with_text(self.q.clone().unwrap_or_default());
        if let Some(categories) = &self.category {
            for category in categories.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                query = query.with_category(category);
            }
        }
        query
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let mount = state.handbook.config.viewer.mount.trim_end_matches('/').to_string();
    let docs = ServeDir::new(&state.handbook.docs_dir);

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/view/*path", get(view_handler))
        .route("/catalog/:name", get(catalog_handler))
        .route("/api/catalog/:name", get(catalog_api_handler));

    let app = if mount.is_empty() {
        app.fallback_service(docs)
    } else {
        app.nest_service(&mount, docs)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Start the development server
pub async fn start(handbook: &Handbook, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(handbook)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!(
        "Documents are served from {:?} under {}",
        handbook.docs_dir, handbook.config.viewer.mount
    );
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let handbook = state.handbook.clone();
    let docs = match tokio::task::spawn_blocking(move || ContentLoader::new(&handbook).load_docs()).await {
        Ok(Ok(docs)) => docs,
        Ok(Err(e)) => return server_error(e.to_string()),
        Err(e) => return server_error(e.to_string()),
    };

    let config = &state.handbook.config;
    let html = templates::index_page(config, &docs, |doc| {
        url_for(config, &format!("/view/{}", encode_path(&doc.path)))
    });
    Html(html).into_response()
}

async fn view_handler(State(state): State<Arc<ServerState>>, Path(path): Path<String>) -> Response {
    let config = &state.handbook.config;
    let location = format!(
        "{}/{}",
        config.viewer.mount.trim_end_matches('/'),
        encode_path(path.trim_start_matches('/'))
    );

    let mut viewer = DocumentViewer::new(state.renderer.clone());
    viewer.navigate(&state.fetcher, &location).await;
    Html(templates::viewer_page(config, &viewer.view())).into_response()
}

async fn catalog_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Query(params): Query<CatalogParams>,
) -> Response {
    let config = &state.handbook.config;
    let kind: CatalogKind = match name.parse() {
        Ok(kind) => kind,
        Err(e) => {
            return (
                StatusCode::NOT_FOUND,
                Html(templates::not_found_page(config, &e.to_string())),
            )
                .into_response()
        }
    };

    let query = params.to_query();
    let outcome = search(kind, &query, &state.policy);
    Html(templates::catalog_page(config, &query, &outcome, &kind.categories())).into_response()
}

async fn catalog_api_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Query(params): Query<CatalogParams>,
) -> Response {
    match name.parse::<CatalogKind>() {
        Ok(kind) => Json(search_json(kind, &params.to_query(), &state.policy)).into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

fn server_error(message: String) -> Response {
    tracing::error!("Request failed: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_params_split_categories() {
        let params = CatalogParams {
            q: Some(" hook ".to_string()),
            category: Some("React, Node.js,,".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.text, " hook ");
        assert_eq!(
            query.categories.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Node.js", "React"]
        );
        assert!(CatalogParams::default().to_query().is_empty());
    }
}
