//! HTTP server for the listing and post pages
//!
//! Every request reads the posts directory again, so edits show up on the
//! next page load without a restart.

pub mod views;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::PostCatalog;
use crate::error::ContentError;
use crate::Blog;

/// Shared server state
pub struct AppState {
    catalog: PostCatalog,
    site_title: String,
    all_label: String,
    highlight_css: String,
}

impl AppState {
    pub fn new(blog: &Blog) -> Result<Self> {
        let catalog = blog.catalog()?;
        let highlight_css = catalog.renderer().highlight_css().unwrap_or_else(|e| {
            tracing::warn!("No highlight stylesheet: {}", e);
            String::new()
        });

        Ok(Self {
            catalog,
            site_title: blog.config.title.clone(),
            all_label: blog.config.all_label.clone(),
            highlight_css,
        })
    }
}

/// Failure of a page request
enum PageError {
    NotFound,
    Internal,
}

impl From<ContentError> for PageError {
    fn from(err: ContentError) -> Self {
        if err.is_not_found() {
            PageError::NotFound
        } else {
            tracing::error!("Request failed: {}", err);
            PageError::Internal
        }
    }
}

/// A page error together with the site title for its error page
struct ErrorPage<'a>(PageError, &'a str);

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        match self.0 {
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                Html(views::not_found_page(self.1)),
            )
                .into_response(),
            PageError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::error_page(self.1)),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    category: Option<String>,
}

/// Build the router; split out from [`start`] so tests can drive it directly
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(listing_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/assets/highlight.css", get(highlight_css_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(blog)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a catalog query off the async runtime; file reads and rendering block
async fn with_catalog<T, F>(state: &Arc<AppState>, query: F) -> Result<T, PageError>
where
    T: Send + 'static,
    F: FnOnce(&PostCatalog) -> Result<T, ContentError> + Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || query(&state.catalog)).await {
        Ok(result) => Ok(result?),
        Err(e) => {
            tracing::error!("Catalog task failed: {}", e);
            Err(PageError::Internal)
        }
    }
}

async fn listing_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let selection = query.category.filter(|c| !c.is_empty());
    let result = with_catalog(&state, move |catalog| catalog.listing(selection.as_deref())).await;

    match result {
        Ok(listing) => {
            Html(views::listing_page(&state.site_title, &listing, &state.all_label)).into_response()
        }
        Err(e) => ErrorPage(e, &state.site_title).into_response(),
    }
}

async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let result = with_catalog(&state, move |catalog| catalog.get_post(&slug)).await;

    match result {
        Ok(post) => Html(views::post_page(&state.site_title, &post)).into_response(),
        Err(e) => ErrorPage(e, &state.site_title).into_response(),
    }
}

async fn highlight_css_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.highlight_css.clone(),
    )
        .into_response()
}

async fn fallback_handler(State(state): State<Arc<AppState>>) -> Response {
    ErrorPage(PageError::NotFound, &state.site_title).into_response()
}
