use crate::error::AppError;
use crate::metrics::Metrics;
use crate::state::SharedState;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_client::ContentResolver;
use folio_core::{
    outline, project, search, CollapseState, DocumentEntry, Heading, NavigationEntry,
    ResolvedDocument, Slug,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

// GET /status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub base_url: String,
    pub index_cached: bool,
    pub index_age_secs: Option<u64>,
}

pub async fn status(State(state): State<SharedState>) -> Json<StatusResponse> {
    let age = state.cache_age().await;
    Json(StatusResponse {
        service: "folio-service".to_string(),
        base_url: state.store.base_url().to_string(),
        index_cached: age.is_some(),
        index_age_secs: age.map(|a| a.as_secs()),
    })
}

// GET /api/index
pub async fn index(State(state): State<SharedState>) -> Result<Response, AppError> {
    let tree = state.index().await?;
    Ok(Json(tree.as_ref()).into_response())
}

// GET /api/documents?q=
#[derive(Deserialize)]
pub struct DocumentsQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn documents(
    State(state): State<SharedState>,
    Query(query): Query<DocumentsQuery>,
) -> Result<Json<Vec<DocumentEntry>>, AppError> {
    let tree = state.index().await?;
    let docs = tree.flatten_documents();
    let hits = match query.q.as_deref() {
        Some(q) => search(&docs, q).into_iter().cloned().collect(),
        None => docs,
    };
    Ok(Json(hits))
}

// GET /api/paths
pub async fn paths(State(state): State<SharedState>) -> Result<Json<Vec<String>>, AppError> {
    let tree = state.index().await?;
    Ok(Json(tree.flatten_addressable_paths()))
}

// GET /api/children, GET /api/children/{*slug}
pub async fn children_root(State(state): State<SharedState>) -> Result<Response, AppError> {
    children_of(state, Slug::root()).await
}

pub async fn children(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    children_of(state, Slug::parse(&slug)).await
}

async fn children_of(state: SharedState, slug: Slug) -> Result<Response, AppError> {
    let tree = state.index().await?;
    let children = tree.children_of(slug.segments());
    Ok(Json(children).into_response())
}

// GET /api/nav?collapsed=a,b/c
#[derive(Deserialize)]
pub struct NavQuery {
    #[serde(default)]
    pub collapsed: Option<String>,
}

impl NavQuery {
    fn collapse_state(&self) -> CollapseState {
        self.collapsed
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|p| p.trim().trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect()
    }
}

pub async fn nav(
    State(state): State<SharedState>,
    Query(query): Query<NavQuery>,
) -> Result<Json<Vec<NavigationEntry>>, AppError> {
    let tree = state.index().await?;
    Ok(Json(project(&tree, &query.collapse_state())))
}

// GET /api/page, GET /api/page/{*slug}
#[derive(Debug, Serialize)]
pub struct PageResponse {
    #[serde(flatten)]
    pub document: ResolvedDocument,
    pub outline: Vec<Heading>,
}

pub async fn page_root(State(state): State<SharedState>) -> Result<Json<PageResponse>, AppError> {
    resolve_page(state, Slug::root()).await
}

pub async fn page(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<PageResponse>, AppError> {
    resolve_page(state, Slug::parse(&slug)).await
}

async fn resolve_page(state: SharedState, slug: Slug) -> Result<Json<PageResponse>, AppError> {
    let start = Instant::now();
    let tree = state.index().await?;

    let resolved = ContentResolver::new(&state.store, &tree)
        .with_probe(state.probe)
        .resolve(&slug)
        .await?;

    let Some(document) = resolved else {
        Metrics::incr(&state.metrics.pages_not_found);
        debug!(slug = %slug, "page not found");
        return Err(AppError::not_found(&slug.join()));
    };

    Metrics::incr(&state.metrics.pages_served);
    if !document.indexed {
        Metrics::incr(&state.metrics.placeholder_pages);
    }
    debug!(
        slug = %slug,
        duration_ms = start.elapsed().as_millis() as u64,
        "page resolved"
    );

    let outline = outline(&document.content);
    Ok(Json(PageResponse { document, outline }))
}

// POST /api/reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub documents: usize,
    pub paths: usize,
}

pub async fn reload(State(state): State<SharedState>) -> Result<Json<ReloadResponse>, AppError> {
    let tree = state.refresh().await?;
    Metrics::incr(&state.metrics.index_reloads);
    let response = ReloadResponse {
        documents: tree.flatten_documents().len(),
        paths: tree.flatten_addressable_paths().len(),
    };
    info!(
        documents = response.documents,
        paths = response.paths,
        "index reloaded"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_query_parses_collapsed_paths() {
        let query = NavQuery {
            collapsed: Some("posts, /posts/rust/ ,,".to_string()),
        };
        let state = query.collapse_state();
        assert!(state.is_collapsed("posts"));
        assert!(state.is_collapsed("posts/rust"));
        assert_eq!(state.len(), 2);

        let empty = NavQuery { collapsed: None };
        assert!(empty.collapse_state().is_empty());
    }
}
