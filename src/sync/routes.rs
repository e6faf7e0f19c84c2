//! Document Routes
//!
//! - GET / - The current page with its etag
//! - HEAD / - Just the etag
//! - PUT / - Replace the page, guarded by `If-Match`

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::document::Document;
use super::error::SyncResult;
use super::state::AppState;

const HTML: &str = "text/html; charset=utf-8";

fn document_response(status: StatusCode, document: Document) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HTML.to_string()),
            (header::ETAG, document.etag),
        ],
        Body::from(document.body),
    )
        .into_response()
}

/// GET /
pub async fn get_document(State(state): State<Arc<AppState>>) -> SyncResult<Response> {
    let document = state.documents.read().await?;
    Ok(document_response(StatusCode::OK, document))
}

/// HEAD /
///
/// Lets the page learn the etag it must send back on upload.
pub async fn head_document(State(state): State<Arc<AppState>>) -> SyncResult<Response> {
    let etag = state.documents.etag().await?;
    Ok((StatusCode::OK, [(header::ETAG, etag)]).into_response())
}

/// PUT /
///
/// Stores the uploaded page when `If-Match` names the served version.
/// A missing or stale etag is answered with `406 Not Acceptable` and the
/// current page, so the client can see what it conflicts with.
pub async fn put_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> SyncResult<Response> {
    let Some(if_match) = headers
        .get(header::IF_MATCH)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!("If-Match header missing");
        let current = state.documents.read().await?;
        return Ok(document_response(StatusCode::NOT_ACCEPTABLE, current));
    };

    match state.documents.replace(if_match, &body).await? {
        Some(stored) => Ok(document_response(StatusCode::OK, stored)),
        None => {
            let current = state.documents.read().await?;
            Ok(document_response(StatusCode::NOT_ACCEPTABLE, current))
        }
    }
}
