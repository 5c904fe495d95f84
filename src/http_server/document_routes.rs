//! Document HTTP Routes
//!
//! Every URL path addresses a node: `/` is the default document's root,
//! `/{segments...}` a node inside it, or inside the document named by the
//! first segment. GET reads, POST and PUT write, DELETE deletes; any other
//! method gets 405 from the router.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::{ApiHandler, Request, Response as ApiResponse};
use crate::observability::Logger;

/// Create the document router
pub fn document_routes(handler: Arc<ApiHandler>) -> Router {
    Router::new()
        .route(
            "/",
            get(root_handler)
                .post(root_handler)
                .put(root_handler)
                .delete(root_handler),
        )
        .route(
            "/*json_path",
            get(node_handler)
                .post(node_handler)
                .put(node_handler)
                .delete(node_handler),
        )
        .with_state(handler)
}

async fn root_handler(
    State(handler): State<Arc<ApiHandler>>,
    method: Method,
    body: Bytes,
) -> Response {
    dispatch(handler, method, String::new(), body).await
}

async fn node_handler(
    State(handler): State<Arc<ApiHandler>>,
    method: Method,
    Path(json_path): Path<String>,
    body: Bytes,
) -> Response {
    dispatch(handler, method, json_path, body).await
}

/// Run the request on the blocking pool; the pipeline does file I/O.
async fn dispatch(handler: Arc<ApiHandler>, method: Method, path: String, body: Bytes) -> Response {
    let body = (!body.is_empty()).then(|| body.to_vec());
    let Some(request) = Request::from_method(method.as_str(), path, body) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    match tokio::task::spawn_blocking(move || handler.handle(&request)).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            let reason = e.to_string();
            Logger::error("REQUEST_TASK_FAILED", &[("reason", &reason)]);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Json(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Empty => StatusCode::OK.into_response(),
            ApiResponse::Error(err) => {
                let status =
                    StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, err.message).into_response()
            }
        }
    }
}
