use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::sanitize;
use crate::state::AppState;
use crate::{todos, users};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .merge(users::router())
        .merge(todos::router())
        .nest_service("/app", ServeDir::new("static"))
        .fallback(not_found)
        .layer(middleware::from_fn(sanitize::sanitize_json_body))
        .layer(DefaultBodyLimit::max(sanitize::JSON_BODY_LIMIT))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "To-Do API is running" }))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Can't find {uri} on this server!"))
}
