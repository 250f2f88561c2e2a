use crate::api::handlers;
use crate::config::AllowedOrigins;
use crate::summarize::DocumentPipeline;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Build the HTTP router around a shared pipeline.
pub fn router(pipeline: Arc<DocumentPipeline>) -> Router {
    let cors = cors_layer(&pipeline.config().allowed_origins);
    let body_limit = pipeline.config().max_upload_bytes;

    Router::new()
        .route("/", get(handlers::root))
        .route("/extract-text/", post(handlers::extract_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

/// CORS with credentials and all methods/headers allowed.
///
/// A literal `*` cannot be combined with credentials, so "any origin" echoes
/// the request's `Origin` back instead.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match origins {
        AllowedOrigins::Any => AllowOrigin::mirror_request(),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin '{}'", o);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
