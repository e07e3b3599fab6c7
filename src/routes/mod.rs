mod api;
mod delivery;
mod health;
mod upload;

pub use api::generate_certificate;
pub use delivery::{attachment_filename, pdf_attachment};
pub use health::{index, ready};
pub use upload::{
    read_certificate_request, validate_fields, validate_image_type, CertificateRequest,
    BACKGROUND_FIELD, MAX_FIELD_CHARS,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header::InvalidHeaderValue, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Result<Router, InvalidHeaderValue> {
    let cors = cors_layer(&state.config)?;

    let app = Router::new()
        .route("/", get(index))
        .route("/ready", get(ready))
        .route(
            "/generate-certificate",
            post(generate_certificate)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

fn cors_layer(config: &Config) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}
