use axum::{
    extract::{Multipart, State},
    response::Response,
};
use std::sync::Arc;

use super::delivery::pdf_attachment;
use super::upload::read_certificate_request;
use crate::error::AppError;
use crate::pdf::RenderError;
use crate::state::AppState;

pub async fn generate_certificate(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request = read_certificate_request(&state.workspace, multipart).await?;

    let renderer = state.renderer.clone();
    let fields = request.fields.clone();
    let background = request
        .background
        .as_ref()
        .map(|upload| upload.path().to_path_buf());

    let pdf = tokio::task::spawn_blocking(move || renderer.render(&fields, background.as_deref()))
        .await
        .map_err(RenderError::from)??;

    tracing::info!(
        recipient = %request.fields.name,
        course = %request.fields.course,
        "Certificate generated"
    );

    pdf_attachment(&request.fields.name, pdf, request.background)
}
