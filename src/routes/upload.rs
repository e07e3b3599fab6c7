//! Multipart parsing and validation for certificate requests

use axum::extract::Multipart;

use crate::error::AppError;
use crate::pdf::CertificateFields;
use crate::storage::{StoredUpload, Workspace};

pub const BACKGROUND_FIELD: &str = "bgImage";

const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Longest accepted value for any text field, in characters. At this length
/// the shrunk name and course tiers still fit on one page.
pub const MAX_FIELD_CHARS: usize = 200;

/// A validated request. Dropping it deletes the stored background image.
#[derive(Debug)]
pub struct CertificateRequest {
    pub fields: CertificateFields,
    pub background: Option<StoredUpload>,
}

/// Reads the `name`, `course` and `date` fields and the optional `bgImage`
/// file, storing the file in `workspace`.
///
/// On any error the stored file (if one was written) is deleted before the
/// error is returned.
pub async fn read_certificate_request(
    workspace: &Workspace,
    mut multipart: Multipart,
) -> Result<CertificateRequest, AppError> {
    let mut name: Option<String> = None;
    let mut course: Option<String> = None;
    let mut date: Option<String> = None;
    let mut background: Option<StoredUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "name" => name = Some(field.text().await?),
            "course" => course = Some(field.text().await?),
            "date" => date = Some(field.text().await?),
            BACKGROUND_FIELD => {
                let file_name = field.file_name().map(|s| s.to_string());
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?;

                // Browsers send an empty, unnamed part when no file was chosen.
                if data.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                    continue;
                }
                if background.is_some() {
                    return Err(AppError::Validation(format!(
                        "Only one {} file may be uploaded",
                        BACKGROUND_FIELD
                    )));
                }

                background = Some(
                    workspace
                        .store(BACKGROUND_FIELD, file_name.as_deref(), &content_type, &data)
                        .await?,
                );
            }
            other => tracing::debug!(field = other, "Ignoring unexpected form field"),
        }
    }

    tracing::info!(
        recipient = name.as_deref().unwrap_or_default(),
        course = course.as_deref().unwrap_or_default(),
        date = date.as_deref().unwrap_or_default(),
        background = background.is_some(),
        "Received certificate generation request"
    );

    let fields = validate_fields(name, course, date)?;
    if let Some(upload) = &background {
        validate_image_type(upload.mime_type())?;
    }

    Ok(CertificateRequest { fields, background })
}

pub fn validate_fields(
    name: Option<String>,
    course: Option<String>,
    date: Option<String>,
) -> Result<CertificateFields, AppError> {
    let name = name.map(|v| v.trim().to_string()).unwrap_or_default();
    let course = course.map(|v| v.trim().to_string()).unwrap_or_default();
    let date = date.map(|v| v.trim().to_string()).unwrap_or_default();

    let missing: Vec<&str> = [("name", &name), ("course", &course), ("date", &date)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(label, _)| label)
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let too_long: Vec<&str> = [("name", &name), ("course", &course), ("date", &date)]
        .into_iter()
        .filter(|(_, value)| value.chars().count() > MAX_FIELD_CHARS)
        .map(|(label, _)| label)
        .collect();
    if !too_long.is_empty() {
        return Err(AppError::Validation(format!(
            "Fields longer than {} characters: {}",
            MAX_FIELD_CHARS,
            too_long.join(", ")
        )));
    }

    // The name ends up in a response header.
    if name.chars().any(char::is_control) {
        return Err(AppError::Validation(
            "Name must not contain control characters".to_string(),
        ));
    }

    Ok(CertificateFields { name, course, date })
}

pub fn validate_image_type(content_type: &str) -> Result<(), AppError> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase();

    if !ALLOWED_IMAGE_TYPES.contains(&normalized.as_str()) {
        return Err(AppError::Validation(
            "Invalid image format. Only PNG and JPEG are supported.".to_string(),
        ));
    }
    Ok(())
}
