use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use futures::{stream, StreamExt};
use std::convert::Infallible;

use crate::error::AppError;
use crate::pdf::CertificatePdf;
use crate::storage::StoredUpload;

/// `Jane Doe` becomes `Jane_Doe_certificate.pdf`. Only spaces are replaced.
pub fn attachment_filename(name: &str) -> String {
    format!("{}_certificate.pdf", name.replace(' ', "_"))
}

/// Builds the download response for a rendered certificate.
///
/// `upload` is moved into the response body and deleted when the server
/// drops the body, after the last byte has been written.
pub fn pdf_attachment(
    name: &str,
    pdf: CertificatePdf,
    upload: Option<StoredUpload>,
) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_bytes(
        format!("attachment; filename={}", attachment_filename(name)).as_bytes(),
    )
    .map_err(|_| AppError::Validation("Name cannot be used as a file name".to_string()))?;

    let bytes = pdf.into_bytes();
    let content_length = HeaderValue::from(bytes.len());
    let body = Body::from_stream(stream::iter([Ok::<_, Infallible>(bytes)]).map(
        move |chunk| {
            let _cleanup_after_send = &upload;
            chunk
        },
    ));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, content_length),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Workspace;
    use http_body_util::BodyExt;
    use std::io::Write;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(attachment_filename("Jane Doe"), "Jane_Doe_certificate.pdf");
        assert_eq!(attachment_filename("  a  b "), "__a__b__certificate.pdf");
        assert_eq!(attachment_filename("José-Luis O'Neil"), "José-Luis_O'Neil_certificate.pdf");
    }

    #[tokio::test]
    async fn response_carries_pdf_headers() {
        let mut pdf = CertificatePdf::default();
        pdf.write_all(b"%PDF-1.3 test").unwrap();

        let response = pdf_attachment("Jane Doe", pdf, None).unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=Jane_Doe_certificate.pdf"
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "13");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"%PDF-1.3 test");
    }

    #[tokio::test]
    async fn upload_outlives_response_until_body_is_consumed() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::prepare(dir.path()).unwrap();
        let upload = workspace
            .store("bgImage", Some("bg.png"), "image/png", b"png")
            .await
            .unwrap();
        let path = upload.path().to_path_buf();

        let mut pdf = CertificatePdf::default();
        pdf.write_all(b"%PDF-").unwrap();
        let response = pdf_attachment("Jane", pdf, Some(upload)).unwrap();
        assert!(path.exists());

        response.into_body().collect().await.unwrap();
        assert!(!path.exists());
    }
}
