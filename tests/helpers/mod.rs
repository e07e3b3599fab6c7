//! Test helpers: build the router over a temporary working directory and
//! hand-roll multipart bodies.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use certificate_service::config::Config;
use certificate_service::{routes, AppState};
use http_body_util::BodyExt;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----certificate-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub ready: bool,
    upload_dir: PathBuf,
    _root: TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Files currently in the working directory.
    pub fn stored_uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.upload_dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Like [`setup_test_app`], with a hook to adjust the config first.
pub fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let upload_dir = root.path().join("uploads");

    let mut config = Config::with_upload_folder(&upload_dir);
    configure(&mut config);
    let state = AppState::initialize(config).unwrap();
    let ready = state.is_ready();
    let router = routes::router(Arc::new(state)).unwrap();

    TestApp {
        router,
        ready,
        upload_dir,
        _root: root,
    }
}

/// Whether this machine has a complete certificate font family. Rendering
/// tests skip only when this is false.
pub fn fonts_installed() -> bool {
    certificate_service::pdf::find_font_files(None).is_some()
}

/// Test app that is expected to render: `None` when no fonts are installed,
/// and a failure when fonts are installed but the app did not load them.
pub fn setup_rendering_app() -> Option<TestApp> {
    if !fonts_installed() {
        eprintln!("skipping: no certificate fonts installed");
        return None;
    }
    let app = setup_test_app();
    assert!(app.ready, "fonts are installed but the app is not ready");
    Some(app)
}

pub fn page_count(pdf: &[u8]) -> usize {
    lopdf::Document::load_mem(pdf).unwrap().get_pages().len()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn certificate_fields(self, name: &str, course: &str, date: &str) -> Self {
        self.text("name", name).text("course", course).text("date", date)
    }

    pub fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/generate-certificate")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([30, 60, 90, 200]),
    ))
    .write_to(&mut out, image::ImageFormat::Png)
    .unwrap();
    out.into_inner()
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([220, 200, 160]),
    ))
    .write_to(&mut out, image::ImageFormat::Jpeg)
    .unwrap();
    out.into_inner()
}
