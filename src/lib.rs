//! HTTP service that renders one-page "certificate of completion" PDFs from
//! a multipart form.

pub mod config;
pub mod error;
pub mod pdf;
pub mod routes;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use state::AppState;
