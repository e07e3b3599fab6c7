use std::path::PathBuf;

const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost:3000,http://127.0.0.1:3000,https://certificate-frontend-eight.vercel.app";

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub upload_folder: PathBuf,
    pub font_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let upload_folder = base_dir.join(
            std::env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string()),
        );

        let font_dir = std::env::var("FONT_DIR")
            .ok()
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );
        if cors_origins.is_empty() {
            return Err("CORS_ORIGINS must name at least one origin".into());
        }

        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5051".to_string())
            .parse()
            .unwrap_or(5051);

        Ok(Self {
            upload_folder,
            font_dir,
            cors_origins,
            max_upload_bytes,
            host,
            port,
        })
    }

    /// Configuration rooted at an explicit working directory, with every
    /// other setting at its default.
    pub fn with_upload_folder(upload_folder: impl Into<PathBuf>) -> Self {
        Self {
            upload_folder: upload_folder.into(),
            font_dir: None,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            host: "127.0.0.1".to_string(),
            port: 5051,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}
