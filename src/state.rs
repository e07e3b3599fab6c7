use crate::config::Config;
use crate::pdf::{self, CertificateRenderer};
use crate::storage::Workspace;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub workspace: Workspace,
    pub renderer: CertificateRenderer,
}

impl AppState {
    /// One-time startup: creates the working directory and loads fonts.
    pub fn initialize(config: Config) -> std::io::Result<Self> {
        let workspace = Workspace::prepare(&config.upload_folder)?;

        let renderer = CertificateRenderer::new(pdf::load_fonts(config.font_dir.as_deref()));
        if !renderer.has_fonts() {
            tracing::warn!(
                "No suitable fonts found; certificate generation will fail until fonts are installed"
            );
        }

        Ok(Self {
            config: Arc::new(config),
            workspace,
            renderer,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.renderer.has_fonts()
    }
}
