use chrono::Utc;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Millisecond wall-clock timestamp that never repeats within the process.
fn next_timestamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let prev = LAST_TIMESTAMP_MS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(prev + 1)
}

/// Working directory for uploaded background images.
///
/// Obtained only through [`Workspace::prepare`], so holding one means the
/// directory existed when the service started.
#[derive(Clone, Debug)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    pub fn prepare(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Writes an uploaded file under a `{timestamp}-{field}{.ext}` name.
    ///
    /// The returned guard owns the file: dropping it deletes it, including
    /// when the write itself fails part way.
    pub async fn store(
        &self,
        field_name: &str,
        original_name: Option<&str>,
        mime_type: &str,
        data: &[u8],
    ) -> io::Result<StoredUpload> {
        let extension = upload_extension(original_name, mime_type);
        let filename = format!(
            "{}-{}{}",
            next_timestamp_ms(),
            sanitize_component(field_name),
            extension
        );

        let upload = StoredUpload {
            path: self.dir.join(filename),
            field_name: field_name.to_string(),
            extension,
            mime_type: mime_type.to_string(),
        };
        tokio::fs::write(&upload.path, data).await?;

        tracing::debug!(path = %upload.path.display(), bytes = data.len(), "Stored upload");
        Ok(upload)
    }
}

/// A file written to the [`Workspace`] for the lifetime of one request.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
    field_name: String,
    extension: String,
    mime_type: String,
}

impl StoredUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Deleted uploaded image"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to delete uploaded image"
            ),
        }
    }
}

/// Extension (with leading dot) taken from the client's file name, falling
/// back to one implied by the declared MIME type.
fn upload_extension(original_name: Option<&str>, mime_type: &str) -> String {
    let from_name = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(sanitize_component)
        .filter(|ext| !ext.is_empty());

    let ext = from_name.or_else(|| {
        mime_guess::get_mime_extensions_str(mime_type)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    });

    ext.map(|ext| format!(".{}", ext)).unwrap_or_default()
}

fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
