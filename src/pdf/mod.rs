// Certificate PDF generation
// Uses genpdf - requires Liberation, DejaVu or Arial fonts in standard paths
mod elements;
pub mod layout;

use genpdf::elements::{Break, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style::{Color, Style};
use genpdf::{Element, Margins, PaperSize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use elements::{page_background, HorizontalRule};
use layout::{certificate_layout, Block, LineItem};

const A4_WIDTH_MM: f64 = 210.0;
const A4_HEIGHT_MM: f64 = 297.0;

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/msttcorefonts",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];

/// File names of the four faces of one family, as the distributions ship
/// them.
struct FontFiles {
    family: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const FONT_FAMILIES: &[FontFiles] = &[
    FontFiles {
        family: "LiberationSans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FontFiles {
        family: "DejaVuSans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    FontFiles {
        family: "Arial",
        regular: "Arial.ttf",
        bold: "Arial Bold.ttf",
        italic: "Arial Italic.ttf",
        bold_italic: "Arial Bold Italic.ttf",
    },
    FontFiles {
        family: "Arial",
        regular: "Arial.ttf",
        bold: "Arial_Bold.ttf",
        italic: "Arial_Italic.ttf",
        bold_italic: "Arial_Bold_Italic.ttf",
    },
];

/// Paths of a complete regular/bold/italic/bold-italic family on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontPaths {
    pub family: &'static str,
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub italic: PathBuf,
    pub bold_italic: PathBuf,
}

impl FontPaths {
    fn in_dir(dir: &Path, files: &FontFiles) -> Option<Self> {
        let paths = Self {
            family: files.family,
            regular: dir.join(files.regular),
            bold: dir.join(files.bold),
            italic: dir.join(files.italic),
            bold_italic: dir.join(files.bold_italic),
        };
        let complete = [&paths.regular, &paths.bold, &paths.italic, &paths.bold_italic]
            .iter()
            .all(|path| path.is_file());
        complete.then_some(paths)
    }

    fn load(&self) -> Result<FontFamily<FontData>, genpdf::error::Error> {
        Ok(FontFamily {
            regular: FontData::load(&self.regular, None)?,
            bold: FontData::load(&self.bold, None)?,
            italic: FontData::load(&self.italic, None)?,
            bold_italic: FontData::load(&self.bold_italic, None)?,
        })
    }
}

/// Every complete family found in `extra_dir` (if any) and then the
/// well-known system font directories, in search order.
fn font_candidates(extra_dir: Option<&Path>) -> impl Iterator<Item = FontPaths> + '_ {
    extra_dir
        .into_iter()
        .chain(FONT_PATHS.iter().map(Path::new))
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            FONT_FAMILIES
                .iter()
                .filter_map(move |files| FontPaths::in_dir(dir, files))
        })
}

/// First complete font family installed on this machine, without loading it.
pub fn find_font_files(extra_dir: Option<&Path>) -> Option<FontPaths> {
    font_candidates(extra_dir).next()
}

/// Loads the first installed family that parses. Families whose files are
/// present but unreadable are logged and skipped.
pub fn load_fonts(extra_dir: Option<&Path>) -> Option<FontFamily<FontData>> {
    font_candidates(extra_dir).find_map(|paths| match paths.load() {
        Ok(fonts) => {
            tracing::info!(
                family = paths.family,
                path = %paths.regular.display(),
                "Loaded certificate fonts"
            );
            Some(fonts)
        }
        Err(e) => {
            tracing::warn!(family = paths.family, error = %e, "Skipping unreadable font family");
            None
        }
    })
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No suitable fonts found. Install: apt install fonts-liberation")]
    FontsUnavailable,

    #[error("Background image {path} could not be read: {source}")]
    Background {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Validated text printed on a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CertificateFields {
    pub name: String,
    pub course: String,
    pub date: String,
}

/// PDF output collected chunk by chunk in the order the document writer
/// emitted it.
#[derive(Debug, Default)]
pub struct CertificatePdf {
    chunks: Vec<Vec<u8>>,
}

impl CertificatePdf {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl io::Write for CertificatePdf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_empty() {
            self.chunks.push(buf.to_vec());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Builds certificates with the fonts loaded at startup.
#[derive(Clone)]
pub struct CertificateRenderer {
    fonts: Option<FontFamily<FontData>>,
}

impl CertificateRenderer {
    pub fn new(fonts: Option<FontFamily<FontData>>) -> Self {
        Self { fonts }
    }

    pub fn has_fonts(&self) -> bool {
        self.fonts.is_some()
    }

    /// Renders the single-page certificate into memory.
    ///
    /// A `background` path that no longer exists renders without a
    /// background; one that exists but cannot be decoded is an error.
    pub fn render(
        &self,
        fields: &CertificateFields,
        background: Option<&Path>,
    ) -> Result<CertificatePdf, RenderError> {
        let background = match background {
            Some(path) if path.exists() => {
                Some(page_background(path, A4_WIDTH_MM, A4_HEIGHT_MM)?)
            }
            Some(path) => {
                tracing::warn!(path = %path.display(), "Background image missing, rendering without it");
                None
            }
            None => None,
        };

        let fonts = self.fonts.clone().ok_or(RenderError::FontsUnavailable)?;

        let mut doc = genpdf::Document::new(fonts);
        doc.set_title("Certificate of Completion");
        doc.set_paper_size(PaperSize::A4);

        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(0);
        doc.set_page_decorator(decorator);

        if let Some(background) = background {
            doc.push(background);
        }

        for item in certificate_layout(fields) {
            push_line_item(&mut doc, item);
        }

        let mut pdf = CertificatePdf::default();
        doc.render(&mut pdf)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;

        tracing::debug!(chunks = pdf.chunk_count(), "Certificate rendered");
        Ok(pdf)
    }
}

fn push_line_item(doc: &mut genpdf::Document, item: LineItem) {
    let color = Color::Rgb(item.color.0, item.color.1, item.color.2);
    let mut style = Style::new()
        .with_font_size(item.tier.font_size())
        .with_color(color);
    if item.tier.is_bold() {
        style = style.bold();
    }
    if item.tier.is_italic() {
        style = style.italic();
    }

    let top = Margins::trbl(item.margin_top_mm, 0.0, 0.0, 0.0);
    match item.block {
        Block::Text(text) => doc.push(
            Paragraph::new(text)
                .aligned(item.alignment)
                .styled(style)
                .padded(top),
        ),
        Block::Rule { width_mm } => doc.push(HorizontalRule::new(width_mm, color).padded(top)),
    }

    if item.spacing_after > 0.0 {
        doc.push(Break::new(item.spacing_after).styled(style));
    }
}
