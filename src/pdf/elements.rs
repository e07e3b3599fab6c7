use genpdf::elements::Image;
use genpdf::style::{Color, Style};
use genpdf::{render, Context, Element, Mm, Position, RenderResult, Scale, Size};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use super::RenderError;

/// A horizontal line centred in the available width, drawn at the top of
/// its area in the element's colour.
pub struct HorizontalRule {
    width: Mm,
    color: Color,
}

impl HorizontalRule {
    pub fn new(width_mm: f64, color: Color) -> Self {
        Self {
            width: Mm::from(width_mm),
            color,
        }
    }
}

/// Vertical space the rule occupies in the flow.
const RULE_HEIGHT_MM: f64 = 0.5;

impl Element for HorizontalRule {
    fn render(
        &mut self,
        _context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, genpdf::error::Error> {
        let available = area.size().width;
        let start = (available - self.width) * 0.5;
        let end = start + self.width;

        area.draw_line(
            vec![Position::new(start, 0.0), Position::new(end, 0.0)],
            Style::new().with_color(self.color),
        );

        Ok(RenderResult {
            size: Size::new(available, RULE_HEIGHT_MM),
            has_more: false,
        })
    }
}

const BACKGROUND_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Loads the background image and scales it to cover `page_width_mm` by
/// `page_height_mm` from the top-left corner, ignoring aspect ratio.
///
/// Transparent pixels are composited onto white first since the PDF
/// backend embeds RGB only.
pub fn page_background(
    path: &Path,
    page_width_mm: f64,
    page_height_mm: f64,
) -> Result<Image, RenderError> {
    let (rgb_png, width_px, height_px) =
        flatten_to_png(path).map_err(|source| RenderError::Background {
            path: path.to_path_buf(),
            source,
        })?;

    let width_mm = width_px as f64 / BACKGROUND_DPI * MM_PER_INCH;
    let height_mm = height_px as f64 / BACKGROUND_DPI * MM_PER_INCH;

    let mut background = Image::from_reader(Cursor::new(rgb_png))
        .map_err(|e| RenderError::Pdf(e.to_string()))?
        .with_position(Position::new(0.0, 0.0))
        .with_scale(Scale::new(
            page_width_mm / width_mm,
            page_height_mm / height_mm,
        ));
    background.set_dpi(BACKGROUND_DPI);

    Ok(background)
}

fn flatten_to_png(path: &Path) -> image::ImageResult<(Vec<u8>, u32, u32)> {
    let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;

    let rgb = if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();
        let mut canvas = RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]));
        image::imageops::overlay(&mut canvas, &rgba, 0, 0);
        DynamicImage::ImageRgba8(canvas).to_rgb8()
    } else {
        decoded.to_rgb8()
    };

    let (width, height) = rgb.dimensions();
    let mut encoded = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb).write_to(&mut encoded, ImageFormat::Png)?;

    Ok((encoded.into_inner(), width, height))
}
