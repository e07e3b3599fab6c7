//! Fixed certificate layout as a list of line items.
//!
//! Items are laid out top to bottom by a single loop in the renderer: each
//! block is drawn centred across the page, then the cursor moves down by
//! `spacing_after` line units of the item's own text size.

use genpdf::Alignment;

use super::{CertificateFields, A4_WIDTH_MM};

pub const TITLE: &str = "CERTIFICATE OF COMPLETION";
pub const PREAMBLE: &str = "This is to certify that";
pub const COMPLETION_CLAUSE: &str = "has successfully completed the course";

/// Distance from the top edge of the page to the title.
pub const TOP_OFFSET_MM: f64 = 63.5;

/// Width of the rule drawn under the recipient name.
pub const RULE_WIDTH_MM: f64 = 105.8;

/// Names longer than this (in characters) drop to the smaller recipient tier.
pub const LONG_NAME_CHARS: usize = 24;

/// Course titles longer than this drop to the smaller subheading tier.
pub const LONG_COURSE_CHARS: usize = 40;

const PT_TO_MM: f64 = 25.4 / 72.0;

/// Widest glyph assumed when checking whether a word fits on one line, in ems.
const WIDEST_GLYPH_EM: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const INK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const DARK: Rgb = Rgb(0x33, 0x33, 0x33);
    pub const MUTED: Rgb = Rgb(0x55, 0x55, 0x55);
    pub const RULE: Rgb = Rgb(0xaa, 0xaa, 0xaa);
}

/// Size and weight class of a text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTier {
    Heading,
    Recipient,
    RecipientLong,
    Subheading,
    SubheadingLong,
    Body,
    Caption,
}

impl TextTier {
    pub fn font_size(self) -> u8 {
        match self {
            TextTier::Heading => 30,
            TextTier::Recipient => 42,
            TextTier::RecipientLong => 22,
            TextTier::Subheading => 26,
            TextTier::SubheadingLong => 14,
            TextTier::Body => 14,
            TextTier::Caption => 12,
        }
    }

    pub fn is_bold(self) -> bool {
        !matches!(self, TextTier::Body | TextTier::Caption)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, TextTier::Recipient | TextTier::RecipientLong)
    }

    fn recipient(name: &str) -> Self {
        if name.chars().count() > LONG_NAME_CHARS {
            TextTier::RecipientLong
        } else {
            TextTier::Recipient
        }
    }

    fn subheading(course: &str) -> Self {
        if course.chars().count() > LONG_COURSE_CHARS {
            TextTier::SubheadingLong
        } else {
            TextTier::Subheading
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    Text(String),
    Rule { width_mm: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineItem {
    pub block: Block,
    pub tier: TextTier,
    pub color: Rgb,
    pub alignment: Alignment,
    pub margin_top_mm: f64,
    pub spacing_after: f64,
}

impl LineItem {
    fn text(text: impl Into<String>, tier: TextTier, color: Rgb, spacing_after: f64) -> Self {
        Self {
            block: Block::Text(text.into()),
            tier,
            color,
            alignment: Alignment::Center,
            margin_top_mm: 0.0,
            spacing_after,
        }
    }

    /// Text from a request field. Words too wide for a page line are split
    /// with spaces so the paragraph can wrap instead of overflowing.
    fn field(text: &str, tier: TextTier, color: Rgb, spacing_after: f64) -> Self {
        Self::text(break_long_words(text, tier.font_size()), tier, color, spacing_after)
    }

    fn with_margin_top(mut self, margin_top_mm: f64) -> Self {
        self.margin_top_mm = margin_top_mm;
        self
    }
}

fn break_long_words(text: &str, font_size: u8) -> String {
    let max_chars = (A4_WIDTH_MM / (f64::from(font_size) * PT_TO_MM * WIDEST_GLYPH_EM)) as usize;
    let max_chars = max_chars.max(1);

    text.split(' ')
        .map(|word| {
            let chars: Vec<char> = word.chars().collect();
            if chars.len() <= max_chars {
                return word.to_string();
            }
            chars
                .chunks(max_chars)
                .map(|chunk| chunk.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn certificate_layout(fields: &CertificateFields) -> Vec<LineItem> {
    vec![
        LineItem::text(TITLE, TextTier::Heading, Rgb::DARK, 1.5).with_margin_top(TOP_OFFSET_MM),
        LineItem::text(PREAMBLE, TextTier::Body, Rgb::MUTED, 1.0),
        LineItem::field(
            &fields.name,
            TextTier::recipient(&fields.name),
            Rgb::INK,
            0.5,
        ),
        LineItem {
            block: Block::Rule {
                width_mm: RULE_WIDTH_MM,
            },
            tier: TextTier::Body,
            color: Rgb::RULE,
            alignment: Alignment::Center,
            margin_top_mm: 0.0,
            spacing_after: 1.5,
        },
        LineItem::text(COMPLETION_CLAUSE, TextTier::Body, Rgb::MUTED, 1.0),
        LineItem::field(
            &fields.course,
            TextTier::subheading(&fields.course),
            Rgb::DARK,
            2.0,
        ),
        LineItem::field(
            &format!("Awarded on {}", fields.date),
            TextTier::Caption,
            Rgb::MUTED,
            0.0,
        ),
    ]
}
