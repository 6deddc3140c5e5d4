//! Content blocks: the units the flow engine places on the page.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Styling primitives
// ────────────────────────────────────────────────────────────────────────────

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Components scaled to the 0.0–1.0 range PDF colour operators expect.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: f32,
    pub emphasis: Emphasis,
    /// `None` renders in the theme's body colour.
    pub color: Option<Rgb>,
}

impl TextStyle {
    pub fn normal(font_size: f32) -> Self {
        Self {
            font_size,
            emphasis: Emphasis::Normal,
            color: None,
        }
    }

    pub fn bold(font_size: f32) -> Self {
        Self {
            font_size,
            emphasis: Emphasis::Bold,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Score buckets
// ────────────────────────────────────────────────────────────────────────────

/// Colour bucket for a score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreTone {
    /// score ≥ 80
    Positive,
    /// 60 ≤ score < 80
    Caution,
    /// score < 60
    Negative,
}

impl ScoreTone {
    pub fn for_score(score: f32) -> Self {
        if score >= 80.0 {
            ScoreTone::Positive
        } else if score >= 60.0 {
            ScoreTone::Caution
        } else {
            ScoreTone::Negative
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

/// Encoded image bytes (JPEG, PNG, ...). Decoding happens in the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData(pub Bytes);

/// One semantic unit of document content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Single- or multi-line title. Never split across pages.
    Heading { text: String, style: TextStyle },
    /// Body text. The only block allowed to continue on the next page, line by line.
    Paragraph { text: String, style: TextStyle },
    /// Labelled horizontal bar filled to `score` percent.
    ScoreBar { label: String, score: f32 },
    /// Bulleted row on a tinted background. `marker` replaces the default `•`,
    /// e.g. `"1."` for numbered lists.
    BulletItem {
        text: String,
        marker: Option<String>,
        fill: Option<Rgb>,
    },
    /// Bold key with a wrapped, smaller value underneath.
    KeyValueRow {
        key: String,
        value: String,
        fill: Option<Rgb>,
    },
    /// Text on a full-width rounded card, vertically centred. Never split.
    Card {
        text: String,
        style: TextStyle,
        /// `None` uses the theme's card colour.
        fill: Option<Rgb>,
    },
    /// Full-width coloured title bar.
    SectionBand { title: String, fill: Option<Rgb> },
    /// Profile header card: name, subtitle, contact line and an optional photo.
    Banner {
        name: String,
        subtitle: String,
        contact: String,
        photo: Option<ImageData>,
    },
    /// Fixed vertical gap.
    Spacer(f32),
}

impl ContentBlock {
    pub fn heading(text: impl Into<String>, style: TextStyle) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            style,
        }
    }

    pub fn paragraph(text: impl Into<String>, style: TextStyle) -> Self {
        ContentBlock::Paragraph {
            text: text.into(),
            style,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::ScoreBar { .. } => "score_bar",
            ContentBlock::BulletItem { .. } => "bullet_item",
            ContentBlock::KeyValueRow { .. } => "key_value_row",
            ContentBlock::Card { .. } => "card",
            ContentBlock::SectionBand { .. } => "section_band",
            ContentBlock::Banner { .. } => "banner",
            ContentBlock::Spacer(_) => "spacer",
        }
    }
}
