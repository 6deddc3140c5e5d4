//! Document flow engine. Places content blocks on fixed-size pages.
//!
//! # Page-break rules
//! - Every block except `Paragraph` is atomic: if it does not fit below the cursor it
//!   moves whole to the next page.
//! - A `Paragraph` is checked line by line and may continue on the next page.
//! - A block taller than an empty page is drawn at the top of the page and overflows;
//!   the engine never emits a page that stays empty.
//! - The footer is drawn once, on the final page, after the last block.
//!
//! The cursor lives inside [`Flow`], which exists for exactly one `layout` call.

use tracing::{debug, warn};

use crate::layout::block::{ContentBlock, Emphasis, ImageData, Rgb, ScoreTone, TextStyle};
use crate::layout::geometry::{Cursor, PageGeometry};
use crate::layout::renderer::{RenderError, Renderer};

// ────────────────────────────────────────────────────────────────────────────
// Metrics (millimetres unless noted)
// ────────────────────────────────────────────────────────────────────────────

/// Line height as a fraction of the font size in points.
pub const LINE_HEIGHT_FACTOR: f32 = 0.5;

pub const SCORE_BAR_HEIGHT: f32 = 12.0;
/// Space to the right of the bar fill reserved for the percentage label.
const SCORE_BAR_LABEL_ROOM: f32 = 40.0;
const SCORE_BAR_INSET: f32 = 2.0;
const SCORE_TEXT_SIZE: f32 = 10.0;

const BULLET_FONT_SIZE: f32 = 10.0;
pub const BULLET_INDENT: f32 = 10.0;
pub const BULLET_LINE_HEIGHT: f32 = 5.0;
const BULLET_PADDING: f32 = 3.0;
pub const BULLET_MIN_HEIGHT: f32 = 8.0;

const ROW_KEY_SIZE: f32 = 10.0;
const ROW_VALUE_SIZE: f32 = 9.0;
const ROW_INDENT: f32 = 15.0;
const ROW_LINE_HEIGHT: f32 = 4.0;
const ROW_PADDING: f32 = 10.0;
const ROW_MIN_HEIGHT: f32 = 12.0;

pub const CARD_MIN_HEIGHT: f32 = 20.0;
const CARD_PADDING: f32 = 5.0;
const CARD_CORNER: f32 = 3.0;

pub const SECTION_BAND_HEIGHT: f32 = 8.0;
const SECTION_BAND_TEXT_SIZE: f32 = 14.0;

pub const BANNER_HEIGHT: f32 = 40.0;
const PHOTO_SIZE: f32 = 32.0;
const PHOTO_INSET: f32 = 4.0;

/// Distance of the footer line from the bottom edge of the page.
pub const FOOTER_OFFSET: f32 = 15.0;
const FOOTER_TEXT_SIZE: f32 = 8.0;

/// Corner radius shared by cards and bars.
const CARD_RADIUS: f32 = 2.0;

pub const DEFAULT_FOOTER: &str = "Generated by JobFit AI - Your Career Success Partner";

// ────────────────────────────────────────────────────────────────────────────
// Theme
// ────────────────────────────────────────────────────────────────────────────

/// Palette, spacing and footer text applied to every block.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub body_text: Rgb,
    pub muted_text: Rgb,
    pub band_fill: Rgb,
    pub band_text: Rgb,
    pub banner_fill: Rgb,
    pub bar_track: Rgb,
    pub card_fill: Rgb,
    pub positive: Rgb,
    pub caution: Rgb,
    pub negative: Rgb,
    pub footer_text: Rgb,
    /// Vertical gap added after every block.
    pub gutter: f32,
    /// Empty disables the footer.
    pub footer: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            body_text: Rgb::BLACK,
            muted_text: Rgb(80, 80, 80),
            band_fill: Rgb(59, 130, 246),
            band_text: Rgb::WHITE,
            banner_fill: Rgb(37, 99, 235),
            bar_track: Rgb(240, 240, 240),
            card_fill: Rgb(240, 240, 240),
            positive: Rgb(132, 204, 22),
            caution: Rgb(251, 191, 36),
            negative: Rgb(239, 68, 68),
            footer_text: Rgb(150, 150, 150),
            gutter: 3.0,
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl Theme {
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    pub fn tone_color(&self, tone: ScoreTone) -> Rgb {
        match tone {
            ScoreTone::Positive => self.positive,
            ScoreTone::Caution => self.caution,
            ScoreTone::Negative => self.negative,
        }
    }
}

/// What a layout run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSummary {
    pub page_count: usize,
    pub blocks_placed: usize,
    /// Optional assets (photos) that failed to render and were left out.
    pub assets_skipped: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Flows `blocks` onto pages of `geometry`, drawing through `renderer`.
///
/// The renderer must have one open page on entry. Asset errors from `draw_image` are
/// absorbed; every other renderer error aborts the run.
pub fn layout<R: Renderer>(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    theme: &Theme,
    renderer: &mut R,
) -> Result<LayoutSummary, RenderError> {
    let mut flow = Flow {
        renderer,
        geometry,
        theme,
        cursor: Cursor::top_of_first_page(geometry),
        blocks_placed: 0,
        assets_skipped: 0,
    };

    for block in blocks {
        flow.place(block)?;
    }
    flow.finish()
}

/// Height a block reserves on the page, before the gutter. Paragraphs report the
/// height of all their lines even though they may be split.
pub fn required_height<R: Renderer>(
    block: &ContentBlock,
    geometry: &PageGeometry,
    renderer: &R,
) -> f32 {
    let content_width = geometry.content_width();
    match block {
        ContentBlock::Heading { text, style } | ContentBlock::Paragraph { text, style } => {
            let lines =
                renderer.measure_wrapped_lines(text, style.font_size, style.emphasis, content_width);
            lines.len() as f32 * style.font_size * LINE_HEIGHT_FACTOR
        }
        ContentBlock::ScoreBar { .. } => SCORE_BAR_HEIGHT,
        ContentBlock::BulletItem { text, marker, .. } => {
            let lines = bullet_lines(text, marker.as_deref(), content_width, renderer);
            (lines.len() as f32 * BULLET_LINE_HEIGHT + BULLET_PADDING).max(BULLET_MIN_HEIGHT)
        }
        ContentBlock::KeyValueRow { value, .. } => {
            let lines = row_value_lines(value, content_width, renderer);
            (lines.len() as f32 * ROW_LINE_HEIGHT + ROW_PADDING).max(ROW_MIN_HEIGHT)
        }
        ContentBlock::Card { text, style, .. } => {
            let lines = card_lines(text, *style, content_width, renderer);
            card_height(lines.len(), *style)
        }
        ContentBlock::SectionBand { .. } => SECTION_BAND_HEIGHT,
        ContentBlock::Banner { .. } => BANNER_HEIGHT,
        ContentBlock::Spacer(amount) => amount.max(0.0),
    }
}

fn bullet_lines<R: Renderer>(
    text: &str,
    marker: Option<&str>,
    content_width: f32,
    renderer: &R,
) -> Vec<String> {
    let marker = marker.unwrap_or("•");
    renderer.measure_wrapped_lines(
        &format!("{marker} {text}"),
        BULLET_FONT_SIZE,
        Emphasis::Normal,
        content_width - BULLET_INDENT,
    )
}

fn card_lines<R: Renderer>(
    text: &str,
    style: TextStyle,
    content_width: f32,
    renderer: &R,
) -> Vec<String> {
    renderer.measure_wrapped_lines(
        text,
        style.font_size,
        style.emphasis,
        content_width - 2.0 * CARD_PADDING,
    )
}

fn card_height(lines: usize, style: TextStyle) -> f32 {
    (lines as f32 * style.font_size * LINE_HEIGHT_FACTOR + 2.0 * CARD_PADDING).max(CARD_MIN_HEIGHT)
}

fn row_value_lines<R: Renderer>(value: &str, content_width: f32, renderer: &R) -> Vec<String> {
    renderer.measure_wrapped_lines(value, ROW_VALUE_SIZE, Emphasis::Normal, content_width - ROW_INDENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Flow state
// ────────────────────────────────────────────────────────────────────────────

struct Flow<'a, R: Renderer> {
    renderer: &'a mut R,
    geometry: &'a PageGeometry,
    theme: &'a Theme,
    cursor: Cursor,
    blocks_placed: usize,
    assets_skipped: usize,
}

impl<R: Renderer> Flow<'_, R> {
    fn place(&mut self, block: &ContentBlock) -> Result<(), RenderError> {
        match block {
            ContentBlock::Paragraph { text, style } => self.place_paragraph(text, *style)?,
            ContentBlock::Spacer(amount) => {
                self.cursor.advance_clamped(amount.max(0.0), self.geometry);
            }
            atomic => {
                let height = required_height(atomic, self.geometry, &*self.renderer);
                if height > self.geometry.content_height() {
                    warn!(
                        kind = atomic.kind(),
                        height,
                        page_height = self.geometry.content_height(),
                        "Block is taller than a page and will overflow the bottom margin"
                    );
                }
                self.ensure_room(height, atomic.kind())?;
                self.draw_atomic(atomic)?;
                self.cursor.advance_clamped(height + self.theme.gutter, self.geometry);
            }
        }
        self.blocks_placed += 1;
        Ok(())
    }

    /// Starts a new page when `height` does not fit below the cursor, unless the
    /// current page is still empty.
    fn ensure_room(&mut self, height: f32, kind: &'static str) -> Result<(), RenderError> {
        let at_page_top = self.cursor.y_offset <= self.geometry.margin();
        if self.cursor.overflows(height, self.geometry) && !at_page_top {
            let remaining = self.cursor.remaining(self.geometry);
            self.renderer.add_page()?;
            self.cursor.next_page(self.geometry);
            debug!(page = self.cursor.page_index, kind, height, remaining, "page break");
        }
        Ok(())
    }

    fn text_style(&self, style: TextStyle) -> TextStyle {
        TextStyle {
            color: Some(style.color.unwrap_or(self.theme.body_text)),
            ..style
        }
    }

    fn place_paragraph(&mut self, text: &str, style: TextStyle) -> Result<(), RenderError> {
        let margin = self.geometry.margin();
        let line_height = style.font_size * LINE_HEIGHT_FACTOR;
        let lines = self.renderer.measure_wrapped_lines(
            text,
            style.font_size,
            style.emphasis,
            self.geometry.content_width(),
        );
        let style = self.text_style(style);

        for line in &lines {
            self.ensure_room(line_height, "paragraph")?;
            self.renderer.draw_text(line, margin, self.cursor.y_offset, style)?;
            self.cursor.y_offset += line_height;
        }
        self.cursor.advance_clamped(self.theme.gutter, self.geometry);
        Ok(())
    }

    fn draw_atomic(&mut self, block: &ContentBlock) -> Result<(), RenderError> {
        let margin = self.geometry.margin();
        let content_width = self.geometry.content_width();
        let y = self.cursor.y_offset;

        match block {
            ContentBlock::Heading { text, style } => {
                let line_height = style.font_size * LINE_HEIGHT_FACTOR;
                let lines = self.renderer.measure_wrapped_lines(
                    text,
                    style.font_size,
                    style.emphasis,
                    content_width,
                );
                let style = self.text_style(*style);
                for (i, line) in lines.iter().enumerate() {
                    self.renderer
                        .draw_text(line, margin, y + i as f32 * line_height, style)?;
                }
            }

            ContentBlock::ScoreBar { label, score } => {
                let clamped = score.clamp(0.0, 100.0);
                self.renderer.draw_filled_rect(
                    margin,
                    y,
                    content_width,
                    SCORE_BAR_HEIGHT,
                    self.theme.bar_track,
                    CARD_RADIUS,
                )?;
                let fill_width = (content_width - SCORE_BAR_LABEL_ROOM) * clamped / 100.0;
                if fill_width > 0.0 {
                    self.renderer.draw_filled_rect(
                        margin + SCORE_BAR_INSET,
                        y + SCORE_BAR_INSET,
                        fill_width,
                        SCORE_BAR_HEIGHT - 2.0 * SCORE_BAR_INSET,
                        self.theme.tone_color(ScoreTone::for_score(clamped)),
                        1.0,
                    )?;
                }
                let text_y = y + (SCORE_BAR_HEIGHT - SCORE_TEXT_SIZE * LINE_HEIGHT_FACTOR) / 2.0;
                let style = self.text_style(TextStyle::bold(SCORE_TEXT_SIZE));
                self.renderer.draw_text(label, margin + 5.0, text_y, style)?;
                self.renderer.draw_text(
                    &format!("{score}%"),
                    self.geometry.width() - margin - 15.0,
                    text_y,
                    style,
                )?;
            }

            ContentBlock::BulletItem { text, marker, fill } => {
                let lines = bullet_lines(text, marker.as_deref(), content_width, &*self.renderer);
                let height = (lines.len() as f32 * BULLET_LINE_HEIGHT + BULLET_PADDING)
                    .max(BULLET_MIN_HEIGHT);
                if let Some(fill) = fill {
                    self.renderer
                        .draw_filled_rect(margin, y, content_width, height, *fill, CARD_RADIUS)?;
                }
                let style = self.text_style(TextStyle::normal(BULLET_FONT_SIZE));
                for (i, line) in lines.iter().enumerate() {
                    self.renderer.draw_text(
                        line,
                        margin + BULLET_INDENT / 2.0,
                        y + BULLET_PADDING / 2.0 + i as f32 * BULLET_LINE_HEIGHT,
                        style,
                    )?;
                }
            }

            ContentBlock::KeyValueRow { key, value, fill } => {
                let lines = row_value_lines(value, content_width, &*self.renderer);
                let height =
                    (lines.len() as f32 * ROW_LINE_HEIGHT + ROW_PADDING).max(ROW_MIN_HEIGHT);
                if let Some(fill) = fill {
                    self.renderer
                        .draw_filled_rect(margin, y, content_width, height, *fill, CARD_RADIUS)?;
                }
                let key_style = self.text_style(TextStyle::bold(ROW_KEY_SIZE));
                self.renderer
                    .draw_text(&format!("• {key}"), margin + 5.0, y + 1.5, key_style)?;
                let value_style =
                    TextStyle::normal(ROW_VALUE_SIZE).with_color(self.theme.muted_text);
                for (i, line) in lines.iter().enumerate() {
                    self.renderer.draw_text(
                        line,
                        margin + ROW_PADDING,
                        y + 7.0 + i as f32 * ROW_LINE_HEIGHT,
                        value_style,
                    )?;
                }
            }

            ContentBlock::Card { text, style, fill } => {
                let lines = card_lines(text, *style, content_width, &*self.renderer);
                let height = card_height(lines.len(), *style);
                self.renderer.draw_filled_rect(
                    margin,
                    y,
                    content_width,
                    height,
                    fill.unwrap_or(self.theme.card_fill),
                    CARD_CORNER,
                )?;
                let line_height = style.font_size * LINE_HEIGHT_FACTOR;
                let text_top = y + (height - lines.len() as f32 * line_height) / 2.0;
                let style = self.text_style(*style);
                for (i, line) in lines.iter().enumerate() {
                    self.renderer.draw_text(
                        line,
                        margin + CARD_PADDING,
                        text_top + i as f32 * line_height,
                        style,
                    )?;
                }
            }

            ContentBlock::SectionBand { title, fill } => {
                self.renderer.draw_filled_rect(
                    margin,
                    y,
                    content_width,
                    SECTION_BAND_HEIGHT,
                    fill.unwrap_or(self.theme.band_fill),
                    0.0,
                )?;
                let style = TextStyle::bold(SECTION_BAND_TEXT_SIZE).with_color(self.theme.band_text);
                let text_y =
                    y + (SECTION_BAND_HEIGHT - SECTION_BAND_TEXT_SIZE * LINE_HEIGHT_FACTOR) / 2.0;
                self.renderer
                    .draw_text(&title.to_uppercase(), margin + 2.0, text_y, style)?;
            }

            ContentBlock::Banner {
                name,
                subtitle,
                contact,
                photo,
            } => self.draw_banner(name, subtitle, contact, photo.as_ref())?,

            // Routed through `place` and never reach here.
            ContentBlock::Paragraph { .. } | ContentBlock::Spacer(_) => {}
        }
        Ok(())
    }

    fn draw_banner(
        &mut self,
        name: &str,
        subtitle: &str,
        contact: &str,
        photo: Option<&ImageData>,
    ) -> Result<(), RenderError> {
        let margin = self.geometry.margin();
        let y = self.cursor.y_offset;
        self.renderer.draw_filled_rect(
            margin,
            y,
            self.geometry.content_width(),
            BANNER_HEIGHT,
            self.theme.banner_fill,
            3.0,
        )?;

        let mut text_x = margin + 6.0;
        if let Some(photo) = photo {
            match self.renderer.draw_image(
                photo,
                margin + PHOTO_INSET,
                y + PHOTO_INSET,
                PHOTO_SIZE,
                PHOTO_SIZE,
            ) {
                Ok(()) => text_x = margin + PHOTO_INSET + PHOTO_SIZE + 6.0,
                Err(RenderError::Asset(reason)) => {
                    warn!(%reason, "Profile photo could not be rendered; continuing without it");
                    self.assets_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let color = self.theme.band_text;
        self.renderer
            .draw_text(name, text_x, y + 4.0, TextStyle::bold(24.0).with_color(color))?;
        if !subtitle.is_empty() {
            self.renderer
                .draw_text(subtitle, text_x, y + 17.0, TextStyle::normal(14.0).with_color(color))?;
        }
        if !contact.is_empty() {
            self.renderer
                .draw_text(contact, text_x, y + 27.0, TextStyle::normal(10.0).with_color(color))?;
        }
        Ok(())
    }

    fn finish(self) -> Result<LayoutSummary, RenderError> {
        if !self.theme.footer.is_empty() {
            let style = TextStyle {
                font_size: FOOTER_TEXT_SIZE,
                emphasis: Emphasis::Italic,
                color: Some(self.theme.footer_text),
            };
            let width =
                self.renderer
                    .text_width(&self.theme.footer, style.font_size, style.emphasis);
            let x = ((self.geometry.width() - width) / 2.0).max(0.0);
            self.renderer.draw_text(
                &self.theme.footer,
                x,
                self.geometry.height() - FOOTER_OFFSET,
                style,
            )?;
        }

        Ok(LayoutSummary {
            page_count: self.cursor.page_index + 1,
            blocks_placed: self.blocks_placed,
            assets_skipped: self.assets_skipped,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
