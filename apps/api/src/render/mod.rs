//! PDF backend for the flow engine.
//!
//! Draw calls are appended to one `Content` stream per page as they arrive; `finish`
//! assembles the catalog, page tree, base-14 Helvetica fonts and image XObjects.
//! Layout coordinates (mm, top-left origin) are converted to PDF points with a
//! bottom-left origin here and nowhere else.

pub mod encoding;
pub mod raster;

use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::documents::PreparedDocument;
use crate::layout::font_metrics::get_metrics;
use crate::layout::{
    layout, Emphasis, ImageData, LayoutSummary, PageGeometry, RenderError, Renderer, Rgb,
    TextStyle, Theme,
};
use encoding::to_win_ansi;
use raster::{EncodedImage, StreamFilter};

/// PDF points per millimetre.
const MM_TO_PT: f32 = 72.0 / 25.4;
/// Distance from the top of a line box to the baseline, in mm per point of font size.
const BASELINE_FACTOR: f32 = 0.33;
/// Bézier control-point factor for quarter circles.
const KAPPA: f32 = 0.552_284_8;
const CONTENT_FLATE_LEVEL: u8 = 6;

/// Resource name and base font for each face, indexed by `font_slot`.
const FONTS: [(&str, Emphasis); 3] = [
    ("F1", Emphasis::Normal),
    ("F2", Emphasis::Bold),
    ("F3", Emphasis::Italic),
];

fn font_slot(emphasis: Emphasis) -> usize {
    match emphasis {
        Emphasis::Normal => 0,
        Emphasis::Bold => 1,
        Emphasis::Italic => 2,
    }
}

fn base_font_name(emphasis: Emphasis) -> &'static str {
    match emphasis {
        Emphasis::Italic => "Helvetica-Oblique",
        other => get_metrics(other).base_font,
    }
}

struct PageBuf {
    content: Content,
    /// Indices into `PdfRenderer::images` placed on this page.
    images: Vec<usize>,
}

impl PageBuf {
    fn new() -> Self {
        Self {
            content: Content::new(),
            images: Vec::new(),
        }
    }
}

/// Renders draw calls into an in-memory PDF document.
pub struct PdfRenderer {
    width_mm: f32,
    height_mm: f32,
    title: Option<String>,
    pages: Vec<PageBuf>,
    images: Vec<EncodedImage>,
}

impl PdfRenderer {
    /// Opens a document with a single empty page of the given geometry.
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            width_mm: geometry.width(),
            height_mm: geometry.height(),
            title: None,
            pages: vec![PageBuf::new()],
            images: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current(&mut self) -> &mut PageBuf {
        if self.pages.is_empty() {
            self.pages.push(PageBuf::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn x_pt(&self, x_mm: f32) -> f32 {
        x_mm * MM_TO_PT
    }

    /// Converts a top-down y in mm to a bottom-up y in points.
    fn y_pt(&self, y_mm: f32) -> f32 {
        (self.height_mm - y_mm) * MM_TO_PT
    }

    /// Serialises the document.
    pub fn finish(self) -> Vec<u8> {
        let PdfRenderer {
            width_mm,
            height_mm,
            title,
            pages,
            images,
        } = self;

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let font_ids: Vec<Ref> = FONTS.iter().map(|_| alloc.bump()).collect();
        let image_ids: Vec<Ref> = images.iter().map(|_| alloc.bump()).collect();
        let page_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();
        let content_ids: Vec<Ref> = pages.iter().map(|_| alloc.bump()).collect();

        let mut pdf = Pdf::new();

        if let Some(title) = &title {
            let info_id = alloc.bump();
            pdf.document_info(info_id)
                .title(TextStr(title))
                .producer(TextStr("jobfit-api"));
        }

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        for ((_, emphasis), id) in FONTS.iter().zip(&font_ids) {
            pdf.type1_font(*id)
                .base_font(Name(base_font_name(*emphasis).as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (image, id) in images.iter().zip(&image_ids) {
            let mask_id = image.alpha_mask.as_ref().map(|_| alloc.bump());

            let mut xobj = pdf.image_xobject(*id, &image.bytes);
            xobj.filter(match image.filter {
                StreamFilter::Dct => Filter::DctDecode,
                StreamFilter::Flate => Filter::FlateDecode,
            });
            xobj.width(image.width as i32);
            xobj.height(image.height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_id) = mask_id {
                xobj.s_mask(mask_id);
            }
            xobj.finish();

            if let (Some(mask_id), Some(mask)) = (mask_id, &image.alpha_mask) {
                let mut s_mask = pdf.image_xobject(mask_id, mask);
                s_mask.filter(Filter::FlateDecode);
                s_mask.width(image.width as i32);
                s_mask.height(image.height as i32);
                s_mask.color_space().device_gray();
                s_mask.bits_per_component(8);
            }
        }

        let media_box = Rect::new(0.0, 0.0, width_mm * MM_TO_PT, height_mm * MM_TO_PT);
        for (i, page_buf) in pages.into_iter().enumerate() {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(page_tree_id)
                .contents(content_ids[i]);
            {
                let mut resources = page.resources();
                {
                    let mut fonts = resources.fonts();
                    for ((name, _), id) in FONTS.iter().zip(&font_ids) {
                        fonts.pair(Name(name.as_bytes()), *id);
                    }
                }
                if !page_buf.images.is_empty() {
                    let mut xobjects = resources.x_objects();
                    for index in &page_buf.images {
                        xobjects.pair(Name(image_name(*index).as_bytes()), image_ids[*index]);
                    }
                }
            }
            page.finish();

            let raw = page_buf.content.finish();
            let compressed = compress_to_vec_zlib(&raw, CONTENT_FLATE_LEVEL);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.finish()
    }
}

/// Lays out a prepared document and serialises it to PDF bytes.
pub fn render_document(
    document: &PreparedDocument,
    theme: &Theme,
) -> Result<(Vec<u8>, LayoutSummary), RenderError> {
    let mut renderer = PdfRenderer::new(&document.geometry).with_title(document.title.clone());
    let summary = layout(&document.blocks, &document.geometry, theme, &mut renderer)?;
    debug!(
        pages = renderer.page_count(),
        images = renderer.images.len(),
        "Serialising PDF"
    );
    Ok((renderer.finish(), summary))
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

impl Renderer for PdfRenderer {
    fn measure_wrapped_lines(
        &self,
        text: &str,
        font_size: f32,
        emphasis: Emphasis,
        max_width: f32,
    ) -> Vec<String> {
        get_metrics(emphasis).wrap(text, font_size, max_width)
    }

    fn text_width(&self, text: &str, font_size: f32, emphasis: Emphasis) -> f32 {
        get_metrics(emphasis).width_mm(text, font_size)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> Result<(), RenderError> {
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return Err(RenderError::Draw(format!(
                "invalid font size {}",
                style.font_size
            )));
        }
        let encoded = to_win_ansi(text);
        if encoded.is_empty() {
            return Ok(());
        }

        let x_pt = self.x_pt(x);
        let y_pt = self.y_pt(y + style.font_size * BASELINE_FACTOR);
        let (r, g, b) = style.color.unwrap_or(Rgb::BLACK).to_unit();
        let font_name = FONTS[font_slot(style.emphasis)].0;

        self.current()
            .content
            .set_fill_rgb(r, g, b)
            .begin_text()
            .set_font(Name(font_name.as_bytes()), style.font_size)
            .next_line(x_pt, y_pt)
            .show(Str(&encoded))
            .end_text();
        Ok(())
    }

    fn draw_filled_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        corner_radius: f32,
    ) -> Result<(), RenderError> {
        if w <= 0.0 || h <= 0.0 {
            return Ok(());
        }
        let x0 = self.x_pt(x);
        let y0 = self.y_pt(y + h);
        let (w, h) = (w * MM_TO_PT, h * MM_TO_PT);
        let radius = (corner_radius * MM_TO_PT).clamp(0.0, w.min(h) / 2.0);
        let (r, g, b) = color.to_unit();

        let content = &mut self.current().content;
        content.set_fill_rgb(r, g, b);
        if radius > 0.0 {
            rounded_rect_path(content, x0, y0, w, h, radius);
        } else {
            content.rect(x0, y0, w, h);
        }
        content.fill_nonzero();
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<(), RenderError> {
        let encoded = raster::encode(&image.0).map_err(|e| RenderError::Asset(e.to_string()))?;
        let index = self.images.len();
        self.images.push(encoded);

        let (x_pt, y_pt) = (self.x_pt(x), self.y_pt(y + h));
        let name = image_name(index);
        let page = self.current();
        page.images.push(index);
        page.content
            .save_state()
            .transform([w * MM_TO_PT, 0.0, 0.0, h * MM_TO_PT, x_pt, y_pt])
            .x_object(Name(name.as_bytes()))
            .restore_state();
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.pages.push(PageBuf::new());
        Ok(())
    }
}

/// Appends a closed rounded-rectangle path with its bottom-left corner at (x, y).
fn rounded_rect_path(content: &mut Content, x: f32, y: f32, w: f32, h: f32, r: f32) {
    let (x1, y1) = (x + w, y + h);
    let k = KAPPA * r;
    content
        .move_to(x + r, y)
        .line_to(x1 - r, y)
        .cubic_to(x1 - r + k, y, x1, y + r - k, x1, y + r)
        .line_to(x1, y1 - r)
        .cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1)
        .line_to(x + r, y1)
        .cubic_to(x + r - k, y1, x, y1 - r + k, x, y1 - r)
        .line_to(x, y + r)
        .cubic_to(x, y + r - k, x + r - k, y, x + r, y)
        .close_path();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ContentBlock;
    use bytes::Bytes;

    fn geometry() -> PageGeometry {
        PageGeometry::a4(15.0).unwrap()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_empty_document_is_valid_single_page_pdf() {
        let renderer = PdfRenderer::new(&geometry());
        assert_eq!(renderer.page_count(), 1);
        let bytes = renderer.finish();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"/Helvetica-Bold"));
    }

    #[test]
    fn test_add_page_increases_page_count() {
        let mut renderer = PdfRenderer::new(&geometry());
        renderer.add_page().unwrap();
        renderer.add_page().unwrap();
        assert_eq!(renderer.page_count(), 3);
        assert!(contains(&renderer.finish(), b"/Count 3"));
    }

    #[test]
    fn test_malformed_image_is_asset_error() {
        let mut renderer = PdfRenderer::new(&geometry());
        let result = renderer.draw_image(
            &ImageData(Bytes::from_static(b"garbage")),
            10.0,
            10.0,
            30.0,
            30.0,
        );
        assert!(matches!(result, Err(RenderError::Asset(_))));
        assert!(renderer.images.is_empty());
    }

    #[test]
    fn test_png_image_is_embedded_with_mask() {
        let mut renderer = PdfRenderer::new(&geometry());
        let png = raster::tests::png_bytes(true);
        renderer
            .draw_image(&ImageData(Bytes::from(png)), 10.0, 10.0, 30.0, 30.0)
            .unwrap();
        let bytes = renderer.finish();
        assert!(contains(&bytes, b"/Im0"));
        assert!(contains(&bytes, b"/SMask"));
    }

    #[test]
    fn test_invalid_font_size_is_draw_error() {
        let mut renderer = PdfRenderer::new(&geometry());
        let result = renderer.draw_text("x", 10.0, 10.0, TextStyle::normal(0.0));
        assert!(matches!(result, Err(RenderError::Draw(_))));
    }

    #[test]
    fn test_layout_through_pdf_renderer() {
        let geometry = geometry();
        let blocks: Vec<ContentBlock> = (0..60)
            .map(|i| ContentBlock::BulletItem {
                text: format!("Strength number {i}"),
                marker: None,
                fill: Some(Rgb(240, 253, 244)),
            })
            .collect();
        let mut renderer = PdfRenderer::new(&geometry).with_title("Report");
        let summary = layout(&blocks, &geometry, &Theme::default(), &mut renderer).unwrap();
        assert_eq!(summary.page_count, renderer.page_count());
        assert!(summary.page_count >= 2);

        let bytes = renderer.finish();
        let expected = format!("/Count {}", summary.page_count);
        assert!(contains(&bytes, expected.as_bytes()));
        assert!(contains(&bytes, b"/Title"));
    }

    #[test]
    fn test_render_document_reports_summary() {
        let document = PreparedDocument {
            title: "CV".to_string(),
            filename: "cv.pdf".to_string(),
            geometry: geometry(),
            blocks: vec![
                ContentBlock::heading("Ada Lovelace", TextStyle::bold(24.0)),
                ContentBlock::paragraph("Analyst and writer.", TextStyle::normal(10.0)),
            ],
        };
        let (bytes, summary) = render_document(&document, &Theme::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.blocks_placed, 2);
    }
}
