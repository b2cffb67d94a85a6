//! Certificate document rendering.
//!
//! Turns one certificate record into a single-page A4 PDF with a fixed
//! region sequence: watermark, branded header, title, course banner,
//! recipient block, body copy, dual metadata columns, pinned verification
//! footer, QR code, border. All geometry is expressed in PDF points from
//! the top of the page and converted at the printpdf boundary, which
//! measures from the bottom.
//!
//! Rendering is deterministic: the same record and assets always produce
//! byte-identical output. Document metadata dates are pinned and no
//! XMP/ICC payloads are emitted.

pub mod assets;
pub mod cursor;
pub mod metrics;
pub mod qr;

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::{
    Actions, BorderArray, Color, ColorArray, CustomPdfConformance, HighlightingMode, Image,
    ImageTransform, IndirectFontRef, Line, LinkAnnotation, Mm, PdfConformance,
    PdfDocument, PdfLayerReference, Point, Rect, Rgb,
};
use printpdf::path::PaintMode;
use thiserror::Error;
use time::OffsetDateTime;

use crate::db::Certificate;
use crate::error::ApiError;
use assets::{flatten_onto_white, Assets};
use cursor::{LayoutCursor, PageGeometry};
use metrics::{ascent, line_height, text_width, FontFace};
use qr::verification_code;

const PT_TO_MM: f64 = 25.4 / 72.0;
const DPI: f64 = 300.0;

const PAGE_MARGIN: f64 = 50.0;

const BRAND_PART_ONE: &str = "VERI";
const BRAND_PART_TWO: &str = "DIA";
const WORDMARK_SIZE: f64 = 18.0;
const LOGO_WIDTH: f64 = 60.0;
const LOGO_TEXT_GAP: f64 = 10.0;
const HEADER_TOP: f64 = 60.0;
const HEADER_FALLBACK_GAP: f64 = 56.0;

const WATERMARK_WIDTH: f64 = 450.0;
const WATERMARK_HEIGHT: f64 = 300.0;
const WATERMARK_STRENGTH: f64 = 0.1;

const TITLE: &str = "Certificate of Accomplishment";
const TITLE_SIZE: f64 = 20.0;

const BANNER_HEIGHT: f64 = 25.0;
const BANNER_PADDING: f64 = 50.0;
const BANNER_TEXT_INSET: f64 = 25.0;
const BANNER_TEXT_DROP: f64 = 6.0;

const PRESENTED_TO: &str = "PRESENTED TO";

const BODY_LINES: [&str; 5] = [
    "The bearer of this certificate has successfully completed a specialized training course",
    "under the guidance of Veridia, demonstrating exceptional dedication and skill. This",
    "achievement stands as a testament to their comprehensive understanding of the",
    "material and their commitment to continual growth. We commend their",
    "accomplishments and wish them continued success in all future endeavors.",
];
const BODY_SIZE: f64 = 11.0;
const BODY_TRAILING_GAP: f64 = 120.0;

const RIGHT_BLOCK_WIDTH: f64 = 200.0;
const SIGNATURE_WIDTH: f64 = 100.0;
const SIGNATURE_OFFSET_X: f64 = 85.0;
const SIGNATURE_OFFSET_Y: f64 = -80.0;
const ISSUER_NAME: &str = "Amara Venkat";
const ISSUER_TITLE: &str = "Director of Learning, Veridia Labs";

const FOOTER_RISE: f64 = 20.0;
const QR_RISE: f64 = 120.0;
const QR_WIDTH: f64 = 100.0;
/// Fixed public site encoded in the scannable code (the dynamic per-record
/// URL is the footer link).
const VERIFICATION_SITE_URL: &str = "https://veridia.io";

const BORDER_THICKNESS: f64 = 3.0;

const INK: u32 = 0x000000;
const WHITE: u32 = 0xffffff;
const WORDMARK_DARK: u32 = 0x333333;
const WORDMARK_ACCENT: u32 = 0xff5733;
const TITLE_COLOR: u32 = 0xfe5732;
const BANNER_COLOR: u32 = 0x0056b6;
const LABEL_COLOR: u32 = 0x555555;
const BODY_COLOR: u32 = 0x444444;
const DIVIDER_COLOR: u32 = 0x888888;
const LINK_COLOR: u32 = 0x0000ff;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pdf construction failed: {0}")]
    Pdf(String),

    #[error("verification code encoding failed: {0}")]
    Qr(String),
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err.to_string())
    }
}

/// Renders the certificate into PDF bytes. Optional assets degrade
/// gracefully; any other failure aborts before bytes leave this function.
pub fn render_certificate(
    certificate: &Certificate,
    base_url: &str,
    assets: &Assets,
) -> Result<Vec<u8>, RenderError> {
    let page = PageGeometry::a4(PAGE_MARGIN);
    let (doc, page_index, layer_index) = PdfDocument::new(
        TITLE,
        Mm((page.width * PT_TO_MM) as f32),
        Mm((page.height * PT_TO_MM) as f32),
        "certificate",
    );
    let doc = doc
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }))
        .with_creation_date(OffsetDateTime::UNIX_EPOCH)
        .with_mod_date(OffsetDateTime::UNIX_EPOCH);

    let layer = doc.get_page(page_index).get_layer(layer_index);
    let regular = doc
        .add_builtin_font(FontFace::Helvetica.builtin())
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(FontFace::HelveticaBold.builtin())
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    let canvas = Canvas { layer, regular, bold, page };
    let mut cursor = LayoutCursor::new(page);

    draw_watermark(&canvas, assets);
    draw_header(&canvas, &mut cursor, assets);
    draw_title(&canvas, &mut cursor);
    draw_course_banner(&canvas, &mut cursor, &certificate.course_name);
    draw_recipient(&canvas, &mut cursor, &certificate.candidate_name);
    draw_body(&canvas, &mut cursor);
    draw_metadata(&canvas, &mut cursor, certificate, assets);
    let footer_top = draw_footer(&canvas, base_url, &certificate.learning_id);
    draw_verification_code(&canvas, footer_top)?;
    draw_border(&canvas);

    doc.save_to_bytes().map_err(|e| RenderError::Pdf(e.to_string()))
}

/// Drawing surface for one render: a single page layer, the two builtin
/// faces, and the page geometry for coordinate conversion.
struct Canvas {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page: PageGeometry,
}

impl Canvas {
    fn font(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Helvetica => &self.regular,
            FontFace::HelveticaBold => &self.bold,
        }
    }

    fn x_mm(&self, x_pt: f64) -> Mm {
        Mm((x_pt * PT_TO_MM) as f32)
    }

    /// Converts a top-origin y in points to printpdf's bottom-origin Mm.
    fn y_mm(&self, y_top_pt: f64) -> Mm {
        Mm(((self.page.height - y_top_pt) * PT_TO_MM) as f32)
    }

    /// Draws one line of text whose top edge sits at `top_pt`.
    fn text(&self, text: &str, face: FontFace, size: f64, color: u32, x_pt: f64, top_pt: f64) {
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(
            text,
            size as f32,
            self.x_mm(x_pt),
            self.y_mm(top_pt + ascent(size)),
            self.font(face),
        );
    }

    /// Centers one line between the margins at the cursor's position
    /// without advancing it; spacing stays the caller's decision.
    fn center_line(
        &self,
        cursor: &LayoutCursor,
        text: &str,
        face: FontFace,
        size: f64,
        color: u32,
    ) {
        let width = text_width(text, face, size);
        self.text(text, face, size, color, cursor.centered_x(width), cursor.y());
    }

    fn line(&self, x1: f64, y1_top: f64, x2: f64, y2_top: f64, color: u32, thickness: f64) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness as f32);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(self.x_mm(x1), self.y_mm(y1_top)), false),
                (Point::new(self.x_mm(x2), self.y_mm(y2_top)), false),
            ],
            is_closed: false,
        });
    }

    fn fill_rect(&self, x_pt: f64, top_pt: f64, width: f64, height: f64, color: u32) {
        self.layer.set_fill_color(rgb(color));
        let rect = Rect::new(
            self.x_mm(x_pt),
            self.y_mm(top_pt + height),
            self.x_mm(x_pt + width),
            self.y_mm(top_pt),
        )
        .with_mode(PaintMode::Fill);
        self.layer.add_rect(rect);
    }

    fn stroke_rect(&self, x_pt: f64, top_pt: f64, width: f64, height: f64, color: u32, thickness: f64) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness as f32);
        let rect = Rect::new(
            self.x_mm(x_pt),
            self.y_mm(top_pt + height),
            self.x_mm(x_pt + width),
            self.y_mm(top_pt),
        )
        .with_mode(PaintMode::Stroke);
        self.layer.add_rect(rect);
    }

    /// Places an image with its top-left corner at (`x_pt`, `top_pt`),
    /// scaled to the requested size in points.
    fn place_image(&self, image: &DynamicImage, x_pt: f64, top_pt: f64, width: f64, height: f64) {
        let native_width = f64::from(image.width()) * 72.0 / DPI;
        let native_height = f64::from(image.height()) * 72.0 / DPI;
        Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(self.x_mm(x_pt)),
                translate_y: Some(self.y_mm(top_pt + height)),
                scale_x: Some((width / native_width) as f32),
                scale_y: Some((height / native_height) as f32),
                dpi: Some(DPI as f32),
                ..Default::default()
            },
        );
    }
}

fn rgb(hex: u32) -> Color {
    let r = f64::from((hex >> 16) & 0xff) / 255.0;
    let g = f64::from((hex >> 8) & 0xff) / 255.0;
    let b = f64::from(hex & 0xff) / 255.0;
    Color::Rgb(Rgb::new(r as f32, g as f32, b as f32, None))
}

/// Brand mark centered on the page at low strength, behind everything
/// drawn afterwards. Missing asset: skip silently.
fn draw_watermark(canvas: &Canvas, assets: &Assets) {
    let Some(logo) = &assets.logo else { return };
    let pale = flatten_onto_white(logo, WATERMARK_STRENGTH);
    let x = (canvas.page.width - WATERMARK_WIDTH) / 2.0;
    let top = (canvas.page.height - WATERMARK_HEIGHT) / 2.0;
    canvas.place_image(&pale, x, top, WATERMARK_WIDTH, WATERMARK_HEIGHT);
}

/// Brand mark and two-tone wordmark centered as one group. Without the
/// mark the header degrades to a blank gap.
fn draw_header(canvas: &Canvas, cursor: &mut LayoutCursor, assets: &Assets) {
    match &assets.logo {
        Some(logo) => {
            let (px_w, px_h) = logo.dimensions();
            let logo_height = LOGO_WIDTH * f64::from(px_h) / f64::from(px_w);

            let part_one_width = text_width(BRAND_PART_ONE, FontFace::HelveticaBold, WORDMARK_SIZE);
            let part_two_width = text_width(BRAND_PART_TWO, FontFace::HelveticaBold, WORDMARK_SIZE);
            let group_width = LOGO_WIDTH + LOGO_TEXT_GAP + part_one_width + part_two_width;
            let start_x = cursor.centered_x(group_width);

            let flat = flatten_onto_white(logo, 1.0);
            canvas.place_image(&flat, start_x, HEADER_TOP, LOGO_WIDTH, logo_height);

            let text_x = start_x + LOGO_WIDTH + LOGO_TEXT_GAP;
            let text_top = HEADER_TOP + LOGO_WIDTH / 4.0;
            canvas.text(BRAND_PART_ONE, FontFace::HelveticaBold, WORDMARK_SIZE, WORDMARK_DARK, text_x, text_top);
            canvas.text(
                BRAND_PART_TWO,
                FontFace::HelveticaBold,
                WORDMARK_SIZE,
                WORDMARK_ACCENT,
                text_x + part_one_width,
                text_top,
            );

            cursor.set_y(HEADER_TOP + LOGO_WIDTH + 30.0);
        }
        None => cursor.advance(HEADER_FALLBACK_GAP),
    }
}

fn draw_title(canvas: &Canvas, cursor: &mut LayoutCursor) {
    canvas.center_line(cursor, TITLE, FontFace::HelveticaBold, TITLE_SIZE, TITLE_COLOR);
    cursor.advance(line_height(TITLE_SIZE) + 24.0);
}

/// Filled banner sized to the course name plus fixed padding; height is
/// fixed, width is content-driven.
fn draw_course_banner(canvas: &Canvas, cursor: &mut LayoutCursor, course_name: &str) {
    let banner_width = text_width(course_name, FontFace::HelveticaBold, 12.0) + BANNER_PADDING;
    let x = cursor.centered_x(banner_width);
    let top = cursor.y();

    canvas.fill_rect(x, top, banner_width, BANNER_HEIGHT, BANNER_COLOR);
    canvas.text(
        course_name,
        FontFace::HelveticaBold,
        12.0,
        WHITE,
        x + BANNER_TEXT_INSET,
        top + BANNER_TEXT_DROP,
    );

    cursor.set_y(top + BANNER_HEIGHT + 20.0);
}

fn draw_recipient(canvas: &Canvas, cursor: &mut LayoutCursor, candidate_name: &str) {
    canvas.center_line(cursor, PRESENTED_TO, FontFace::Helvetica, 10.0, LABEL_COLOR);
    cursor.advance(line_height(10.0) + 12.0);

    let name = candidate_name.to_uppercase();
    canvas.center_line(cursor, &name, FontFace::HelveticaBold, 18.0, INK);
    cursor.advance(line_height(18.0) + 16.0);

    let page = canvas.page;
    canvas.line(
        page.margin_left,
        cursor.y(),
        page.width - page.margin_right,
        cursor.y(),
        DIVIDER_COLOR,
        1.0,
    );
    cursor.advance(14.0);
}

fn draw_body(canvas: &Canvas, cursor: &mut LayoutCursor) {
    for line in BODY_LINES {
        canvas.center_line(cursor, line, FontFace::HelveticaBold, BODY_SIZE, BODY_COLOR);
        cursor.advance(line_height(BODY_SIZE) + 4.0);
    }
    cursor.advance(BODY_TRAILING_GAP);
}

/// Two sibling columns from one starting y: earned-on date and learning id
/// on the left, signature and issuer identity on the right. The cursor
/// resumes below the taller column.
fn draw_metadata(canvas: &Canvas, cursor: &mut LayoutCursor, certificate: &Certificate, assets: &Assets) {
    let page = canvas.page;

    let mut left = cursor.fork();
    let left_x = page.margin_left + 20.0;

    let label = "Earned on: ";
    canvas.text(label, FontFace::Helvetica, 10.0, INK, left_x, left.y());
    let earned_date = certificate.creation_date.format("%-d %b %Y").to_string();
    canvas.text(
        &earned_date,
        FontFace::HelveticaBold,
        10.0,
        INK,
        left_x + text_width(label, FontFace::Helvetica, 10.0),
        left.y(),
    );
    left.advance(line_height(10.0) + 5.0);

    let id_line = format!("ID: {}", certificate.learning_id.to_uppercase());
    canvas.text(&id_line, FontFace::Helvetica, 10.0, INK, left_x, left.y());
    left.advance(line_height(10.0));

    let mut right = cursor.fork();
    let right_x = page.width - page.margin_right - RIGHT_BLOCK_WIDTH;

    // Signature sits at a fixed offset from the block origin and does not
    // participate in cursor flow; its absence leaves the text untouched.
    if let Some(signature) = &assets.signature {
        let (px_w, px_h) = signature.dimensions();
        let signature_height = SIGNATURE_WIDTH * f64::from(px_h) / f64::from(px_w);
        let flat = flatten_onto_white(signature, 1.0);
        canvas.place_image(
            &flat,
            right_x + SIGNATURE_OFFSET_X,
            right.y() + SIGNATURE_OFFSET_Y,
            SIGNATURE_WIDTH,
            signature_height,
        );
    }

    let name_width = text_width(ISSUER_NAME, FontFace::HelveticaBold, 10.0);
    canvas.text(
        ISSUER_NAME,
        FontFace::HelveticaBold,
        10.0,
        INK,
        right_x + RIGHT_BLOCK_WIDTH - name_width,
        right.y(),
    );
    right.advance(line_height(10.0));

    let title_width = text_width(ISSUER_TITLE, FontFace::Helvetica, 9.0);
    canvas.text(
        ISSUER_TITLE,
        FontFace::Helvetica,
        9.0,
        INK,
        right_x + RIGHT_BLOCK_WIDTH - title_width,
        right.y(),
    );
    right.advance(line_height(9.0));

    cursor.merge(&left, &right);
    cursor.advance(20.0);
}

/// Label plus clickable dynamic URL, pinned at a fixed rise from the page
/// bottom regardless of how much content preceded it. Returns the footer's
/// top edge so the QR code can anchor above it.
fn draw_footer(canvas: &Canvas, base_url: &str, learning_id: &str) -> f64 {
    let page = canvas.page;
    let footer_top = page.height - page.margin_bottom - FOOTER_RISE;

    let label = "Certificate URL: ";
    let label_x = page.margin_left + 20.0;
    canvas.text(label, FontFace::Helvetica, 10.0, INK, label_x, footer_top);

    let url = format!("{}/api/certificates/{}/pdf", base_url, learning_id);
    let url_x = label_x + text_width(label, FontFace::Helvetica, 10.0);
    let url_width = text_width(&url, FontFace::Helvetica, 10.0);
    canvas.text(&url, FontFace::Helvetica, 10.0, LINK_COLOR, url_x, footer_top);

    let underline_y = footer_top + ascent(10.0) + 1.5;
    canvas.line(url_x, underline_y, url_x + url_width, underline_y, LINK_COLOR, 0.5);

    canvas.layer.add_link_annotation(LinkAnnotation::new(
        Rect::new(
            canvas.x_mm(url_x),
            canvas.y_mm(footer_top + line_height(10.0)),
            canvas.x_mm(url_x + url_width),
            canvas.y_mm(footer_top),
        ),
        Some(BorderArray::default()),
        Some(ColorArray::default()),
        Actions::uri(url),
        Some(HighlightingMode::Invert),
    ));

    footer_top
}

fn draw_verification_code(canvas: &Canvas, footer_top: f64) -> Result<(), RenderError> {
    let code = verification_code(VERIFICATION_SITE_URL)
        .map_err(|e| RenderError::Qr(format!("{e:?}")))?;
    let image = DynamicImage::ImageLuma8(code);
    let x = canvas.page.margin_left + 20.0;
    let top = footer_top - QR_RISE;
    canvas.place_image(&image, x, top, QR_WIDTH, QR_WIDTH);
    Ok(())
}

/// Stroked last so nothing occludes it.
fn draw_border(canvas: &Canvas) {
    let page = canvas.page;
    canvas.stroke_rect(
        page.margin_left,
        page.margin_top,
        page.width - page.margin_left - page.margin_right,
        page.height - page.margin_top - page.margin_bottom,
        INK,
        BORDER_THICKNESS,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_certificate() -> Certificate {
        Certificate {
            id: 1,
            candidate_name: "Jane Doe".to_string(),
            course_name: "Systems Design".to_string(),
            learning_id: "0f8b2c4d6e9a1b3c5d7e9f0a2b4c6d8e".to_string(),
            creation_date: chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn output_is_a_pdf() {
        let bytes =
            render_certificate(&sample_certificate(), "http://localhost:5000", &Assets::none())
                .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let cert = sample_certificate();
        let a = render_certificate(&cert, "http://localhost:5000", &Assets::none()).unwrap();
        let b = render_certificate(&cert, "http://localhost:5000", &Assets::none()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn footer_link_embeds_the_dynamic_url() {
        let cert = sample_certificate();
        let bytes = render_certificate(&cert, "http://localhost:5000", &Assets::none()).unwrap();
        let expected = format!(
            "http://localhost:5000/api/certificates/{}/pdf",
            cert.learning_id
        );
        assert!(contains(&bytes, expected.as_bytes()));
    }

    #[test]
    fn missing_assets_do_not_abort_the_render() {
        // no watermark, no logo, no signature: header falls back to a gap,
        // the right metadata column still renders
        let result =
            render_certificate(&sample_certificate(), "http://localhost:5000", &Assets::none());
        assert!(result.is_ok());
    }

    #[test]
    fn different_records_produce_different_documents() {
        let a = sample_certificate();
        let mut b = sample_certificate();
        b.learning_id = "ffffffffffffffffffffffffffffffff".to_string();
        let bytes_a = render_certificate(&a, "http://localhost:5000", &Assets::none()).unwrap();
        let bytes_b = render_certificate(&b, "http://localhost:5000", &Assets::none()).unwrap();
        assert_ne!(bytes_a, bytes_b);
    }
}
