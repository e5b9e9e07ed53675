//! PDF layout for the commercial proposal.
//!
//! One vertical cursor walks each A4 page from the top margin down: logo,
//! centered title, client block, divider, one numbered section per line
//! item, divider, grand total and footer. When the cursor falls under the
//! page-break threshold before a new section, a fresh page is started.

use std::fs::File;
use std::io::BufWriter;

use ::image::{DynamicImage, RgbImage, Rgba};
use chrono::{Duration, NaiveDate};
use printpdf::*;

use crate::currency;
use crate::error::AppError;
use crate::model::{ClientRecord, LineItem};

/// A4 dimensions in mm
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Margins
const MARGIN_MM: f32 = 18.0;

/// Indent for the fields inside an item section
const FIELD_INDENT_MM: f32 = 7.0;

/// Vertical advance per drawn line
const LINE_HEIGHT_MM: f32 = 7.0;
const FIELD_HEIGHT_MM: f32 = 5.5;
const SECTION_GAP_MM: f32 = 10.0;

/// Font sizes in points
const TITLE_FONT_SIZE: f32 = 20.0;
const SECTION_FONT_SIZE: f32 = 14.0;
const NORMAL_FONT_SIZE: f32 = 12.0;

/// Logo bounds
const LOGO_MAX_WIDTH_MM: f32 = 50.0;
const LOGO_MAX_HEIGHT_MM: f32 = 25.0;

/// Cursor height below which the next item section starts a new page
const DEFAULT_PAGE_BREAK_THRESHOLD_MM: f32 = 35.0;

/// How long a proposal stays valid
const VALIDITY_DAYS: i64 = 14;

/// Layout knobs for `generate_pdf`.
pub struct RenderOptions {
    pub page_break_threshold_mm: f32,
    pub logo: Option<DynamicImage>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            page_break_threshold_mm: DEFAULT_PAGE_BREAK_THRESHOLD_MM,
            logo: None,
        }
    }
}

/// Date the proposal stops being valid.
pub fn expiration_date(proposal_date: NaiveDate) -> NaiveDate {
    proposal_date + Duration::days(VALIDITY_DAYS)
}

/// Default output filename derived from the client name: trimmed,
/// whitespace collapsed to underscores, lowercased.
pub fn output_filename(client_name: &str) -> String {
    let slug = client_name
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    format!("proposta_comercial_{}.pdf", slug)
}

/// Render the proposal for `client` and `items` and write it to
/// `output_path`. Fails before creating any file when the client name is
/// empty or an item carries a non-numeric price or quantity.
pub fn generate_pdf(
    client: &ClientRecord,
    items: &[LineItem],
    proposal_date: NaiveDate,
    options: &RenderOptions,
    output_path: &str,
) -> Result<(), AppError> {
    if client.name.trim().is_empty() {
        return Err(AppError::MissingField("client name"));
    }

    let (doc, page1, layer1) = PdfDocument::new(
        "Proposta Comercial",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let mut layer = doc.get_page(page1).get_layer(layer1);

    let font_regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::PdfError(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    // Logo in the top-left corner, when provided
    if let Some(ref logo) = options.logo {
        let logo_height = embed_logo(&layer, logo, MARGIN_MM, y);
        y -= logo_height + 10.0;
    }

    // Centered title
    let title = "Proposta Comercial";
    let title_x = (PAGE_WIDTH_MM - text_width_mm(title, TITLE_FONT_SIZE)) / 2.0;
    layer.use_text(title, TITLE_FONT_SIZE, Mm(title_x), Mm(y), &font_bold);
    y -= LINE_HEIGHT_MM + 4.0;

    // Client block
    layer.use_text(
        &format!("Cliente: {}", client.name),
        NORMAL_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_regular,
    );
    y -= LINE_HEIGHT_MM;
    if let Some(ref email) = client.email {
        layer.use_text(
            &format!("E-mail: {}", email),
            NORMAL_FONT_SIZE,
            Mm(MARGIN_MM),
            Mm(y),
            &font_regular,
        );
        y -= LINE_HEIGHT_MM;
    }
    if let Some(ref phone) = client.phone {
        layer.use_text(
            &format!("WhatsApp: {}", phone),
            NORMAL_FONT_SIZE,
            Mm(MARGIN_MM),
            Mm(y),
            &font_regular,
        );
        y -= LINE_HEIGHT_MM;
    }
    layer.use_text(
        &format!("Data da Proposta: {}", proposal_date.format("%d/%m/%Y")),
        NORMAL_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_regular,
    );
    y -= LINE_HEIGHT_MM;

    draw_divider(&layer, y);
    y -= LINE_HEIGHT_MM;

    // Item sections
    let mut grand_total = 0.0;
    for (index, item) in items.iter().enumerate() {
        if y < options.page_break_threshold_mm {
            let (page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        let field_x = MARGIN_MM + FIELD_INDENT_MM;

        layer.use_text(
            &format!("Serviço {}", index + 1),
            SECTION_FONT_SIZE,
            Mm(MARGIN_MM),
            Mm(y),
            &font_bold,
        );
        y -= LINE_HEIGHT_MM;

        layer.use_text(
            &format!("Nome: {}", item.name),
            NORMAL_FONT_SIZE,
            Mm(field_x),
            Mm(y),
            &font_regular,
        );
        y -= FIELD_HEIGHT_MM;

        if let Some(ref details) = item.details {
            layer.use_text(
                &format!("Detalhes: {}", details),
                NORMAL_FONT_SIZE,
                Mm(field_x),
                Mm(y),
                &font_regular,
            );
            y -= FIELD_HEIGHT_MM;
        }

        layer.use_text(
            &format!("Unidade: {}", item.unit),
            NORMAL_FONT_SIZE,
            Mm(field_x),
            Mm(y),
            &font_regular,
        );
        y -= FIELD_HEIGHT_MM;

        layer.use_text(
            &format!("Preço Unitário: {}", item.unit_price),
            NORMAL_FONT_SIZE,
            Mm(field_x),
            Mm(y),
            &font_regular,
        );
        y -= FIELD_HEIGHT_MM;

        layer.use_text(
            &format!("Quantidade: {}", item.quantity),
            NORMAL_FONT_SIZE,
            Mm(field_x),
            Mm(y),
            &font_regular,
        );
        y -= FIELD_HEIGHT_MM;

        let line_total = item.total()?;
        layer.use_text(
            &format!("Total: {}", currency::format(line_total)),
            NORMAL_FONT_SIZE,
            Mm(field_x),
            Mm(y),
            &font_regular,
        );
        y -= SECTION_GAP_MM;

        grand_total += line_total;
    }

    draw_divider(&layer, y);
    y -= LINE_HEIGHT_MM;

    // Footer: grand total, payment terms, validity
    layer.use_text(
        &format!("Total dos Serviços: {}", currency::format(grand_total)),
        SECTION_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_bold,
    );
    y -= SECTION_GAP_MM;

    layer.use_text(
        "Forma de Pagamento: À vista e cartões de crédito e débito.",
        NORMAL_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_regular,
    );
    y -= LINE_HEIGHT_MM;

    layer.use_text(
        &format!(
            "Validade da proposta: {}",
            expiration_date(proposal_date).format("%d/%m/%Y")
        ),
        NORMAL_FONT_SIZE,
        Mm(MARGIN_MM),
        Mm(y),
        &font_regular,
    );

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| AppError::PdfError(e.to_string()))?;

    Ok(())
}

/// Approximate rendered width of Helvetica text, for centering.
/// The average glyph is close to half an em.
fn text_width_mm(text: &str, font_size_pt: f32) -> f32 {
    text.chars().count() as f32 * font_size_pt * 0.5 * 0.3528
}

fn draw_divider(layer: &PdfLayerReference, y: f32) {
    let color = Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None));
    layer.set_outline_color(color);
    layer.set_outline_thickness(0.5);
    draw_line(layer, MARGIN_MM, y, PAGE_WIDTH_MM - MARGIN_MM, y);
}

fn draw_line(layer: &PdfLayerReference, x1: f32, y1: f32, x2: f32, y2: f32) {
    let points = vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
    ];
    let line = Line {
        points,
        is_closed: false,
    };
    layer.add_line(line);
}

/// Place the logo top-left aligned at (x, top_y), scaled to fit the logo
/// bounds while keeping its aspect ratio. Returns the drawn height in mm.
fn embed_logo(layer: &PdfLayerReference, logo: &DynamicImage, x: f32, top_y: f32) -> f32 {
    // Flatten transparency against a white page background
    let rgba_image = logo.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();

    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (px, py, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(px, py, ::image::Rgb([out_r, out_g, out_b]));
    }

    let aspect_ratio = width_px as f32 / height_px as f32;
    let (final_width_mm, final_height_mm) =
        if LOGO_MAX_WIDTH_MM / LOGO_MAX_HEIGHT_MM > aspect_ratio {
            (LOGO_MAX_HEIGHT_MM * aspect_ratio, LOGO_MAX_HEIGHT_MM)
        } else {
            (LOGO_MAX_WIDTH_MM, LOGO_MAX_WIDTH_MM / aspect_ratio)
        };

    let raw_pixels = rgb_image.into_raw();
    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: raw_pixels,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI that maps the pixel width onto the desired physical width
    let dpi = (width_px as f32) / (final_width_mm / 25.4);

    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(top_y - final_height_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    final_height_mm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_slugged_from_the_client_name() {
        assert_eq!(
            output_filename("  Maria   Silva "),
            "proposta_comercial_maria_silva.pdf"
        );
        assert_eq!(output_filename("ACME"), "proposta_comercial_acme.pdf");
    }

    #[test]
    fn proposal_is_valid_for_fourteen_days() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            expiration_date(date),
            NaiveDate::from_ymd_opt(2026, 9, 13).unwrap()
        );
    }

    #[test]
    fn empty_client_name_aborts_before_writing() {
        let client = ClientRecord {
            name: "   ".to_string(),
            email: None,
            phone: None,
        };
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let path = "tests/output/should-not-exist-unit.pdf";
        let result = generate_pdf(&client, &[], date, &RenderOptions::default(), path);
        assert!(matches!(result, Err(AppError::MissingField(_))));
        assert!(!std::path::Path::new(path).exists());
    }
}
