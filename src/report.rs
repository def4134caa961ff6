use printpdf::path::PaintMode;
use printpdf::{
    Actions, BorderArray, BuiltinFont, Color, ColorArray, HighlightingMode, Image, ImageTransform,
    Line, LinkAnnotation, Mm, PdfDocument, Point, Rect, Rgb,
};
use serde::Serialize;

use crate::roster::StudentRecord;

const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;

const MARGIN_X: f64 = 10.0;
const RULE_RIGHT_X: f64 = 200.0;
const TOP_RULE_Y: f64 = 20.0;
const BOTTOM_RULE_Y: f64 = 285.0;

const TABLE_TOP_Y: f64 = 40.0;
const ROW_HEIGHT: f64 = 10.0;
const LABEL_CELL_WIDTH: f64 = 60.0;
const VALUE_CELL_WIDTH: f64 = 130.0;

const CHART_TOP_Y: f64 = 140.0;
const CHART_WIDTH_MM: f64 = 180.0;

const FOOTER_TEXT: &str = "Created with RollBook";
const FOOTER_LINK: &str = "https://rollbook.dev";

#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

impl ReportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: "render_failed".to_string(),
            message: message.into(),
        }
    }
}

fn pdf_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::new(e.to_string())
}

/// `{roll}_{name}.pdf`, with path separators flattened out of the name.
pub fn file_name(record: &StudentRecord) -> String {
    let raw = format!("{}_{}.pdf", record.roll_number, record.name);
    raw.replace(['/', '\\'], "-")
}

/// The nine identity/contact rows of the report table, in fixed order.
/// Missing optional fields render as an empty cell, never an omitted row.
fn table_rows(record: &StudentRecord) -> [(&'static str, String); 9] {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        ("Student Name:", record.name.clone()),
        ("Roll Number:", record.roll_number.clone()),
        ("PRN Number:", record.prn_number.clone()),
        ("Student's Mobile Number:", opt(&record.student_mobile)),
        ("Parent's Mobile Number:", opt(&record.parent_mobile)),
        ("Student's mail ID:", opt(&record.student_email)),
        ("Parents' mail ID:", opt(&record.parent_email)),
        ("Permanent Address:", opt(&record.permanent_address)),
        ("Residential Address:", opt(&record.residential_address)),
    ]
}

// printpdf's origin is the lower-left corner; the layout constants above are
// measured from the top of the page like the shell's mockups.
fn from_top(y: f64) -> Mm {
    Mm((PAGE_HEIGHT - y) as f32)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// One-page student report: horizontal rules, centered title, nine-row
/// bordered identity table, the performance chart scaled to a fixed width,
/// and a linked footer credit line.
pub fn build(record: &StudentRecord, chart_png: &[u8]) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        "Student Performance Report",
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "Layer 1",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let times_italic = doc
        .add_builtin_font(BuiltinFont::TimesItalic)
        .map_err(pdf_err)?;
    let helvetica_oblique = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(pdf_err)?;
    let helvetica = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;

    // Page rules.
    layer.set_outline_color(black());
    layer.set_outline_thickness(0.25);
    for y in [TOP_RULE_Y, BOTTOM_RULE_Y] {
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_X as f32), from_top(y)), false),
                (Point::new(Mm(RULE_RIGHT_X as f32), from_top(y)), false),
            ],
            is_closed: false,
        });
    }

    // Title, centered. Builtin fonts carry no metrics, so centering uses the
    // Helvetica/Times average glyph width of roughly half the point size.
    let title = "Student Information";
    layer.set_fill_color(black());
    layer.use_text(
        title,
        18.0,
        Mm((PAGE_WIDTH / 2.0 - text_width_mm(title, 18.0) / 2.0) as f32),
        from_top(30.0),
        &times_italic,
    );

    // Identity table: filled cells with near-white borders, label column then
    // value column, one row per field.
    layer.set_outline_color(Color::Rgb(Rgb::new(0.988, 0.988, 0.988, None)));
    layer.set_outline_thickness(0.5);
    for (i, (label, value)) in table_rows(record).iter().enumerate() {
        let row_top = TABLE_TOP_Y + i as f64 * ROW_HEIGHT;
        let row_bottom = row_top + ROW_HEIGHT;
        layer.set_fill_color(Color::Rgb(Rgb::new(
            100.0 / 255.0,
            176.0 / 255.0,
            227.0 / 255.0,
            None,
        )));
        layer.add_rect(
            Rect::new(
                Mm(MARGIN_X as f32),
                from_top(row_bottom),
                Mm((MARGIN_X + LABEL_CELL_WIDTH) as f32),
                from_top(row_top),
            )
            .with_mode(PaintMode::FillStroke),
        );
        layer.add_rect(
            Rect::new(
                Mm((MARGIN_X + LABEL_CELL_WIDTH) as f32),
                from_top(row_bottom),
                Mm((MARGIN_X + LABEL_CELL_WIDTH + VALUE_CELL_WIDTH) as f32),
                from_top(row_top),
            )
            .with_mode(PaintMode::FillStroke),
        );
        layer.set_fill_color(black());
        let baseline = from_top(row_top + 6.5);
        layer.use_text(*label, 12.0, Mm((MARGIN_X + 2.0) as f32), baseline, &helvetica_oblique);
        layer.use_text(
            value.as_str(),
            12.0,
            Mm((MARGIN_X + LABEL_CELL_WIDTH + 2.0) as f32),
            baseline,
            &helvetica_oblique,
        );
    }

    // Chart image, scaled to the fixed report width.
    let decoder = printpdf::image_crate::codecs::png::PngDecoder::new(std::io::Cursor::new(
        chart_png,
    ))
    .map_err(|e| ReportError::new(format!("malformed chart image: {}", e)))?;
    let chart = Image::try_from(decoder)
        .map_err(|e| ReportError::new(format!("malformed chart image: {}", e)))?;
    let px_width = chart.image.width.0 as f64;
    let px_height = chart.image.height.0 as f64;
    if px_width <= 0.0 || px_height <= 0.0 {
        return Err(ReportError::new("chart image has zero size"));
    }
    let chart_height_mm = px_height * CHART_WIDTH_MM / px_width;
    let dpi = px_width * 25.4 / CHART_WIDTH_MM;
    chart.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_X as f32)),
            translate_y: Some(from_top(CHART_TOP_Y + chart_height_mm)),
            dpi: Some(dpi as f32),
            ..Default::default()
        },
    );

    // Footer credit line with a URI link annotation over the text.
    let footer_width = text_width_mm(FOOTER_TEXT, 8.0);
    let footer_x = PAGE_WIDTH / 2.0 - footer_width / 2.0;
    layer.set_fill_color(black());
    layer.use_text(FOOTER_TEXT, 8.0, Mm(footer_x as f32), from_top(290.0), &helvetica);
    layer.add_link_annotation(LinkAnnotation::new(
        Rect::new(
            Mm(footer_x as f32),
            from_top(291.5),
            Mm((footer_x + footer_width) as f32),
            from_top(287.0),
        ),
        Some(BorderArray::default()),
        Some(ColorArray::default()),
        Actions::uri(FOOTER_LINK.to_string()),
        Some(HighlightingMode::Invert),
    ));

    doc.save_to_bytes().map_err(pdf_err)
}

fn text_width_mm(text: &str, font_size_pt: f64) -> f64 {
    const MM_PER_PT: f64 = 0.352_778;
    text.chars().count() as f64 * font_size_pt * 0.5 * MM_PER_PT
}
