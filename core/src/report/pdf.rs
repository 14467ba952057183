use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};

use crate::prelude::{ReportArtifact, ReportBody, ReportContext, ReportRenderer, ReportResult};
use crate::report::summary::FaultSummary;
use crate::telemetry::log::LogManager;

// A4 portrait, millimetres, top-down cursor.
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 16.0;
const CONTENT_W: f32 = PAGE_W - MARGIN * 2.0;

// Content must stay above the footer block on every page.
const CONTENT_BOTTOM: f32 = 266.0;
const FOOTER_RULE_Y: f32 = 272.0;
const FOOTER_TEXT_Y: f32 = 279.0;
const HEADER_CONTENT_Y: f32 = 37.0;

const MM_PER_PT: f32 = 0.352_778;
const BODY_PT: f32 = 10.5;
const BODY_LINE_H: f32 = 4.6;

const DESCRIPTION_MIN_H: f32 = 36.0;
const DESCRIPTION_MAX_H: f32 = 82.0;

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn text_color() -> Color {
    rgb(17, 24, 39)
}
fn subtext_color() -> Color {
    rgb(55, 65, 81)
}
fn muted_color() -> Color {
    rgb(100, 116, 139)
}
fn rule_color() -> Color {
    rgb(203, 213, 225)
}
fn card_color() -> Color {
    rgb(250, 250, 250)
}
fn brand_color() -> Color {
    rgb(21, 122, 90)
}
fn badge_text_color() -> Color {
    rgb(255, 255, 255)
}

/// Estimated advance width for builtin Helvetica, average glyph at half an em.
fn text_width_mm(text: &str, font_pt: f32) -> f32 {
    text.chars().count() as f32 * font_pt * 0.5 * MM_PER_PT
}

/// Greedy word wrap against the estimated Helvetica advance. Paragraph
/// breaks in the input are preserved.
fn wrap_to_width(text: &str, font_pt: f32, max_w: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if current.is_empty() || text_width_mm(&candidate, font_pt) <= max_w {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Card height for a wrapped description, clamped so one runaway record
/// cannot swallow the page.
fn description_card_height(line_count: usize) -> f32 {
    (18.0 + line_count as f32 * BODY_LINE_H).clamp(DESCRIPTION_MIN_H, DESCRIPTION_MAX_H)
}

fn description_line_capacity(card_h: f32) -> usize {
    ((card_h - 18.0) / BODY_LINE_H).floor() as usize
}

/// Renders the paginated PDF fault report.
///
/// Layout is a deterministic sequence of drawing calls: repeated header,
/// section cards in fixed order, and a page break whenever the next card
/// would not fit above the footer.
pub struct PdfRenderer {
    logger: LogManager,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for PdfRenderer {
    fn render(&self, ctx: &ReportContext) -> ReportResult<ReportArtifact> {
        let summary = FaultSummary::from_context(ctx);
        if summary.point.is_none() {
            self.logger.record_degraded(&format!(
                "report {}: geometry unavailable, location degraded",
                summary.folio
            ));
        }

        let (doc, page, layer) = PdfDocument::new(
            format!("Reporte de falla {}", summary.folio),
            Mm(PAGE_W),
            Mm(PAGE_H),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        {
            let mut writer = PageWriter {
                doc: &doc,
                layer: doc.get_page(page).get_layer(layer),
                regular: &regular,
                bold: &bold,
                y: HEADER_CONTENT_Y,
                pages: 1,
            };
            writer.draw_header(&summary, false);
            writer.draw_footer(&summary);
            writer.resumen_card(&summary);
            writer.fechas_card(&summary);
            writer.descripcion_card(&summary);
            writer.ubicacion_card(&summary);

            self.logger.record(&format!(
                "pdf report {} rendered on {} page(s)",
                summary.folio, writer.pages
            ));
        }

        let bytes = doc.save_to_bytes()?;
        Ok(ReportArtifact {
            filename: format!("reporte-falla-{}.pdf", summary.folio),
            body: ReportBody::Pdf(bytes),
        })
    }
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    /// Cursor measured from the top edge of the page.
    y: f32,
    pages: usize,
}

impl PageWriter<'_> {
    fn text(&self, content: &str, pt: f32, x: f32, y_top: f32, font: &IndirectFontRef, color: Color) {
        self.layer.set_fill_color(color);
        self.layer
            .use_text(content, pt, Mm(x), Mm(PAGE_H - y_top), font);
    }

    fn text_right(&self, content: &str, pt: f32, y_top: f32, font: &IndirectFontRef, color: Color) {
        let x = PAGE_W - MARGIN - text_width_mm(content, pt);
        self.text(content, pt, x, y_top, font, color);
    }

    fn hline(&self, x1: f32, x2: f32, y_top: f32, thickness: f32, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x1), Mm(PAGE_H - y_top)), false),
                (Point::new(Mm(x2), Mm(PAGE_H - y_top)), false),
            ],
            is_closed: false,
        });
    }

    fn vline(&self, x: f32, y1_top: f32, y2_top: f32, thickness: f32, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(thickness);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(PAGE_H - y1_top)), false),
                (Point::new(Mm(x), Mm(PAGE_H - y2_top)), false),
            ],
            is_closed: false,
        });
    }

    fn rect(&self, x: f32, y_top: f32, w: f32, h: f32, fill: Option<Color>, stroke: Option<Color>) {
        let mode = match (&fill, &stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            _ => PaintMode::Stroke,
        };
        if let Some(fill) = fill {
            self.layer.set_fill_color(fill);
        }
        if let Some(stroke) = stroke {
            self.layer.set_outline_color(stroke);
            self.layer.set_outline_thickness(0.4);
        }
        self.layer.add_rect(
            Rect::new(Mm(x), Mm(PAGE_H - y_top - h), Mm(x + w), Mm(PAGE_H - y_top)).with_mode(mode),
        );
    }

    fn draw_header(&mut self, summary: &FaultSummary, continuation: bool) {
        self.hline(MARGIN, PAGE_W - MARGIN, 10.0, 1.2, brand_color());

        self.text("REPORTE DE FALLA", 15.0, MARGIN, 19.0, self.bold, text_color());
        self.text(
            "Comisión Federal de Electricidad · Linergy",
            10.0,
            MARGIN,
            25.0,
            self.regular,
            subtext_color(),
        );

        self.text_right(
            &format!("Folio: {}", summary.folio),
            9.0,
            19.0,
            self.regular,
            muted_color(),
        );
        self.text_right(
            &format!("Emisión: {}", summary.generated_text),
            9.0,
            25.0,
            self.regular,
            muted_color(),
        );

        self.hline(MARGIN, PAGE_W - MARGIN, 29.5, 0.4, rule_color());

        if continuation {
            self.text_right("Continuación", 9.0, 34.0, self.regular, muted_color());
        }

        self.y = HEADER_CONTENT_Y;
    }

    fn draw_footer(&self, summary: &FaultSummary) {
        self.hline(MARGIN, PAGE_W - MARGIN, FOOTER_RULE_Y, 0.4, rule_color());
        self.text(
            "Documento generado automáticamente · Uso interno",
            9.0,
            MARGIN,
            FOOTER_TEXT_Y,
            self.regular,
            subtext_color(),
        );
        self.text_right(
            &format!("CFE · Linergy · Folio {}", summary.folio),
            9.0,
            FOOTER_TEXT_Y,
            self.regular,
            muted_color(),
        );
    }

    /// Starts a fresh page with header and footer when the next block would
    /// collide with the footer.
    fn ensure_space(&mut self, summary: &FaultSummary, needed: f32) {
        if self.y + needed > CONTENT_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.pages += 1;
            self.draw_header(summary, true);
            self.draw_footer(summary);
        }
    }

    /// Draws the card frame and returns the inner origin; advances the
    /// cursor past the card.
    fn card(&mut self, summary: &FaultSummary, h: f32) -> (f32, f32) {
        self.ensure_space(summary, h + 4.0);
        let top = self.y;

        self.rect(MARGIN, top, CONTENT_W, h, Some(card_color()), Some(rule_color()));
        self.vline(MARGIN + 2.5, top + 4.0, top + h - 4.0, 0.8, brand_color());

        self.y = top + h + 5.0;
        (MARGIN + 7.0, top + 9.0)
    }

    fn section_title(&self, x: f32, y_top: f32, title: &str) {
        self.text(&title.to_uppercase(), BODY_PT, x, y_top, self.bold, text_color());
        self.hline(x, x + 78.0, y_top + 2.0, 0.4, rule_color());
    }

    /// Uppercase label over a wrapped value; returns the y below the row.
    fn kv_row(&self, label: &str, value: &str, x: f32, y_top: f32, max_w: f32) -> f32 {
        self.text(&label.to_uppercase(), 7.5, x, y_top, self.regular, muted_color());

        let shown = if value.trim().is_empty() { "N/A" } else { value };
        let mut yy = y_top + 5.0;
        for line in wrap_to_width(shown, BODY_PT, max_w) {
            self.text(&line, BODY_PT, x, yy, self.regular, text_color());
            yy += BODY_LINE_H;
        }
        yy + 2.0
    }

    fn badge(&self, label: &str, x_right: f32, y_top: f32) {
        let w = text_width_mm(label, 9.0) + 6.0;
        let h = 7.0;
        let x = x_right - w;

        self.rect(x, y_top, w, h, Some(brand_color()), None);
        self.text(
            label,
            9.0,
            x + (w - text_width_mm(label, 9.0)) / 2.0,
            y_top + 4.8,
            self.bold,
            badge_text_color(),
        );
    }

    fn resumen_card(&mut self, summary: &FaultSummary) {
        let (x, top) = self.card(summary, 44.0);
        self.section_title(x, top, "Resumen");

        let inner_w = CONTENT_W - 14.0;
        let col2 = x + inner_w * 0.55;

        let mut yy = top + 8.0;
        yy = self.kv_row("ID", &summary.id, x, yy, inner_w * 0.5);
        self.kv_row("Línea", &summary.line_text, x, yy, inner_w * 0.5);

        let mut yy2 = top + 8.0;
        yy2 = self.kv_row("Kilómetro", &summary.km_text, col2, yy2, inner_w * 0.4);
        self.kv_row("Tipo", &summary.type_text, col2, yy2, inner_w * 0.4);

        self.badge(&summary.status_text, MARGIN + CONTENT_W - 6.0, top - 2.0);
    }

    fn fechas_card(&mut self, summary: &FaultSummary) {
        let (x, top) = self.card(summary, 30.0);
        self.section_title(x, top, "Fechas");

        let inner_w = CONTENT_W - 14.0;
        let col2 = x + inner_w * 0.55;

        self.kv_row(
            "Ocurrencia",
            &summary.occurrence_text,
            x,
            top + 8.0,
            inner_w * 0.5,
        );
        self.kv_row(
            "Generado",
            &summary.generated_text,
            col2,
            top + 8.0,
            inner_w * 0.4,
        );
    }

    fn descripcion_card(&mut self, summary: &FaultSummary) {
        let max_w = CONTENT_W - 20.0;
        let lines = wrap_to_width(&summary.description_text, BODY_PT, max_w);
        let h = description_card_height(lines.len());
        let capacity = description_line_capacity(h);

        let (x, top) = self.card(summary, h);
        self.section_title(x, top, "Descripción");

        let mut yy = top + 8.0;
        for line in lines.iter().take(capacity) {
            self.text(line, BODY_PT, x, yy, self.regular, text_color());
            yy += BODY_LINE_H;
        }
    }

    fn ubicacion_card(&mut self, summary: &FaultSummary) {
        let h = if summary.maps_url.is_some() { 34.0 } else { 26.0 };
        let (x, top) = self.card(summary, h);
        self.section_title(x, top, "Ubicación");

        let inner_w = CONTENT_W - 14.0;
        let yy = self.kv_row(
            "Coordenadas (lat, lon)",
            &summary.coords_text,
            x,
            top + 8.0,
            inner_w,
        );
        if let Some(url) = &summary.maps_url {
            self.kv_row("Google Maps", url, x, yy, inner_w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_interface::{FaultRecord, LineRef};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_fault() -> FaultRecord {
        FaultRecord {
            id: "abc12345-6789-dead-beef-000000000000".to_string(),
            ocurrencia_ts: Utc.with_ymd_and_hms(2026, 2, 3, 14, 30, 0).unwrap(),
            km: 12.34,
            tipo: "Cortocircuito".to_string(),
            descripcion: "Conductor caído entre torres.".to_string(),
            estado: "EN_ATENCION".to_string(),
            clasificacion: None,
            linea_id: Some("LT-01".to_string()),
            geom: Some(json!({"type": "Point", "coordinates": [-99.1, 19.4]})),
        }
    }

    fn render_pdf(fault: FaultRecord) -> ReportArtifact {
        let line = LineRef {
            numero: "LT-01".to_string(),
            nombre: Some("Texcoco".to_string()),
        };
        let ctx = ReportContext::at(
            fault,
            Some(line),
            Utc.with_ymd_and_hms(2026, 2, 4, 9, 15, 0).unwrap(),
        );
        PdfRenderer::new().render(&ctx).unwrap()
    }

    #[test]
    fn pdf_filename_derives_from_folio() {
        let artifact = render_pdf(sample_fault());
        assert_eq!(artifact.filename, "reporte-falla-ABC12345.pdf");
    }

    #[test]
    fn pdf_bytes_form_a_document() {
        let artifact = render_pdf(sample_fault());
        let bytes = artifact.as_bytes();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
    }

    #[test]
    fn pdf_renders_with_degraded_geometry() {
        let mut fault = sample_fault();
        fault.geom = Some(json!({"type": "Point", "coordinates": ["x", "y"]}));
        let artifact = render_pdf(fault);
        assert!(artifact.as_bytes().starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_splits_on_estimated_width() {
        let lines = wrap_to_width("uno dos tres cuatro cinco seis", BODY_PT, 20.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, BODY_PT) <= 20.0 + text_width_mm("cuatro", BODY_PT));
        }
    }

    #[test]
    fn wrap_preserves_paragraph_breaks() {
        let lines = wrap_to_width("uno\ndos", BODY_PT, 120.0);
        assert_eq!(lines, vec!["uno".to_string(), "dos".to_string()]);
    }

    #[test]
    fn wrap_never_returns_empty_line_set() {
        assert_eq!(wrap_to_width("", BODY_PT, 120.0), vec![String::new()]);
    }

    #[test]
    fn description_height_is_clamped() {
        assert_eq!(description_card_height(1), DESCRIPTION_MIN_H);
        assert_eq!(description_card_height(200), DESCRIPTION_MAX_H);
        let mid = description_card_height(6);
        assert!(mid > DESCRIPTION_MIN_H && mid < DESCRIPTION_MAX_H);
    }

    #[test]
    fn line_capacity_fits_inside_card() {
        for count in [1usize, 4, 6, 40, 200] {
            let h = description_card_height(count);
            let capacity = description_line_capacity(h);
            assert!(18.0 + capacity as f32 * BODY_LINE_H <= h + BODY_LINE_H);
        }
    }
}
