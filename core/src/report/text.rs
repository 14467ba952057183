use crate::prelude::{ReportArtifact, ReportBody, ReportContext, ReportRenderer, ReportResult};
use crate::report::summary::FaultSummary;
use crate::telemetry::log::LogManager;

/// Renders the fixed-template plain-text fault report.
///
/// The returned body is what the GUI copies to the clipboard; the renderer
/// itself performs no I/O.
pub struct TextRenderer {
    logger: LogManager,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, ctx: &ReportContext) -> ReportResult<ReportArtifact> {
        let summary = FaultSummary::from_context(ctx);
        let maps_line = summary.maps_url.as_deref().unwrap_or("N/A");

        let body = format!(
            "REPORTE DE FALLA - Linergy (CFE)\n\
             \n\
             Folio: {folio}\n\
             Línea: {line}\n\
             Kilómetro: {km}\n\
             Tipo de falla: {tipo}\n\
             Estado: {estado}\n\
             \n\
             Ocurrencia: {occurrence}\n\
             \n\
             Ubicación:\n\
             Coordenadas: {coords}\n\
             Google Maps: {maps}\n\
             \n\
             Descripción:\n\
             {descripcion}\n\
             \n\
             ID de falla: {id}\n",
            folio = summary.folio,
            line = summary.line_text,
            km = summary.km_text,
            tipo = summary.type_text,
            estado = summary.status_text,
            occurrence = summary.occurrence_text,
            coords = summary.coords_text,
            maps = maps_line,
            descripcion = summary.description_text,
            id = summary.id,
        );

        self.logger
            .record(&format!("text report {} rendered", summary.folio));

        Ok(ReportArtifact {
            filename: format!("reporte-falla-{}.txt", summary.folio),
            body: ReportBody::Text(body),
        })
    }
}
