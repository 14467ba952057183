use chrono::{DateTime, Locale, Utc};

use crate::data_interface::{status_label, GeoPoint};
use crate::prelude::ReportContext;

const COORDS_UNAVAILABLE: &str = "No disponible";
const DESCRIPTION_PLACEHOLDER: &str = "Sin descripción adicional";

/// Display fields derived once from a fault record and shared by the text
/// and PDF renderers, so both artifacts agree on every value.
#[derive(Debug, Clone)]
pub struct FaultSummary {
    pub id: String,
    pub folio: String,
    pub line_text: String,
    pub km_text: String,
    pub type_text: String,
    pub status_text: String,
    pub occurrence_text: String,
    pub generated_text: String,
    /// Validated location, or `None` when the stored geometry is absent or
    /// malformed. Never defaulted.
    pub point: Option<GeoPoint>,
    pub coords_text: String,
    pub maps_url: Option<String>,
    pub description_text: String,
}

impl FaultSummary {
    pub fn from_context(ctx: &ReportContext) -> Self {
        let fault = &ctx.fault;

        let line_text = match &ctx.line {
            Some(line) => match &line.nombre {
                Some(nombre) => format!("{} - {}", line.numero, nombre),
                None => line.numero.clone(),
            },
            None => "N/A".to_string(),
        };

        let km_text = if fault.km.is_finite() {
            format!("{:.1} km", fault.km)
        } else {
            "N/A".to_string()
        };

        let type_text = if fault.tipo.trim().is_empty() {
            "N/A".to_string()
        } else {
            fault.tipo.clone()
        };

        let point = GeoPoint::from_geojson(fault.geom.as_ref());
        let coords_text = point
            .map(|p| p.coords_text())
            .unwrap_or_else(|| COORDS_UNAVAILABLE.to_string());
        let maps_url = point.map(|p| p.maps_url());

        let description_text = if fault.descripcion.trim().is_empty() {
            DESCRIPTION_PLACEHOLDER.to_string()
        } else {
            fault.descripcion.clone()
        };

        Self {
            id: fault.id.clone(),
            folio: fault.folio(),
            line_text,
            km_text,
            type_text,
            status_text: status_label(&fault.estado).to_string(),
            occurrence_text: format_moment(&fault.ocurrencia_ts),
            generated_text: format_moment(&ctx.generated_at),
            point,
            coords_text,
            maps_url,
            description_text,
        }
    }
}

/// Long-form Spanish date plus 24-hour time, e.g. `7 de agosto de 2026 · 14:30`.
fn format_moment(ts: &DateTime<Utc>) -> String {
    format!(
        "{} · {}",
        ts.format_localized("%-d de %B de %Y", Locale::es_MX),
        ts.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_interface::{FaultRecord, LineRef};
    use chrono::TimeZone;
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

    fn sample_context(fault: FaultRecord) -> ReportContext {
        let line = LineRef {
            numero: "LT-01".to_string(),
            nombre: Some("Texcoco".to_string()),
        };
        ReportContext::at(
            fault,
            Some(line),
            Utc.with_ymd_and_hms(2026, 2, 4, 9, 15, 0).unwrap(),
        )
    }

    #[test]
    fn summary_derives_display_fields() {
        let summary = FaultSummary::from_context(&sample_context(sample_fault()));
        assert_eq!(summary.folio, "ABC12345");
        assert_eq!(summary.line_text, "LT-01 - Texcoco");
        assert_eq!(summary.km_text, "12.3 km");
        assert_eq!(summary.status_text, "En atención");
        assert_eq!(summary.coords_text, "19.400000, -99.100000");
        assert_eq!(
            summary.maps_url.as_deref(),
            Some("https://www.google.com/maps?q=19.4,-99.1")
        );
    }

    #[test]
    fn summary_localizes_dates_in_spanish() {
        let summary = FaultSummary::from_context(&sample_context(sample_fault()));
        assert_eq!(summary.occurrence_text, "3 de febrero de 2026 · 14:30");
        assert_eq!(summary.generated_text, "4 de febrero de 2026 · 09:15");
    }

    #[test]
    fn summary_never_defaults_missing_geometry_to_origin() {
        let mut fault = sample_fault();
        fault.geom = None;
        let summary = FaultSummary::from_context(&sample_context(fault));
        assert_eq!(summary.point, None);
        assert_eq!(summary.coords_text, "No disponible");
        assert_eq!(summary.maps_url, None);
        assert!(!summary.coords_text.contains("0.000000"));
    }

    #[test]
    fn summary_treats_malformed_geometry_as_absent() {
        let mut fault = sample_fault();
        fault.geom = Some(json!({"type": "Point", "coordinates": [-99.1, 123.0]}));
        let summary = FaultSummary::from_context(&sample_context(fault));
        assert_eq!(summary.coords_text, "No disponible");
        assert_eq!(summary.maps_url, None);
    }

    #[test]
    fn summary_substitutes_placeholders_for_blank_fields() {
        let mut fault = sample_fault();
        fault.descripcion = "   ".to_string();
        fault.tipo = String::new();
        fault.km = f64::NAN;
        let ctx = ReportContext::at(
            fault,
            None,
            Utc.with_ymd_and_hms(2026, 2, 4, 9, 15, 0).unwrap(),
        );
        let summary = FaultSummary::from_context(&ctx);
        assert_eq!(summary.description_text, "Sin descripción adicional");
        assert_eq!(summary.type_text, "N/A");
        assert_eq!(summary.km_text, "N/A");
        assert_eq!(summary.line_text, "N/A");
    }

    #[test]
    fn summary_passes_unknown_status_codes_through() {
        let mut fault = sample_fault();
        fault.estado = "SUSPENDIDA".to_string();
        let summary = FaultSummary::from_context(&sample_context(fault));
        assert_eq!(summary.status_text, "SUSPENDIDA");
    }
}
