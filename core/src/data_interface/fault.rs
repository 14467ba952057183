use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reported infrastructure incident as stored by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultRecord {
    pub id: String,
    pub ocurrencia_ts: DateTime<Utc>,
    pub km: f64,
    pub tipo: String,
    pub descripcion: String,
    /// Wire status code: `ABIERTA`, `EN_ATENCION`, `CERRADA`, or a code
    /// this build does not know yet.
    pub estado: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clasificacion: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linea_id: Option<String>,
    /// GeoJSON-like point; treated as absent unless it validates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geom: Option<serde_json::Value>,
}

impl FaultRecord {
    /// Short uppercase identifier used for display and file naming.
    pub fn folio(&self) -> String {
        self.id.chars().take(8).collect::<String>().to_uppercase()
    }
}

/// Transmission line a fault may be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRef {
    pub numero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
}

/// Tower or support structure rendered on the map layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linea_id: Option<String>,
    pub km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geom: Option<serde_json::Value>,
}

/// Fault lifecycle status as selected on the filter panel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FaultStatus {
    Abierta,
    EnAtencion,
    Cerrada,
}

impl FaultStatus {
    pub const ALL: [FaultStatus; 3] = [
        FaultStatus::Abierta,
        FaultStatus::EnAtencion,
        FaultStatus::Cerrada,
    ];

    /// Wire code used by the data layer.
    pub fn code(&self) -> &'static str {
        match self {
            FaultStatus::Abierta => "ABIERTA",
            FaultStatus::EnAtencion => "EN_ATENCION",
            FaultStatus::Cerrada => "CERRADA",
        }
    }

    /// Display label shown on the map and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            FaultStatus::Abierta => "Abierta",
            FaultStatus::EnAtencion => "En atención",
            FaultStatus::Cerrada => "Cerrada",
        }
    }

    pub fn parse(code: &str) -> Option<FaultStatus> {
        match code {
            "ABIERTA" => Some(FaultStatus::Abierta),
            "EN_ATENCION" => Some(FaultStatus::EnAtencion),
            "CERRADA" => Some(FaultStatus::Cerrada),
            _ => None,
        }
    }
}

/// Maps a wire status code to its display label.
///
/// Unrecognized codes pass through unchanged so a newer data layer does not
/// break older report builds.
pub fn status_label(code: &str) -> &str {
    match FaultStatus::parse(code) {
        Some(status) => status.label(),
        None => code,
    }
}

/// Severity classification assigned during triage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Classification {
    Alta,
    Moderada,
    Baja,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Alta,
        Classification::Moderada,
        Classification::Baja,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Alta => "Alta",
            Classification::Moderada => "Moderada",
            Classification::Baja => "Baja",
        }
    }
}
