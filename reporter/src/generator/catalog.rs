use linergycore::data_interface::LineRef;

/// Built-in transmission-line catalog used when no data file is supplied.
pub fn line_catalog() -> Vec<LineRef> {
    vec![
        LineRef {
            numero: "LT-01".to_string(),
            nombre: Some("Texcoco - Chapingo".to_string()),
        },
        LineRef {
            numero: "LT-02".to_string(),
            nombre: Some("Valle de México Norte".to_string()),
        },
        LineRef {
            numero: "LT-03".to_string(),
            nombre: None,
        },
    ]
}

pub const FAULT_TYPES: [&str; 5] = [
    "Cortocircuito",
    "Falla a tierra",
    "Conductor dañado",
    "Aislamiento degradado",
    "Sobrecarga",
];

pub const SAMPLE_DESCRIPTIONS: [&str; 4] = [
    "Conductor caído entre torres, reporte de brigada en sitio.",
    "Disparo de protección tras descarga atmosférica.",
    "Aislador fracturado detectado en inspección aérea.",
    "",
];

// Bounding box for generated coordinates (Valle de México service area).
pub const LAT_RANGE: (f64, f64) = (19.20, 19.60);
pub const LON_RANGE: (f64, f64) = (-99.40, -98.90);
