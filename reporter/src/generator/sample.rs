use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use linergycore::data_interface::{
    Classification, FaultRecord, FaultStatus, LineRef, StructureRecord,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Builder;

use crate::generator::catalog::{
    line_catalog, FAULT_TYPES, LAT_RANGE, LON_RANGE, SAMPLE_DESCRIPTIONS,
};

/// Configuration for synthesizing sample fault data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub structures_per_line: usize,
    /// Roughly one record in N is emitted without geometry so the degraded
    /// report path stays exercised.
    pub missing_geometry_every: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 12,
            seed: 7,
            structures_per_line: 6,
            missing_geometry_every: 5,
        }
    }
}

/// Complete data set handed to the runner and the bridge.
#[derive(Debug, Clone)]
pub struct SampleSet {
    pub faults: Vec<FaultRecord>,
    pub structures: Vec<StructureRecord>,
    pub lines: Vec<LineRef>,
}

pub fn build_sample_set(config: &SampleConfig) -> anyhow::Result<SampleSet> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let lines = line_catalog();

    let base_ts = Utc
        .with_ymd_and_hms(2026, 3, 14, 8, 30, 0)
        .single()
        .context("building base occurrence timestamp")?;

    let mut faults = Vec::with_capacity(config.count);
    for index in 0..config.count {
        let id = Builder::from_random_bytes(rng.gen::<[u8; 16]>())
            .into_uuid()
            .to_string();
        let line = &lines[index % lines.len()];

        let geom = if config.missing_geometry_every > 0
            && index % config.missing_geometry_every == config.missing_geometry_every - 1
        {
            None
        } else {
            let lat = rng.gen_range(LAT_RANGE.0..LAT_RANGE.1);
            let lon = rng.gen_range(LON_RANGE.0..LON_RANGE.1);
            Some(json!({"type": "Point", "coordinates": [lon, lat]}))
        };

        let clasificacion = match index % 4 {
            0 => Some(Classification::Alta),
            1 => Some(Classification::Moderada),
            2 => Some(Classification::Baja),
            _ => None,
        };

        faults.push(FaultRecord {
            id,
            ocurrencia_ts: base_ts - Duration::minutes(index as i64 * 137),
            km: (rng.gen_range(0.0..240.0_f64) * 10.0).round() / 10.0,
            tipo: FAULT_TYPES[index % FAULT_TYPES.len()].to_string(),
            descripcion: SAMPLE_DESCRIPTIONS[index % SAMPLE_DESCRIPTIONS.len()].to_string(),
            estado: FaultStatus::ALL[index % FaultStatus::ALL.len()].code().to_string(),
            clasificacion,
            linea_id: Some(line.numero.clone()),
            geom,
        });
    }

    let mut structures = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        for tower in 0..config.structures_per_line {
            let fraction = tower as f64 / config.structures_per_line.max(1) as f64;
            let lat = LAT_RANGE.0 + (LAT_RANGE.1 - LAT_RANGE.0) * fraction;
            let lon = LON_RANGE.0
                + (LON_RANGE.1 - LON_RANGE.0) * (line_index as f64 + 0.5)
                    / lines.len() as f64;
            structures.push(StructureRecord {
                id: format!("{}-T{:03}", line.numero, tower + 1),
                linea_id: Some(line.numero.clone()),
                km: (fraction * 240.0 * 10.0).round() / 10.0,
                geom: Some(json!({"type": "Point", "coordinates": [lon, lat]})),
            });
        }
    }

    Ok(SampleSet {
        faults,
        structures,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use linergycore::data_interface::GeoPoint;

    #[test]
    fn generator_builds_requested_count() {
        let set = build_sample_set(&SampleConfig::default()).unwrap();
        assert_eq!(set.faults.len(), 12);
        assert_eq!(set.structures.len(), set.lines.len() * 6);
    }

    #[test]
    fn generator_is_deterministic_for_a_seed() {
        let config = SampleConfig {
            seed: 42,
            ..SampleConfig::default()
        };
        let a = build_sample_set(&config).unwrap();
        let b = build_sample_set(&config).unwrap();
        let ids_a: Vec<_> = a.faults.iter().map(|f| f.id.clone()).collect();
        let ids_b: Vec<_> = b.faults.iter().map(|f| f.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn generator_emits_some_records_without_geometry() {
        let set = build_sample_set(&SampleConfig::default()).unwrap();
        let missing = set.faults.iter().filter(|f| f.geom.is_none()).count();
        assert!(missing > 0);
        assert!(missing < set.faults.len());
    }

    #[test]
    fn generated_geometry_always_validates() {
        let set = build_sample_set(&SampleConfig::default()).unwrap();
        for fault in set.faults.iter().filter(|f| f.geom.is_some()) {
            assert!(GeoPoint::from_geojson(fault.geom.as_ref()).is_some());
        }
        for structure in &set.structures {
            assert!(GeoPoint::from_geojson(structure.geom.as_ref()).is_some());
        }
    }
}
