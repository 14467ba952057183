use serde::{Deserialize, Serialize};

use crate::data_interface::{Classification, FaultRecord, FaultStatus, StructureRecord};

/// Complete filter selection pushed to the map on every change.
///
/// An empty selection means "no filter applied" for that dimension; the
/// consuming map treats it as show-all rather than exclude-all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub classifications: Vec<Classification>,
    pub statuses: Vec<FaultStatus>,
    pub show_structures: bool,
    pub show_faults: bool,
}

impl FilterState {
    /// Count shown on the panel badge. Visibility flags do not count.
    pub fn active_filter_count(&self) -> usize {
        self.classifications.len() + self.statuses.len()
    }

    pub fn matches_fault(&self, fault: &FaultRecord) -> bool {
        if !self.show_faults {
            return false;
        }
        let classification_ok = self.classifications.is_empty()
            || fault
                .clasificacion
                .map_or(false, |c| self.classifications.contains(&c));
        let status_ok = self.statuses.is_empty()
            || FaultStatus::parse(&fault.estado).map_or(false, |s| self.statuses.contains(&s));
        classification_ok && status_ok
    }

    pub fn matches_structure(&self, _structure: &StructureRecord) -> bool {
        self.show_structures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fault(estado: &str, clasificacion: Option<Classification>) -> FaultRecord {
        FaultRecord {
            id: "f-1".to_string(),
            ocurrencia_ts: Utc::now(),
            km: 1.0,
            tipo: "Cortocircuito".to_string(),
            descripcion: String::new(),
            estado: estado.to_string(),
            clasificacion,
            linea_id: None,
            geom: None,
        }
    }

    #[test]
    fn count_ignores_visibility_flags() {
        let classifications = Classification::ALL;
        let statuses = FaultStatus::ALL;
        for c in 0..=3usize {
            for s in 0..=3usize {
                let state = FilterState {
                    classifications: classifications[..c].to_vec(),
                    statuses: statuses[..s].to_vec(),
                    show_structures: true,
                    show_faults: true,
                };
                assert_eq!(state.active_filter_count(), c + s);
            }
        }
    }

    #[test]
    fn empty_selection_shows_all_faults() {
        let state = FilterState {
            show_faults: true,
            ..FilterState::default()
        };
        assert!(state.matches_fault(&fault("ABIERTA", None)));
        assert!(state.matches_fault(&fault("SUSPENDIDA", Some(Classification::Baja))));
    }

    #[test]
    fn hidden_faults_never_match() {
        let state = FilterState::default();
        assert!(!state.matches_fault(&fault("ABIERTA", Some(Classification::Alta))));
    }

    #[test]
    fn status_selection_narrows_matches() {
        let state = FilterState {
            statuses: vec![FaultStatus::Cerrada],
            show_faults: true,
            ..FilterState::default()
        };
        assert!(state.matches_fault(&fault("CERRADA", None)));
        assert!(!state.matches_fault(&fault("ABIERTA", None)));
        // Unknown codes cannot satisfy an explicit status selection.
        assert!(!state.matches_fault(&fault("SUSPENDIDA", None)));
    }

    #[test]
    fn classification_selection_requires_a_classified_fault() {
        let state = FilterState {
            classifications: vec![Classification::Alta],
            show_faults: true,
            ..FilterState::default()
        };
        assert!(state.matches_fault(&fault("ABIERTA", Some(Classification::Alta))));
        assert!(!state.matches_fault(&fault("ABIERTA", Some(Classification::Baja))));
        assert!(!state.matches_fault(&fault("ABIERTA", None)));
    }

    #[test]
    fn structures_follow_their_visibility_flag() {
        let structure = StructureRecord {
            id: "s-1".to_string(),
            linea_id: None,
            km: 3.0,
            geom: None,
        };
        let mut state = FilterState::default();
        assert!(!state.matches_structure(&structure));
        state.show_structures = true;
        assert!(state.matches_structure(&structure));
    }
}
