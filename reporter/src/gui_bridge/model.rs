use linergycore::data_interface::{FaultRecord, LineRef, StructureRecord};
use serde::{Deserialize, Serialize};

/// Snapshot served to the visualizer; stands in for the hosted data layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapModel {
    pub faults: Vec<FaultRecord>,
    pub structures: Vec<StructureRecord>,
    pub lines: Vec<LineRef>,
}

impl MapModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_for(&self, fault: &FaultRecord) -> Option<&LineRef> {
        fault
            .linea_id
            .as_ref()
            .and_then(|id| self.lines.iter().find(|line| &line.numero == id))
    }
}
