pub mod fault;
pub mod geometry;

pub use fault::{status_label, Classification, FaultRecord, FaultStatus, LineRef, StructureRecord};
pub use geometry::GeoPoint;
