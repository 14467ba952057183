//! Report rendering and map-state core for the Linergy fault platform.
//!
//! The modules mirror the hosted fault-tracking application while providing
//! owned component state, validated geometry, and deterministic report
//! layout for electrical-line incident records.

pub mod data_interface;
pub mod filter;
pub mod notify;
pub mod prelude;
pub mod report;
pub mod telemetry;

pub use prelude::{ReportArtifact, ReportBody, ReportContext, ReportRenderer};
