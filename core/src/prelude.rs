use chrono::{DateTime, Utc};

use crate::data_interface::{FaultRecord, LineRef};

/// Inputs shared by every report renderer.
///
/// `generated_at` is captured once so the emission timestamp is identical
/// across the header, the dates card, and any sibling artifact.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub fault: FaultRecord,
    pub line: Option<LineRef>,
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    pub fn new(fault: FaultRecord, line: Option<LineRef>) -> Self {
        Self {
            fault,
            line,
            generated_at: Utc::now(),
        }
    }

    /// Builds a context with a fixed emission timestamp.
    pub fn at(fault: FaultRecord, line: Option<LineRef>, generated_at: DateTime<Utc>) -> Self {
        Self {
            fault,
            line,
            generated_at,
        }
    }
}

/// Finished artifact produced by a renderer.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub filename: String,
    pub body: ReportBody,
}

#[derive(Debug, Clone)]
pub enum ReportBody {
    Text(String),
    Pdf(Vec<u8>),
}

impl ReportArtifact {
    pub fn as_text(&self) -> Option<&str> {
        match &self.body {
            ReportBody::Text(text) => Some(text),
            ReportBody::Pdf(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.body {
            ReportBody::Text(text) => text.as_bytes(),
            ReportBody::Pdf(bytes) => bytes,
        }
    }
}

/// Common error type for report rendering.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("document assembly failed: {0}")]
    Document(#[from] printpdf::Error),
    #[error("layout failure: {0}")]
    Layout(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Trait describing the report renderers exposed by this crate.
pub trait ReportRenderer {
    fn render(&self, ctx: &ReportContext) -> ReportResult<ReportArtifact>;
}
