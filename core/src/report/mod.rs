pub mod pdf;
pub mod summary;
pub mod text;

pub use pdf::PdfRenderer;
pub use summary::FaultSummary;
pub use text::TextRenderer;
