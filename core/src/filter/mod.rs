pub mod panel;
pub mod state;

pub use panel::FilterPanel;
pub use state::FilterState;
