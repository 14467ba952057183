pub mod toast;

pub use toast::{Toast, ToastEvent, ToastKind, DEFAULT_TOAST_DURATION_MS};
