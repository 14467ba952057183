use std::time::{Duration, Instant};

/// Default auto-dismiss window.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    AutoDismissed,
}

/// Transient notification with a single armed auto-dismiss deadline.
///
/// The clock is injected so hosts drive it from their own tick loop and
/// tests control elapsed time directly. At most one deadline is armed per
/// shown toast; showing again or changing the duration re-arms it, and
/// dismissal or teardown cancels it so nothing fires later.
#[derive(Debug)]
pub struct Toast {
    message: String,
    kind: ToastKind,
    visible: bool,
    duration: Duration,
    deadline: Option<Instant>,
}

impl Toast {
    pub fn new() -> Self {
        Self::with_duration(Duration::from_millis(DEFAULT_TOAST_DURATION_MS))
    }

    /// A zero duration disables the timer; the toast then stays visible
    /// until dismissed manually.
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            message: String::new(),
            kind: ToastKind::Info,
            visible: false,
            duration,
            deadline: None,
        }
    }

    /// Shows the toast and arms the auto-dismiss deadline.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.message = message.into();
        self.kind = kind;
        self.visible = true;
        self.arm(now);
    }

    /// Changing the duration while visible re-arms the pending deadline.
    pub fn set_duration(&mut self, duration: Duration, now: Instant) {
        self.duration = duration;
        if self.visible {
            self.arm(now);
        }
    }

    /// Fires the auto-dismiss at most once after the deadline passes.
    pub fn poll(&mut self, now: Instant) -> Option<ToastEvent> {
        match self.deadline {
            Some(deadline) if self.visible && now >= deadline => {
                self.deadline = None;
                self.visible = false;
                Some(ToastEvent::AutoDismissed)
            }
            _ => None,
        }
    }

    /// Manual close; independent of the timer.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.deadline = None;
    }

    /// Cancels the pending deadline on component teardown.
    pub fn teardown(&mut self) {
        self.dismiss();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    fn arm(&mut self, now: Instant) {
        self.deadline = if self.duration.is_zero() {
            None
        } else {
            Some(now + self.duration)
        };
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new()
    }
}
