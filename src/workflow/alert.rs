use std::time::{Duration, Instant};

pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Transient notification shown at the bottom of the window.
#[derive(Debug, Clone)]
pub struct AlertState {
    visible: bool,
    message: String,
    severity: Severity,
    shown_at: Option<Instant>,
    duration: Duration,
}

impl Default for AlertState {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_DURATION)
    }
}

impl AlertState {
    pub fn new(duration: Duration) -> Self {
        Self {
            visible: false,
            message: String::new(),
            severity: Severity::Info,
            shown_at: None,
            duration,
        }
    }

    /// Replaces whatever is showing and restarts the display window.
    pub fn show(&mut self, message: impl Into<String>, severity: Severity) {
        self.message = message.into();
        self.severity = severity;
        self.visible = true;
        self.shown_at = Some(Instant::now());
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.shown_at = None;
    }

    /// Hides the alert once its display window has elapsed. Returns true if
    /// this call hid it.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.shown_at {
            Some(shown_at) if self.visible && now.saturating_duration_since(shown_at) >= self.duration => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    /// Time left before auto-dismissal, `None` when nothing is showing.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let shown_at = self.shown_at.filter(|_| self.visible)?;
        Some(self.duration.saturating_sub(now.saturating_duration_since(shown_at)))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}
