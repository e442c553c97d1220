use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    visible: bool,
    expires_at: Instant,
}

impl Notification {
    pub fn is_visible(&self) -> bool {
        self.visible && Instant::now() < self.expires_at
    }
}

/// Single-slot, auto-expiring message surface.
///
/// Raising replaces whatever is showing; nothing is queued. Expiry is tracked
/// as a deadline so the owning event loop can sleep until [`deadline`] and
/// then call [`expire`].
///
/// [`deadline`]: NotificationChannel::deadline
/// [`expire`]: NotificationChannel::expire
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    current: Option<Notification>,
    ttl: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationChannel {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Show `message`, replacing any visible notification and restarting the
    /// expiry timer.
    pub fn raise(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        tracing::debug!(target: "notification", %severity, %message, "raised");
        self.current = Some(Notification {
            message,
            severity,
            visible: true,
            expires_at: Instant::now() + self.ttl,
        });
    }

    /// Hide the current notification. Calling it again is a no-op.
    pub fn dismiss(&mut self) {
        if let Some(n) = self.current.as_mut() {
            n.visible = false;
        }
    }

    /// Hide the current notification if its time is up.
    pub fn expire(&mut self) {
        if let Some(n) = self.current.as_mut() {
            if n.visible && Instant::now() >= n.expires_at {
                tracing::trace!(target: "notification", message = %n.message, "expired");
                n.visible = false;
            }
        }
    }

    /// The visible notification, if any.
    pub fn visible(&self) -> Option<&Notification> {
        self.current.as_ref().filter(|n| n.is_visible())
    }

    /// When the visible notification should auto-dismiss.
    pub fn deadline(&self) -> Option<Instant> {
        self.visible().map(|n| n.expires_at)
    }
}

/// Resolve once `deadline` passes; never resolve for `None`.
pub async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
