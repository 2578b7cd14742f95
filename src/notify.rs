//! Transient on-page notifications

use crate::consts::{NOTIFICATION_LIFETIME_MS, SECURITY_WARNING_LIFETIME_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            NotificationKind::Success => "#10b981",
            NotificationKind::Error => "#ef4444",
            NotificationKind::Info => "#6366f1",
        }
    }
}

/// A toast in the top-right corner. Only one is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.kind.as_str())
    }

    pub fn lifetime_ms(&self) -> u32 {
        NOTIFICATION_LIFETIME_MS
    }

    /// Inline style, starting off-screen to the right
    pub fn style(&self) -> String {
        format!(
            "position: fixed; top: 20px; right: 20px; background: {}; color: white; \
             padding: 1rem 1.5rem; border-radius: 10px; box-shadow: 0 10px 25px rgba(0, 0, 0, 0.1); \
             z-index: 10000; transform: translateX(100%); transition: transform 0.3s ease; max-width: 400px;",
            self.kind.background()
        )
    }
}

/// Amber banner shown when typed input got sanitized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityWarning {
    pub message: String,
}

impl SecurityWarning {
    pub const CLASS_NAME: &'static str = "security-warning";
    pub const STYLE: &'static str = "position: fixed; top: 80px; right: 20px; background: #fef3c7; \
         border: 1px solid #f59e0b; color: #92400e; padding: 10px 15px; border-radius: 8px; \
         font-size: 0.9rem; z-index: 10000; max-width: 300px;";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn text(&self) -> String {
        format!("⚠️ {}", self.message)
    }

    pub fn lifetime_ms(&self) -> u32 {
        SECURITY_WARNING_LIFETIME_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_class_and_color() {
        let n = Notification::error("nope");
        assert_eq!(n.class_name(), "notification notification-error");
        assert!(n.style().contains("#ef4444"));
        assert_eq!(Notification::success("ok").kind.background(), "#10b981");
        assert_eq!(NotificationKind::default().background(), "#6366f1");
    }

    #[test]
    fn test_security_warning_text() {
        let w = SecurityWarning::new("Input was sanitized for security reasons");
        assert_eq!(w.text(), "⚠️ Input was sanitized for security reasons");
        assert_eq!(w.lifetime_ms(), 5000);
    }
}
