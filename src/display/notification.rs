//! One-line user notifications
//!
//! Commands report their outcome with a short notification instead of the
//! underlying error; details go to the diagnostic log.

use std::fmt;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// Prefix shown before the message
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Success => "+",
            Self::Error => "x",
        }
    }
}

/// A message shown to the user once an operation finishes
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

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    /// Print to stdout, or stderr for errors
    pub fn show(&self) {
        if self.is_error() {
            eprintln!("{}", self);
        } else {
            println!("{}", self);
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.icon(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Notification::success("Transaction deleted").to_string(),
            "[+] Transaction deleted"
        );
        assert_eq!(
            Notification::error("Failed to delete transaction").to_string(),
            "[x] Failed to delete transaction"
        );
    }

    #[test]
    fn test_kind() {
        assert!(Notification::error("nope").is_error());
        assert!(!Notification::success("ok").is_error());
    }
}
