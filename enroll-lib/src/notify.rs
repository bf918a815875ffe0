//! Transient user notices.

use serde::Serialize;

/// Notice severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    #[default]
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message for the user.
///
/// # Example
///
/// ```
/// use enroll_lib::notify::{Notice, NoticeLevel};
///
/// let notice = Notice::error("Username already exists");
/// assert_eq!(notice.level, NoticeLevel::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }
}

impl From<String> for Notice {
    fn from(message: String) -> Self {
        Notice::info(message)
    }
}

impl From<&str> for Notice {
    fn from(message: &str) -> Self {
        Notice::info(message)
    }
}

/// Shows notices to the user. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

impl<F> Notifier for F
where
    F: Fn(Notice) + Send + Sync,
{
    fn notify(&self, notice: Notice) {
        self(notice)
    }
}

/// Notifier that writes notices to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => log::error!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => log::info!("{}", notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_closure_notifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let notifier = move |notice: Notice| sink.lock().unwrap().push(notice);

        notifier.notify(Notice::success("Registration successful"));
        notifier.notify("plain".into());

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].level, NoticeLevel::Success);
        assert_eq!(seen[1].level, NoticeLevel::Info);
        assert_eq!(seen[1].message, "plain");
    }

    #[test]
    fn test_level_names() {
        assert_eq!(NoticeLevel::Error.as_str(), "error");
        assert_eq!(NoticeLevel::default(), NoticeLevel::Info);
    }
}
