use enroll_lib::notify::{LogNotifier, Notice, NoticeLevel, Notifier};

/// Prints notices to the terminal and mirrors them to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Info => println!("ℹ {}", notice.message),
        }
        LogNotifier.notify(notice);
    }
}
