use bookstore::import::{Notification, NotificationKind, Notifier};
use log::{info, warn};

/// Shows notifications on the terminal while a command is running.
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => info!("{}", notification.message),
            NotificationKind::Warning => warn!("{}", notification.message),
        }

        if !self.quiet {
            println!("{}", format_notification(&notification));
        }
    }
}

pub fn format_notification(notification: &Notification) -> String {
    match &notification.title {
        Some(title) => format!("{title}: {}", notification.message),
        None => notification.message.clone(),
    }
}
