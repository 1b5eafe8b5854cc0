//! Desktop notifications.

/// Title of the notice shown when a hotkey is blocked by an open dialog.
pub const HOTKEY_BLOCKED_TITLE: &str = "Glassy Calendar";

/// Body of the notice shown when AI add-event is triggered with a dialog open.
pub const HOTKEY_BLOCKED_MESSAGE: &str = "Another window is open; AI add-event is unavailable.";

/// Something that can put a transient notice in front of the user.
pub trait DesktopNotifier {
    fn show(&self, title: &str, message: &str, timeout_ms: u64);
}

/// Notifier backed by the platform notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNotifier;

impl DesktopNotifier for SystemNotifier {
    fn show(&self, title: &str, message: &str, timeout_ms: u64) {
        // Always log notifications
        log::info!("Notification: {}: {}", title, message);

        #[cfg(not(target_os = "macos"))]
        {
            use notify_rust::Notification;

            let timeout = u32::try_from(timeout_ms).unwrap_or(u32::MAX);
            if let Err(e) = Notification::new()
                .summary(title)
                .body(message)
                .timeout(notify_rust::Timeout::Milliseconds(timeout))
                .show()
            {
                log::warn!("Failed to send desktop notification: {}", e);
            }
        }

        #[cfg(target_os = "macos")]
        {
            // Unbundled binaries cannot post to Notification Center
            let _ = timeout_ms;
            log::debug!("Desktop notifications unavailable on macOS; logged only");
        }
    }
}
