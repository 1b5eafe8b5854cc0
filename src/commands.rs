//! Actions that hotkeys can trigger.
//!
//! [`CommandDispatcher`] is the application's single [`HotkeyHandler`]. It
//! owns the dialog-session state and turns actions into window requests that
//! the event loop applies after the handler returns.

use crate::APP_TITLE;
use crate::notifications::{DesktopNotifier, HOTKEY_BLOCKED_MESSAGE, HOTKEY_BLOCKED_TITLE};
use glassy_hotkeys::HotkeyHandler;

/// Open the AI add-event dialog session.
pub const AI_ADD_EVENT: &str = "ai_add_event";
/// Raise and focus the calendar window.
pub const SHOW_CALENDAR: &str = "show_calendar";
/// Redraw the calendar.
pub const REFRESH: &str = "refresh";

/// Title shown while the AI add-event session is open.
pub const AI_ADD_EVENT_TITLE: &str = "Glassy Calendar - Add event with AI";

/// What a dispatched action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    DialogOpened,
    /// A dialog was already open; the user was notified instead
    Blocked,
    CalendarShown,
    RefreshRequested,
    /// No command is known under this action name
    Unknown,
}

/// A change the event loop should make to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowRequest {
    Focus,
    Redraw,
    SetTitle(String),
}

/// Routes hotkey actions to application commands.
pub struct CommandDispatcher<N: DesktopNotifier> {
    notifier: N,
    dialog_open: bool,
    blocked_notification_ms: u64,
    requests: Vec<WindowRequest>,
}

impl<N: DesktopNotifier> CommandDispatcher<N> {
    pub fn new(notifier: N, blocked_notification_ms: u64) -> Self {
        Self {
            notifier,
            dialog_open: false,
            blocked_notification_ms,
            requests: Vec::new(),
        }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn set_blocked_notification_ms(&mut self, ms: u64) {
        self.blocked_notification_ms = ms;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Run the command bound to `action`.
    pub fn dispatch(&mut self, action: &str) -> CommandOutcome {
        match action {
            AI_ADD_EVENT => self.open_ai_add_event(),
            SHOW_CALENDAR => {
                self.requests.push(WindowRequest::Focus);
                CommandOutcome::CalendarShown
            }
            REFRESH => {
                self.requests.push(WindowRequest::Redraw);
                CommandOutcome::RefreshRequested
            }
            other => {
                log::warn!("No command for hotkey action '{}'", other);
                CommandOutcome::Unknown
            }
        }
    }

    fn open_ai_add_event(&mut self) -> CommandOutcome {
        if self.dialog_open {
            log::info!("AI add-event blocked: a dialog is already open");
            self.notifier.show(
                HOTKEY_BLOCKED_TITLE,
                HOTKEY_BLOCKED_MESSAGE,
                self.blocked_notification_ms,
            );
            return CommandOutcome::Blocked;
        }

        log::info!("Opening AI add-event session");
        self.dialog_open = true;
        self.requests
            .push(WindowRequest::SetTitle(AI_ADD_EVENT_TITLE.to_string()));
        self.requests.push(WindowRequest::Focus);
        self.requests.push(WindowRequest::Redraw);
        CommandOutcome::DialogOpened
    }

    /// Close the open dialog session. Returns false if none was open.
    pub fn close_dialog(&mut self) -> bool {
        if !self.dialog_open {
            return false;
        }
        log::info!("Closing AI add-event session");
        self.dialog_open = false;
        self.requests
            .push(WindowRequest::SetTitle(APP_TITLE.to_string()));
        self.requests.push(WindowRequest::Redraw);
        true
    }

    /// Window requests queued since the last call, in order.
    pub fn take_requests(&mut self) -> Vec<WindowRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl<N: DesktopNotifier> HotkeyHandler for CommandDispatcher<N> {
    fn on_hotkey(&mut self, action: &str) -> anyhow::Result<()> {
        self.dispatch(action);
        Ok(())
    }
}
