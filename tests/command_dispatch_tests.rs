//! Hotkey → command dispatch, driven through the hotkey service.

mod common;

use common::RecordingNotifier;
use glassy_calendar::commands::{
    AI_ADD_EVENT, AI_ADD_EVENT_TITLE, CommandDispatcher, CommandOutcome, REFRESH, SHOW_CALENDAR,
    WindowRequest,
};
use glassy_calendar::notifications::HOTKEY_BLOCKED_MESSAGE;
use glassy_config::Config;
use glassy_hotkeys::{FocusedWindowHost, HotkeyFired, HotkeyService, KeyStroke, parse_combination};

fn dispatcher() -> CommandDispatcher<RecordingNotifier> {
    CommandDispatcher::new(RecordingNotifier::default(), 3000)
}

fn configured_service() -> HotkeyService<FocusedWindowHost> {
    let mut host = FocusedWindowHost::new();
    host.attach_window();
    let mut service = HotkeyService::new(host);
    let mut config = Config::default();
    config
        .hotkeys
        .insert(SHOW_CALENDAR.to_string(), "Ctrl+Alt+C".to_string());
    let summary = service.apply_settings(&config);
    assert!(summary.is_complete());
    service
}

fn press(text: &str) -> KeyStroke {
    KeyStroke::from_combo(&parse_combination(text).expect("valid combination"))
}

#[test]
fn test_ai_add_event_opens_dialog() {
    let mut commands = dispatcher();
    assert_eq!(commands.dispatch(AI_ADD_EVENT), CommandOutcome::DialogOpened);
    assert!(commands.is_dialog_open());
    assert_eq!(
        commands.take_requests(),
        vec![
            WindowRequest::SetTitle(AI_ADD_EVENT_TITLE.to_string()),
            WindowRequest::Focus,
            WindowRequest::Redraw,
        ]
    );
    assert!(commands.take_requests().is_empty());
}

#[test]
fn test_second_trigger_is_blocked_with_notification() {
    let mut commands = CommandDispatcher::new(RecordingNotifier::default(), 1500);
    commands.dispatch(AI_ADD_EVENT);
    commands.take_requests();

    assert_eq!(commands.dispatch(AI_ADD_EVENT), CommandOutcome::Blocked);
    assert!(commands.take_requests().is_empty());

    let shown = commands.notifier().shown.borrow();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].message, HOTKEY_BLOCKED_MESSAGE);
    assert_eq!(shown[0].timeout_ms, 1500);
}

#[test]
fn test_closing_dialog_allows_reopen() {
    let mut commands = dispatcher();
    commands.dispatch(AI_ADD_EVENT);
    assert!(commands.close_dialog());
    assert!(!commands.close_dialog());
    assert_eq!(commands.dispatch(AI_ADD_EVENT), CommandOutcome::DialogOpened);
    assert!(commands.notifier().shown.borrow().is_empty());
}

#[test]
fn test_other_commands_and_unknown_actions() {
    let mut commands = dispatcher();
    assert_eq!(commands.dispatch(SHOW_CALENDAR), CommandOutcome::CalendarShown);
    assert_eq!(commands.dispatch(REFRESH), CommandOutcome::RefreshRequested);
    assert_eq!(commands.dispatch("make_coffee"), CommandOutcome::Unknown);
    assert_eq!(
        commands.take_requests(),
        vec![WindowRequest::Focus, WindowRequest::Redraw]
    );
}

#[test]
fn test_default_hotkey_reaches_dispatcher_once() {
    let service = configured_service();
    let mut commands = dispatcher();

    assert!(service.handle_key_stroke(&press("Ctrl+Shift+F1"), &mut commands));
    assert!(commands.is_dialog_open());

    // Same key again while the dialog is open: blocked, not reopened
    assert!(service.handle_key_stroke(&press("ctrl + shift + f1"), &mut commands));
    assert_eq!(commands.notifier().shown.borrow().len(), 1);
}

#[test]
fn test_unbound_key_does_nothing() {
    let service = configured_service();
    let mut commands = dispatcher();
    assert!(!service.handle_key_stroke(&press("Ctrl+F1"), &mut commands));
    assert!(commands.take_requests().is_empty());
}

#[test]
fn test_posted_hotkey_delivered_to_dispatcher() {
    let mut service = configured_service();
    let mut commands = dispatcher();

    assert!(service.deliver(&HotkeyFired::new(SHOW_CALENDAR), &mut commands));
    assert_eq!(commands.take_requests(), vec![WindowRequest::Focus]);

    service.unregister(SHOW_CALENDAR);
    assert!(!service.deliver(&HotkeyFired::new(SHOW_CALENDAR), &mut commands));
    assert!(commands.take_requests().is_empty());
}
