//! The hotkey binding service.
//!
//! Owns the mapping from action name to key combination, registers each
//! binding with a [`HotkeyHost`], and hands presses to the application's
//! [`HotkeyHandler`]. All methods run on the GUI-owning thread.

use crate::delivery::HotkeyFired;
use crate::error::{BindingFailure, HostError, RegistrationError};
use crate::host::{CaptureScope, HotkeyHost};
use crate::matcher::KeyStroke;
use crate::parser::{KeyCombo, parse_combination};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// The single delivery point for hotkey notifications.
pub trait HotkeyHandler {
    fn on_hotkey(&mut self, action: &str) -> anyhow::Result<()>;
}

impl<F> HotkeyHandler for F
where
    F: FnMut(&str) -> anyhow::Result<()>,
{
    fn on_hotkey(&mut self, action: &str) -> anyhow::Result<()> {
        self(action)
    }
}

/// One action bound to one key combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    action_name: String,
    key_combination: KeyCombo,
    active: bool,
}

impl HotkeyBinding {
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    pub fn key_combination(&self) -> &KeyCombo {
        &self.key_combination
    }

    /// Whether the binding is registered with the host.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// An entry of a batch registration that did not take effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBinding {
    pub action: String,
    pub reason: BindingFailure,
}

/// Outcome of [`HotkeyService::register_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    /// Actions that are now active, in input order
    pub succeeded: Vec<String>,
    /// Actions that failed, with the reason
    pub failed: Vec<FailedBinding>,
}

impl RegistrationSummary {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Names of the actions that failed.
    pub fn failed_actions(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|f| f.action.as_str())
    }
}

/// Maps action names to key combinations and delivers presses.
///
/// Construct once from the application shell and tear down with
/// [`HotkeyService::shutdown`] (also run on drop).
#[derive(Debug)]
pub struct HotkeyService<H: HotkeyHost> {
    host: H,
    bindings: HashMap<String, HotkeyBinding>,
    /// Registration order, for deterministic matching
    order: Vec<String>,
}

impl<H: HotkeyHost> HotkeyService<H> {
    pub fn new(host: H) -> Self {
        log::info!(
            "Hotkey service created (capture scope: {})",
            host.scope()
        );
        Self {
            host,
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Where bound combinations can be observed.
    ///
    /// [`CaptureScope::FocusedWindow`] means hotkeys do not fire while the
    /// application is in the background.
    pub fn capture_scope(&self) -> CaptureScope {
        self.host.scope()
    }

    /// Bind `combination` to `action_name`.
    ///
    /// An existing binding for the action is released before the new one is
    /// claimed, so the two are never live at once. If the new claim fails the
    /// previous combination is claimed again.
    pub fn register(
        &mut self,
        action_name: &str,
        combination: KeyCombo,
    ) -> Result<(), RegistrationError> {
        if action_name.trim().is_empty() {
            return Err(RegistrationError::ConflictOrInvalid(
                "action name is empty".to_string(),
            ));
        }

        if !self.host.is_ready() {
            return Err(RegistrationError::HostUnavailable(format!(
                "cannot bind '{}' before the input host is ready",
                action_name
            )));
        }

        let previous = if self.bindings.contains_key(action_name) {
            log::debug!("Replacing hotkey binding for '{}'", action_name);
            self.take(action_name)
        } else {
            None
        };

        match self.host.activate(action_name, &combination) {
            Ok(()) => {
                log::info!("Registered hotkey: {} -> {}", combination, action_name);
                self.order.push(action_name.to_string());
                self.bindings.insert(
                    action_name.to_string(),
                    HotkeyBinding {
                        action_name: action_name.to_string(),
                        key_combination: combination,
                        active: true,
                    },
                );
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "Failed to register hotkey '{}' for '{}': {}",
                    combination,
                    action_name,
                    e
                );
                if let Some((index, binding)) = previous {
                    self.restore(index, binding);
                }
                Err(e.into())
            }
        }
    }

    /// Put back a binding taken by a failed re-registration, at its old
    /// position in the registration order.
    fn restore(&mut self, index: usize, binding: HotkeyBinding) {
        let action = binding.action_name.clone();
        if binding.active
            && let Err(e) = self.host.activate(&action, &binding.key_combination)
        {
            log::error!(
                "Could not restore '{}' for '{}': {}",
                binding.key_combination,
                action,
                e
            );
            return;
        }
        log::info!("Kept previous hotkey {} -> {}", binding.key_combination, action);
        self.order.insert(index.min(self.order.len()), action.clone());
        self.bindings.insert(action, binding);
    }

    /// Parse and bind every entry of `bindings` independently.
    ///
    /// One failing entry never stops the others.
    pub fn register_all<I, A, K>(&mut self, bindings: I) -> RegistrationSummary
    where
        I: IntoIterator<Item = (A, K)>,
        A: AsRef<str>,
        K: AsRef<str>,
    {
        let mut summary = RegistrationSummary::default();

        for (action, text) in bindings {
            let action = action.as_ref();
            let text = text.as_ref();

            let result = parse_combination(text)
                .map_err(BindingFailure::from)
                .and_then(|combo| self.register(action, combo).map_err(BindingFailure::from));

            match result {
                Ok(()) => summary.succeeded.push(action.to_string()),
                Err(reason) => {
                    log::warn!("Hotkey '{}' for '{}' not applied: {}", text, action, reason);
                    summary.failed.push(FailedBinding {
                        action: action.to_string(),
                        reason,
                    });
                }
            }
        }

        log::info!(
            "Applied hotkeys: {} registered, {} failed",
            summary.succeeded_count(),
            summary.failed_count()
        );
        summary
    }

    /// Replace every binding with the hotkeys from `config`.
    ///
    /// Used at startup and on config reload. With `hotkeys_enabled: false`
    /// this only releases what was registered before.
    pub fn apply_settings(&mut self, config: &glassy_config::Config) -> RegistrationSummary {
        self.shutdown();
        if !config.hotkeys_enabled {
            log::info!("Hotkeys disabled in config");
            return RegistrationSummary::default();
        }
        self.register_all(&config.hotkey_map())
    }

    /// Release and forget the binding for `action_name`. No-op if absent.
    pub fn unregister(&mut self, action_name: &str) {
        if self.bindings.contains_key(action_name) {
            self.release(action_name);
            log::info!("Unregistered hotkey for '{}'", action_name);
        }
    }

    /// Release every binding. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.bindings.is_empty() {
            return;
        }
        log::info!("Releasing {} hotkey binding(s)", self.bindings.len());
        let actions: Vec<String> = self.order.clone();
        for action in actions {
            self.release(&action);
        }
    }

    fn release(&mut self, action_name: &str) {
        self.take(action_name);
    }

    /// Remove the binding and release it from the host, returning it with its
    /// registration index. Bookkeeping is dropped even if the host fails to
    /// release the combination.
    fn take(&mut self, action_name: &str) -> Option<(usize, HotkeyBinding)> {
        let index = self.order.iter().position(|a| a == action_name)?;
        self.order.remove(index);
        let binding = self.bindings.remove(action_name)?;
        if binding.active {
            self.deactivate(&binding);
        }
        Some((index, binding))
    }

    fn deactivate(&mut self, binding: &HotkeyBinding) {
        let action_name = binding.action_name.as_str();
        if let Err(e) = self.host.deactivate(action_name, &binding.key_combination) {
            match e {
                HostError::Disposal(msg) => log::error!(
                    "Host failed to release '{}' for '{}': {}",
                    binding.key_combination,
                    action_name,
                    msg
                ),
                other => log::error!(
                    "Unexpected error releasing '{}' for '{}': {}",
                    binding.key_combination,
                    action_name,
                    other
                ),
            }
        }
    }

    pub fn is_active(&self, action_name: &str) -> bool {
        self.bindings
            .get(action_name)
            .is_some_and(HotkeyBinding::is_active)
    }

    pub fn binding(&self, action_name: &str) -> Option<&HotkeyBinding> {
        self.bindings.get(action_name)
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &HotkeyBinding> {
        self.order.iter().filter_map(|a| self.bindings.get(a))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Feed a key press observed by the window.
    ///
    /// Only focused-window hosts are matched here; a system-wide host reports
    /// the same press through [`HotkeyService::deliver`], and matching it twice
    /// would fire the action twice. Every matching action fires once, in
    /// registration order. Returns true if any action fired.
    pub fn handle_key_stroke(
        &self,
        stroke: &KeyStroke,
        handler: &mut dyn HotkeyHandler,
    ) -> bool {
        if self.host.scope() != CaptureScope::FocusedWindow {
            return false;
        }

        let matched: Vec<&str> = self
            .bindings()
            .filter(|b| b.active && stroke.matches(&b.key_combination))
            .map(|b| b.action_name.as_str())
            .collect();

        for action in &matched {
            log::debug!("Hotkey pressed for '{}'", action);
            dispatch(action, handler);
        }
        !matched.is_empty()
    }

    /// Deliver a notification posted from a listener thread.
    ///
    /// Notifications for actions that were unregistered after the press was
    /// queued are dropped. Returns true if the handler was called.
    pub fn deliver(&self, fired: &HotkeyFired, handler: &mut dyn HotkeyHandler) -> bool {
        if !self.is_active(fired.action()) {
            log::debug!("Dropping stale hotkey notification for '{}'", fired.action());
            return false;
        }
        dispatch(fired.action(), handler);
        true
    }
}

impl<H: HotkeyHost> Drop for HotkeyService<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Call the handler, containing errors and panics so they never unwind
/// through the event loop.
fn dispatch(action: &str, handler: &mut dyn HotkeyHandler) {
    match catch_unwind(AssertUnwindSafe(|| handler.on_hotkey(action))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("Hotkey handler for '{}' failed: {:#}", action, e),
        Err(_) => log::error!("Hotkey handler for '{}' panicked", action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_host::FocusedWindowHost;

    fn ready_service() -> HotkeyService<FocusedWindowHost> {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        HotkeyService::new(host)
    }

    #[test]
    fn test_register_activates_binding() {
        let mut service = ready_service();
        service
            .register("ai_add_event", parse_combination("Ctrl+Shift+F1").unwrap())
            .unwrap();
        assert!(service.is_active("ai_add_event"));
        assert_eq!(service.len(), 1);
        assert_eq!(
            service.binding("ai_add_event").unwrap().key_combination().to_string(),
            "Ctrl+Shift+F1"
        );
    }

    #[test]
    fn test_register_before_window_is_unavailable() {
        let mut service = HotkeyService::new(FocusedWindowHost::new());
        let err = service
            .register("ai_add_event", parse_combination("Ctrl+Shift+F1").unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::HostUnavailable(_)));
        assert!(service.is_empty());
    }

    #[test]
    fn test_empty_action_name_rejected() {
        let mut service = ready_service();
        let err = service
            .register("  ", parse_combination("Ctrl+K").unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistrationError::ConflictOrInvalid(_)));
    }

    #[test]
    fn test_reregister_same_combo_succeeds() {
        let mut service = ready_service();
        let combo = parse_combination("Ctrl+K").unwrap();
        service.register("a", combo.clone()).unwrap();
        service.register("a", combo).unwrap();
        assert_eq!(service.len(), 1);
        assert_eq!(service.host().claimed(), 1);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut service = ready_service();
        service.register("a", parse_combination("Ctrl+1").unwrap()).unwrap();
        service.shutdown();
        service.shutdown();
        assert!(service.is_empty());
        assert_eq!(service.host().claimed(), 0);
    }

    #[test]
    fn test_bindings_keep_registration_order() {
        let mut service = ready_service();
        service.register("z", parse_combination("Ctrl+3").unwrap()).unwrap();
        service.register("a", parse_combination("Ctrl+4").unwrap()).unwrap();
        let names: Vec<&str> = service.bindings().map(HotkeyBinding::action_name).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let mut service = ready_service();
        let combo = parse_combination("Ctrl+K").unwrap();
        service.register("boom", combo.clone()).unwrap();

        let mut handler = |_: &str| -> anyhow::Result<()> { panic!("handler bug") };
        assert!(service.handle_key_stroke(&KeyStroke::from_combo(&combo), &mut handler));
    }

    #[test]
    fn test_handler_error_is_contained() {
        let mut service = ready_service();
        service.register("fails", parse_combination("Ctrl+K").unwrap()).unwrap();

        let mut handler = |_: &str| -> anyhow::Result<()> { anyhow::bail!("no dialog") };
        assert!(service.deliver(&HotkeyFired::new("fails"), &mut handler));
    }
}
