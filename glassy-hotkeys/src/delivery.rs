//! Cross-thread hotkey delivery.
//!
//! A hook listener thread must never touch GUI state. It resolves the hook id
//! to an action name through [`HookRouter`] and posts a [`HotkeyFired`] to the
//! GUI thread through a [`HotkeyNotifier`]. The GUI thread then hands the
//! event to [`crate::HotkeyService::deliver`].
//!
//! Two notifiers are provided:
//! - [`LoopNotifier`] wraps winit's `EventLoopProxy`, the toolkit's own
//!   post-to-main-loop primitive.
//! - [`HotkeyQueue`] is a bounded queue drained once per loop iteration, for
//!   loops without such a primitive.

use crate::error::NotifyError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};
use winit::event_loop::EventLoopProxy;

/// Default capacity for [`HotkeyQueue`].
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Notification that a bound combination was pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyFired {
    action: String,
}

impl HotkeyFired {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    /// The action name the combination is bound to.
    pub fn action(&self) -> &str {
        &self.action
    }
}

/// Posts hotkey notifications onto the GUI thread's queue.
///
/// Implementations are called from listener threads and must not block.
pub trait HotkeyNotifier: Send + Sync {
    fn post(&self, fired: HotkeyFired) -> Result<(), NotifyError>;
}

/// Notifier backed by a winit event loop proxy.
///
/// The loop's user event type must be constructible from [`HotkeyFired`].
pub struct LoopNotifier<T: 'static> {
    proxy: Mutex<EventLoopProxy<T>>,
}

impl<T: 'static> LoopNotifier<T> {
    pub fn new(proxy: EventLoopProxy<T>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }
}

impl<T: 'static> std::fmt::Debug for LoopNotifier<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopNotifier").finish_non_exhaustive()
    }
}

impl<T> HotkeyNotifier for LoopNotifier<T>
where
    T: From<HotkeyFired> + Send + 'static,
{
    fn post(&self, fired: HotkeyFired) -> Result<(), NotifyError> {
        self.proxy
            .lock()
            .send_event(T::from(fired))
            .map_err(|_| NotifyError::Closed)
    }
}

/// Bounded queue of hotkey notifications, drained on the GUI thread.
#[derive(Debug)]
pub struct HotkeyQueue {
    sender: SyncSender<HotkeyFired>,
    receiver: Receiver<HotkeyFired>,
}

impl Default for HotkeyQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl HotkeyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = sync_channel(capacity.max(1));
        Self { sender, receiver }
    }

    /// A notifier that listener threads can post through.
    pub fn notifier(&self) -> QueueNotifier {
        QueueNotifier {
            sender: self.sender.clone(),
        }
    }

    /// Take every pending notification in arrival order (non-blocking).
    pub fn drain(&self) -> Vec<HotkeyFired> {
        self.receiver.try_iter().collect()
    }
}

/// Sending half of a [`HotkeyQueue`].
#[derive(Debug, Clone)]
pub struct QueueNotifier {
    sender: SyncSender<HotkeyFired>,
}

impl HotkeyNotifier for QueueNotifier {
    fn post(&self, fired: HotkeyFired) -> Result<(), NotifyError> {
        self.sender.try_send(fired).map_err(|e| match e {
            TrySendError::Full(_) => NotifyError::QueueFull,
            TrySendError::Disconnected(_) => NotifyError::Closed,
        })
    }
}

/// Maps hook ids to action names for a listener thread.
///
/// The GUI thread edits the table; the listener only reads it. The lock is
/// held just long enough to copy the action name out and is released before
/// the notification is posted.
pub struct HookRouter {
    routes: Mutex<HashMap<u32, String>>,
    notifier: Arc<dyn HotkeyNotifier>,
}

impl std::fmt::Debug for HookRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRouter")
            .field("routes", &self.routes.lock().len())
            .finish_non_exhaustive()
    }
}

impl HookRouter {
    pub fn new(notifier: Arc<dyn HotkeyNotifier>) -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            notifier,
        }
    }

    /// Route hook `id` to `action`.
    pub fn route(&self, id: u32, action: &str) {
        self.routes.lock().insert(id, action.to_string());
    }

    /// Stop routing hook `id`. Returns the action it was routed to.
    pub fn unroute(&self, id: u32) -> Option<String> {
        self.routes.lock().remove(&id)
    }

    /// Drop every route.
    pub fn clear(&self) {
        self.routes.lock().clear();
    }

    pub fn is_routed(&self, id: u32) -> bool {
        self.routes.lock().contains_key(&id)
    }

    /// Handle a raw hook event. Called on the listener thread.
    ///
    /// Releases are ignored so each physical press produces one notification.
    /// Returns true if a notification was posted.
    pub fn on_hook_event(&self, id: u32, pressed: bool) -> bool {
        if !pressed {
            return false;
        }

        let action = self.routes.lock().get(&id).cloned();
        let Some(action) = action else {
            log::trace!("Ignoring hook event for unrouted id {}", id);
            return false;
        };

        match self.notifier.post(HotkeyFired::new(action.as_str())) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropped hotkey notification for '{}': {}", action, e);
                false
            }
        }
    }
}
