//! The application: a winit event loop that owns the calendar window and
//! the hotkey service.

use crate::APP_TITLE;
use crate::cli::RuntimeOptions;
use crate::commands::{CommandDispatcher, WindowRequest};
use crate::debug;
use crate::notifications::SystemNotifier;
use anyhow::Result;
use glassy_config::watcher::ConfigWatcher;
use glassy_config::{Config, HotkeyMode};
use glassy_hotkeys::{
    CaptureScope, FocusedWindowHost, HostError, HotkeyFired, HotkeyHost, HotkeyService, KeyCombo,
    KeyStroke,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Modifiers, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Events posted to the GUI thread from other threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A system-wide hotkey was pressed
    Hotkey(HotkeyFired),
    /// The config file changed on disk
    ConfigReloaded,
}

impl From<HotkeyFired> for AppEvent {
    fn from(fired: HotkeyFired) -> Self {
        AppEvent::Hotkey(fired)
    }
}

/// The host the service registers against, chosen from `hotkey_mode`.
pub enum AppHost {
    Window(FocusedWindowHost),
    #[cfg(feature = "global-hook")]
    Global(glassy_hotkeys::GlobalHookHost),
}

impl AppHost {
    /// Build the host for `mode`. Global mode needs the `global-hook` build;
    /// without it the focused-window host is used.
    pub fn for_mode(mode: HotkeyMode, proxy: &EventLoopProxy<AppEvent>) -> Self {
        match mode {
            HotkeyMode::FocusedWindow => AppHost::Window(FocusedWindowHost::new()),
            #[cfg(feature = "global-hook")]
            HotkeyMode::Global => {
                let notifier = Arc::new(glassy_hotkeys::LoopNotifier::new(proxy.clone()));
                AppHost::Global(glassy_hotkeys::GlobalHookHost::new(notifier))
            }
            #[cfg(not(feature = "global-hook"))]
            HotkeyMode::Global => {
                let _ = proxy;
                log::warn!(
                    "hotkey_mode 'global' needs a build with the global-hook feature; \
                     using focused-window hotkeys"
                );
                AppHost::Window(FocusedWindowHost::new())
            }
        }
    }

    /// Bring the host context up once the window exists.
    pub fn attach(&mut self) -> Result<(), HostError> {
        match self {
            AppHost::Window(host) => {
                host.attach_window();
                Ok(())
            }
            #[cfg(feature = "global-hook")]
            AppHost::Global(host) => host.start(),
        }
    }

    fn inner(&self) -> &dyn HotkeyHost {
        match self {
            AppHost::Window(host) => host,
            #[cfg(feature = "global-hook")]
            AppHost::Global(host) => host,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn HotkeyHost {
        match self {
            AppHost::Window(host) => host,
            #[cfg(feature = "global-hook")]
            AppHost::Global(host) => host,
        }
    }
}

impl HotkeyHost for AppHost {
    fn scope(&self) -> CaptureScope {
        self.inner().scope()
    }

    fn is_ready(&self) -> bool {
        self.inner().is_ready()
    }

    fn activate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        self.inner_mut().activate(action, combo)
    }

    fn deactivate(&mut self, action: &str, combo: &KeyCombo) -> Result<(), HostError> {
        self.inner_mut().deactivate(action, combo)
    }
}

/// Main application state
pub struct App {
    config: Config,
    config_path: PathBuf,
    mode_override: Option<HotkeyMode>,
}

impl App {
    /// Create a new application
    pub fn new(options: RuntimeOptions) -> Result<Self> {
        let config = options.load_config();
        debug::apply_config_level(config.log_level);
        Ok(Self {
            config,
            config_path: options.config_path(),
            mode_override: options.hotkey_mode,
        })
    }

    /// Run the application until the window is closed
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);
        let proxy = event_loop.create_proxy();

        let watcher = ConfigReloadForwarder::spawn(
            &self.config_path,
            self.config.config_watch_debounce_ms,
            proxy.clone(),
        );

        let mut state =
            AppState::new(self.config, self.config_path, self.mode_override, &proxy);
        let result = event_loop.run_app(&mut state);

        state.service.shutdown();
        if let Some(watcher) = watcher {
            watcher.stop();
        }
        result?;
        Ok(())
    }
}

/// Forwards config file changes from a watcher thread to the event loop.
struct ConfigReloadForwarder {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl ConfigReloadForwarder {
    fn spawn(
        path: &std::path::Path,
        debounce_ms: u64,
        proxy: EventLoopProxy<AppEvent>,
    ) -> Option<Self> {
        let watcher = match ConfigWatcher::new(path, debounce_ms) {
            Ok(w) => w,
            Err(e) => {
                log::warn!("Config hot reload disabled: {:#}", e);
                return None;
            }
        };

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let spawned = std::thread::Builder::new()
            .name("config-watcher".to_string())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    match watcher.recv_timeout(Duration::from_millis(500)) {
                        Ok(Some(_)) => {
                            if proxy.send_event(AppEvent::ConfigReloaded).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            log::warn!("{}", e);
                            break;
                        }
                    }
                }
            });

        match spawned {
            Ok(thread) => Some(Self { stop, thread }),
            Err(e) => {
                log::warn!("Failed to start config watcher thread: {}", e);
                None
            }
        }
    }

    fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        if self.thread.join().is_err() {
            log::error!("Config watcher thread panicked");
        }
    }
}

/// The mode a reloaded file asks for, when it differs from the running one.
///
/// A `--hotkey-mode` override decides the mode regardless of the file, so no
/// change is pending while one is set.
fn pending_mode_change(
    running: HotkeyMode,
    from_file: HotkeyMode,
    mode_override: Option<HotkeyMode>,
) -> Option<HotkeyMode> {
    (mode_override.is_none() && from_file != running).then_some(from_file)
}

/// Application state that handles events
struct AppState {
    config: Config,
    config_path: PathBuf,
    /// `--hotkey-mode`, which wins over the file on every reload
    mode_override: Option<HotkeyMode>,
    window: Option<Arc<Window>>,
    service: HotkeyService<AppHost>,
    dispatcher: CommandDispatcher<SystemNotifier>,
    modifiers: Modifiers,
    is_focused: bool,
}

impl AppState {
    fn new(
        config: Config,
        config_path: PathBuf,
        mode_override: Option<HotkeyMode>,
        proxy: &EventLoopProxy<AppEvent>,
    ) -> Self {
        let host = AppHost::for_mode(config.hotkey_mode, proxy);
        let dispatcher =
            CommandDispatcher::new(SystemNotifier, config.hotkey_blocked_notification_ms);
        Self {
            config,
            config_path,
            mode_override,
            window: None,
            service: HotkeyService::new(host),
            dispatcher,
            modifiers: Modifiers::default(),
            is_focused: false,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(APP_TITLE)
            .with_inner_size(LogicalSize::new(360.0, 420.0))
            .with_transparent(true);
        let window = Arc::new(event_loop.create_window(attributes)?);
        self.window = Some(window);

        self.service.host_mut().attach()?;
        log::info!("Hotkey capture scope: {}", self.service.capture_scope());
        self.apply_hotkeys();
        Ok(())
    }

    fn apply_hotkeys(&mut self) {
        let summary = self.service.apply_settings(&self.config);
        for failed in &summary.failed {
            log::warn!("Hotkey for '{}' unavailable: {}", failed.action, failed.reason);
        }
    }

    fn reload_config(&mut self) {
        let config = match Config::reload_from(&self.config_path) {
            Ok(Some(config)) => config,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Ignoring config change: {}", e);
                return;
            }
        };

        if let Some(mode) =
            pending_mode_change(self.config.hotkey_mode, config.hotkey_mode, self.mode_override)
        {
            log::warn!("hotkey_mode changed to {}; takes effect on restart", mode);
        }
        debug::apply_config_level(config.log_level);
        self.dispatcher
            .set_blocked_notification_ms(config.hotkey_blocked_notification_ms);

        // Keep the mode the host was built with
        self.config = Config {
            hotkey_mode: self.config.hotkey_mode,
            ..config
        };
        self.apply_hotkeys();
    }

    fn apply_window_requests(&mut self) {
        let requests = self.dispatcher.take_requests();
        let Some(window) = &self.window else {
            return;
        };
        for request in requests {
            match request {
                WindowRequest::Focus => {
                    window.set_visible(true);
                    window.set_minimized(false);
                    window.focus_window();
                }
                WindowRequest::Redraw => window.request_redraw(),
                WindowRequest::SetTitle(title) => window.set_title(&title),
            }
        }
    }
}

impl ApplicationHandler<AppEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("Failed to set up window: {:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, releasing hotkeys");
                self.service.shutdown();
                event_loop.exit();
            }
            WindowEvent::Focused(focused) => {
                self.is_focused = focused;
                log::debug!("Window focus changed: {}", focused);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                    && self.dispatcher.close_dialog()
                {
                    self.apply_window_requests();
                    return;
                }
                if let Some(stroke) = KeyStroke::from_press(&event, &self.modifiers) {
                    self.service
                        .handle_key_stroke(&stroke, &mut self.dispatcher);
                    self.apply_window_requests();
                }
            }
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Hotkey(fired) => {
                log::debug!(
                    "System-wide hotkey '{}' (window focused: {})",
                    fired.action(),
                    self.is_focused
                );
                self.service.deliver(&fired, &mut self.dispatcher);
                self.apply_window_requests();
            }
            AppEvent::ConfigReloaded => self.reload_config(),
        }
    }
}
