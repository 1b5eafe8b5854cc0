//! Config file watcher for hot reload.
//!
//! Watches the directory holding config.yaml (editors often save by
//! replacing the file) and reports changes to that one file. A burst of
//! writes produces a single reload once the file has been quiet for the
//! debounce window, so the reload sees the last write, not a truncated
//! intermediate state.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The watched config file changed and should be reloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReloadEvent {
    pub path: PathBuf,
}

/// Trailing-edge debouncer: a change settles once no further change has
/// been seen for `quiet`.
#[derive(Debug)]
struct Debouncer {
    quiet: Duration,
    last_change: Mutex<Option<Instant>>,
}

impl Debouncer {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_change: Mutex::new(None),
        }
    }

    fn note(&self, now: Instant) {
        *self.last_change.lock() = Some(now);
    }

    /// Time left until the pending change settles, if one is pending.
    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .lock()
            .map(|at| self.quiet.saturating_sub(now.saturating_duration_since(at)))
    }

    /// Consume the pending change if it has settled.
    fn take_settled(&self, now: Instant) -> bool {
        let mut last = self.last_change.lock();
        match *last {
            Some(at) if now.saturating_duration_since(at) >= self.quiet => {
                *last = None;
                true
            }
            _ => false,
        }
    }
}

/// Shared state for the notify callback; cloned for the fallback backend.
#[derive(Clone)]
struct ChangeFilter {
    filename: OsString,
    debouncer: Arc<Debouncer>,
    wake: Sender<()>,
}

impl ChangeFilter {
    fn handle(&self, result: notify::Result<Event>) {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::debug!("Config watcher error: {}", e);
                return;
            }
        };

        // Create covers atomic saves (write temp, rename over)
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        let touches_config = event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.filename.as_os_str()));
        if !touches_config {
            return;
        }

        log::trace!("Config change seen; waiting for writes to settle");
        self.debouncer.note(Instant::now());
        // The receiver only goes away with the watcher itself
        let _ = self.wake.send(());
    }
}

/// Watches the config file and queues reload events.
pub struct ConfigWatcher {
    /// Kept alive to keep watching
    _watcher: Box<dyn Watcher + Send>,
    wake: Receiver<()>,
    debouncer: Arc<Debouncer>,
    path: PathBuf,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher").finish_non_exhaustive()
    }
}

impl ConfigWatcher {
    /// Start watching `config_path`.
    ///
    /// Uses the platform's native backend and falls back to polling when it
    /// cannot be initialised (containers, network filesystems).
    ///
    /// # Errors
    /// Fails if the file does not exist or neither backend can watch its directory.
    pub fn new(config_path: &Path, debounce_ms: u64) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let path = config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf());
        let filename = path
            .file_name()
            .context("Config path has no filename")?
            .to_os_string();
        let parent = path
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        let (wake_tx, wake) = channel();
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(debounce_ms)));
        let filter = ChangeFilter {
            filename,
            debouncer: Arc::clone(&debouncer),
            wake: wake_tx,
        };

        let mut watcher = Self::create_backend(filter)?;
        watcher
            .watch(&parent, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config directory: {}", parent.display()))?;

        log::info!("Config hot reload: watching {}", path.display());

        Ok(Self {
            _watcher: watcher,
            wake,
            debouncer,
            path,
        })
    }

    fn create_backend(filter: ChangeFilter) -> Result<Box<dyn Watcher + Send>> {
        let native = filter.clone();
        match notify::recommended_watcher(move |res: notify::Result<Event>| native.handle(res)) {
            Ok(w) => {
                log::debug!("Config watcher: using native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Config watcher: native backend unavailable ({}); falling back to polling",
                    e
                );
                let poll = PollWatcher::new(
                    move |res: notify::Result<Event>| filter.handle(res),
                    NotifyConfig::default().with_poll_interval(POLL_INTERVAL),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll))
            }
        }
    }

    /// Next settled reload event, without blocking.
    pub fn try_recv(&self) -> Option<ConfigReloadEvent> {
        while self.wake.try_recv().is_ok() {}
        self.settled(Instant::now())
    }

    /// Wait up to `timeout` for a change to settle.
    ///
    /// Returns `Ok(None)` on timeout and `Err` once the backend has shut down.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ConfigReloadEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            let now = Instant::now();
            if let Some(event) = self.settled(now) {
                return Ok(Some(event));
            }
            if now >= deadline {
                return Ok(None);
            }

            let until_deadline = deadline - now;
            let wait = self
                .debouncer
                .remaining(now)
                .map_or(until_deadline, |left| left.min(until_deadline));
            match self.wake.recv_timeout(wait) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => anyhow::bail!("config watcher stopped"),
            }
        }
    }

    fn settled(&self, now: Instant) -> Option<ConfigReloadEvent> {
        if !self.debouncer.take_settled(now) {
            return None;
        }
        log::info!("Config file changed: {}", self.path.display());
        Some(ConfigReloadEvent {
            path: self.path.clone(),
        })
    }
}
