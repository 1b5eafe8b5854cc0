//! Debug logging for Glassy Calendar.
//!
//! Installs a `log::Log` implementation that writes every record to
//! `glassy_calendar_debug.log` in the system temp directory, keeping stdout
//! and stderr quiet for a widget that usually has no console. When
//! `RUST_LOG` is set, records are mirrored to stderr as well.
//!
//! Level precedence: `--log-level` CLI flag, then `RUST_LOG`, then the
//! `log_level` config field (applied once the config is loaded).

use glassy_config::LogLevel;
use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where the effective log level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    Cli,
    Env,
    Config,
}

struct DebugLogger {
    path: PathBuf,
    /// Opened on the first record so `log_level: off` never creates the file
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
    source: LevelSource,
}

impl DebugLogger {
    fn open(&self) -> Option<File> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&self.path)
            .ok()?;
        let _ = writeln!(
            file,
            "{}\nglassy-calendar debug session started at {}\n{}",
            "=".repeat(80),
            timestamp(),
            "=".repeat(80)
        );
        Some(file)
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );

        if self.mirror_stderr {
            eprint!("{}", line);
        }

        let mut file = self.file.lock();
        if file.is_none() {
            *file = self.open();
        }
        // Silently drop the line if the log file can't be opened
        if let Some(f) = file.as_mut() {
            let _ = f.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Some(f) = self.file.lock().as_mut() {
            let _ = f.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("glassy_calendar_debug.log")
}

/// Read a level out of a `RUST_LOG` value.
///
/// Accepts a bare level (`debug`) or directives (`glassy=trace,winit=warn`),
/// in which case the most verbose level mentioned wins.
pub fn parse_rust_log(value: &str) -> Option<LogLevel> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next().unwrap_or(directive);
            level.parse::<LogLevel>().ok()
        })
        .max_by_key(|level| level.to_level_filter())
}

/// Decide the startup level from the CLI flag and the `RUST_LOG` value.
///
/// Without either, logging starts at `Info` until the config is applied.
pub fn resolve_level(cli: Option<LogLevel>, rust_log: Option<&str>) -> (LevelFilter, LevelSource) {
    if let Some(level) = cli {
        return (level.to_level_filter(), LevelSource::Cli);
    }
    if let Some(level) = rust_log.and_then(parse_rust_log) {
        return (level.to_level_filter(), LevelSource::Env);
    }
    (LogLevel::Info.to_level_filter(), LevelSource::Config)
}

/// Install the debug logger as the global `log` backend.
///
/// Calling this more than once keeps the first logger.
pub fn init_log_bridge(cli_level: Option<LogLevel>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let (level, source) = resolve_level(cli_level, rust_log.as_deref());

    let logger = LOGGER.get_or_init(|| DebugLogger {
        path: log_path(),
        file: Mutex::new(None),
        mirror_stderr: rust_log.is_some(),
        source,
    });

    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
        log::info!(
            "Logging to {} at {} (from {:?})",
            logger.path.display(),
            level,
            source
        );
    }
}

/// Apply the config's `log_level` unless the CLI or `RUST_LOG` chose one.
///
/// Returns true if the level changed.
pub fn apply_config_level(level: LogLevel) -> bool {
    match LOGGER.get() {
        Some(logger) if logger.source == LevelSource::Config => {
            let filter = level.to_level_filter();
            if log::max_level() != filter {
                log::info!("Log level set to {} from config", filter);
                log::set_max_level(filter);
                return true;
            }
            false
        }
        _ => false,
    }
}
