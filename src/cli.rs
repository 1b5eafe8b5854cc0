//! Command-line interface for Glassy Calendar.
//!
//! Handles argument parsing and the `check-hotkeys` subcommand.

use clap::{Parser, Subcommand};
use glassy_config::{Config, HotkeyMode, LogLevel};
use glassy_hotkeys::{FocusedWindowHost, HotkeyService, parse_combination};
use std::io::{self, Write};
use std::path::PathBuf;

/// Glassy Calendar - a translucent desktop calendar widget
#[derive(Parser)]
#[command(name = "glassy-calendar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of ~/.config/glassy-calendar/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace); overrides RUST_LOG and config
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Hotkey capture mode (focused_window, global); overrides config
    #[arg(long, value_name = "MODE")]
    pub hotkey_mode: Option<HotkeyMode>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse the configured hotkeys and print each normalized combination
    CheckHotkeys,
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Log level override
    pub log_level: Option<LogLevel>,
    /// Hotkey mode override
    pub hotkey_mode: Option<HotkeyMode>,
}

impl RuntimeOptions {
    /// Path of the config file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(Config::config_path)
    }

    /// Load the config, falling back to defaults when it is missing or broken.
    ///
    /// A desktop widget should still come up with a bad config; the problem
    /// is logged instead.
    pub fn load_config(&self) -> Config {
        let result = match &self.config_path {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        };
        let mut config = result.unwrap_or_else(|e| {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        });
        if let Some(mode) = self.hotkey_mode {
            config.hotkey_mode = mode;
        }
        config
    }
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal application startup
    Continue(RuntimeOptions),
    /// Exit with the given code (subcommand completed)
    Exit(i32),
}

/// Process CLI arguments and handle subcommands
pub fn process_cli() -> CliResult {
    let cli = Cli::parse();
    let options = RuntimeOptions {
        config_path: cli.config,
        log_level: cli.log_level,
        hotkey_mode: cli.hotkey_mode,
    };

    match cli.command {
        Some(Commands::CheckHotkeys) => {
            let config = options.load_config();
            let mut stdout = io::stdout().lock();
            match check_hotkeys(&config, &mut stdout) {
                Ok(true) => CliResult::Exit(0),
                Ok(false) => CliResult::Exit(1),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    CliResult::Exit(1)
                }
            }
        }
        None => CliResult::Continue(options),
    }
}

/// Whether startup registers through the focused-window host, whose rules
/// can be checked without touching the OS.
fn uses_window_host(mode: HotkeyMode) -> bool {
    mode == HotkeyMode::FocusedWindow || !cfg!(feature = "global-hook")
}

/// Print every configured hotkey with its normalized form, parse error or
/// host rejection.
///
/// Entries are registered against a fresh focused-window host in the order
/// startup uses, so bare printable keys and combinations claimed twice are
/// reported the way they would fail at launch. Returns false if any entry
/// would not be bound.
pub fn check_hotkeys(config: &Config, out: &mut impl Write) -> io::Result<bool> {
    writeln!(out, "Hotkey mode: {}", config.hotkey_mode)?;
    if !config.hotkeys_enabled {
        writeln!(out, "Hotkeys are disabled (hotkeys_enabled: false)")?;
    }

    let mut service = uses_window_host(config.hotkey_mode).then(|| {
        let mut host = FocusedWindowHost::new();
        host.attach_window();
        HotkeyService::new(host)
    });

    let width = config.hotkeys.keys().map(String::len).max().unwrap_or(0);
    let mut all_valid = true;
    for (action, text) in &config.hotkeys {
        if text.trim().is_empty() {
            writeln!(out, "  {:<width$}  (disabled)", action)?;
            continue;
        }
        let combo = match parse_combination(text) {
            Ok(combo) => combo,
            Err(e) => {
                all_valid = false;
                writeln!(out, "  {:<width$}  ERROR: {}", action, e)?;
                continue;
            }
        };
        let registered = match service.as_mut() {
            Some(service) => service.register(action, combo.clone()),
            None => Ok(()),
        };
        match registered {
            Ok(()) => writeln!(out, "  {:<width$}  {}", action, combo)?,
            Err(e) => {
                all_valid = false;
                writeln!(out, "  {:<width$}  {}  REJECTED: {}", action, combo, e)?;
            }
        }
    }
    Ok(all_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::try_parse_from([
            "glassy-calendar",
            "--log-level",
            "debug",
            "--hotkey-mode",
            "global",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.hotkey_mode, Some(HotkeyMode::Global));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["glassy-calendar", "--hotkey-mode", "everywhere"]).is_err());
    }

    #[test]
    fn test_check_hotkeys_subcommand() {
        let cli = Cli::try_parse_from(["glassy-calendar", "check-hotkeys"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::CheckHotkeys)));
    }
}
