// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::Result;
use glassy_calendar::app::App;
use glassy_calendar::cli;

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            // No app state exists yet, so no destructors are skipped
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };

    // Routes log::info!() etc. to the debug log file, mirrored to stderr when
    // RUST_LOG is set. CLI --log-level wins, then RUST_LOG, then config (applied later).
    glassy_calendar::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting Glassy Calendar {}", glassy_calendar::VERSION);

    let app = App::new(runtime_options)?;
    let result = app.run();
    log::info!("Event loop exited");

    if let Err(ref e) = result {
        eprintln!("glassy-calendar: error: {e:#}");
        #[cfg(target_os = "linux")]
        {
            let msg = format!("{e:?}").to_lowercase();
            if msg.contains("display") || msg.contains("wayland") || msg.contains("xcb") {
                eprintln!(
                    "glassy-calendar: hint: no display server found; ensure DISPLAY (X11) or \
                     WAYLAND_DISPLAY (Wayland) is set"
                );
            }
        }
    }
    result
}
