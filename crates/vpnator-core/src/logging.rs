//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Environment variable controlling the log filter.
pub const LOG_ENV_VAR: &str = "VPNATOR_LOG";

const LOG_FILE_NAME: &str = "vpnator.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/vpnator/logs/` (platform equivalent).
/// Nothing is written to stdout: the TUI and the headless NDJSON stream own it.
/// Log level is controlled by the `VPNATOR_LOG` environment variable.
///
/// # Examples
/// ```bash
/// VPNATOR_LOG=debug vpnator
/// VPNATOR_LOG=vpnator_client=trace vpnator --headless ...
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_NAME);

    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new("vpnator=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("VPNator starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("vpnator").join("logs"))
}

/// Get the log file path for the current day
///
/// The daily appender suffixes the file name with the UTC date.
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    let date = chrono::Utc::now().format("%Y-%m-%d");
    Ok(dir.join(format!("{}.{}", LOG_FILE_NAME, date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_under_vpnator_logs() {
        let path = get_current_log_file().unwrap();
        assert!(path.parent().unwrap().ends_with("vpnator/logs"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("vpnator.log."));
        assert_eq!(name.len(), "vpnator.log.".len() + "YYYY-MM-DD".len());
    }
}
