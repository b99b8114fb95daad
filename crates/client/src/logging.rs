//! File-based tracing setup for the `clash` binary.
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "client.log";

/// Platform log directory:
/// - macOS: `~/Library/Caches/clash/logs`
/// - Linux: `~/.cache/clash/logs` (or `$XDG_CACHE_HOME/clash/logs`)
/// - Windows: `%LOCALAPPDATA%\clash\logs`
/// - Fallback: `/tmp/clash/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "clash")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/clash"))
        .join("logs")
}

/// Session directory name, generated from the clock when not supplied.
pub fn session_name(session_id: Option<&str>) -> String {
    match session_id {
        Some(id) => id.to_string(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or_default();
            format!("session_{}", timestamp)
        }
    }
}

/// Installs the global subscriber and returns the log file path.
///
/// Logs always go to `<log_dir>/<session>/client.log`. Stdout belongs to the
/// battle display, so the stderr layer is opt-in.
pub fn setup_logging(session_id: Option<&str>, to_stderr: bool) -> Result<PathBuf> {
    let session = session_name(session_id);
    let session_log_dir = log_dir().join(&session);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory {}",
            session_log_dir.display()
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = to_stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    // Keep the writer alive for the rest of the process.
    std::mem::forget(guard);

    let log_file = session_log_dir.join(LOG_FILE);
    tracing::info!(session = %session, file = %log_file.display(), "logging initialized");
    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_session_name_is_kept() {
        assert_eq!(session_name(Some("duel-1")), "duel-1");
        assert!(session_name(None).starts_with("session_"));
    }

    #[test]
    fn log_dir_ends_in_logs() {
        assert!(log_dir().ends_with("logs"));
    }
}
