//! Logging configuration using the tracing ecosystem.
//!
//! The library only emits events; the `clubhouse` binary installs the
//! subscriber. Output goes to a daily rotating file so that the JSON the
//! binary prints on stdout stays clean.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set and no `-v` was given.
const DEFAULT_LOG_FILTER: &str = "clubhouse=info,warn";

/// The filter directive for a `-v` count. `RUST_LOG` wins over a count of 0.
fn filter_directive(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("clubhouse=debug,warn"),
        _ => Some("clubhouse=trace,reqwest=debug,hyper=info"),
    }
}

/// Initialize the logging system.
///
/// # Log Directory
///
/// Logs are stored in the platform-specific local data directory:
/// - Linux: `~/.local/share/clubhouse/logs/`
/// - macOS: `~/Library/Application Support/clubhouse/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\clubhouse\logs\`
///
/// # Log Levels
///
/// `-v` logs every request method and path, `-vv` adds HTTP client
/// internals. Without `-v`, `RUST_LOG` is honored, e.g.
/// `RUST_LOG=clubhouse=debug`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created,
/// or if a global subscriber is already set.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "clubhouse.log");

    let filter = match filter_directive(verbosity) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        verbosity,
        "clubhouse starting up"
    );
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(())
}

fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("clubhouse").join("logs"))
}

/// Where log files are written, for display to users.
pub fn log_directory() -> Option<PathBuf> {
    get_log_directory().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_by_verbosity() {
        assert_eq!(filter_directive(0), None);
        assert_eq!(filter_directive(1), Some("clubhouse=debug,warn"));
        assert_eq!(filter_directive(2), filter_directive(5));
    }

    #[test]
    fn test_directives_parse() {
        for verbosity in 1..=2 {
            let directive = filter_directive(verbosity).unwrap();
            assert!(EnvFilter::try_new(directive).is_ok());
        }
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_log_directory_has_expected_structure() {
        if let Some(dir) = log_directory() {
            assert!(dir.ends_with("clubhouse/logs"));
        }
    }
}
