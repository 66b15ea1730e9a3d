//! Logging setup.
//!
//! Logs go to journald when running under systemd, and to stderr otherwise.
//! The `RUST_LOG` env var overrides the default `info` level.

use std::io::IsTerminal as _;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const SYSLOG_IDENTIFIER: &str = "worldcoin-modemmanager-exporter";

/// Installs the global tracing subscriber. Call this once, at the start of the
/// program.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // Checking for a terminal helps detect if we are running under systemd.
    let journald_layer = if std::io::stderr().is_terminal() {
        None
    } else {
        tracing_journald::layer()
            .inspect_err(|err| {
                eprintln!("failed connecting to journald socket. will write to stderr: {err}");
            })
            .map(|layer| layer.with_syslog_identifier(SYSLOG_IDENTIFIER.to_owned()))
            .ok()
    };

    let stderr_layer = journald_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(journald_layer)
        .with(filter)
        .try_init()
}
