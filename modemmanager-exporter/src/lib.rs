//! Prometheus exporter for ModemManager.
//!
//! Every request to `/metrics` asks ModemManager for the current state of all
//! modems and exposes it as a fresh set of gauges. Nothing is cached between
//! scrapes.

use color_eyre::eyre::{Result, WrapErr as _};
use futures::TryStreamExt as _;
use modem_manager::ModemManager;
use scrape::Scraper;
use std::{pin::pin, sync::Arc, time::Duration};
use tokio::{net::TcpListener, time};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod metrics;
pub mod modem_manager;
pub mod scrape;
pub mod server;
pub mod telemetry;

mod utils;

pub const DEFAULT_ADDR: &str = "0.0.0.0:9539";

const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

#[bon::builder(finish_fn = run)]
pub async fn program(
    listener: TcpListener,
    modem_manager: impl ModemManager,
    signal_rate: Duration,
    scrape_timeout: Duration,
    shutdown: CancellationToken,
) -> Result<()> {
    let mm: Arc<dyn ModemManager> = Arc::new(modem_manager);

    let version = time::timeout(STARTUP_TIMEOUT, setup(mm.as_ref(), signal_rate))
        .await
        .wrap_err("timed out configuring modems")??;

    info!("ModemManager version {version}");

    let scraper = Scraper::builder()
        .mm(mm)
        .version(version)
        .timeout(scrape_timeout)
        .build();

    info!(
        "starting ModemManager exporter on {:?}",
        listener.local_addr()?
    );

    axum::serve(listener, server::router(scraper))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .wrap_err("ModemManager exporter server failed")
}

/// Reads the daemon version and sets the extended signal refresh rate of every
/// modem to `rate`.
async fn setup(mm: &dyn ModemManager, rate: Duration) -> Result<String> {
    let version = mm
        .version()
        .await
        .wrap_err("failed to connect to ModemManager")?;

    let mut modems = pin!(modem_manager::modems(mm));
    while let Some(modem) = modems.try_next().await? {
        info!("modem {}: {:?}", modem.id, modem.model);

        mm.signal_setup(&modem.id, rate)
            .await
            .wrap_err_with(|| format!("failed to set signal refresh rate for modem {}", modem.id))?;
    }

    Ok(version)
}
