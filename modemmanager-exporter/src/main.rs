mod args;

use args::Args;
use clap::Parser as _;
use color_eyre::eyre::{Result, WrapErr as _};
use orb_modemmanager_exporter::{modem_manager::cli::ModemManagerCli, telemetry};
use tokio::{
    net::TcpListener,
    signal::unix::{self, SignalKind},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    telemetry::init()?;

    let args = Args::parse();
    info!("starting orb-modemmanager-exporter: {args:?}");

    let listener = TcpListener::bind(args.addr)
        .await
        .wrap_err_with(|| format!("cannot bind to {}", args.addr))?;

    let shutdown = CancellationToken::new();
    let mut sigterm = unix::signal(SignalKind::terminate())?;
    let mut sigint = unix::signal(SignalKind::interrupt())?;

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            tokio::select! {
                _ = sigterm.recv() => warn!("received SIGTERM"),
                _ = sigint.recv()  => warn!("received SIGINT"),
            }

            info!("shutting down gracefully");
            shutdown.cancel();
        }
    });

    orb_modemmanager_exporter::program()
        .listener(listener)
        .modem_manager(ModemManagerCli)
        .signal_rate(args.rate())
        .scrape_timeout(args.scrape_timeout())
        .shutdown(shutdown)
        .run()
        .await
}
