use clap::{
    Parser,
    builder::{Styles, styling::AnsiColor},
};
use orb_modemmanager_exporter::{DEFAULT_ADDR, scrape::DEFAULT_SCRAPE_TIMEOUT};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Parser)]
#[clap(version, about, styles = clap_v3_styles())]
pub struct Args {
    /// Address the exporter listens on.
    #[clap(long, env = "ORB_MM_EXPORTER_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
    /// How often ModemManager should poll each modem for its extended signal
    /// strength data, in seconds.
    #[clap(long, env = "ORB_MM_EXPORTER_SIGNAL_RATE", default_value_t = 5)]
    pub rate: u64,
    /// Upper bound for a single scrape, in seconds.
    #[clap(
        long,
        env = "ORB_MM_EXPORTER_SCRAPE_TIMEOUT",
        default_value_t = DEFAULT_SCRAPE_TIMEOUT.as_secs()
    )]
    pub scrape_timeout: u64,
}

impl Args {
    pub fn rate(&self) -> Duration {
        Duration::from_secs(self.rate)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout)
    }
}

fn clap_v3_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser as _;
    use std::time::Duration;

    #[test]
    fn it_uses_defaults() {
        let args = Args::try_parse_from(["orb-modemmanager-exporter"]).unwrap();

        assert_eq!(args.addr.port(), 9539);
        assert_eq!(args.rate(), Duration::from_secs(5));
        assert_eq!(args.scrape_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn it_parses_flags() {
        let args = Args::try_parse_from([
            "orb-modemmanager-exporter",
            "--addr",
            "127.0.0.1:9000",
            "--rate",
            "10",
        ])
        .unwrap();

        assert_eq!(args.addr.to_string(), "127.0.0.1:9000");
        assert_eq!(args.rate(), Duration::from_secs(10));
    }
}
