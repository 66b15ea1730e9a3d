use async_stream::try_stream;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use color_eyre::{Result, eyre::WrapErr as _};
use connection_state::ConnectionState;
use derive_more::{Display, From};
use futures::Stream;
use power_state::PowerState;
use std::time::Duration;

pub mod cli;
pub mod connection_state;
pub mod power_state;

#[async_trait]
pub trait ModemManager: 'static + Send + Sync {
    /// Version of the ModemManager daemon.
    async fn version(&self) -> Result<String>;

    async fn list_modems(&self) -> Result<Vec<ModemId>>;

    async fn modem_info(&self, modem_id: &ModemId) -> Result<Modem>;

    /// Current time as reported by the modem's cellular network.
    async fn network_time(&self, modem_id: &ModemId) -> Result<DateTime<FixedOffset>>;

    async fn signal_get(&self, modem_id: &ModemId) -> Result<Signal>;

    /// Sets how often the modem refreshes its extended signal readings.
    async fn signal_setup(&self, modem_id: &ModemId, rate: Duration) -> Result<()>;
}

#[derive(Display, From, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModemId(String);

impl ModemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<usize> for ModemId {
    fn from(value: usize) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ModemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Read-only view of a single modem, fetched fresh for every scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct Modem {
    pub id: ModemId,
    /// Stable identifier for the device, used as the `device_id` label.
    pub device_identifier: String,
    /// Firmware revision.
    pub revision: String,
    /// IMEI for 3GPP modems.
    pub equipment_identifier: String,
    pub model: String,
    pub power_state: PowerState,
    pub state: ConnectionState,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub kind: PortType,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    #[display("net")]
    Net,
    #[display("at")]
    At,
    #[display("qcdm")]
    Qcdm,
    #[display("gps")]
    Gps,
    #[display("qmi")]
    Qmi,
    #[display("mbim")]
    Mbim,
    #[display("audio")]
    Audio,
    #[display("ignored")]
    Ignored,
    #[display("unknown")]
    Unknown,
}

impl From<&str> for PortType {
    fn from(value: &str) -> Self {
        match value {
            "net" => PortType::Net,
            "at" => PortType::At,
            "qcdm" => PortType::Qcdm,
            "gps" => PortType::Gps,
            "qmi" => PortType::Qmi,
            "mbim" => PortType::Mbim,
            "audio" => PortType::Audio,
            "ignored" => PortType::Ignored,
            _ => PortType::Unknown,
        }
    }
}

/// Extended LTE signal readings. Readings the modem does not report are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    /// Reference Signal Received Quality, dB.
    pub rsrq: f64,
    /// Reference Signal Received Power, dBm.
    pub rsrp: f64,
    /// Received Signal Strength Indication, dBm.
    pub rssi: f64,
    /// Signal-to-Noise Ratio, dB.
    pub snr: f64,
}

impl Default for Signal {
    fn default() -> Self {
        Self {
            rsrq: f64::NAN,
            rsrp: f64::NAN,
            rssi: f64::NAN,
            snr: f64::NAN,
        }
    }
}

/// Yields a snapshot of every modem currently known to ModemManager, in
/// listing order. The stream ends after the first error.
pub fn modems(mm: &dyn ModemManager) -> impl Stream<Item = Result<Modem>> + Send + '_ {
    try_stream! {
        let ids = mm.list_modems().await.wrap_err("failed to list modems")?;

        for id in ids {
            let modem = mm
                .modem_info(&id)
                .await
                .wrap_err_with(|| format!("failed to get info for modem {id}"))?;

            yield modem;
        }
    }
}
