use prometheus::{GaugeVec, Opts, Registry};
use std::collections::HashMap;

/// Every metric the exporter promises to emit.
///
/// Both registration and per-scrape dispatch are driven from this enum, so a
/// metric can't be declared without also being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Info,
    ModemInfo,
    ModemNetworkPortInfo,
    ModemNetworkTimestamp,
    ModemPowerState,
    ModemState,
    ModemSignalLteRsrq,
    ModemSignalLteRsrp,
    ModemSignalLteRssi,
    ModemSignalLteSnr,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Info,
        Metric::ModemInfo,
        Metric::ModemNetworkPortInfo,
        Metric::ModemNetworkTimestamp,
        Metric::ModemPowerState,
        Metric::ModemState,
        Metric::ModemSignalLteRsrq,
        Metric::ModemSignalLteRsrp,
        Metric::ModemSignalLteRssi,
        Metric::ModemSignalLteSnr,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Metric::Info => "modemmanager_info",
            Metric::ModemInfo => "modemmanager_modem_info",
            Metric::ModemNetworkPortInfo => "modemmanager_modem_network_port_info",
            Metric::ModemNetworkTimestamp => "modemmanager_network_timestamp_seconds",
            Metric::ModemPowerState => "modemmanager_modem_power_state",
            Metric::ModemState => "modemmanager_modem_state",
            Metric::ModemSignalLteRsrq => "modemmanager_modem_signal_lte_rsrq_db",
            Metric::ModemSignalLteRsrp => "modemmanager_modem_signal_lte_rsrp_dbm",
            Metric::ModemSignalLteRssi => "modemmanager_modem_signal_lte_rssi_dbm",
            Metric::ModemSignalLteSnr => "modemmanager_modem_signal_lte_snr_db",
        }
    }

    pub const fn help(self) -> &'static str {
        match self {
            Metric::Info => "Metadata about the ModemManager daemon.",
            Metric::ModemInfo => "Metadata about a managed modem.",
            Metric::ModemNetworkPortInfo => {
                "Metadata about the attached network interface ports for a modem. \
                 Note that device refers to the network interface name, and not the modem name."
            }
            Metric::ModemNetworkTimestamp => {
                "The current UNIX timestamp as reported by a modem's cellular network."
            }
            Metric::ModemPowerState => {
                "An enumeration of power states for a modem, \
                 where a value of 1 indicates the current state."
            }
            Metric::ModemState => {
                "An enumeration of cellular connection states for a modem, \
                 where a value of 1 indicates the current state."
            }
            Metric::ModemSignalLteRsrq => {
                "A modem's current LTE signal RSRQ (Reference Signal Received Quality) in dB."
            }
            Metric::ModemSignalLteRsrp => {
                "A modem's current LTE signal RSRP (Reference Signal Received Power) in dBm."
            }
            Metric::ModemSignalLteRssi => {
                "A modem's current LTE signal RSSI (Received Signal Strength Indication) in dBm."
            }
            Metric::ModemSignalLteSnr => {
                "A modem's current LTE signal SNR (Signal-to-Noise Ratio) in dB."
            }
        }
    }

    /// Label names, in the order label values are passed on emission.
    pub const fn labels(self) -> &'static [&'static str] {
        match self {
            Metric::Info => &["version"],
            Metric::ModemInfo => &["device_id", "firmware", "imei", "model"],
            Metric::ModemNetworkPortInfo => &["device_id", "device"],
            Metric::ModemPowerState | Metric::ModemState => &["device_id", "state"],
            Metric::ModemNetworkTimestamp
            | Metric::ModemSignalLteRsrq
            | Metric::ModemSignalLteRsrp
            | Metric::ModemSignalLteRssi
            | Metric::ModemSignalLteSnr => &["device_id"],
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// Declares one gauge per [`Metric`] on `registry`.
pub fn register(registry: &Registry) -> prometheus::Result<HashMap<Metric, GaugeVec>> {
    Metric::ALL
        .into_iter()
        .map(|metric| {
            let gauge =
                GaugeVec::new(Opts::new(metric.name(), metric.help()), metric.labels())?;
            registry.register(Box::new(gauge.clone()))?;

            Ok((metric, gauge))
        })
        .collect()
}
