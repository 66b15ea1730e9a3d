use super::{
    Modem, ModemId, ModemManager, Port, PortType, Signal,
    connection_state::ConnectionState, power_state::PowerState,
};
use crate::utils::run_cmd;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use color_eyre::{
    Result,
    eyre::{ContextCompat, WrapErr as _},
};
use regex::Regex;
use std::{sync::LazyLock, time::Duration};

/// [`ModemManager`] backed by the `mmcli` command line client.
pub struct ModemManagerCli;

#[async_trait]
impl ModemManager for ModemManagerCli {
    async fn version(&self) -> Result<String> {
        let output = run_cmd("mmcli", &["--version"]).await?;
        parse_version(&output)
    }

    async fn list_modems(&self) -> Result<Vec<ModemId>> {
        let output = run_cmd("mmcli", &["-L"]).await?;
        Ok(parse_modem_list(&output))
    }

    async fn modem_info(&self, modem_id: &ModemId) -> Result<Modem> {
        let output = run_cmd("mmcli", &["-m", modem_id.as_str(), "-J"]).await?;
        parse_modem_info(modem_id, &output)
    }

    async fn network_time(
        &self,
        modem_id: &ModemId,
    ) -> Result<DateTime<FixedOffset>> {
        let output =
            run_cmd("mmcli", &["-m", modem_id.as_str(), "--time", "-J"]).await?;

        parse_network_time(&output)
    }

    async fn signal_get(&self, modem_id: &ModemId) -> Result<Signal> {
        let output =
            run_cmd("mmcli", &["-m", modem_id.as_str(), "--signal-get", "-J"]).await?;

        parse_signal(&output)
    }

    async fn signal_setup(&self, modem_id: &ModemId, rate: Duration) -> Result<()> {
        let rate = format!("--signal-setup={}", rate.as_secs());
        run_cmd("mmcli", &["-m", modem_id.as_str(), rate.as_str()]).await?;

        Ok(())
    }
}

macro_rules! jerr {
    ($s:expr) => {
        format!("could not get {}", $s)
    };
}

fn parse_version(str: &str) -> Result<String> {
    str.lines()
        .find_map(|line| line.trim().strip_prefix("mmcli "))
        .map(|version| version.trim().to_string())
        .wrap_err_with(|| format!("unexpected mmcli --version output: {str}"))
}

fn parse_modem_list(str: &str) -> Vec<ModemId> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^/org/freedesktop/ModemManager\d+/Modem/(?P<id>\d+)\b").unwrap()
    });

    str.lines()
        .map(|line| line.trim())
        .filter_map(|line| {
            let captures = RE.captures(line)?;
            let id: usize = captures.name("id")?.as_str().parse().ok()?;

            Some(ModemId::from(id))
        })
        .collect()
}

fn parse_modem_info(modem_id: &ModemId, str: &str) -> Result<Modem> {
    let json: serde_json::Value = serde_json::from_str(str)
        .wrap_err_with(|| format!("invalid mmcli json for modem {modem_id}"))?;
    let generic = &json["modem"]["generic"];

    let device_identifier = generic["device-identifier"]
        .as_str()
        .wrap_err(jerr!("modem.generic.device-identifier"))?
        .to_string();

    let state = generic["state"]
        .as_str()
        .map(ConnectionState::from)
        .wrap_err(jerr!("modem.generic.state"))?;

    let power_state = generic["power-state"]
        .as_str()
        .map(PowerState::from)
        .unwrap_or(PowerState::Unknown);

    let text = |field: &str| generic[field].as_str().unwrap_or_default().to_string();

    let ports = generic["ports"]
        .as_array()
        .map(|ports| {
            ports
                .iter()
                .filter_map(|p| p.as_str())
                .filter_map(parse_port)
                .collect()
        })
        .unwrap_or_default();

    Ok(Modem {
        id: modem_id.clone(),
        device_identifier,
        revision: text("revision"),
        equipment_identifier: text("equipment-identifier"),
        model: text("model"),
        power_state,
        state,
        ports,
    })
}

/// Parses entries like `wwan0 (net)`.
fn parse_port(str: &str) -> Option<Port> {
    let (name, kind) = str.trim().split_once(' ')?;
    let kind = kind.trim().strip_prefix('(')?.strip_suffix(')')?;

    Some(Port {
        name: name.to_string(),
        kind: PortType::from(kind),
    })
}

fn parse_network_time(str: &str) -> Result<DateTime<FixedOffset>> {
    let json: serde_json::Value = serde_json::from_str(str)?;
    let current = json["modem"]["time"]["current"]
        .as_str()
        .wrap_err(jerr!("modem.time.current"))?;

    DateTime::parse_from_rfc3339(current)
        .wrap_err_with(|| format!("invalid network time {current:?}"))
}

fn parse_signal(str: &str) -> Result<Signal> {
    let json: serde_json::Value = serde_json::from_str(str)?;
    let lte = &json["modem"]["signal"]["lte"];

    let get = |field: &str| -> f64 {
        lte[field]
            .as_str()
            .and_then(|x| x.trim().parse().ok())
            .unwrap_or(f64::NAN)
    };

    Ok(Signal {
        rsrq: get("rsrq"),
        rsrp: get("rsrp"),
        rssi: get("rssi"),
        snr: get("snr"),
    })
}
