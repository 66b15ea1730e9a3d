#![allow(dead_code)]
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use color_eyre::Result;
use mockall::mock;
use orb_modemmanager_exporter::{
    metrics::{EmitFn, Emitters, Metric},
    modem_manager::{
        Modem, ModemId, ModemManager, Port, PortType, Signal,
        connection_state::ConnectionState, power_state::PowerState,
    },
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time;

mock! {
    pub MM {}
    #[async_trait]
    impl ModemManager for MM {
        async fn version(&self) -> Result<String>;

        async fn list_modems(&self) -> Result<Vec<ModemId>>;

        async fn modem_info(&self, modem_id: &ModemId) -> Result<Modem>;

        async fn network_time(&self, modem_id: &ModemId) -> Result<DateTime<FixedOffset>>;

        async fn signal_get(&self, modem_id: &ModemId) -> Result<Signal>;

        async fn signal_setup(&self, modem_id: &ModemId, rate: Duration) -> Result<()>;
    }
}

/// A modem whose network time never arrives.
pub struct StuckMM;

#[async_trait]
impl ModemManager for StuckMM {
    async fn version(&self) -> Result<String> {
        Ok("1.20.0".to_string())
    }

    async fn list_modems(&self) -> Result<Vec<ModemId>> {
        Ok(vec![ModemId::from(0)])
    }

    async fn modem_info(&self, _modem_id: &ModemId) -> Result<Modem> {
        Ok(modem("foo"))
    }

    async fn network_time(&self, _modem_id: &ModemId) -> Result<DateTime<FixedOffset>> {
        time::sleep(Duration::from_secs(3600)).await;
        Ok(epoch(1))
    }

    async fn signal_get(&self, _modem_id: &ModemId) -> Result<Signal> {
        Ok(signal())
    }

    async fn signal_setup(&self, _modem_id: &ModemId, _rate: Duration) -> Result<()> {
        Ok(())
    }
}

pub fn modem(device_identifier: &str) -> Modem {
    Modem {
        id: ModemId::from(0),
        device_identifier: device_identifier.to_string(),
        revision: "2020-07-17".to_string(),
        equipment_identifier: "deadbeef".to_string(),
        model: "Test Modem".to_string(),
        power_state: PowerState::On,
        state: ConnectionState::Connected,
        ports: vec![
            Port {
                name: "ttyUSB0".to_string(),
                kind: PortType::At,
            },
            Port {
                name: "wwan0".to_string(),
                kind: PortType::Net,
            },
        ],
    }
}

pub fn signal() -> Signal {
    Signal {
        rsrq: -17.0,
        rsrp: -116.0,
        rssi: -81.0,
        snr: 1.0,
    }
}

pub fn epoch(secs: i64) -> DateTime<FixedOffset> {
    DateTime::from_timestamp(secs, 0).unwrap().fixed_offset()
}

/// Mock with `modems` listed in order, each answering with canned data.
pub fn healthy_mm(modems: &[&'static str]) -> MockMM {
    let mut mm = MockMM::new();
    let ids: Vec<ModemId> = (0..modems.len()).map(ModemId::from).collect();
    let by_id: BTreeMap<ModemId, &'static str> =
        ids.iter().cloned().zip(modems.iter().copied()).collect();

    mm.expect_version().returning(|| Ok("1.20.0".to_string()));
    mm.expect_list_modems().returning(move || Ok(ids.clone()));
    mm.expect_modem_info().returning(move |id| {
        let mut m = modem(by_id[id]);
        m.id = id.clone();
        Ok(m)
    });
    mm.expect_network_time().returning(|_| Ok(epoch(1)));
    mm.expect_signal_get().returning(|_| Ok(signal()));

    mm
}

pub type Series = BTreeMap<&'static str, BTreeMap<String, f64>>;

/// In-memory sink. Samples are keyed by `label=value` pairs joined with commas.
#[derive(Clone, Default)]
pub struct Memory {
    series: Arc<Mutex<Series>>,
}

impl Memory {
    pub fn emitters(&self) -> Emitters<'static> {
        Emitters::new(Metric::ALL.map(|metric| {
            let series = Arc::clone(&self.series);
            series.lock().unwrap().entry(metric.name()).or_default();

            let emit: EmitFn<'static> = Box::new(move |value: f64, labels: &[&str]| {
                let key = metric
                    .labels()
                    .iter()
                    .zip(labels)
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(",");

                let mut series = series.lock().unwrap();
                let samples = series.entry(metric.name()).or_default();
                assert!(
                    samples.insert(key.clone(), value).is_none(),
                    "duplicate sample {key} for {}",
                    metric.name()
                );
            });

            (metric.name(), emit)
        }))
    }

    pub fn series(&self) -> Series {
        self.series.lock().unwrap().clone()
    }

    pub fn sample_count(&self) -> usize {
        self.series().values().map(|s| s.len()).sum()
    }
}
