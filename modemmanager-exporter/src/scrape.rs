use crate::{
    metrics::{Emitters, Metric, Sample, encode},
    modem_manager::{self, Modem, ModemId, ModemManager, Signal},
};
use chrono::{DateTime, FixedOffset};
use color_eyre::Report;
use futures::TryStreamExt as _;
use std::{pin::pin, sync::Arc, time::Duration};
use tokio::time;
use tracing::debug;

pub const DEFAULT_SCRAPE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to iterate modems: {0}")]
    Modems(Report),
    #[error("failed to get network time for modem {modem}: {err}")]
    NetworkTime { modem: ModemId, err: Report },
    #[error("failed to get signal quality for modem {modem}: {err}")]
    Signal { modem: ModemId, err: Report },
    #[error("scrape did not finish within {0:?}")]
    Timeout(Duration),
}

/// Turns the current state of every modem into samples, once per scrape request.
///
/// Holds no state between scrapes.
#[derive(Clone)]
pub struct Scraper {
    mm: Arc<dyn ModemManager>,
    version: String,
    timeout: Duration,
}

#[bon::bon]
impl Scraper {
    #[builder]
    pub fn new(
        mm: Arc<dyn ModemManager>,
        version: String,
        #[builder(default = DEFAULT_SCRAPE_TIMEOUT)] timeout: Duration,
    ) -> Self {
        Self {
            mm,
            version,
            timeout,
        }
    }

    /// Emits samples for every modem followed by `modemmanager_info`.
    ///
    /// Fails fast: the first modem whose network time or signal can't be
    /// fetched aborts the whole scrape. Nothing reaches `emitters` unless the
    /// scrape succeeds.
    pub async fn scrape(&self, emitters: &mut Emitters<'_>) -> Result<(), ScrapeError> {
        let metrics: Vec<Metric> = emitters.metrics().collect();

        let mut samples = time::timeout(self.timeout, self.collect(&metrics))
            .await
            .map_err(|_| ScrapeError::Timeout(self.timeout))??;

        // Outside the modem loop so it's present even without modems.
        samples.push(Sample::new(Metric::Info, 1.0, &[self.version.as_str()]));

        for sample in &samples {
            emitters.emit(sample);
        }

        Ok(())
    }

    async fn collect(&self, metrics: &[Metric]) -> Result<Vec<Sample>, ScrapeError> {
        let mut samples = vec![];
        let mut modems = pin!(modem_manager::modems(self.mm.as_ref()));
        let mut count = 0;

        while let Some(modem) = modems.try_next().await.map_err(ScrapeError::Modems)? {
            // Both fetches have to succeed before any sample of this modem is staged.
            let now = self.mm.network_time(&modem.id).await.map_err(|err| {
                ScrapeError::NetworkTime {
                    modem: modem.id.clone(),
                    err,
                }
            })?;

            let signal =
                self.mm
                    .signal_get(&modem.id)
                    .await
                    .map_err(|err| ScrapeError::Signal {
                        modem: modem.id.clone(),
                        err,
                    })?;

            modem_samples(metrics, &modem, now, &signal, &mut samples);
            count += 1;
        }

        debug!("scraped {count} modems into {} samples", samples.len());

        Ok(samples)
    }
}

/// Appends the samples of a single modem for each of `metrics`.
fn modem_samples(
    metrics: &[Metric],
    modem: &Modem,
    now: DateTime<FixedOffset>,
    signal: &Signal,
    out: &mut Vec<Sample>,
) {
    let id = modem.device_identifier.as_str();

    for &metric in metrics {
        let mut emit = |value: f64, labels: &[&str]| {
            out.push(Sample::new(metric, value, labels));
        };

        match metric {
            Metric::Info => {
                // once per scrape, see Scraper::scrape
            }
            Metric::ModemInfo => emit(
                1.0,
                &[
                    id,
                    modem.revision.as_str(),
                    modem.equipment_identifier.as_str(),
                    modem.model.as_str(),
                ],
            ),
            Metric::ModemNetworkPortInfo => encode::network_ports(id, &modem.ports, emit),
            Metric::ModemNetworkTimestamp => emit(now.timestamp() as f64, &[id]),
            Metric::ModemPowerState => encode::one_hot(id, modem.power_state, emit),
            Metric::ModemState => encode::one_hot(id, modem.state, emit),
            Metric::ModemSignalLteRsrq => emit(signal.rsrq, &[id]),
            Metric::ModemSignalLteRsrp => emit(signal.rsrp, &[id]),
            Metric::ModemSignalLteRssi => emit(signal.rssi, &[id]),
            Metric::ModemSignalLteSnr => emit(signal.snr, &[id]),
        }
    }
}
