use super::schema::{self, Metric};
use prometheus::Registry;
use std::collections::BTreeMap;

/// Callback receiving a sample's value and its label values, ordered as in
/// [`Metric::labels`].
pub type EmitFn<'a> = Box<dyn FnMut(f64, &[&str]) + Send + 'a>;

/// One value of one metric for one label set.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: Metric,
    pub labels: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn new(metric: Metric, value: f64, labels: &[&str]) -> Self {
        Self {
            metric,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            value,
        }
    }
}

/// The emit callbacks a sink hands to a scrape, keyed by metric.
pub struct Emitters<'a> {
    emitters: BTreeMap<Metric, EmitFn<'a>>,
}

impl<'a> Emitters<'a> {
    /// Builds the dispatch table from metric names.
    ///
    /// # Panics
    /// If a name is not a declared [`Metric`]. That means the sink and the
    /// schema have drifted apart, which is a bug and not a scrape failure.
    pub fn new<I, S>(emitters: I) -> Self
    where
        I: IntoIterator<Item = (S, EmitFn<'a>)>,
        S: AsRef<str>,
    {
        let emitters = emitters
            .into_iter()
            .map(|(name, emit)| {
                let name = name.as_ref();
                let metric = Metric::from_name(name).unwrap_or_else(|| {
                    panic!("modemmanager exporter: unhandled metric {name:?}")
                });

                (metric, emit)
            })
            .collect();

        Self { emitters }
    }

    /// Metrics this sink accepts, in declaration order.
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.emitters.keys().copied()
    }

    /// # Panics
    /// If the sink did not supply a callback for `sample.metric`.
    pub fn emit(&mut self, sample: &Sample) {
        let emit = self.emitters.get_mut(&sample.metric).unwrap_or_else(|| {
            panic!(
                "modemmanager exporter: no emitter for metric {:?}",
                sample.metric.name()
            )
        });

        let labels: Vec<&str> = sample.labels.iter().map(String::as_str).collect();
        emit(sample.value, &labels);
    }
}

impl Emitters<'static> {
    /// Registers the whole schema on `registry` and emits straight into its gauges.
    pub fn prometheus(registry: &Registry) -> prometheus::Result<Self> {
        let gauges = schema::register(registry)?;

        Ok(Emitters::new(gauges.into_iter().map(|(metric, gauge)| {
            let emit: EmitFn<'static> = Box::new(move |value: f64, labels: &[&str]| {
                gauge.with_label_values(labels).set(value)
            });

            (metric.name(), emit)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::{EmitFn, Emitters, Sample};
    use crate::metrics::schema::Metric;
    use prometheus::{Encoder as _, Registry, TextEncoder};

    #[test]
    #[should_panic(expected = "unhandled metric")]
    fn unknown_metric_names_are_fatal() {
        let emit: EmitFn = Box::new(|_: f64, _: &[&str]| {});
        let _ = Emitters::new([("modemmanager_bogus", emit)]);
    }

    #[test]
    #[should_panic(expected = "no emitter")]
    fn emitting_an_unsupplied_metric_is_fatal() {
        let emit: EmitFn = Box::new(|_: f64, _: &[&str]| {});
        let mut emitters = Emitters::new([(Metric::ModemInfo.name(), emit)]);

        emitters.emit(&Sample::new(Metric::Info, 1.0, &["1.20.0"]));
    }

    #[test]
    fn it_emits_into_prometheus_gauges() {
        let registry = Registry::new();
        let mut emitters = Emitters::prometheus(&registry).unwrap();

        assert_eq!(emitters.metrics().collect::<Vec<_>>(), Metric::ALL.to_vec());

        emitters.emit(&Sample::new(Metric::Info, 1.0, &["1.20.0"]));
        emitters.emit(&Sample::new(Metric::ModemSignalLteRsrp, -116.0, &["foo"]));

        let mut buf = vec![];
        TextEncoder::new().encode(&registry.gather(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains(r#"modemmanager_info{version="1.20.0"} 1"#));
        assert!(text.contains(r#"modemmanager_modem_signal_lte_rsrp_dbm{device_id="foo"} -116"#));
    }
}
