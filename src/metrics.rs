//! Sinks for scalar metrics reported while a solver runs
//!
//! A sink receives `(step, name, value)` triples at a cadence chosen by the caller. Experiment
//! trackers and plotting live outside of this crate and are connected by implementing
//! [MetricsSink].

use log::info;

/// Receiver of scalar metrics
pub trait MetricsSink {
    fn record(&mut self, step: usize, name: &str, value: f64);
}

/// Discards every metric
impl MetricsSink for () {
    fn record(&mut self, _step: usize, _name: &str, _value: f64) {}
}

/// A single recorded metric
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub step: usize,
    pub name: String,
    pub value: f64,
}

/// Collects metrics in memory
impl MetricsSink for Vec<Metric> {
    fn record(&mut self, step: usize, name: &str, value: f64) {
        self.push(Metric {
            step,
            name: name.to_owned(),
            value,
        });
    }
}

impl<T: MetricsSink + ?Sized> MetricsSink for &mut T {
    fn record(&mut self, step: usize, name: &str, value: f64) {
        (**self).record(step, name, value)
    }
}

/// Forwards metrics to the `log` facade at info level
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    prefix: Option<String>,
}

impl LogSink {
    pub fn new() -> Self {
        LogSink::default()
    }

    /// Prepend `prefix` to every metric name, e.g. to tell several runs apart
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        LogSink {
            prefix: Some(prefix.into()),
        }
    }
}

impl MetricsSink for LogSink {
    fn record(&mut self, step: usize, name: &str, value: f64) {
        match self.prefix {
            Some(ref prefix) => info!("step {}: {}/{} = {:e}", step, prefix, name, value),
            None => info!("step {}: {} = {:e}", step, name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report<S: MetricsSink>(mut sink: S) {
        sink.record(0, "objective", -1.5);
        sink.record(5, "step_size", 0.5);
    }

    #[test]
    fn collect() {
        let mut metrics: Vec<Metric> = Vec::new();
        report(&mut metrics);

        assert_eq!(
            metrics,
            vec![
                Metric {
                    step: 0,
                    name: "objective".into(),
                    value: -1.5
                },
                Metric {
                    step: 5,
                    name: "step_size".into(),
                    value: 0.5
                },
            ]
        );
    }

    #[test]
    fn discard_and_log() {
        report(());
        report(LogSink::new());
        report(LogSink::with_prefix("run-1"));
    }
}
