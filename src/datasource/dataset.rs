//! Read-only snapshot of all recorded series.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::column::{
    GRAPH_COLUMNS, RBS_ASSIGNED_COLUMN, SCHEDULING_POLICY_COLUMN, format_column_name,
};
use crate::datasource::{
    DocumentStore, LOG_COLLECTION, LOG_DOCUMENT_ID, LogRecord, METRICS_COLLECTION, MetricRecord,
};
use crate::error::{Error, Result};
use crate::lookup::KeyedSeries;
use crate::series::{Sample, TimeSeries};
use crate::timestamp::readable_to_millis;

/// Everything the dashboard replays, loaded once at startup.
///
/// Series are reference counted so panels share them without copying.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    graphs: Vec<TimeSeries>,
    rbs_assigned: Arc<KeyedSeries<f64>>,
    scheduling_policy: Arc<KeyedSeries<i64>>,
    log_classes: Arc<KeyedSeries<String>>,
}

impl Dataset {
    /// Load every series from `store`.
    ///
    /// Never fails: missing documents give empty series, malformed records are
    /// skipped, and a store error is logged and treated as missing data.
    pub fn load(store: &dyn DocumentStore) -> Self {
        let graphs = GRAPH_COLUMNS
            .iter()
            .map(|raw| {
                let name = format_column_name(raw);
                let samples = load_records::<MetricRecord>(store, METRICS_COLLECTION, raw, "data")
                    .into_iter()
                    .filter_map(|record| metric_sample(raw, &record))
                    .collect();
                TimeSeries::new(name, samples)
            })
            .collect();

        let rbs_assigned = load_keyed(store, RBS_ASSIGNED_COLUMN, Value::as_f64);
        let scheduling_policy = load_keyed(store, SCHEDULING_POLICY_COLUMN, policy_code);
        let log_classes = load_log_classes(store);

        let dataset = Self::from_parts(graphs, rbs_assigned, scheduling_policy, log_classes);
        info!(
            graphs = dataset.graphs.len(),
            graph_samples = dataset.graphs.iter().map(TimeSeries::len).sum::<usize>(),
            rbs_assigned = dataset.rbs_assigned.len(),
            scheduling_policy = dataset.scheduling_policy.len(),
            log_classes = dataset.log_classes.len(),
            "dataset loaded"
        );
        dataset
    }

    /// Dataset with one empty series per KPI column.
    pub fn empty() -> Self {
        Self {
            graphs: GRAPH_COLUMNS
                .iter()
                .map(|raw| TimeSeries::empty(format_column_name(raw)))
                .collect(),
            ..Self::default()
        }
    }

    /// Build a dataset from already loaded parts.
    pub fn from_parts(
        graphs: Vec<TimeSeries>,
        rbs_assigned: KeyedSeries<f64>,
        scheduling_policy: KeyedSeries<i64>,
        log_classes: KeyedSeries<String>,
    ) -> Self {
        Self {
            graphs,
            rbs_assigned: Arc::new(rbs_assigned),
            scheduling_policy: Arc::new(scheduling_policy),
            log_classes: Arc::new(log_classes),
        }
    }

    /// KPI series in display order.
    pub fn graphs(&self) -> &[TimeSeries] {
        &self.graphs
    }

    /// KPI series by display name.
    pub fn graph(&self, name: &str) -> Option<&TimeSeries> {
        self.graphs.iter().find(|series| series.name() == name)
    }

    /// Display names of the KPI series.
    pub fn graph_columns(&self) -> Vec<&str> {
        self.graphs.iter().map(TimeSeries::name).collect()
    }

    /// Resource blocks assigned per timestamp.
    pub fn rbs_assigned(&self) -> &Arc<KeyedSeries<f64>> {
        &self.rbs_assigned
    }

    /// Scheduling policy code per timestamp.
    pub fn scheduling_policy(&self) -> &Arc<KeyedSeries<i64>> {
        &self.scheduling_policy
    }

    /// Classifier output per timestamp.
    pub fn log_classes(&self) -> &Arc<KeyedSeries<String>> {
        &self.log_classes
    }
}

fn find_or_warn(store: &dyn DocumentStore, collection: &str, id: &str) -> Option<Value> {
    match store.find(collection, id) {
        Ok(Some(document)) => Some(document),
        Ok(None) => {
            warn!(collection, id, "document not found");
            None
        }
        Err(err) => {
            warn!(collection, id, error = %err, "document store unavailable");
            None
        }
    }
}

/// Deserialize the records of `field`, sorted by epoch, skipping bad ones.
fn load_records<T>(store: &dyn DocumentStore, collection: &str, id: &str, field: &str) -> Vec<T>
where
    T: DeserializeOwned + HasEpoch,
{
    let Some(document) = find_or_warn(store, collection, id) else {
        return Vec::new();
    };
    records_from(&document, id, field)
}

fn records_from<T>(document: &Value, id: &str, field: &str) -> Vec<T>
where
    T: DeserializeOwned + HasEpoch,
{
    let Some(raw) = document.get(field).and_then(Value::as_array) else {
        warn!(id, field, "document has no record list");
        return Vec::new();
    };
    let mut skipped = 0_usize;
    let mut records: Vec<T> = raw
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(record) => Some(record),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        warn!(id, skipped, "skipped malformed records");
    }
    records.sort_by_key(HasEpoch::epoch);
    records
}

trait HasEpoch {
    fn epoch(&self) -> i64;
}

impl HasEpoch for MetricRecord {
    fn epoch(&self) -> i64 {
        self.unix_epoch
    }
}

impl HasEpoch for LogRecord {
    fn epoch(&self) -> i64 {
        self.unix_epoch
    }
}

fn metric_sample(column: &str, record: &MetricRecord) -> Option<Sample> {
    match record_value(column, record, Value::as_f64) {
        Ok((timestamp, value)) => Some(Sample::new(timestamp, value)),
        Err(err) => {
            warn!(column, error = %err, "skipping record");
            None
        }
    }
}

fn record_value<V>(
    column: &str,
    record: &MetricRecord,
    convert: impl Fn(&Value) -> Option<V>,
) -> Result<(i64, V)> {
    let timestamp = readable_to_millis(&record.readable_timestamp)?;
    let value = convert(&record.value).ok_or_else(|| Error::InvalidValue {
        metric: column.to_string(),
        reason: format!("unexpected value {}", record.value),
    })?;
    Ok((timestamp, value))
}

fn load_keyed<V>(
    store: &dyn DocumentStore,
    column: &str,
    convert: impl Fn(&Value) -> Option<V>,
) -> KeyedSeries<V> {
    load_records::<MetricRecord>(store, METRICS_COLLECTION, column, "data")
        .iter()
        .filter_map(|record| match record_value(column, record, &convert) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(column, error = %err, "skipping record");
                None
            }
        })
        .collect()
}

fn policy_code(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|code| code.fract() == 0.0)
            .map(|code| code as i64)
    })
}

fn load_log_classes(store: &dyn DocumentStore) -> KeyedSeries<String> {
    let document = match store.find(LOG_COLLECTION, LOG_DOCUMENT_ID) {
        Ok(Some(document)) => Some(document),
        Ok(None) => match store.first(LOG_COLLECTION) {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "document store unavailable");
                None
            }
        },
        Err(err) => {
            warn!(error = %err, "document store unavailable");
            None
        }
    };
    let Some(document) = document else {
        warn!(collection = LOG_COLLECTION, "no log document");
        return KeyedSeries::new();
    };
    records_from::<LogRecord>(&document, LOG_DOCUMENT_ID, "entries")
        .into_iter()
        .filter_map(|record| match readable_to_millis(&record.readable_timestamp) {
            Ok(timestamp) => Some((timestamp, record.class)),
            Err(err) => {
                warn!(error = %err, "skipping log entry");
                None
            }
        })
        .collect()
}
