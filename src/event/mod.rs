//! Normalized events
//!
//! Every (target, metric family) visited by a polling cycle produces exactly one
//! [`Event`]: either a [`MetricEvent`] with typed fields or an [`ErrorEvent`]
//! describing why the metrics could not be collected.
//!
//! Serialized field names follow the beat event schema consumed downstream:
//!
//! ```text
//! {"@timestamp":"...","wb_server":"managed1","wb_metric_type":"server_status","srv_state":"RUNNING",...}
//! {"@timestamp":"...","err_server":"managed1","err_metric_type":"server_status","err_metric_error":"..."}
//! ```

pub mod builder;
pub mod sink;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use builder::{build, Coercion, EventBuilder, FieldSpec};
pub use sink::{EventSink, JsonLinesSink};

/// Category of collected status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    ServerStatus,
    DatasourceStatus,
    ApplicationStatus,
    ThreadStatus,
}

impl MetricFamily {
    /// Tag used in serialized events
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricFamily::ServerStatus => "server_status",
            MetricFamily::DatasourceStatus => "datasource_status",
            MetricFamily::ApplicationStatus => "application_status",
            MetricFamily::ThreadStatus => "thread_status",
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed metric value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Successfully collected metrics for one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEvent {
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Owning target (server name, or datasource/application for domain-wide calls)
    #[serde(rename = "wb_server")]
    pub target: String,

    #[serde(rename = "wb_metric_type")]
    pub family: MetricFamily,

    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl MetricEvent {
    /// Look up a field by metric name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Collection failure for one target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEvent {
    #[serde(rename = "@timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "err_server")]
    pub target: String,

    #[serde(rename = "err_metric_type")]
    pub family: MetricFamily,

    #[serde(rename = "err_metric_error")]
    pub error: String,

    /// Raw response body, when the server answered
    #[serde(rename = "err_metric_body", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// One record handed to the sink
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Event {
    Metric(MetricEvent),
    Error(ErrorEvent),
}

impl Event {
    pub fn target(&self) -> &str {
        match self {
            Event::Metric(m) => &m.target,
            Event::Error(e) => &e.target,
        }
    }

    pub fn family(&self) -> MetricFamily {
        match self {
            Event::Metric(m) => m.family,
            Event::Error(e) => e.family,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    pub fn as_metric(&self) -> Option<&MetricEvent> {
        match self {
            Event::Metric(m) => Some(m),
            Event::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorEvent> {
        match self {
            Event::Error(e) => Some(e),
            Event::Metric(_) => None,
        }
    }
}

impl From<MetricEvent> for Event {
    fn from(event: MetricEvent) -> Self {
        Event::Metric(event)
    }
}

impl From<ErrorEvent> for Event {
    fn from(event: ErrorEvent) -> Self {
        Event::Error(event)
    }
}
