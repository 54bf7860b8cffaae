//! Event construction
//!
//! Adapters describe which document paths feed which event fields; the builder
//! runs every extracted value through the coercion layer and stamps the event.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;

use super::{ErrorEvent, FieldValue, MetricEvent, MetricFamily};
use crate::collector::coerce;
use crate::error::CollectorError;

/// How a raw JSON field is converted into an event value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Plain string, sentinel on empty/absent/mistyped
    String,
    /// String or structured value rendered as text
    Text,
    Int,
    Float,
    /// Byte count reported in megabytes
    Megabytes,
    Bool,
}

impl Coercion {
    /// Convert a raw field into a typed value
    pub fn apply(self, value: Option<&Value>) -> FieldValue {
        match self {
            Coercion::String => FieldValue::Text(coerce::coerce_string(value)),
            Coercion::Text => FieldValue::Text(coerce::coerce_text(value)),
            Coercion::Int => FieldValue::Int(coerce::coerce_int(value)),
            Coercion::Float => FieldValue::Float(coerce::coerce_float(value)),
            Coercion::Megabytes => FieldValue::Int(coerce::scale_bytes_to_megabytes(value)),
            Coercion::Bool => FieldValue::Bool(coerce::coerce_bool(value)),
        }
    }
}

/// Maps one JSON pointer in a response document to one event field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Event field name
    pub name: &'static str,
    /// RFC 6901 pointer into the response document
    pub pointer: &'static str,
    pub coercion: Coercion,
}

impl FieldSpec {
    pub const fn new(name: &'static str, pointer: &'static str, coercion: Coercion) -> Self {
        Self {
            name,
            pointer,
            coercion,
        }
    }
}

/// Incrementally assembles a [`MetricEvent`]
#[derive(Debug, Clone)]
pub struct EventBuilder {
    family: MetricFamily,
    target: String,
    fields: BTreeMap<String, FieldValue>,
}

impl EventBuilder {
    pub fn new(family: MetricFamily, target: impl Into<String>) -> Self {
        Self {
            family,
            target: target.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Coerce a single raw value into a field
    pub fn field(mut self, name: &str, value: Option<&Value>, coercion: Coercion) -> Self {
        self.fields.insert(name.to_string(), coercion.apply(value));
        self
    }

    /// Extract every spec'd field from a response document
    pub fn extract(mut self, document: &Value, specs: &[FieldSpec]) -> Self {
        for spec in specs {
            self.fields.insert(
                spec.name.to_string(),
                spec.coercion.apply(document.pointer(spec.pointer)),
            );
        }
        self
    }

    /// Known string taken from configuration rather than the response
    pub fn label(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Text(value.into()));
        self
    }

    /// Boolean outcome computed by the adapter (e.g. a probe result)
    pub fn flag(mut self, name: &str, value: bool) -> Self {
        self.fields.insert(name.to_string(), FieldValue::Bool(value));
        self
    }

    pub fn build(self) -> MetricEvent {
        MetricEvent {
            timestamp: Utc::now(),
            target: self.target,
            family: self.family,
            fields: self.fields,
        }
    }
}

/// Build a metric event from a single response document
pub fn build(
    family: MetricFamily,
    target: impl Into<String>,
    document: &Value,
    specs: &[FieldSpec],
) -> MetricEvent {
    EventBuilder::new(family, target)
        .extract(document, specs)
        .build()
}

impl ErrorEvent {
    pub fn new(
        family: MetricFamily,
        target: impl Into<String>,
        error: impl Into<String>,
        body: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            target: target.into(),
            family,
            error: error.into(),
            body,
        }
    }

    /// Error event for a failed REST call, keeping the response body if any
    pub fn from_failure(
        family: MetricFamily,
        target: impl Into<String>,
        error: &CollectorError,
    ) -> Self {
        Self::new(
            family,
            target,
            error.to_string(),
            error.body().map(str::to_string),
        )
    }
}
