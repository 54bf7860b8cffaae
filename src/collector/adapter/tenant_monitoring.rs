//! 12.1.x `tenant-monitoring` REST surface
//!
//! Resources are domain-wide and wrap their payload in `body.item`; per-server
//! detail is nested (datasource `instances`, application `targetStates`).
//! This surface has no thread pool resource.

use async_trait::async_trait;
use serde_json::Value;

use super::{into_event, into_events, Scope, ServerVersion, Traversal, VersionAdapter};
use crate::collector::coerce::coerce_string;
use crate::collector::{CollectResult, ResourcePath, RestClient};
use crate::error::CollectorError;
use crate::event::{Coercion, Event, EventBuilder, FieldSpec, MetricEvent, MetricFamily};

const TENANT_MONITORING: &[&str] = &["management", "tenant-monitoring"];

const SERVER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("srv_name", "/body/item/name", Coercion::String),
    FieldSpec::new("srv_state", "/body/item/state", Coercion::String),
    FieldSpec::new("srv_health", "/body/item/health", Coercion::Text),
    FieldSpec::new(
        "srv_heapFreeCurrent",
        "/body/item/heapFreeCurrent",
        Coercion::Megabytes,
    ),
    FieldSpec::new(
        "srv_heapSizeCurrent",
        "/body/item/heapSizeCurrent",
        Coercion::Megabytes,
    ),
    FieldSpec::new("srv_heapSizeMax", "/body/item/heapSizeMax", Coercion::Megabytes),
];

/// Relative to one entry of `body.item.instances`
const DATASOURCE_INSTANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("ds_server", "/server", Coercion::String),
    FieldSpec::new("ds_state", "/state", Coercion::String),
    FieldSpec::new("ds_enabled", "/enabled", Coercion::Bool),
    FieldSpec::new(
        "ds_activeConnectionsCurrentCount",
        "/activeConnectionsCurrentCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "ds_activeConnectionsAverageCount",
        "/activeConnectionsAverageCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "ds_connectionsTotalCount",
        "/connectionsTotalCount",
        Coercion::Int,
    ),
];

const APPLICATION_FIELDS: &[FieldSpec] =
    &[FieldSpec::new("app_health", "/body/item/health", Coercion::Text)];

/// Adapter for the 12.1.x `tenant-monitoring` resources
#[derive(Clone)]
pub struct TenantMonitoringAdapter {
    client: RestClient,
}

fn monitoring_resource(kind: &str, name: &str) -> ResourcePath {
    ResourcePath::new(TENANT_MONITORING).push(kind).push(name)
}

/// Per-server deployment state, falling back to the domain-wide state
fn target_state<'a>(item: Option<&'a Value>, server: &str) -> Option<&'a Value> {
    let item = item?;
    item.get("targetStates")
        .and_then(Value::as_array)
        .and_then(|states| {
            states
                .iter()
                .find(|s| s.get("target").and_then(Value::as_str) == Some(server))
        })
        .and_then(|s| s.get("state"))
        .or_else(|| item.get("state"))
}

impl TenantMonitoringAdapter {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn collect_server(&self, server: &str) -> CollectResult<MetricEvent> {
        let doc = self
            .client
            .get_json(&monitoring_resource("servers", server))
            .await?;

        Ok(EventBuilder::new(MetricFamily::ServerStatus, server)
            .extract(&doc, SERVER_FIELDS)
            .build())
    }

    async fn collect_datasource(
        &self,
        scope: Scope<'_>,
        datasource: &str,
    ) -> CollectResult<Vec<MetricEvent>> {
        let doc = self
            .client
            .get_json(&monitoring_resource("datasources", datasource))
            .await?;

        let events: Vec<MetricEvent> = doc
            .pointer("/body/item/instances")
            .and_then(Value::as_array)
            .map(|instances| {
                instances
                    .iter()
                    .filter_map(|instance| {
                        let server = coerce_string(instance.get("server"));
                        scope.contains(&server).then(|| {
                            EventBuilder::new(MetricFamily::DatasourceStatus, server)
                                .label("ds_name", datasource)
                                .extract(instance, DATASOURCE_INSTANCE_FIELDS)
                                .build()
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if events.is_empty() {
            return Err(CollectorError::UnexpectedResponse {
                message: format!(
                    "datasource '{}' has no instance on a configured server",
                    datasource
                ),
                body: doc.to_string(),
            });
        }

        Ok(events)
    }

    async fn collect_application(
        &self,
        scope: Scope<'_>,
        application: &str,
    ) -> CollectResult<Vec<MetricEvent>> {
        let doc = self
            .client
            .get_json(&monitoring_resource("applications", application))
            .await?;
        let item = doc.pointer("/body/item");

        let events: Vec<MetricEvent> = scope
            .servers()
            .into_iter()
            .map(|server| {
                EventBuilder::new(MetricFamily::ApplicationStatus, server)
                    .label("app_server", server)
                    .label("app_name", application)
                    .label("app_componentName", application)
                    .field("app_state", target_state(item, server), Coercion::String)
                    .extract(&doc, APPLICATION_FIELDS)
                    .build()
            })
            .collect();

        if events.is_empty() {
            return Err(CollectorError::UnexpectedResponse {
                message: format!(
                    "application '{}' has no configured server to report on",
                    application
                ),
                body: doc.to_string(),
            });
        }

        Ok(events)
    }
}

#[async_trait]
impl VersionAdapter for TenantMonitoringAdapter {
    fn version(&self) -> ServerVersion {
        ServerVersion::TenantMonitoring
    }

    fn traversal(&self) -> Traversal {
        Traversal::PerResource
    }

    async fn server_status(&self, server: &str) -> Event {
        into_event(
            MetricFamily::ServerStatus,
            server,
            self.collect_server(server).await,
        )
    }

    async fn datasource_status(&self, scope: Scope<'_>, datasource: &str) -> Vec<Event> {
        into_events(
            MetricFamily::DatasourceStatus,
            datasource,
            self.collect_datasource(scope, datasource).await,
        )
    }

    async fn application_status(&self, scope: Scope<'_>, application: &str) -> Vec<Event> {
        into_events(
            MetricFamily::ApplicationStatus,
            application,
            self.collect_application(scope, application).await,
        )
    }

    async fn thread_pool_status(&self, _server: &str) -> Option<Event> {
        None
    }
}
