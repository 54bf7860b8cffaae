//! 12.2.1+ `domainRuntime` REST surface
//!
//! Every metric family is read from the per-server runtime tree:
//!
//! ```text
//! /management/weblogic/latest/domainRuntime/serverRuntimes/{server}
//!     /JVMRuntime
//!     /JDBCServiceRuntime/JDBCDataSourceRuntimeMBeans/{datasource}[/testPool]
//!     /applicationRuntimes/{application}[/componentRuntimes]
//!     /threadPoolRuntime
//! ```

use async_trait::async_trait;
use serde_json::Value;

use super::{into_event, into_events, Scope, ServerVersion, Traversal, VersionAdapter};
use crate::collector::{CollectResult, ResourcePath, RestClient};
use crate::error::CollectorError;
use crate::event::{Coercion, Event, EventBuilder, FieldSpec, MetricEvent, MetricFamily};

const SERVER_RUNTIMES: &[&str] = &[
    "management",
    "weblogic",
    "latest",
    "domainRuntime",
    "serverRuntimes",
];

const SERVER_QUERY: &str = "links=none&fields=name,state,healthState";
const JVM_QUERY: &str =
    "links=none&fields=heapSizeCurrent,heapFreeCurrent,heapFreePercent,heapSizeMax,processCpuLoad";
const DATASOURCE_QUERY: &str = "links=none&fields=activeConnectionsCurrentCount,activeConnectionsAverageCount,connectionsTotalCount,enabled,state,name";
const APPLICATION_QUERY: &str = "links=none&fields=name,healthState";
const COMPONENT_QUERY: &str = "links=none&fields=openSessionsCurrentCount,sessionsOpenedTotalCount,openSessionsHighCount,applicationIdentifier,status,componentName";
const THREAD_POOL_QUERY: &str = "links=none&fields=overloadRejectedRequestsCount,pendingUserRequestCount,executeThreadTotalCount,healthState,stuckThreadCount,throughput,hoggingThreadCount";

const SERVER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("srv_name", "/name", Coercion::String),
    FieldSpec::new("srv_state", "/state", Coercion::String),
    FieldSpec::new("srv_health", "/healthState/state", Coercion::String),
    FieldSpec::new("srv_symptoms", "/healthState/symptoms", Coercion::Text),
];

const JVM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("srv_heapFreeCurrent", "/heapFreeCurrent", Coercion::Megabytes),
    FieldSpec::new("srv_heapSizeCurrent", "/heapSizeCurrent", Coercion::Megabytes),
    FieldSpec::new("srv_heapSizeMax", "/heapSizeMax", Coercion::Megabytes),
    FieldSpec::new("srv_jvmProcessorLoad", "/processCpuLoad", Coercion::Float),
];

const DATASOURCE_FIELDS: &[FieldSpec] = &[
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

const APPLICATION_FIELDS: &[FieldSpec] = &[FieldSpec::new(
    "app_health",
    "/healthState/state",
    Coercion::String,
)];

const COMPONENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("app_componentName", "/componentName", Coercion::String),
    FieldSpec::new("app_state", "/status", Coercion::String),
    FieldSpec::new(
        "app_openSessionsCurrentCount",
        "/openSessionsCurrentCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "app_openSessionsHighCount",
        "/openSessionsHighCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "app_sessionsOpenedTotalCount",
        "/sessionsOpenedTotalCount",
        Coercion::Int,
    ),
];

const THREAD_POOL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(
        "th_overloadRejectedRequestsCount",
        "/overloadRejectedRequestsCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "th_pendingUserRequestCount",
        "/pendingUserRequestCount",
        Coercion::Int,
    ),
    FieldSpec::new(
        "th_executeThreadTotalCount",
        "/executeThreadTotalCount",
        Coercion::Int,
    ),
    FieldSpec::new("th_stuckThreadCount", "/stuckThreadCount", Coercion::Int),
    FieldSpec::new("th_hoggingThreadCount", "/hoggingThreadCount", Coercion::Int),
    FieldSpec::new("th_throughput", "/throughput", Coercion::Float),
    FieldSpec::new("th_state", "/healthState/state", Coercion::String),
    FieldSpec::new("th_symptoms", "/healthState/symptoms", Coercion::Text),
];

/// Adapter for the 12.2.1+ `domainRuntime` tree
#[derive(Clone)]
pub struct DomainRuntimeAdapter {
    client: RestClient,
}

fn server_runtime(server: &str) -> ResourcePath {
    ResourcePath::new(SERVER_RUNTIMES).push(server)
}

fn datasource_runtime(server: &str, datasource: &str) -> ResourcePath {
    server_runtime(server)
        .push("JDBCServiceRuntime")
        .push("JDBCDataSourceRuntimeMBeans")
        .push(datasource)
}

fn application_runtime(server: &str, application: &str) -> ResourcePath {
    server_runtime(server)
        .push("applicationRuntimes")
        .push(application)
}

impl DomainRuntimeAdapter {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    async fn collect_server(&self, server: &str) -> CollectResult<MetricEvent> {
        let status = self
            .client
            .get_json(&server_runtime(server).query(SERVER_QUERY))
            .await?;
        let jvm = self
            .client
            .get_json(&server_runtime(server).push("JVMRuntime").query(JVM_QUERY))
            .await?;

        Ok(EventBuilder::new(MetricFamily::ServerStatus, server)
            .extract(&status, SERVER_FIELDS)
            .extract(&jvm, JVM_FIELDS)
            .build())
    }

    async fn collect_datasource(&self, server: &str, datasource: &str) -> CollectResult<MetricEvent> {
        let resource = datasource_runtime(server, datasource);
        let info = self
            .client
            .get_json(&resource.clone().query(DATASOURCE_QUERY))
            .await?;

        // testPool failures are reported in the event, not as an error event.
        let pool_ok = self.client.probe(&resource.push("testPool")).await;

        Ok(EventBuilder::new(MetricFamily::DatasourceStatus, server)
            .label("ds_name", datasource)
            .extract(&info, DATASOURCE_FIELDS)
            .flag("ds_testpool", pool_ok)
            .build())
    }

    async fn collect_application(
        &self,
        server: &str,
        application: &str,
    ) -> CollectResult<Vec<MetricEvent>> {
        let resource = application_runtime(server, application);
        let app = self
            .client
            .get_json(&resource.clone().query(APPLICATION_QUERY))
            .await?;
        let components = self
            .client
            .get_json(&resource.push("componentRuntimes").query(COMPONENT_QUERY))
            .await?;

        let items = match components.pointer("/items").and_then(Value::as_array) {
            Some(items) if !items.is_empty() => items,
            _ => {
                return Err(CollectorError::UnexpectedResponse {
                    message: format!("no component runtimes reported for '{}'", application),
                    body: components.to_string(),
                })
            }
        };

        Ok(items
            .iter()
            .map(|component| {
                EventBuilder::new(MetricFamily::ApplicationStatus, server)
                    .label("app_name", application)
                    .extract(&app, APPLICATION_FIELDS)
                    .extract(component, COMPONENT_FIELDS)
                    .build()
            })
            .collect())
    }

    async fn collect_thread_pool(&self, server: &str) -> CollectResult<MetricEvent> {
        let pool = self
            .client
            .get_json(
                &server_runtime(server)
                    .push("threadPoolRuntime")
                    .query(THREAD_POOL_QUERY),
            )
            .await?;

        Ok(EventBuilder::new(MetricFamily::ThreadStatus, server)
            .extract(&pool, THREAD_POOL_FIELDS)
            .build())
    }
}

#[async_trait]
impl VersionAdapter for DomainRuntimeAdapter {
    fn version(&self) -> ServerVersion {
        ServerVersion::DomainRuntime
    }

    fn traversal(&self) -> Traversal {
        Traversal::PerServer
    }

    async fn server_status(&self, server: &str) -> Event {
        into_event(
            MetricFamily::ServerStatus,
            server,
            self.collect_server(server).await,
        )
    }

    async fn datasource_status(&self, scope: Scope<'_>, datasource: &str) -> Vec<Event> {
        let mut events = Vec::new();
        for server in scope.servers() {
            events.push(into_event(
                MetricFamily::DatasourceStatus,
                server,
                self.collect_datasource(server, datasource).await,
            ));
        }
        events
    }

    async fn application_status(&self, scope: Scope<'_>, application: &str) -> Vec<Event> {
        let mut events = Vec::new();
        for server in scope.servers() {
            events.extend(into_events(
                MetricFamily::ApplicationStatus,
                server,
                self.collect_application(server, application).await,
            ));
        }
        events
    }

    async fn thread_pool_status(&self, server: &str) -> Option<Event> {
        Some(into_event(
            MetricFamily::ThreadStatus,
            server,
            self.collect_thread_pool(server).await,
        ))
    }
}
