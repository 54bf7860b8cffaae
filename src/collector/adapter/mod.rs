//! Version adapters
//!
//! WebLogic exposes two incompatible monitoring REST surfaces:
//!
//! - 12.2.1 and later: `/management/weblogic/latest/domainRuntime/...`, one
//!   resource per server runtime ([`DomainRuntimeAdapter`]).
//! - 12.1.x: `/management/tenant-monitoring/...`, domain-wide resources with
//!   per-server detail nested in the payload ([`TenantMonitoringAdapter`]).
//!
//! Both implement [`VersionAdapter`]; the variant is chosen from the configured
//! version tag, never from the shape of a response.

mod domain_runtime;
mod tenant_monitoring;

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use domain_runtime::DomainRuntimeAdapter;
pub use tenant_monitoring::TenantMonitoringAdapter;

use super::{CollectResult, RestClient};
use crate::event::{ErrorEvent, Event, MetricEvent, MetricFamily};

/// REST surface generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerVersion {
    /// 12.2.1+ `domainRuntime` resources
    DomainRuntime,
    /// 12.1.x `tenant-monitoring` resources
    TenantMonitoring,
}

impl ServerVersion {
    /// Parse a version tag such as "12.2.1.3" or "latest".
    ///
    /// Returns `None` for tags that don't name a known generation.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("latest") {
            return Some(ServerVersion::DomainRuntime);
        }

        let mut parts = tag.split('.');
        let major = parts.next()?.parse::<u32>().ok()?;
        // 14.x and 15.x share one surface; the minor may be a wildcard.
        if matches!(major, 14 | 15) {
            return Some(ServerVersion::DomainRuntime);
        }
        if major != 12 {
            return None;
        }

        match parts.next()? {
            "1" => Some(ServerVersion::TenantMonitoring),
            "2" => Some(ServerVersion::DomainRuntime),
            _ => None,
        }
    }

    /// Parse a version tag, falling back to the newest REST surface
    pub fn resolve(tag: &str) -> Self {
        Self::parse(tag).unwrap_or(ServerVersion::DomainRuntime)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerVersion::DomainRuntime => "domain-runtime",
            ServerVersion::TenantMonitoring => "tenant-monitoring",
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How datasource and application targets are walked in a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// One call per server × resource
    PerServer,
    /// One call per resource, reporting every server at once
    PerResource,
}

/// Servers a datasource/application call should report on
#[derive(Debug, Clone, Copy)]
pub enum Scope<'a> {
    Server(&'a str),
    Domain(&'a [String]),
}

impl<'a> Scope<'a> {
    /// Server names covered by this scope, in configured order
    pub fn servers(&self) -> Vec<&'a str> {
        match self {
            Scope::Server(name) => vec![*name],
            Scope::Domain(names) => names.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, server: &str) -> bool {
        match self {
            Scope::Server(name) => *name == server,
            Scope::Domain(names) => names.iter().any(|n| n == server),
        }
    }
}

/// Capability set every REST surface generation provides
///
/// Methods never fail: a failed call becomes an [`ErrorEvent`] for that
/// (target, family) so the cycle can carry on with the next one.
#[async_trait]
pub trait VersionAdapter: Send + Sync {
    fn version(&self) -> ServerVersion;

    fn traversal(&self) -> Traversal;

    /// Server state, health and JVM heap
    async fn server_status(&self, server: &str) -> Event;

    /// Pool state and connection counts of one datasource
    async fn datasource_status(&self, scope: Scope<'_>, datasource: &str) -> Vec<Event>;

    /// State and health of one application
    async fn application_status(&self, scope: Scope<'_>, application: &str) -> Vec<Event>;

    /// Thread pool saturation; `None` when the surface doesn't expose it
    async fn thread_pool_status(&self, server: &str) -> Option<Event>;
}

/// Pick the adapter for a REST surface generation
pub fn select_adapter(version: ServerVersion, client: RestClient) -> Box<dyn VersionAdapter> {
    match version {
        ServerVersion::DomainRuntime => Box::new(DomainRuntimeAdapter::new(client)),
        ServerVersion::TenantMonitoring => Box::new(TenantMonitoringAdapter::new(client)),
    }
}

/// Turn a collection outcome into the event sent downstream
pub(crate) fn into_event(
    family: MetricFamily,
    target: &str,
    result: CollectResult<MetricEvent>,
) -> Event {
    match result {
        Ok(event) => {
            debug!(target_name = %target, family = %family, "Metrics collected");
            event.into()
        }
        Err(e) => failure_event(family, target, e),
    }
}

/// Like [`into_event`] for calls that fan out into several events
pub(crate) fn into_events(
    family: MetricFamily,
    target: &str,
    result: CollectResult<Vec<MetricEvent>>,
) -> Vec<Event> {
    match result {
        Ok(events) => {
            debug!(
                target_name = %target,
                family = %family,
                count = events.len(),
                "Metrics collected"
            );
            events.into_iter().map(Event::from).collect()
        }
        Err(e) => vec![failure_event(family, target, e)],
    }
}

fn failure_event(family: MetricFamily, target: &str, error: crate::error::CollectorError) -> Event {
    warn!(
        target_name = %target,
        family = %family,
        status = ?error.http_status(),
        transport = error.is_transport(),
        error = %error,
        "Metric collection failed"
    );
    ErrorEvent::from_failure(family, target, &error).into()
}
