//! Polling cycle controller
//!
//! One cycle walks the configured targets in a fixed order and forwards every
//! event to the sink as soon as it is produced:
//!
//! 1. server status, per server
//! 2. datasource status, per server × datasource (or per datasource)
//! 3. application status, per server × application (or per application)
//! 4. thread pool status, per server, when the REST surface has it
//!
//! Calls run one after another. A failed call becomes an error event and the
//! cycle moves on to the next step.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::signal;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::collector::{select_adapter, RestClient, Scope, ServerVersion, Traversal};
use crate::config::{Config, TargetSet};
use crate::error::AppResult;
use crate::event::{Event, EventSink};

/// Outcome counters for one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub metric_events: usize,
    pub error_events: usize,
    /// Events the sink refused
    pub sink_failures: usize,
    pub elapsed: Duration,
}

impl CycleSummary {
    pub fn events(&self) -> usize {
        self.metric_events + self.error_events
    }
}

/// Drives polling cycles against one WebLogic domain
pub struct Poller {
    client: RestClient,
    targets: TargetSet,
    period: Duration,
}

impl Poller {
    pub fn new(client: RestClient, targets: TargetSet, period: Duration) -> Self {
        if ServerVersion::parse(&targets.version_tag).is_none() {
            warn!(
                version = %targets.version_tag,
                fallback = %ServerVersion::DomainRuntime,
                "Unrecognized server version; using the newest REST surface"
            );
        }

        Self {
            client,
            targets,
            period,
        }
    }

    /// Build a poller from validated configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = RestClient::from_config(&config.weblogic)?;
        Ok(Self::new(client, config.target_set(), config.period()))
    }

    /// Run one full polling cycle
    pub async fn run_cycle<S: EventSink + ?Sized>(&self, sink: &mut S) -> CycleSummary {
        let start = Instant::now();
        let mut summary = CycleSummary::default();
        let targets = &self.targets;
        let adapter = select_adapter(targets.server_version(), self.client.clone());

        for server in &targets.servers {
            let event = adapter.server_status(server).await;
            forward(sink, &mut summary, event);
        }

        match adapter.traversal() {
            Traversal::PerServer => {
                for server in &targets.servers {
                    for datasource in &targets.datasources {
                        for event in adapter
                            .datasource_status(Scope::Server(server), datasource)
                            .await
                        {
                            forward(sink, &mut summary, event);
                        }
                    }
                }
                for server in &targets.servers {
                    for application in &targets.applications {
                        for event in adapter
                            .application_status(Scope::Server(server), application)
                            .await
                        {
                            forward(sink, &mut summary, event);
                        }
                    }
                }
            }
            Traversal::PerResource => {
                let domain = Scope::Domain(&targets.servers);
                for datasource in &targets.datasources {
                    for event in adapter.datasource_status(domain, datasource).await {
                        forward(sink, &mut summary, event);
                    }
                }
                for application in &targets.applications {
                    for event in adapter.application_status(domain, application).await {
                        forward(sink, &mut summary, event);
                    }
                }
            }
        }

        for server in &targets.servers {
            if let Some(event) = adapter.thread_pool_status(server).await {
                forward(sink, &mut summary, event);
            }
        }

        summary.elapsed = start.elapsed();
        info!(
            adapter = %adapter.version(),
            metric_events = summary.metric_events,
            error_events = summary.error_events,
            sink_failures = summary.sink_failures,
            duration_ms = summary.elapsed.as_millis() as u64,
            "Polling cycle complete"
        );

        summary
    }

    /// Run cycles on every tick until `shutdown` resolves
    ///
    /// The first cycle starts immediately. Shutdown is only observed while
    /// waiting for the next tick, so an in-flight cycle always completes. A cycle
    /// that overruns the period delays the next tick instead of overlapping it.
    ///
    /// Returns the number of completed cycles.
    pub async fn run<S, F>(&self, sink: &mut S, shutdown: F) -> u64
    where
        S: EventSink + ?Sized,
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            period_ms = self.period.as_millis() as u64,
            servers = self.targets.servers.len(),
            datasources = self.targets.datasources.len(),
            applications = self.targets.applications.len(),
            "Poller started"
        );

        let mut cycles = 0;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            self.run_cycle(sink).await;
            cycles += 1;
        }

        info!(cycles, "Poller stopped");
        cycles
    }
}

fn forward<S: EventSink + ?Sized>(sink: &mut S, summary: &mut CycleSummary, event: Event) {
    if event.is_error() {
        summary.error_events += 1;
    } else {
        summary.metric_events += 1;
    }

    let family = event.family();
    if let Err(e) = sink.publish(event) {
        summary.sink_failures += 1;
        warn!(family = %family, error = %e, "Failed to publish event");
    }
}

/// Wait for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
