// Poll worker: list -> inspect -> build mapping -> push, once per interval.
// Cycles run inline in the loop so they never overlap; errors are logged and
// the next tick starts from scratch.

use crate::config::AppConfig;
use crate::docker_repo::ContainerRuntime;
use crate::error::CycleError;
use crate::mapping::{self, MatchMode};
use crate::registry::RegistryPush;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Collaborators and shutdown for the worker.
pub struct WorkerDeps {
    pub runtime: Arc<dyn ContainerRuntime>,
    pub registry: Arc<dyn RegistryPush>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Mapping inputs for one cycle.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    pub domain_env_key: String,
    pub allowed_ports: String,
    pub match_mode: MatchMode,
}

impl From<&AppConfig> for CycleConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            domain_env_key: config.env.clone(),
            allowed_ports: config.ports.clone(),
            match_mode: config.match_mode,
        }
    }
}

pub struct WorkerConfig {
    pub interval: Duration,
    pub cycle: CycleConfig,
}

/// What a successful cycle published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub containers: usize,
    pub domains: usize,
    pub urls: usize,
}

/// Run one poll cycle. Nothing is pushed unless every container was inspected
/// and at least one domain qualified.
pub async fn run_cycle(
    runtime: &dyn ContainerRuntime,
    registry: &dyn RegistryPush,
    config: &CycleConfig,
) -> Result<CycleReport, CycleError> {
    let ids = runtime.list_running().await?;

    let mut snapshots = Vec::with_capacity(ids.len());
    for id in &ids {
        snapshots.push(runtime.inspect(id).await?);
    }

    let mapping = mapping::build(
        &snapshots,
        &config.domain_env_key,
        &config.allowed_ports,
        config.match_mode,
    );
    if mapping.is_empty() {
        return Err(CycleError::EmptyMapping);
    }

    let backends = mapping.to_backends();
    registry.send(&backends).await?;

    Ok(CycleReport {
        containers: snapshots.len(),
        domains: mapping.len(),
        urls: mapping.url_count(),
    })
}

/// Spawn the periodic push task. The first cycle runs immediately; the task
/// exits when `shutdown_rx` fires (after finishing any cycle in progress).
pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        runtime,
        registry,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig { interval: period, cycle } = config;

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        interval_secs = period.as_secs()
    );

    tokio::spawn(
        async move {
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        tracing::info!(phase = "started", "Started pushing data to Marco.");
                        match run_cycle(runtime.as_ref(), registry.as_ref(), &cycle).await {
                            Ok(report) => tracing::info!(
                                phase = "completed",
                                containers = report.containers,
                                domains = report.domains,
                                urls = report.urls,
                                "Successfully pushed data to Marco."
                            ),
                            Err(e) => tracing::warn!(
                                phase = "failed",
                                kind = e.kind(),
                                error = %e,
                                "Push to Marco failed"
                            ),
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
