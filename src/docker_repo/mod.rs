// Running-container discovery via bollard

mod snapshot;

use snapshot::snapshot_from_inspect;

use crate::models::ContainerSnapshot;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions};
use bollard::{API_DEFAULT_VERSION, Docker};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Docker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("listing containers failed: {0}")]
    List(#[source] bollard::errors::Error),
    #[error("inspecting container {id} failed: {source}")]
    Inspect {
        id: String,
        #[source]
        source: bollard::errors::Error,
    },
}

pub type RuntimeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RuntimeError>> + Send + 'a>>;

/// Source of container snapshots for a poll cycle.
///
/// Object-safe so the worker can hold `Arc<dyn ContainerRuntime>`; tests supply
/// in-memory implementations.
pub trait ContainerRuntime: Send + Sync {
    /// Ids of running containers, in runtime listing order.
    fn list_running(&self) -> RuntimeFuture<'_, Vec<String>>;

    fn inspect<'a>(&'a self, id: &'a str) -> RuntimeFuture<'a, ContainerSnapshot>;
}

pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect to `endpoint`: `unix://` paths use the socket, `tcp://` and
    /// `http://` use HTTP, and an empty endpoint uses bollard's local defaults.
    /// `timeout_secs` bounds every request.
    pub fn connect(endpoint: &str, timeout_secs: u64) -> Result<Self, RuntimeError> {
        let connection = if endpoint.is_empty() {
            Docker::connect_with_local_defaults()
        } else if let Some(path) = endpoint.strip_prefix("unix://") {
            Docker::connect_with_socket(path, timeout_secs, &API_DEFAULT_VERSION)
        } else if endpoint.starts_with("tcp://") || endpoint.starts_with("http://") {
            Docker::connect_with_http(endpoint, timeout_secs, &API_DEFAULT_VERSION)
        } else {
            return Err(RuntimeError::ConnectionFailed(format!(
                "unsupported docker endpoint {endpoint:?}"
            )));
        };
        let docker = connection.map_err(|e| RuntimeError::ConnectionFailed(e.to_string()))?;

        Ok(Self { docker })
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_running"))]
    async fn list_running_ids(&self) -> Result<Vec<String>, RuntimeError> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(RuntimeError::List)?;

        let ids: Vec<String> = containers.into_iter().filter_map(|c| c.id).collect();
        debug!(containers_count = ids.len(), "Listed running containers");
        Ok(ids)
    }

    async fn inspect_snapshot(&self, id: &str) -> Result<ContainerSnapshot, RuntimeError> {
        let response = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(|source| RuntimeError::Inspect {
                id: id.to_string(),
                source,
            })?;
        Ok(snapshot_from_inspect(id, &response))
    }
}

impl ContainerRuntime for DockerRepo {
    fn list_running(&self) -> RuntimeFuture<'_, Vec<String>> {
        Box::pin(self.list_running_ids())
    }

    fn inspect<'a>(&'a self, id: &'a str) -> RuntimeFuture<'a, ContainerSnapshot> {
        Box::pin(self.inspect_snapshot(id))
    }
}
