// Shared test helpers: in-memory runtime and registry

#![allow(dead_code)]

use marco_docker::docker_repo::{ContainerRuntime, RuntimeError, RuntimeFuture};
use marco_docker::models::{Backend, ContainerSnapshot, PortBinding};
use marco_docker::registry::{PushError, PushFuture, RegistryPush};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot with the given env entries and `(spec, [(ip, port)])` ports.
pub fn snapshot(id: &str, env: &[&str], ports: &[(&str, &[(&str, &str)])]) -> ContainerSnapshot {
    let mut snap = ContainerSnapshot::new(id);
    for e in env {
        snap = snap.with_env(*e);
    }
    for (spec, bindings) in ports {
        let bindings = bindings
            .iter()
            .map(|(ip, port)| PortBinding::new(*ip, *port))
            .collect();
        snap = snap.with_port(*spec, bindings);
    }
    snap
}

/// Container runtime serving fixed snapshots.
#[derive(Default)]
pub struct FakeRuntime {
    pub snapshots: Vec<ContainerSnapshot>,
    /// Fail `list_running` this many times before succeeding.
    pub list_failures: AtomicUsize,
    /// Inspecting this id fails.
    pub failing_inspect: Option<String>,
    pub list_calls: AtomicUsize,
}

impl FakeRuntime {
    pub fn new(snapshots: Vec<ContainerSnapshot>) -> Self {
        Self {
            snapshots,
            ..Default::default()
        }
    }
}

impl ContainerRuntime for FakeRuntime {
    fn list_running(&self) -> RuntimeFuture<'_, Vec<String>> {
        Box::pin(async move {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.list_failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.list_failures.store(remaining - 1, Ordering::SeqCst);
                return Err(RuntimeError::ConnectionFailed("daemon unreachable".into()));
            }
            Ok(self.snapshots.iter().map(|s| s.id.clone()).collect())
        })
    }

    fn inspect<'a>(&'a self, id: &'a str) -> RuntimeFuture<'a, ContainerSnapshot> {
        Box::pin(async move {
            if self.failing_inspect.as_deref() == Some(id) {
                return Err(RuntimeError::ConnectionFailed(format!("no such container {id}")));
            }
            self.snapshots
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .ok_or_else(|| RuntimeError::ConnectionFailed(format!("no such container {id}")))
        })
    }
}

/// Registry that records every push.
#[derive(Default)]
pub struct RecordingRegistry {
    pub pushes: Mutex<Vec<Vec<Backend>>>,
    pub fail_with_status: Option<u16>,
}

impl RecordingRegistry {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }

    pub fn last_push(&self) -> Option<Vec<Backend>> {
        self.pushes.lock().unwrap().last().cloned()
    }
}

impl RegistryPush for RecordingRegistry {
    fn send<'a>(&'a self, backends: &'a [Backend]) -> PushFuture<'a> {
        Box::pin(async move {
            if let Some(code) = self.fail_with_status {
                return Err(PushError::Status {
                    url: "http://marco.test".into(),
                    status: reqwest::StatusCode::from_u16(code).unwrap(),
                    body: "rejected".into(),
                });
            }
            self.pushes.lock().unwrap().push(backends.to_vec());
            Ok(())
        })
    }
}
