// Container inspection models

use std::collections::BTreeMap;

/// One host binding of an exposed container port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBinding {
    pub host_ip: String,
    pub host_port: String,
}

impl PortBinding {
    pub fn new(host_ip: impl Into<String>, host_port: impl Into<String>) -> Self {
        Self {
            host_ip: host_ip.into(),
            host_port: host_port.into(),
        }
    }
}

/// Read-only view of one container at inspection time.
///
/// `env` keeps the raw `KEY=VALUE` strings in inspection order. `ports` is keyed
/// by exposed-port spec (`"80/tcp"`); a spec Docker reports without bindings maps
/// to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub id: String,
    pub env: Vec<String>,
    pub ports: BTreeMap<String, Vec<PortBinding>>,
}

impl ContainerSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_env(mut self, entry: impl Into<String>) -> Self {
        self.env.push(entry.into());
        self
    }

    pub fn with_port(mut self, spec: impl Into<String>, bindings: Vec<PortBinding>) -> Self {
        self.ports.insert(spec.into(), bindings);
        self
    }
}
