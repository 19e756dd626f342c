// Raw Docker inspect response -> ContainerSnapshot

use crate::models::{ContainerSnapshot, PortBinding};
use bollard::models::ContainerInspectResponse;
use std::collections::BTreeMap;

/// Convert an inspect response into a snapshot. Exposed for unit tests.
///
/// Missing env, port map, host IP or host port become empty values; a port
/// reported with `null` bindings maps to an empty binding list.
pub(crate) fn snapshot_from_inspect(id: &str, response: &ContainerInspectResponse) -> ContainerSnapshot {
    let env = response
        .config
        .as_ref()
        .and_then(|c| c.env.clone())
        .unwrap_or_default();

    let ports: BTreeMap<String, Vec<PortBinding>> = response
        .network_settings
        .as_ref()
        .and_then(|n| n.ports.as_ref())
        .map(|ports| {
            ports
                .iter()
                .map(|(spec, bindings)| {
                    let bindings = bindings
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .map(|b| PortBinding {
                            host_ip: b.host_ip.clone().unwrap_or_default(),
                            host_port: b.host_port.clone().unwrap_or_default(),
                        })
                        .collect();
                    (spec.clone(), bindings)
                })
                .collect()
        })
        .unwrap_or_default();

    ContainerSnapshot {
        id: id.to_string(),
        env,
        ports,
    }
}
