// Host binding -> backend URL

use crate::models::PortBinding;

const WILDCARD_IP: &str = "0.0.0.0";
const LOOPBACK_IP: &str = "127.0.0.1";

/// Host address reachable from this machine: wildcard binds resolve to loopback.
pub fn loopback_host(host_ip: &str) -> &str {
    if host_ip == WILDCARD_IP {
        LOOPBACK_IP
    } else {
        host_ip
    }
}

/// Backend URL for a port, using only its first host binding (first-binding-wins).
/// Returns `None` when the port has no bindings.
pub fn first_binding_url(bindings: &[PortBinding]) -> Option<String> {
    let binding = bindings.first()?;
    Some(format!(
        "http://{}:{}",
        loopback_host(&binding.host_ip),
        binding.host_port
    ))
}
