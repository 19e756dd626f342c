// Container snapshots -> domain mapping

mod binding;
mod matching;

pub use binding::{first_binding_url, loopback_host};
pub use matching::{MatchMode, bare_port, env_entry_matches, find_domain, port_allowed};

use crate::models::{ContainerSnapshot, DomainMapping};

/// Build the `domain -> URLs` mapping for one poll cycle.
///
/// A container contributes only when an env entry yields a non-empty domain
/// for `domain_env_key`. Each of its exposed ports admitted by `allowed_ports`
/// then adds the URL of its first host binding. URLs are appended in snapshot
/// order and never deduplicated. Returns an empty mapping when nothing
/// qualifies.
pub fn build(
    snapshots: &[ContainerSnapshot],
    domain_env_key: &str,
    allowed_ports: &str,
    mode: MatchMode,
) -> DomainMapping {
    let mut mapping = DomainMapping::new();

    for snapshot in snapshots {
        let Some(domain) = find_domain(&snapshot.env, domain_env_key, mode) else {
            continue;
        };

        for (spec, bindings) in &snapshot.ports {
            if !port_allowed(bare_port(spec), allowed_ports, mode) {
                continue;
            }
            if let Some(url) = first_binding_url(bindings) {
                mapping.push(domain, url);
            }
        }
    }

    mapping
}
