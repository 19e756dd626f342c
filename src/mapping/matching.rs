// Env-key and port-allowlist predicates

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How the domain env key and the port allowlist are compared.
///
/// `Substring` is the historical behaviour: `"DOMAIN"` matches
/// `"NOT_DOMAIN=x"` and allowlist `"8080"` admits port `"80"`. `Exact` compares
/// the env key before `=` and whole comma-separated allowlist tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Substring,
    Exact,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Substring => "substring",
            MatchMode::Exact => "exact",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "exact" => Ok(MatchMode::Exact),
            other => Err(format!(
                "unknown match mode {other:?} (expected \"substring\" or \"exact\")"
            )),
        }
    }
}

/// Whether an env entry is the domain source for `key`.
pub fn env_entry_matches(entry: &str, key: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => entry.contains(key),
        MatchMode::Exact => entry.split_once('=').map_or(entry, |(k, _)| k) == key,
    }
}

/// Domain value of the first env entry matching `key`, or `None` when no
/// entry matches or the matched value is empty.
pub fn find_domain<'a>(env: &'a [String], key: &str, mode: MatchMode) -> Option<&'a str> {
    let entry = env.iter().find(|e| env_entry_matches(e, key, mode))?;
    let value = entry.split_once('=').map_or("", |(_, v)| v);
    (!value.is_empty()).then_some(value)
}

/// Port number part of an exposed-port spec: `"80/tcp"` -> `"80"`.
pub fn bare_port(spec: &str) -> &str {
    spec.split_once('/').map_or(spec, |(port, _)| port)
}

/// Whether `port` is admitted by the comma-joined `allowlist`.
pub fn port_allowed(port: &str, allowlist: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => allowlist.contains(port),
        MatchMode::Exact => allowlist.split(',').any(|p| p.trim() == port),
    }
}
