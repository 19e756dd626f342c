// Registry payload models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source tag carried by every backend this agent publishes.
pub const BACKEND_TYPE: &str = "docker";

/// One registry record: a domain and the URLs that serve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    #[serde(rename = "type")]
    pub kind: String,
    pub domain: String,
    pub list: Vec<String>,
}

/// Backend URLs grouped by domain, built fresh every poll cycle.
///
/// A domain is present only once a URL has been appended for it. URLs keep
/// append order; domains iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMapping {
    domains: BTreeMap<String, Vec<String>>,
}

impl DomainMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, domain: &str, url: String) {
        self.domains.entry(domain.to_string()).or_default().push(url);
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Total URLs across all domains.
    pub fn url_count(&self) -> usize {
        self.domains.values().map(Vec::len).sum()
    }

    pub fn get(&self, domain: &str) -> Option<&[String]> {
        self.domains.get(domain).map(Vec::as_slice)
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// One backend per domain, in domain order.
    pub fn to_backends(&self) -> Vec<Backend> {
        self.domains
            .iter()
            .map(|(domain, list)| Backend {
                kind: BACKEND_TYPE.to_string(),
                domain: domain.clone(),
                list: list.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_groups_urls_under_domain_in_append_order() {
        let mut m = DomainMapping::new();
        m.push("b.com", "http://127.0.0.1:2".into());
        m.push("a.com", "http://127.0.0.1:1".into());
        m.push("b.com", "http://127.0.0.1:3".into());
        assert_eq!(m.len(), 2);
        assert_eq!(m.url_count(), 3);
        assert_eq!(
            m.get("b.com").unwrap(),
            ["http://127.0.0.1:2", "http://127.0.0.1:3"]
        );
        assert_eq!(m.domains().collect::<Vec<_>>(), vec!["a.com", "b.com"]);
    }

    #[test]
    fn to_backends_tags_each_domain_with_docker_type() {
        let mut m = DomainMapping::new();
        m.push("example.com", "http://10.0.0.2:80".into());
        let backends = m.to_backends();
        assert_eq!(
            backends,
            vec![Backend {
                kind: "docker".into(),
                domain: "example.com".into(),
                list: vec!["http://10.0.0.2:80".into()],
            }]
        );
    }

    #[test]
    fn backend_serializes_with_type_field() {
        let b = Backend {
            kind: BACKEND_TYPE.into(),
            domain: "example.com".into(),
            list: vec!["http://127.0.0.1:8000".into()],
        };
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["type"], "docker");
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["list"][0], "http://127.0.0.1:8000");
    }

    #[test]
    fn empty_mapping_produces_no_backends() {
        let m = DomainMapping::new();
        assert!(m.is_empty());
        assert!(m.to_backends().is_empty());
    }
}
