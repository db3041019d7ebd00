//! Keyword tables driving classification, selection and escalation.
//!
//! Matching is plain lower-case substring search over Italian terms. The
//! tables can be overridden from the `[routing]` section of `config.toml`.

use serde::{Deserialize, Serialize};

use crate::error::{GraphrouteError, Result};

/// Query topics a service can be matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Violence and stalking
    Violence,
    /// Disability and Law 104 protections
    Disability,
    /// Employment, tax assistance and benefits agencies
    Employment,
}

/// Query-side trigger paired with the haystack terms that satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRule {
    pub topic: Topic,
    /// Any of these in the query activates the topic.
    pub query_terms: Vec<String>,
    /// A service qualifies if its haystack holds any of these.
    pub haystack_terms: Vec<String>,
}

/// Recognises a well-known contact among escalation nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMarker {
    /// Matched against the node's `url` attribute, e.g. `tel:1522`.
    pub url_marker: String,
    /// Matched against the node's `name` attribute, e.g. `1522`.
    pub name_marker: String,
}

impl ContactMarker {
    fn new(url_marker: &str, name_marker: &str) -> Self {
        Self {
            url_marker: url_marker.to_string(),
            name_marker: name_marker.to_string(),
        }
    }

    pub fn matches(&self, url: &str, name: &str) -> bool {
        url.to_lowercase().contains(&self.url_marker.to_lowercase()) || name.contains(&self.name_marker)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingRules {
    /// Phrases signalling an ongoing or imminent threat.
    pub urgency_phrases: Vec<String>,
    pub topics: Vec<TopicRule>,
    /// Haystack terms marking an anti-violence or protection centre.
    pub protection_terms: Vec<String>,
    /// National anti-violence hotline, sorted first among escalations.
    pub hotline: ContactMarker,
    /// Universal emergency number, injected for urgent queries when absent.
    pub emergency: ContactMarker,
    /// Services returned for non-urgent queries.
    pub max_candidates: usize,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            urgency_phrases: terms(&[
                "pericolo",
                "emergenza",
                "mi sta seguendo",
                "mi segue",
                "mi ha aggredit",
                "mi hanno aggredit",
                "mi ha picchiat",
                "minaccia",
                "vuole uccidermi",
                "adesso",
                "sotto casa",
                "qui fuori",
            ]),
            topics: vec![
                TopicRule {
                    topic: Topic::Violence,
                    query_terms: terms(&["violenza", "stalking"]),
                    haystack_terms: terms(&["antiviolenza", "tutela"]),
                },
                TopicRule {
                    topic: Topic::Disability,
                    query_terms: terms(&["disabilità", "104"]),
                    haystack_terms: terms(&["disabilità", "inclusione"]),
                },
                TopicRule {
                    topic: Topic::Employment,
                    query_terms: terms(&["lavoro", "caf", "inps", "inail"]),
                    haystack_terms: terms(&["lavoro", "caf"]),
                },
            ],
            protection_terms: terms(&["antiviolenza", "casa rifugio", "protezione"]),
            hotline: ContactMarker::new("tel:1522", "1522"),
            emergency: ContactMarker::new("tel:112", "112"),
            max_candidates: 2,
        }
    }
}

impl RoutingRules {
    pub fn topic_rule(&self, topic: Topic) -> Option<&TopicRule> {
        self.topics.iter().find(|r| r.topic == topic)
    }

    /// Reject tables that would make routing silently inert.
    pub fn validate(&self) -> Result<()> {
        if self.urgency_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(GraphrouteError::Config(
                "routing.urgency_phrases must not be empty".to_string(),
            ));
        }
        for rule in &self.topics {
            if rule.query_terms.is_empty() || rule.haystack_terms.is_empty() {
                return Err(GraphrouteError::Config(format!(
                    "routing topic {:?} needs both query_terms and haystack_terms",
                    rule.topic
                )));
            }
        }
        for (label, marker) in [("hotline", &self.hotline), ("emergency", &self.emergency)] {
            if marker.url_marker.trim().is_empty() || marker.name_marker.trim().is_empty() {
                return Err(GraphrouteError::Config(format!(
                    "routing.{} markers must not be blank",
                    label
                )));
            }
        }
        if self.max_candidates == 0 {
            return Err(GraphrouteError::Config(
                "routing.max_candidates must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
