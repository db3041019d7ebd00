//! Urgency and topic signals derived from a free-text query.

use serde::Serialize;

use super::rules::{RoutingRules, Topic};

/// Per-query signals. Built fresh for every query and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub urgent: bool,
    /// Topics whose query-side terms appear, in rule order.
    pub topics: Vec<Topic>,
}

impl Classification {
    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }
}

fn contains_any(text: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .any(|t| !t.is_empty() && text.contains(&t.to_lowercase()))
}

pub fn classify(query: &str, rules: &RoutingRules) -> Classification {
    let q = query.to_lowercase();
    let urgent = contains_any(&q, &rules.urgency_phrases);
    let topics = rules
        .topics
        .iter()
        .filter(|rule| contains_any(&q, &rule.query_terms))
        .map(|rule| rule.topic)
        .collect();

    let classification = Classification { urgent, topics };
    log::debug!("Classified query {:?}: {:?}", query, classification);
    classification
}

/// True if `haystack` satisfies any of the terms paired with `topic`.
pub fn haystack_matches(haystack: &str, topic: Topic, rules: &RoutingRules) -> bool {
    rules
        .topic_rule(topic)
        .map(|rule| contains_any(haystack, &rule.haystack_terms))
        .unwrap_or(false)
}

/// True if `haystack` describes an anti-violence or protection centre.
pub fn is_protection_centre(haystack: &str, rules: &RoutingRules) -> bool {
    contains_any(haystack, &rules.protection_terms)
}
