//! Choose the service nodes a query is routed to.

use super::classifier::{haystack_matches, is_protection_centre, Classification};
use super::rules::RoutingRules;
use crate::graph::MultiGraph;

/// Ordered ids of the selected services: at most one when urgent, otherwise
/// at most `rules.max_candidates`.
///
/// Services qualify in graph order when any triggered topic is satisfied by
/// their haystack. With no qualifying service every service is a candidate.
pub fn select_candidates<G: MultiGraph>(
    graph: &G,
    classification: &Classification,
    rules: &RoutingRules,
) -> Vec<String> {
    let services: Vec<_> = graph.nodes().into_iter().filter(|n| n.is_service()).collect();

    let mut candidates: Vec<_> = services
        .iter()
        .filter(|node| {
            let hay = node.haystack();
            classification
                .topics
                .iter()
                .any(|&topic| haystack_matches(&hay, topic, rules))
        })
        .copied()
        .collect();

    if candidates.is_empty() {
        log::debug!("No topical match, falling back to all {} services", services.len());
        candidates = services;
    }

    let selected: Vec<String> = if classification.urgent {
        candidates
            .iter()
            .find(|node| is_protection_centre(&node.haystack(), rules))
            .or_else(|| candidates.first())
            .map(|node| vec![node.id.to_string()])
            .unwrap_or_default()
    } else {
        candidates
            .iter()
            .take(rules.max_candidates)
            .map(|node| node.id.to_string())
            .collect()
    };

    log::debug!("Selected services: {:?}", selected);
    selected
}
