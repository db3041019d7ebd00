//! Channels and escalation contacts for a selected service.

use serde::Serialize;
use serde_json::Value;

use super::rules::{ContactMarker, RoutingRules};
use crate::graph::{attr_str, Attributes, MultiGraph, REL_ESCALATES_TO, REL_HAS_CHANNEL};

/// Provenance tag carried only by records the router synthesizes.
pub const RULE_INJECTED: &str = "rule_injected";

/// The universal emergency contact, added for urgent queries when the data
/// lacks one. Never stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmergencyContact {
    pub id: &'static str,
    pub node_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
    pub jurisdiction: &'static str,
}

pub const EMERGENCY_112: EmergencyContact = EmergencyContact {
    id: "emergency_112",
    node_type: "emergency",
    name: "Numero Unico di Emergenza 112",
    description: "Pericolo immediato: chiama il 112 (NUE), attivo 24 ore su 24",
    url: "tel:112",
    jurisdiction: "IT",
};

impl EmergencyContact {
    pub fn to_record(&self) -> Attributes {
        let mut record = Attributes::new();
        record.insert("id".to_string(), self.id.into());
        record.insert("type".to_string(), self.node_type.into());
        record.insert("name".to_string(), self.name.into());
        record.insert("description".to_string(), self.description.into());
        record.insert("url".to_string(), self.url.into());
        record.insert("jurisdiction".to_string(), self.jurisdiction.into());
        record.insert("source".to_string(), RULE_INJECTED.into());
        record
    }
}

/// True for records synthesized by the router rather than loaded from data.
pub fn is_injected(record: &Attributes) -> bool {
    record.get("source").and_then(Value::as_str) == Some(RULE_INJECTED)
}

/// One routed service with its contact points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    pub service: Attributes,
    pub channels: Vec<Attributes>,
    pub escalations: Vec<Attributes>,
}

fn is_contact(record: &Attributes, marker: &ContactMarker) -> bool {
    marker.matches(attr_str(record, "url"), attr_str(record, "name"))
}

/// Records of nodes reached from `service_id` through `rel` edges.
fn neighbours<G: MultiGraph>(graph: &G, service_id: &str, rel: &str) -> Vec<Attributes> {
    graph
        .out_edges(service_id)
        .into_iter()
        .filter(|edge| edge.rel() == rel)
        .filter_map(|edge| match graph.node(edge.dst) {
            Some(node) => Some(node.to_record()),
            None => {
                log::warn!("Edge {} points at unknown node {}", edge.key, edge.dst);
                None
            }
        })
        .collect()
}

/// Assemble the routing record for one service.
///
/// Escalations put the reference hotline first. For urgent queries lacking
/// the universal emergency number, [`EMERGENCY_112`] is prepended.
/// Returns `None` when `service_id` is not in the graph.
pub fn assemble<G: MultiGraph>(
    graph: &G,
    service_id: &str,
    urgent: bool,
    rules: &RoutingRules,
) -> Option<RouteRecord> {
    let service = graph.node(service_id)?.to_record();
    let channels = neighbours(graph, service_id, REL_HAS_CHANNEL);

    let mut escalations = neighbours(graph, service_id, REL_ESCALATES_TO);
    // Stable: everything else keeps its edge order.
    escalations.sort_by_key(|record| !is_contact(record, &rules.hotline));

    if urgent && !escalations.iter().any(|r| is_contact(r, &rules.emergency)) {
        log::debug!("Injecting {} for urgent route to {}", EMERGENCY_112.id, service_id);
        escalations.insert(0, EMERGENCY_112.to_record());
    }

    Some(RouteRecord {
        service,
        channels,
        escalations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ServiceGraph;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    fn rel(r: &str) -> Attributes {
        attrs(json!({"rel": r, "weight": 0.0}))
    }

    fn ids(records: &[Attributes]) -> Vec<&str> {
        records.iter().map(|r| attr_str(r, "id")).collect()
    }

    fn graph() -> ServiceGraph {
        let mut g = ServiceGraph::new();
        g.add_node("s1", attrs(json!({"id": "s1", "type": "service", "name": "Centro Antiviolenza"})));
        g.add_node("tel", attrs(json!({"type": "channel", "name": "Telefono", "url": "tel:0612345"})));
        g.add_node("mail", attrs(json!({"type": "channel", "name": "Email", "url": "mailto:x@y.it"})));
        g.add_node("social", attrs(json!({"type": "contact", "name": "Servizi sociali"})));
        g.add_node("hotline", attrs(json!({"type": "hotline", "name": "Antiviolenza", "url": "tel:1522"})));
        g.add_node("police", attrs(json!({"type": "emergency", "name": "Carabinieri 112"})));
        g.add_edge("s1", "tel", "e1", rel("has_channel")).unwrap();
        g.add_edge("s1", "social", "e2", rel("escalates_to")).unwrap();
        g.add_edge("s1", "mail", "e3", rel("has_channel")).unwrap();
        g.add_edge("s1", "hotline", "e4", rel("escalates_to")).unwrap();
        g
    }

    #[test]
    fn test_channels_in_edge_order() {
        let g = graph();
        let record = assemble(&g, "s1", false, &RoutingRules::default()).unwrap();
        assert_eq!(ids(&record.channels), vec!["tel", "mail"]);
        assert_eq!(attr_str(&record.service, "id"), "s1");
    }

    #[test]
    fn test_hotline_sorted_first() {
        let g = graph();
        let record = assemble(&g, "s1", false, &RoutingRules::default()).unwrap();
        assert_eq!(ids(&record.escalations), vec!["hotline", "social"]);
    }

    #[test]
    fn test_urgent_injects_emergency_first() {
        let g = graph();
        let record = assemble(&g, "s1", true, &RoutingRules::default()).unwrap();
        assert_eq!(ids(&record.escalations), vec!["emergency_112", "hotline", "social"]);
        assert!(is_injected(&record.escalations[0]));
        assert_eq!(record.escalations[0]["url"], "tel:112");
        assert!(!is_injected(&record.escalations[1]));
        assert_eq!(record.escalations.iter().filter(|r| is_injected(r)).count(), 1);
    }

    #[test]
    fn test_urgent_keeps_existing_emergency_contact() {
        let mut g = graph();
        g.add_edge("s1", "police", "e5", rel("escalates_to")).unwrap();
        let record = assemble(&g, "s1", true, &RoutingRules::default()).unwrap();
        assert_eq!(ids(&record.escalations), vec!["hotline", "social", "police"]);
        assert!(!record.escalations.iter().any(is_injected));
    }

    #[test]
    fn test_not_urgent_never_injects() {
        let g = graph();
        let record = assemble(&g, "s1", false, &RoutingRules::default()).unwrap();
        assert!(!record.escalations.iter().any(is_injected));
    }

    #[test]
    fn test_unknown_service() {
        let g = graph();
        assert!(assemble(&g, "ghost", true, &RoutingRules::default()).is_none());
    }

    #[test]
    fn test_emergency_record_shape() {
        let record = EMERGENCY_112.to_record();
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "type", "name", "description", "url", "jurisdiction", "source"]);
        assert_eq!(record["jurisdiction"], "IT");
    }
}
