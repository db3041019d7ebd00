//! Rule-based routing: classify the query, pick services, assemble contacts.

mod classifier;
mod escalation;
mod rules;
mod selector;

pub use classifier::{classify, haystack_matches, is_protection_centre, Classification};
pub use escalation::{assemble, is_injected, EmergencyContact, RouteRecord, EMERGENCY_112, RULE_INJECTED};
pub use rules::{ContactMarker, RoutingRules, Topic, TopicRule};
pub use selector::select_candidates;

use crate::graph::MultiGraph;

/// Routes queries with a fixed rule table. Holds no per-query state.
#[derive(Debug, Clone, Default)]
pub struct Router {
    rules: RoutingRules,
}

impl Router {
    pub fn new(rules: RoutingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    pub fn route<G: MultiGraph>(&self, graph: &G, query: &str) -> Vec<RouteRecord> {
        let classification = classify(query, &self.rules);
        select_candidates(graph, &classification, &self.rules)
            .iter()
            .filter_map(|id| assemble(graph, id, classification.urgent, &self.rules))
            .collect()
    }
}

/// Route `query` over `graph` with the built-in rules.
pub fn route<G: MultiGraph>(graph: &G, query: &str) -> Vec<RouteRecord> {
    Router::default().route(graph, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{attr_str, load_from_readers, Attributes, ServiceGraph};

    fn load(nodes: &str, edges: &str) -> ServiceGraph {
        let mut g = ServiceGraph::new();
        load_from_readers(&mut g, nodes.as_bytes(), edges.as_bytes()).unwrap();
        g
    }

    fn ids(records: &[Attributes]) -> Vec<&str> {
        records.iter().map(|r| attr_str(r, "id")).collect()
    }

    const NODES: &str = "\
id,type,name,description,tags,url
caf,service,CAF Patronato,Assistenza fiscale e pratiche INPS,\"caf,lavoro\",
cav,service,Centro Antiviolenza Roma,Accoglienza e ascolto,\"antiviolenza,tutela\",
inc,service,Sportello Inclusione,Supporto disabilità e legge 104,inclusione,
ch_tel,channel,Telefono sportello,,,tel:0600000
ch_mail,channel,Email,,,mailto:info@example.it
h1522,hotline,Numero antiviolenza e stalking 1522,Gratuito h24,,tel:1522
social,contact,Servizi sociali municipio,,,
";

    const EDGES: &str = "\
id,src,dst,rel,weight,properties
e1,cav,ch_tel,has_channel,1,\"{\"\"availability\"\":\"\"h24\"\"}\"
e2,cav,social,escalates_to,0.5,
e3,cav,h1522,escalates_to,0.9,\"{\\condition\"\":\"\"urgente\"\"}\"
e4,caf,ch_mail,has_channel,,
e5,inc,ch_mail,has_channel,,{}
";

    #[test]
    fn test_scenario_single_service_self_escalation() {
        let nodes = "id,type,name,tags\ns1,service,Centro Antiviolenza Roma,\"antiviolenza,tutela\"\n";
        let edges = "id,src,dst,rel,properties\ne1,s1,s1,escalates_to,\"{\"\"note\"\":\"\"self\"\"}\"\n";
        let g = load(nodes, edges);

        let query = "ho paura, mi sta seguendo adesso";
        let rules = RoutingRules::default();
        let classification = classify(query, &rules);
        assert!(classification.urgent);
        assert_eq!(select_candidates(&g, &classification, &rules), vec!["s1"]);

        let result = route(&g, query);
        assert_eq!(result.len(), 1);
        assert_eq!(attr_str(&result[0].service, "id"), "s1");
        assert_eq!(ids(&result[0].escalations), vec!["emergency_112", "s1"]);
        assert!(is_injected(&result[0].escalations[0]));
        assert!(result[0].channels.is_empty());
    }

    #[test]
    fn test_violence_query_routes_to_centre_with_hotline_first() {
        let g = load(NODES, EDGES);
        let result = route(&g, "ho subìto violenza, ho paura");
        assert_eq!(result.len(), 1);
        assert_eq!(attr_str(&result[0].service, "id"), "cav");
        assert_eq!(ids(&result[0].channels), vec!["ch_tel"]);
        assert_eq!(ids(&result[0].escalations), vec!["h1522", "social"]);
    }

    #[test]
    fn test_urgent_query_returns_single_record() {
        let g = load(NODES, EDGES);
        let result = route(&g, "pericolo, lavoro e disabilità");
        assert_eq!(result.len(), 1);
        assert_eq!(attr_str(&result[0].service, "id"), "caf");
        assert_eq!(ids(&result[0].escalations), vec!["emergency_112"]);
    }

    #[test]
    fn test_urgent_prefers_centre_even_when_not_first() {
        let g = load(NODES, EDGES);
        let result = route(&g, "mi segue uno sconosciuto");
        assert_eq!(result.len(), 1);
        assert_eq!(attr_str(&result[0].service, "id"), "cav");
        assert_eq!(ids(&result[0].escalations), vec!["emergency_112", "h1522", "social"]);
    }

    #[test]
    fn test_fallback_returns_first_two_services() {
        let g = load(NODES, EDGES);
        let result = route(&g, "vorrei informazioni");
        let services: Vec<_> = result.iter().map(|r| attr_str(&r.service, "id")).collect();
        assert_eq!(services, vec!["caf", "cav"]);
    }

    #[test]
    fn test_route_is_idempotent() {
        let g = load(NODES, EDGES);
        for query in ["stalking", "adesso", "104", "niente"] {
            assert_eq!(route(&g, query), route(&g, query));
        }
    }

    #[test]
    fn test_length_bounds() {
        let g = load(NODES, EDGES);
        for query in ["lavoro caf inps", "violenza 104 lavoro", "emergenza", "qualcosa", ""] {
            let urgent = classify(query, &RoutingRules::default()).urgent;
            let len = route(&g, query).len();
            assert!(len <= 2);
            if urgent {
                assert!(len <= 1);
            }
        }
    }

    #[test]
    fn test_no_services_yields_empty() {
        let g = load("id,type,name\nc1,channel,Email\n", "id,src,dst,rel\n");
        assert!(route(&g, "pericolo").is_empty());
        assert!(route(&g, "lavoro").is_empty());
    }

    #[test]
    fn test_custom_rules() {
        let g = load(NODES, EDGES);
        let rules = RoutingRules {
            max_candidates: 1,
            ..RoutingRules::default()
        };
        let router = Router::new(rules);
        assert_eq!(router.rules().max_candidates, 1);
        assert_eq!(router.route(&g, "vorrei informazioni").len(), 1);
    }

    #[test]
    fn test_serialized_shape() {
        let g = load(NODES, EDGES);
        let result = route(&g, "stalking");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json[0]["service"]["name"], "Centro Antiviolenza Roma");
        assert_eq!(json[0]["channels"][0]["url"], "tel:0600000");
        assert!(json[0]["escalations"].is_array());
    }
}
