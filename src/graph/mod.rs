//! Service graph module: property recovery, CSV loading and the multigraph store.
//!
//! Nodes and edges carry open attribute maps. The routing engine only talks to
//! the [`MultiGraph`] trait, so any store exposing these primitives will do.

mod loader;
mod properties;
mod schema;
mod store;

pub use loader::{load_graph, load_from_readers, REQUIRED_EDGE_COLUMNS, REQUIRED_NODE_COLUMNS};
pub use properties::{parse_properties, try_parse_properties};
pub use schema::validate_columns;
pub use store::ServiceGraph;

use crate::error::Result;

/// Untyped attribute mapping, kept in source column order.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Relationship label linking a service to one of its contact channels.
pub const REL_HAS_CHANNEL: &str = "has_channel";
/// Relationship label linking a service to a higher-tier contact.
pub const REL_ESCALATES_TO: &str = "escalates_to";
/// Node type eligible for routing.
pub const SERVICE_TYPE: &str = "service";

/// Borrowed view of one node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub id: &'a str,
    pub attrs: &'a Attributes,
}

impl<'a> NodeRef<'a> {
    /// String attribute, or "" when absent or not a string.
    pub fn attr(&self, key: &str) -> &'a str {
        attr_str(self.attrs, key)
    }

    pub fn node_type(&self) -> &'a str {
        self.attr("type")
    }

    pub fn is_service(&self) -> bool {
        self.node_type() == SERVICE_TYPE
    }

    /// Lower-cased name, description and tags joined by spaces.
    pub fn haystack(&self) -> String {
        [self.attr("name"), self.attr("description"), self.attr("tags")]
            .join(" ")
            .to_lowercase()
    }

    /// Attributes with `id` placed first.
    pub fn to_record(&self) -> Attributes {
        let mut record = Attributes::new();
        record.insert("id".to_string(), self.id.into());
        for (key, value) in self.attrs {
            if key != "id" {
                record.insert(key.clone(), value.clone());
            }
        }
        record
    }
}

/// Borrowed view of one directed edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRef<'a> {
    pub key: &'a str,
    pub src: &'a str,
    pub dst: &'a str,
    pub attrs: &'a Attributes,
}

impl<'a> EdgeRef<'a> {
    pub fn rel(&self) -> &'a str {
        attr_str(self.attrs, "rel")
    }

    pub fn weight(&self) -> f64 {
        self.attrs
            .get("weight")
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }
}

/// Minimal directed multigraph the router depends on.
pub trait MultiGraph {
    /// Insert a node, merging attributes into an existing node with the same id.
    fn add_node(&mut self, id: &str, attrs: Attributes);

    /// Insert an edge identified by `key`. Both endpoints must already exist.
    fn add_edge(&mut self, src: &str, dst: &str, key: &str, attrs: Attributes) -> Result<()>;

    /// All nodes, in insertion order.
    fn nodes(&self) -> Vec<NodeRef<'_>>;

    fn node(&self, id: &str) -> Option<NodeRef<'_>>;

    /// Outgoing edges of `id`, in insertion order. Unknown ids yield nothing.
    fn out_edges(&self, id: &str) -> Vec<EdgeRef<'_>>;

    /// All edges, in insertion order.
    fn edges(&self) -> Vec<EdgeRef<'_>>;

    fn node_count(&self) -> usize;

    fn edge_count(&self) -> usize;
}

pub(crate) fn attr_str<'a>(attrs: &'a Attributes, key: &str) -> &'a str {
    attrs.get(key).and_then(|v| v.as_str()).unwrap_or("")
}
