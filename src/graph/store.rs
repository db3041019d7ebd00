//! petgraph-backed implementation of [`MultiGraph`].

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef as _;
use petgraph::Direction;

use super::{Attributes, EdgeRef, MultiGraph, NodeRef};
use crate::error::{GraphrouteError, Result};

#[derive(Debug, Clone)]
struct NodeData {
    id: String,
    attrs: Attributes,
}

#[derive(Debug, Clone)]
struct EdgeData {
    key: String,
    attrs: Attributes,
}

/// Directed multigraph of services, channels and escalation contacts.
///
/// Parallel edges between the same pair are kept apart by their key.
#[derive(Debug, Clone, Default)]
pub struct ServiceGraph {
    graph: DiGraph<NodeData, EdgeData>,
    node_index: HashMap<String, NodeIndex>,
    edge_index: HashMap<String, EdgeIndex>,
}

impl ServiceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn edge_ref(&self, idx: EdgeIndex) -> Option<EdgeRef<'_>> {
        let (src, dst) = self.graph.edge_endpoints(idx)?;
        let data = &self.graph[idx];
        Some(EdgeRef {
            key: &data.key,
            src: &self.graph[src].id,
            dst: &self.graph[dst].id,
            attrs: &data.attrs,
        })
    }
}

impl MultiGraph for ServiceGraph {
    fn add_node(&mut self, id: &str, attrs: Attributes) {
        if let Some(&idx) = self.node_index.get(id) {
            self.graph[idx].attrs.extend(attrs);
            return;
        }
        let idx = self.graph.add_node(NodeData {
            id: id.to_string(),
            attrs,
        });
        self.node_index.insert(id.to_string(), idx);
    }

    fn add_edge(&mut self, src: &str, dst: &str, key: &str, attrs: Attributes) -> Result<()> {
        let src_idx = *self
            .node_index
            .get(src)
            .ok_or_else(|| GraphrouteError::NodeNotFound(src.to_string()))?;
        let dst_idx = *self
            .node_index
            .get(dst)
            .ok_or_else(|| GraphrouteError::NodeNotFound(dst.to_string()))?;

        if let Some(&existing) = self.edge_index.get(key) {
            if self.graph.edge_endpoints(existing) == Some((src_idx, dst_idx)) {
                self.graph[existing].attrs.extend(attrs);
                return Ok(());
            }
            return Err(GraphrouteError::InvalidInput(format!(
                "edge key {} already links different nodes",
                key
            )));
        }

        let idx = self.graph.add_edge(
            src_idx,
            dst_idx,
            EdgeData {
                key: key.to_string(),
                attrs,
            },
        );
        self.edge_index.insert(key.to_string(), idx);
        Ok(())
    }

    fn nodes(&self) -> Vec<NodeRef<'_>> {
        self.graph
            .node_indices()
            .map(|idx| {
                let data = &self.graph[idx];
                NodeRef {
                    id: &data.id,
                    attrs: &data.attrs,
                }
            })
            .collect()
    }

    fn node(&self, id: &str) -> Option<NodeRef<'_>> {
        let data = &self.graph[*self.node_index.get(id)?];
        Some(NodeRef {
            id: &data.id,
            attrs: &data.attrs,
        })
    }

    fn out_edges(&self, id: &str) -> Vec<EdgeRef<'_>> {
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest first
        let mut indices: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.id())
            .collect();
        indices.sort();
        indices
            .into_iter()
            .filter_map(|e| self.edge_ref(e))
            .collect()
    }

    fn edges(&self) -> Vec<EdgeRef<'_>> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.edge_ref(e))
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
