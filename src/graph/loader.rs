//! Build a [`ServiceGraph`] from the nodes and edges CSV sources.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;

use super::{parse_properties, validate_columns, Attributes, MultiGraph, ServiceGraph};
use crate::error::Result;

pub const REQUIRED_NODE_COLUMNS: [&str; 3] = ["id", "type", "name"];
pub const REQUIRED_EDGE_COLUMNS: [&str; 4] = ["id", "src", "dst", "rel"];

/// Edge columns that shape the graph rather than describe the edge.
const STRUCTURAL_EDGE_COLUMNS: [&str; 4] = ["id", "src", "dst", "properties"];

/// Load both CSV files into a fresh graph.
pub fn load_graph(nodes_path: &Path, edges_path: &Path) -> Result<ServiceGraph> {
    let nodes = File::open(nodes_path)?;
    let edges = File::open(edges_path)?;

    let nodes_label = nodes_path.display().to_string();
    let edges_label = edges_path.display().to_string();

    let mut graph = ServiceGraph::new();
    load_sources(&mut graph, (nodes_label.as_str(), nodes), (edges_label.as_str(), edges))?;
    log::info!(
        "Loaded graph: {} nodes, {} edges ({}, {})",
        graph.node_count(),
        graph.edge_count(),
        nodes_path.display(),
        edges_path.display()
    );
    Ok(graph)
}

/// Load CSV content from arbitrary readers into `graph`.
pub fn load_from_readers<G, N, E>(graph: &mut G, nodes: N, edges: E) -> Result<()>
where
    G: MultiGraph,
    N: Read,
    E: Read,
{
    load_sources(graph, ("<nodes>", nodes), ("<edges>", edges))
}

fn load_sources<G, N, E>(graph: &mut G, nodes: (&str, N), edges: (&str, E)) -> Result<()>
where
    G: MultiGraph,
    N: Read,
    E: Read,
{
    // All nodes first so edge endpoints resolve regardless of row order.
    load_nodes(graph, nodes.0, nodes.1)?;
    load_edges(graph, edges.0, edges.1)
}

/// Short rows are accepted; their trailing columns read as absent.
fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(source)
}

fn load_nodes<G: MultiGraph, R: Read>(graph: &mut G, label: &str, source: R) -> Result<()> {
    let mut rdr = reader(source);
    let headers = rdr.headers()?.clone();
    validate_columns(label, headers.iter(), &REQUIRED_NODE_COLUMNS)?;

    for record in rdr.records() {
        let record = record?;
        let attrs = row_attributes(&headers, &record, &[]);
        let id = field(&headers, &record, "id").unwrap_or("").to_string();
        graph.add_node(&id, attrs);
    }
    Ok(())
}

fn load_edges<G: MultiGraph, R: Read>(graph: &mut G, label: &str, source: R) -> Result<()> {
    let mut rdr = reader(source);
    let headers = rdr.headers()?.clone();
    validate_columns(label, headers.iter(), &REQUIRED_EDGE_COLUMNS)?;
    // Without the column, a numeric weight from the properties is kept.
    let has_weight_column = headers.iter().any(|h| h == "weight");

    for record in rdr.records() {
        let record = record?;
        let key = field(&headers, &record, "id").unwrap_or("");
        let src = field(&headers, &record, "src").unwrap_or("");
        let dst = field(&headers, &record, "dst").unwrap_or("");
        let rel = field(&headers, &record, "rel").unwrap_or("");

        let context = format!("edge {} ({} -> {})", key, src, dst);
        let mut attrs = parse_properties(field(&headers, &record, "properties"), &context);
        attrs.extend(row_attributes(
            &headers,
            &record,
            &STRUCTURAL_EDGE_COLUMNS,
        ));
        attrs.insert("rel".to_string(), Value::from(rel));
        let weight = if has_weight_column {
            parse_weight(field(&headers, &record, "weight"), &context)
        } else {
            attrs.get("weight").and_then(Value::as_f64).unwrap_or(0.0)
        };
        attrs.insert("weight".to_string(), Value::from(weight));

        // Dangling endpoints and clashing keys are data defects, not load failures.
        if let Err(e) = graph.add_edge(src, dst, key, attrs) {
            log::warn!("Skipping {}: {}", context, e);
        }
    }
    Ok(())
}

fn field<'r>(headers: &StringRecord, record: &'r StringRecord, column: &str) -> Option<&'r str> {
    headers
        .iter()
        .position(|h| h == column)
        .and_then(|i| record.get(i))
}

/// Every column except `skip` as a string attribute, in header order.
fn row_attributes(headers: &StringRecord, record: &StringRecord, skip: &[&str]) -> Attributes {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(h, _)| !skip.contains(h))
        .map(|(h, v)| (h.to_string(), Value::from(v)))
        .collect()
}

fn parse_weight(raw: Option<&str>, context: &str) -> f64 {
    let raw = raw.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(w) if w.is_finite() => w,
        _ => {
            log::warn!("Invalid weight {:?} for {}, using 0", raw, context);
            0.0
        }
    }
}
