use std::collections::HashMap;
use std::fmt::Write;

use petgraph::dot::Dot;
use petgraph::graph::DiGraph;

use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::AnalysisError;
use crate::models::{Analysis, Graph, NodeRole, TransactionSummary};

pub const EMPTY_GRAPH_PLACEHOLDER: &str = "No graph to display";
pub const CONTRACT_CREATION: &str = "Contract creation";

pub fn render_analysis(analysis: &Analysis, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(analysis),
        OutputFormat::Json => serde_json::to_string_pretty(analysis)?,
        OutputFormat::Dot => render_dot(&analysis.graph),
    })
}

/// Errors never carry a partial graph.
pub fn render_error(err: &AnalysisError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => json!({
            "error": { "kind": err.kind(), "message": err.to_string() },
            "graph": Graph::default(),
        })
        .to_string(),
        OutputFormat::Text | OutputFormat::Dot => format!("Error: {}", err),
    }
}

fn status_text(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "success",
        Some(false) => "failed",
        None => "unknown",
    }
}

pub fn render_summary(summary: &TransactionSummary) -> String {
    let mut out = String::new();
    let to = summary.to.as_deref().unwrap_or(CONTRACT_CREATION);
    let block = summary
        .block_number
        .map_or_else(|| "pending".to_string(), |n| n.to_string());

    let _ = writeln!(out, "Transaction:  {}", summary.hash);
    let _ = writeln!(out, "Status:       {}", status_text(summary.status));
    let _ = writeln!(out, "Block:        {}", block);
    let _ = writeln!(out, "From:         {}", summary.from);
    let _ = writeln!(out, "To:           {}", to);
    if let Some(created) = &summary.created_contract {
        let _ = writeln!(out, "Created:      {}", created);
    }
    let _ = writeln!(out, "Value:        {} ETH", summary.value_eth);
    let _ = writeln!(out, "Gas used:     {}", summary.gas_used);
    let _ = writeln!(out, "Gas price:    {} gwei", summary.effective_gas_price_gwei);
    let _ = writeln!(out, "Fee:          {} ETH", summary.fee_eth);
    let _ = writeln!(out, "Logs:         {}", summary.log_count);
    out
}

pub fn render_graph_text(graph: &Graph) -> String {
    if graph.is_empty() {
        return format!("{}\n", EMPTY_GRAPH_PLACEHOLDER);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Nodes:");
    for node in &graph.nodes {
        let _ = writeln!(
            out,
            "  [{:?}] {} size={} at ({}, {})",
            node.role, node.label, node.size, node.position.x, node.position.y
        );
    }
    let _ = writeln!(out, "Edges:");
    for edge in &graph.edges {
        match &edge.label {
            Some(label) => {
                let _ = writeln!(out, "  {} -> {} [{}]", edge.source, edge.target, label);
            }
            None => {
                let _ = writeln!(out, "  {} -> {}", edge.source, edge.target);
            }
        }
    }
    out
}

fn render_text(analysis: &Analysis) -> String {
    format!(
        "{}\n{}",
        render_summary(&analysis.summary),
        render_graph_text(&analysis.graph)
    )
}

/// Graphviz output. Node ids are positional; labels are escaped by petgraph.
pub fn render_dot(graph: &Graph) -> String {
    let mut dot_graph: DiGraph<String, String> = DiGraph::new();
    let mut indices = HashMap::new();

    for node in &graph.nodes {
        indices.insert(node.id.as_str(), dot_graph.add_node(node.label.clone()));
    }
    for edge in &graph.edges {
        if let (Some(&source), Some(&target)) = (
            indices.get(edge.source.as_str()),
            indices.get(edge.target.as_str()),
        ) {
            dot_graph.add_edge(source, target, edge.label.clone().unwrap_or_default());
        }
    }
    if graph.is_empty() {
        dot_graph.add_node(EMPTY_GRAPH_PLACEHOLDER.to_string());
    }

    let edge_attrs = |_, _| String::new();
    let node_attrs = |_, (idx, _): (petgraph::graph::NodeIndex, _)| match graph.nodes.get(idx.index()) {
            Some(node) => {
                let color = match node.role {
                    NodeRole::Sender => "#1f77b4",
                    NodeRole::Receiver => "#2ca02c",
                    NodeRole::Contract => "#ff7f0e",
                };
                // Graphviz sizes are in inches; the layout units are points.
                format!(
                    "pos = \"{},{}!\" width = {:.2} style = filled fillcolor = \"{}\" ",
                    node.position.x,
                    -node.position.y,
                    node.size / 72.0,
                    color
                )
            }
            None => "shape = plaintext ".to_string(),
        };
    let dot = Dot::with_attr_getters(&dot_graph, &[], &edge_attrs, &node_attrs);
    format!("{}", dot)
}
