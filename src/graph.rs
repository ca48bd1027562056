//! Turns a fetched transaction and receipt into a node/edge description for the renderer.
//!
//! Node ids are lowercased addresses, so log addresses that differ only in case share a
//! node. Output order is stable: sender, receiver, then log-emitting contracts in the
//! order their first log appears.

use std::collections::HashMap;

use crate::models::{
    Graph, GraphEdge, GraphNode, NodeRole, Position, ReceiptRecord, TransactionRecord,
};
use crate::units::{format_ether, truncate_address};

pub const SENDER_POSITION: Position = Position { x: 100.0, y: 200.0 };
pub const RECEIVER_POSITION: Position = Position { x: 400.0, y: 200.0 };
const CONTRACT_X: f64 = 700.0;
const CONTRACT_Y_START: f64 = 50.0;
const CONTRACT_Y_STEP: f64 = 100.0;

pub const BASE_NODE_SIZE: f64 = 40.0;
pub const SIZE_PER_EVENT: f64 = 10.0;

/// How receiver→contract edges are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EdgeLabelMode {
    #[default]
    None,
    /// Label with the indices of the logs the contract emitted, e.g. `#0, #3`.
    EventIndex,
}

#[derive(Debug, Default)]
struct Emitter {
    count: usize,
    log_indices: Vec<u64>,
}

/// Emission counts per lowercased address, remembering first-seen order.
#[derive(Debug, Default)]
struct EmissionTable {
    order: Vec<String>,
    emitters: HashMap<String, Emitter>,
}

impl EmissionTable {
    fn from_receipt(receipt: &ReceiptRecord) -> Self {
        let mut table = Self::default();
        for (position, log) in receipt.logs.iter().enumerate() {
            let id = log.address.to_lowercase();
            let emitter = table.emitters.entry(id.clone()).or_insert_with(|| {
                table.order.push(id);
                Emitter::default()
            });
            emitter.count += 1;
            emitter
                .log_indices
                .push(log.log_index.unwrap_or(position as u64));
        }
        table
    }

    fn count(&self, id: &str) -> usize {
        self.emitters.get(id).map_or(0, |e| e.count)
    }
}

pub fn node_size(emission_count: usize) -> f64 {
    BASE_NODE_SIZE + emission_count as f64 * SIZE_PER_EVENT
}

fn counted_label(address: &str, count: usize) -> String {
    let noun = if count == 1 { "event" } else { "events" };
    format!("{} ({} {})", truncate_address(address), count, noun)
}

pub fn synthesize(tx: &TransactionRecord, receipt: &ReceiptRecord, mode: EdgeLabelMode) -> Graph {
    let table = EmissionTable::from_receipt(receipt);
    let mut graph = Graph::default();

    let sender_id = tx.sender.to_lowercase();
    let receiver_id = tx.receiver.as_deref().map(str::to_lowercase);

    graph.nodes.push(GraphNode {
        id: sender_id.clone(),
        position: SENDER_POSITION,
        label: truncate_address(&sender_id),
        role: NodeRole::Sender,
        emission_count: table.count(&sender_id),
        size: BASE_NODE_SIZE,
    });

    if let Some(receiver_id) = receiver_id.as_ref().filter(|id| **id != sender_id) {
        let count = table.count(receiver_id);
        graph.nodes.push(GraphNode {
            id: receiver_id.clone(),
            position: RECEIVER_POSITION,
            label: counted_label(receiver_id, count),
            role: NodeRole::Receiver,
            emission_count: count,
            size: node_size(count),
        });
    }

    let contracts: Vec<&String> = table
        .order
        .iter()
        .filter(|id| **id != sender_id && Some(*id) != receiver_id.as_ref())
        .collect();

    for (row, id) in contracts.iter().enumerate() {
        let count = table.count(id);
        graph.nodes.push(GraphNode {
            id: (*id).clone(),
            position: Position {
                x: CONTRACT_X,
                y: CONTRACT_Y_START + row as f64 * CONTRACT_Y_STEP,
            },
            label: counted_label(id, count),
            role: NodeRole::Contract,
            emission_count: count,
            size: node_size(count),
        });
    }

    let Some(receiver_id) = receiver_id else {
        return graph;
    };

    graph.edges.push(GraphEdge {
        id: format!("e-{}-{}", sender_id, receiver_id),
        source: sender_id,
        target: receiver_id.clone(),
        label: Some(format!("{} ETH", format_ether(tx.value_wei))),
    });

    for id in contracts {
        let label = match mode {
            EdgeLabelMode::None => None,
            EdgeLabelMode::EventIndex => table.emitters.get(id).map(|e| {
                e.log_indices
                    .iter()
                    .map(|i| format!("#{}", i))
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        };
        graph.edges.push(GraphEdge {
            id: format!("e-{}-{}", receiver_id, id),
            source: receiver_id.clone(),
            target: id.clone(),
            label,
        });
    }

    graph
}
