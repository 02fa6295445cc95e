//! Net Builder
//!
//! Builds an undirected connectivity graph over component terminals and
//! board pins using petgraph. Explicit wires become edges; a breadboard
//! contributes its internal rail and strip ties the same way, so the
//! resolver never needs to know where an edge came from.

pub mod resolver;

pub use resolver::{resolve_nets, NetId, NetMap};

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::parser::pinout::{
    rail_terminal, strip_terminal, PROTOBOARD_COLUMNS, PROTOBOARD_RAILS,
    PROTOBOARD_RAIL_POSITIONS, PROTOBOARD_STRIP_GROUPS,
};
use crate::parser::schema::{Component, Terminal, Wire, BOARD_ID};

/// Origin of an edge in the connectivity graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    /// An explicit wire, by wire id.
    Wire(String),
    /// An internal tie of a bus component, by component id.
    Bus(String),
}

/// Connectivity graph: one node per terminal that has at least one wire or tie.
#[derive(Debug, Clone, Default)]
pub struct NetGraph {
    graph: UnGraph<Terminal, Link>,
    indices: HashMap<Terminal, NodeIndex>,
}

impl NetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, terminal: &Terminal) -> NodeIndex {
        if let Some(&idx) = self.indices.get(terminal) {
            return idx;
        }
        let idx = self.graph.add_node(terminal.clone());
        self.indices.insert(terminal.clone(), idx);
        idx
    }

    /// Add a bidirectional edge between two terminals.
    pub fn connect(&mut self, a: &Terminal, b: &Terminal, link: Link) {
        let ia = self.node(a);
        let ib = self.node(b);
        self.graph.add_edge(ia, ib, link);
    }

    pub fn contains(&self, terminal: &Terminal) -> bool {
        self.indices.contains_key(terminal)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Terminals directly tied to `terminal`.
    pub fn neighbors(&self, terminal: &Terminal) -> Vec<&Terminal> {
        let Some(&idx) = self.indices.get(terminal) else {
            return Vec::new();
        };
        self.graph
            .neighbors(idx)
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// Terminals in insertion order.
    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.graph.node_weights()
    }

    pub(crate) fn graph(&self) -> &UnGraph<Terminal, Link> {
        &self.graph
    }
}

/// Build the connectivity graph for a snapshot.
///
/// Wires whose endpoint names a component that is neither placed nor the
/// board are dropped, so a dangling reference cannot bridge two real nets.
pub fn build_nets(components: &[Component], wires: &[Wire]) -> NetGraph {
    let mut graph = NetGraph::new();
    let known: HashSet<&str> = components.iter().map(|c| c.id.as_str()).collect();
    let resolves = |t: &Terminal| t.is_board_pin() || known.contains(t.component_id.as_str());

    for wire in wires {
        if !resolves(&wire.start) || !resolves(&wire.end) {
            tracing::debug!("Ignoring wire {} with a dangling endpoint", wire.id);
            continue;
        }
        graph.connect(&wire.start, &wire.end, Link::Wire(wire.id.clone()));
    }

    for component in components.iter().filter(|c| c.kind.is_bus()) {
        if component.id == BOARD_ID {
            tracing::debug!("Ignoring ties of a bus component using the board id");
            continue;
        }
        add_bus_ties(&mut graph, component);
    }

    tracing::debug!(
        "Built connectivity graph: {} terminals, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Rails and strips are linear chains: hole *i* is tied to hole *i+1*.
fn add_bus_ties(graph: &mut NetGraph, board: &Component) {
    let tie = || Link::Bus(board.id.clone());

    for rail in PROTOBOARD_RAILS {
        for pos in 1..PROTOBOARD_RAIL_POSITIONS {
            graph.connect(
                &board.terminal(&rail_terminal(rail, pos)),
                &board.terminal(&rail_terminal(rail, pos + 1)),
                tie(),
            );
        }
    }

    for rows in PROTOBOARD_STRIP_GROUPS {
        for col in 1..=PROTOBOARD_COLUMNS {
            for pair in rows.windows(2) {
                graph.connect(
                    &board.terminal(&strip_terminal(pair[0], col)),
                    &board.terminal(&strip_terminal(pair[1], col)),
                    tie(),
                );
            }
        }
    }
}
