//! Net Resolver
//!
//! Partitions the connectivity graph into electrical nets with a
//! breadth-first flood fill.

use petgraph::visit::Bfs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::NetGraph;
use crate::parser::schema::Terminal;

/// Opaque net identifier. Only equality is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NetId(pub usize);

static EMPTY_NET: BTreeSet<Terminal> = BTreeSet::new();

/// Result of net resolution: terminal → net and net → members.
#[derive(Debug, Clone, Default)]
pub struct NetMap {
    terminal_to_net: HashMap<Terminal, NetId>,
    nets: BTreeMap<NetId, BTreeSet<Terminal>>,
}

impl NetMap {
    pub fn net_id(&self, terminal: &Terminal) -> Option<NetId> {
        self.terminal_to_net.get(terminal).copied()
    }

    /// Members of the net containing `terminal`. Empty when it is not wired.
    pub fn members(&self, terminal: &Terminal) -> &BTreeSet<Terminal> {
        self.net_id(terminal)
            .and_then(|id| self.nets.get(&id))
            .unwrap_or(&EMPTY_NET)
    }

    /// Net of a terminal named by its parts.
    pub fn get_net(&self, component_id: &str, terminal_id: &str) -> &BTreeSet<Terminal> {
        self.members(&Terminal::new(component_id, terminal_id))
    }

    pub fn same_net(&self, a: &Terminal, b: &Terminal) -> bool {
        match (self.net_id(a), self.net_id(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// True if the terminal shares a net with at least one other terminal.
    /// A self-looped wire alone does not count.
    pub fn is_wired(&self, terminal: &Terminal) -> bool {
        self.members(terminal).iter().any(|t| t != terminal)
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    pub fn nets(&self) -> impl Iterator<Item = (NetId, &BTreeSet<Terminal>)> {
        self.nets.iter().map(|(id, members)| (*id, members))
    }
}

/// Flood-fill every node of the graph into its net.
pub fn resolve_nets(graph: &NetGraph) -> NetMap {
    let g = graph.graph();
    let mut map = NetMap::default();

    for start in g.node_indices() {
        if map.terminal_to_net.contains_key(&g[start]) {
            continue;
        }
        let id = NetId(map.nets.len());
        let mut members = BTreeSet::new();
        let mut bfs = Bfs::new(g, start);
        while let Some(idx) = bfs.next(g) {
            let terminal = g[idx].clone();
            map.terminal_to_net.insert(terminal.clone(), id);
            members.insert(terminal);
        }
        map.nets.insert(id, members);
    }

    tracing::debug!("Resolved {} nets", map.nets.len());
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::build_nets;
    use crate::parser::schema::{Component, ComponentKind, Wire};

    fn t(c: &str, p: &str) -> Terminal {
        Terminal::new(c, p)
    }

    fn chain() -> (Vec<Component>, Vec<Wire>) {
        let components = vec![
            Component::new("r-1", ComponentKind::Resistor, "R1"),
            Component::new("r-2", ComponentKind::Resistor, "R2"),
        ];
        let wires = vec![
            Wire::with_id("w1", Terminal::board("pin-2"), t("r-1", "t1")),
            Wire::with_id("w2", t("r-1", "t1"), t("r-2", "t1")),
            Wire::with_id("w3", t("r-2", "t2"), Terminal::board("gnd-1")),
        ];
        (components, wires)
    }

    #[test]
    fn test_transitive_membership() {
        let (components, wires) = chain();
        let nets = resolve_nets(&build_nets(&components, &wires));

        assert_eq!(nets.net_count(), 2);
        assert!(nets.same_net(&Terminal::board("pin-2"), &t("r-2", "t1")));
        assert!(!nets.same_net(&t("r-1", "t1"), &t("r-1", "t2")));
        assert!(nets.same_net(&t("r-2", "t2"), &Terminal::board("gnd-1")));

        let net = nets.get_net("r-1", "t1");
        assert_eq!(net.len(), 3);
        assert!(net.contains(&Terminal::board("pin-2")));
    }

    #[test]
    fn test_unwired_terminal_has_empty_net() {
        let (components, wires) = chain();
        let nets = resolve_nets(&build_nets(&components, &wires));
        let loose = t("r-1", "t2");
        assert!(nets.members(&loose).is_empty());
        assert_eq!(nets.net_id(&loose), None);
        assert!(!nets.is_wired(&loose));
        assert!(!nets.same_net(&loose, &loose));
    }

    #[test]
    fn test_partition_is_stable_across_runs() {
        let (components, wires) = chain();
        let first = resolve_nets(&build_nets(&components, &wires));
        let second = resolve_nets(&build_nets(&components, &wires));
        let sets = |m: &NetMap| m.nets().map(|(_, s)| s.clone()).collect::<BTreeSet<_>>();
        assert_eq!(sets(&first), sets(&second));
    }

    #[test]
    fn test_wire_order_does_not_change_partition() {
        let (components, mut wires) = chain();
        let forward = resolve_nets(&build_nets(&components, &wires));
        wires.reverse();
        let backward = resolve_nets(&build_nets(&components, &wires));
        for (_, members) in forward.nets() {
            let first = members.iter().next().unwrap();
            assert_eq!(backward.members(first), members);
        }
    }

    #[test]
    fn test_self_loop_is_single_node_net() {
        let components = vec![Component::new("led-1", ComponentKind::Led, "LED")];
        let anode = t("led-1", "anode");
        let wires = vec![Wire::with_id("w", anode.clone(), anode.clone())];
        let nets = resolve_nets(&build_nets(&components, &wires));
        assert_eq!(nets.members(&anode).len(), 1);
        assert!(!nets.is_wired(&anode));
    }
}
