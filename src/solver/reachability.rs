//! Reachability and cycle analysis over unweighted graphs.

use std::collections::{HashMap, HashSet, VecDeque};

use super::builder::{build_graph, Adjacency};
use crate::circuit::{Circuit, ComponentId, Conductor, PerConductor, TerminalId};

/// Terminals reachable from each reference terminal of the supply.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplyReach {
    /// Supply or consumer unit used as the reference
    pub source: ComponentId,
    /// Reference terminal per family (`L`, `N`, `E` on the source)
    pub terminals: PerConductor<Option<TerminalId>>,
    /// Reachable set per family, each computed on that family's graph
    pub reach: PerConductor<HashSet<TerminalId>>,
}

impl SupplyReach {
    /// Whether `terminal` is reachable from the supply's `conductor` terminal.
    pub fn reaches(&self, conductor: Conductor, terminal: TerminalId) -> bool {
        self.reach.get(conductor).contains(&terminal)
    }
}

/// Per-family reachability from the reference source, or `None` when the
/// circuit has neither a supply nor a consumer unit.
pub fn supply_reach(circuit: &Circuit) -> Option<SupplyReach> {
    let source = circuit.reference_source()?;
    let terminals = PerConductor::from_fn(|c| source.terminal_id(c.supply_terminal()));
    let reach = PerConductor::from_fn(|c| match terminals.get(c) {
        Some(start) => reachable_set(&build_graph(circuit, Some(c.into())), *start),
        None => HashSet::new(),
    });
    Some(SupplyReach {
        source: source.id,
        terminals,
        reach,
    })
}

/// Every terminal reachable from `start` by breadth-first traversal.
///
/// The start terminal is always part of the result, even when it is not a
/// node of `graph`.
pub fn reachable_set(graph: &Adjacency, start: TerminalId) -> HashSet<TerminalId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        if !visited.insert(node) {
            continue;
        }
        if let Some(neighbors) = graph.get(&node) {
            for neighbor in neighbors {
                if !visited.contains(neighbor) {
                    queue.push_back(*neighbor);
                }
            }
        }
    }
    visited
}

/// Whether the part of `graph` reachable from `start` contains a cycle.
///
/// Depth-first traversal with a parent pointer per node: meeting an already
/// discovered neighbour that is not the parent closes a loop. Self-loops are
/// ignored.
///
/// Parallel wires between the same two terminals collapse into a single
/// [`Adjacency`] edge, so a loop made only of two such cables is not
/// reported.
pub fn has_cycle(graph: &Adjacency, start: TerminalId) -> bool {
    if !graph.contains_key(&start) {
        return false;
    }
    let mut discovered = HashSet::from([start]);
    let mut stack: Vec<(TerminalId, Option<TerminalId>)> = vec![(start, None)];
    while let Some((node, parent)) = stack.pop() {
        let Some(neighbors) = graph.get(&node) else {
            continue;
        };
        for &neighbor in neighbors {
            if neighbor == node || Some(neighbor) == parent {
                continue;
            }
            if !discovered.insert(neighbor) {
                return true;
            }
            stack.push((neighbor, Some(node)));
        }
    }
    false
}

struct Frame {
    node: TerminalId,
    parent: Option<TerminalId>,
    neighbors: Vec<TerminalId>,
    next: usize,
}

/// Terminals lying on at least one cycle of `graph`.
///
/// A terminal is on a cycle when it touches an edge that is not a bridge.
/// Bridges are found with Tarjan's low-link numbering, run iteratively.
/// Like [`has_cycle`], it cannot see a loop formed by parallel wires alone.
pub fn cycle_nodes(graph: &Adjacency) -> HashSet<TerminalId> {
    let mut discovery: HashMap<TerminalId, usize> = HashMap::new();
    let mut low: HashMap<TerminalId, usize> = HashMap::new();
    let mut on_cycle = HashSet::new();
    let mut clock = 0usize;

    for &root in graph.keys() {
        if discovery.contains_key(&root) {
            continue;
        }
        discovery.insert(root, clock);
        low.insert(root, clock);
        clock += 1;
        let mut stack = vec![Frame {
            node: root,
            parent: None,
            neighbors: graph[&root].iter().copied().collect(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.neighbors.len() {
                let neighbor = frame.neighbors[frame.next];
                frame.next += 1;
                let node = frame.node;
                if neighbor == node || Some(neighbor) == frame.parent {
                    continue;
                }
                if let Some(&seen) = discovery.get(&neighbor) {
                    // Back edge: never a bridge
                    let entry = low.entry(node).or_insert(seen);
                    *entry = (*entry).min(seen);
                    on_cycle.insert(node);
                    on_cycle.insert(neighbor);
                } else {
                    discovery.insert(neighbor, clock);
                    low.insert(neighbor, clock);
                    clock += 1;
                    stack.push(Frame {
                        node: neighbor,
                        parent: Some(node),
                        neighbors: graph
                            .get(&neighbor)
                            .map(|n| n.iter().copied().collect())
                            .unwrap_or_default(),
                        next: 0,
                    });
                }
                continue;
            }

            let Some(Frame { node, parent, .. }) = stack.pop() else {
                break;
            };
            if let Some(parent) = parent {
                let child_low = low[&node];
                let parent_low = low[&parent];
                low.insert(parent, parent_low.min(child_low));
                if child_low <= discovery[&parent] {
                    on_cycle.insert(node);
                    on_cycle.insert(parent);
                }
            }
        }
    }

    on_cycle
}

/// Copy of `graph` with the given nodes and their edges removed.
pub fn without_nodes(graph: &Adjacency, removed: &HashSet<TerminalId>) -> Adjacency {
    graph
        .iter()
        .filter(|(id, _)| !removed.contains(id))
        .map(|(id, neighbors)| {
            (
                *id,
                neighbors
                    .iter()
                    .filter(|n| !removed.contains(n))
                    .copied()
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Wire, WireKind};
    use crate::components::{Component, ComponentKind};

    fn ids(n: usize) -> Vec<TerminalId> {
        (0..n).map(|_| TerminalId::new()).collect()
    }

    fn graph_of(nodes: &[TerminalId], edges: &[(usize, usize)]) -> Adjacency {
        let mut graph: Adjacency = nodes.iter().map(|n| (*n, HashSet::new())).collect();
        for &(a, b) in edges {
            graph.get_mut(&nodes[a]).unwrap().insert(nodes[b]);
            graph.get_mut(&nodes[b]).unwrap().insert(nodes[a]);
        }
        graph
    }

    #[test]
    fn test_reachable_set() {
        let n = ids(5);
        let graph = graph_of(&n, &[(0, 1), (1, 2), (3, 4)]);
        let reach = reachable_set(&graph, n[0]);
        assert_eq!(reach, HashSet::from([n[0], n[1], n[2]]));
    }

    #[test]
    fn test_reachable_from_absent_node() {
        let n = ids(2);
        let graph = graph_of(&n[..1], &[]);
        assert_eq!(reachable_set(&graph, n[1]), HashSet::from([n[1]]));
    }

    #[test]
    fn test_has_cycle() {
        let n = ids(4);
        let path = graph_of(&n, &[(0, 1), (1, 2), (2, 3)]);
        assert!(!has_cycle(&path, n[0]));

        let ring = graph_of(&n, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert!(has_cycle(&ring, n[0]));
        assert!(has_cycle(&ring, n[2]));
    }

    #[test]
    fn test_cycle_must_be_reachable() {
        let n = ids(5);
        let graph = graph_of(&n, &[(0, 1), (2, 3), (3, 4), (4, 2)]);
        assert!(!has_cycle(&graph, n[0]));
        assert!(has_cycle(&graph, n[2]));
    }

    #[test]
    fn test_cycle_detection_is_order_independent() {
        let n = ids(4);
        let forward = graph_of(&n, &[(0, 1), (1, 2), (2, 0), (2, 3)]);
        let backward = graph_of(&n, &[(0, 2), (2, 1), (1, 0), (3, 2)]);
        assert_eq!(has_cycle(&forward, n[0]), has_cycle(&backward, n[0]));
    }

    #[test]
    fn test_cycle_nodes_excludes_tails() {
        let n = ids(6);
        // Triangle 0-1-2 with a tail 2-3-4 and an isolated 5
        let graph = graph_of(&n, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let on_cycle = cycle_nodes(&graph);
        assert_eq!(on_cycle, HashSet::from([n[0], n[1], n[2]]));
    }

    #[test]
    fn test_parallel_wires_are_not_a_cycle() {
        let supply = Component::new(ComponentKind::Supply, Point::default());
        let block = Component::new(ComponentKind::ConnectorL2, Point::new(500.0, 0.0));
        let (l, t1) = (supply.terminal_id("L").unwrap(), block.terminal_id("T1").unwrap());
        let circuit = Circuit::new()
            .with_component(supply)
            .with_component(block)
            .with_wire(Wire::new(l, t1, WireKind::Line))
            .with_wire(Wire::new(t1, l, WireKind::Line));
        let graph = build_graph(&circuit, Some(Conductor::Line.into()));
        assert_eq!(graph[&l].len(), 1);
        assert!(!has_cycle(&graph, l));
        assert!(cycle_nodes(&graph).is_empty());
    }

    #[test]
    fn test_without_nodes() {
        let n = ids(3);
        let graph = graph_of(&n, &[(0, 1), (1, 2)]);
        let reduced = without_nodes(&graph, &HashSet::from([n[1]]));
        assert_eq!(reduced.len(), 2);
        assert!(reduced[&n[0]].is_empty());
    }
}
