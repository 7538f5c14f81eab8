//! Shortest-resistance path between two terminals.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use super::builder::WeightedAdjacency;
use crate::circuit::TerminalId;

/// Lowest-resistance route between two terminals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Total resistance in ohms; infinite when there is no path
    pub resistance: f64,
    /// Terminals along the route, start first
    pub path: Option<Vec<TerminalId>>,
}

impl PathResult {
    /// The "open line" result.
    pub fn open() -> Self {
        Self {
            resistance: f64::INFINITY,
            path: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.path.is_none()
    }
}

/// Heap entry ordered so the smallest distance pops first.
#[derive(Debug, Clone, Copy)]
struct Tentative {
    distance: f64,
    node: TerminalId,
}

impl PartialEq for Tentative {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Tentative {}

impl PartialOrd for Tentative {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tentative {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Dijkstra's algorithm from `start` to `goal`.
///
/// Returns [`PathResult::open`] when either terminal is absent from the
/// graph or no route exists. Edge weights are non-negative by construction.
pub fn shortest_resistance(
    graph: &WeightedAdjacency,
    start: TerminalId,
    goal: TerminalId,
) -> PathResult {
    if !graph.contains_key(&start) || !graph.contains_key(&goal) {
        return PathResult::open();
    }

    let mut distance: HashMap<TerminalId, f64> = HashMap::from([(start, 0.0)]);
    let mut previous: HashMap<TerminalId, TerminalId> = HashMap::new();
    let mut settled: HashSet<TerminalId> = HashSet::new();
    let mut frontier = BinaryHeap::from([Tentative {
        distance: 0.0,
        node: start,
    }]);

    while let Some(Tentative { distance: d, node }) = frontier.pop() {
        if !settled.insert(node) {
            continue;
        }
        if node == goal {
            let mut path = vec![goal];
            let mut cursor = goal;
            while let Some(&prev) = previous.get(&cursor) {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return PathResult {
                resistance: d,
                path: Some(path),
            };
        }
        for edge in graph.get(&node).into_iter().flatten() {
            if settled.contains(&edge.to) {
                continue;
            }
            let candidate = d + edge.resistance.max(0.0);
            let better = distance
                .get(&edge.to)
                .map_or(true, |&current| candidate < current);
            if better {
                distance.insert(edge.to, candidate);
                previous.insert(edge.to, node);
                frontier.push(Tentative {
                    distance: candidate,
                    node: edge.to,
                });
            }
        }
    }

    PathResult::open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::builder::WeightedEdge;
    use approx::assert_relative_eq;

    fn weighted(nodes: &[TerminalId], edges: &[(usize, usize, f64)]) -> WeightedAdjacency {
        let mut graph: WeightedAdjacency = nodes.iter().map(|n| (*n, Vec::new())).collect();
        for &(a, b, r) in edges {
            graph.get_mut(&nodes[a]).unwrap().push(WeightedEdge {
                to: nodes[b],
                resistance: r,
            });
            graph.get_mut(&nodes[b]).unwrap().push(WeightedEdge {
                to: nodes[a],
                resistance: r,
            });
        }
        graph
    }

    #[test]
    fn test_picks_lowest_resistance_route() {
        let n: Vec<_> = (0..4).map(|_| TerminalId::new()).collect();
        // Direct 0-3 is 5 Ω; 0-1-2-3 is 0.3 Ω
        let graph = weighted(&n, &[(0, 3, 5.0), (0, 1, 0.1), (1, 2, 0.1), (2, 3, 0.1)]);
        let result = shortest_resistance(&graph, n[0], n[3]);
        assert_relative_eq!(result.resistance, 0.3, epsilon = 1e-12);
        assert_eq!(result.path, Some(vec![n[0], n[1], n[2], n[3]]));
    }

    #[test]
    fn test_no_path_is_open() {
        let n: Vec<_> = (0..3).map(|_| TerminalId::new()).collect();
        let graph = weighted(&n, &[(0, 1, 1.0)]);
        let result = shortest_resistance(&graph, n[0], n[2]);
        assert!(result.is_open());
        assert!(result.resistance.is_infinite());
    }

    #[test]
    fn test_absent_terminal_is_open() {
        let n: Vec<_> = (0..2).map(|_| TerminalId::new()).collect();
        let graph = weighted(&n, &[(0, 1, 1.0)]);
        assert!(shortest_resistance(&graph, n[0], TerminalId::new()).is_open());
    }

    #[test]
    fn test_same_terminal_is_zero() {
        let n = [TerminalId::new()];
        let graph = weighted(&n, &[]);
        let result = shortest_resistance(&graph, n[0], n[0]);
        assert_eq!(result.resistance, 0.0);
        assert_eq!(result.path, Some(vec![n[0]]));
    }
}
