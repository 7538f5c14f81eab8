//! Ring-final circuit analysis: ring presence per family, socket
//! classification and spur-off-spur detection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::builder::{build_graph, wire_degree, Adjacency};
use super::reachability::{cycle_nodes, has_cycle, reachable_set, without_nodes, SupplyReach};
use crate::circuit::{Circuit, ComponentId, Conductor, PerConductor, TerminalId};

/// Where a socket-outlet sits in the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketClass {
    /// Two or more line terminals wired and fed from the supply
    InRing,
    /// Wired, but not as part of a ring
    Spur,
    /// No wires at all
    Isolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocketStatus {
    pub component: ComponentId,
    pub class: SocketClass,
}

/// Ring findings for a circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingAnalysis {
    /// Whether each family forms a loop reachable from the supply
    pub rings: PerConductor<bool>,
    /// Line, neutral and earth all loop back to the supply
    pub ring_circuit: bool,
    pub sockets: Vec<SocketStatus>,
    /// Groups of two or more spur sockets fed through one another
    pub spur_off_spur: Vec<Vec<ComponentId>>,
}

/// Per-family ring presence seeded at the supply terminals.
pub fn ring_presence(circuit: &Circuit, reach: Option<&SupplyReach>) -> PerConductor<bool> {
    PerConductor::from_fn(|c| {
        reach
            .and_then(|r| *r.terminals.get(c))
            .is_some_and(|start| has_cycle(&build_graph(circuit, Some(c.into())), start))
    })
}

/// Analyse rings, classify sockets and find spurs fed from spurs.
pub fn analyze_rings(circuit: &Circuit, reach: Option<&SupplyReach>) -> RingAnalysis {
    let rings = ring_presence(circuit, reach);
    let line_graph = build_graph(circuit, Some(Conductor::Line.into()));
    let on_cycle = cycle_nodes(&line_graph);
    let degree = wire_degree(circuit);
    let wired = |t: &TerminalId| degree.get(t).copied().unwrap_or(0) > 0;

    let mut sockets = Vec::new();
    for socket in circuit.components.iter().filter(|c| c.kind.is_socket()) {
        let line_terminals: Vec<TerminalId> = socket
            .terminals
            .iter()
            .filter(|t| t.family.conductor() == Conductor::Line)
            .map(|t| t.id)
            .collect();
        let fed = line_terminals
            .iter()
            .filter(|t| wired(*t) && reach.is_some_and(|r| r.reaches(Conductor::Line, **t)))
            .count();
        let class = if fed >= 2 {
            SocketClass::InRing
        } else if fed >= 1 || socket.terminals.iter().any(|t| wired(&t.id)) {
            SocketClass::Spur
        } else {
            SocketClass::Isolated
        };
        sockets.push(SocketStatus {
            component: socket.id,
            class,
        });
    }

    let spur_off_spur = if rings.line {
        spur_groups(circuit, reach, &line_graph, &on_cycle, &sockets)
    } else {
        Vec::new()
    };

    RingAnalysis {
        ring_circuit: rings.all(),
        rings,
        sockets,
        spur_off_spur,
    }
}

/// Group spur sockets sharing a line-connected island once the ring itself
/// (every terminal on a line cycle) and the source are cut away.
fn spur_groups(
    circuit: &Circuit,
    reach: Option<&SupplyReach>,
    line_graph: &Adjacency,
    on_cycle: &HashSet<TerminalId>,
    sockets: &[SocketStatus],
) -> Vec<Vec<ComponentId>> {
    let mut removed: HashSet<TerminalId> = on_cycle.clone();
    if let Some(source) = reach.and_then(|r| circuit.component(r.source)) {
        removed.extend(source.terminals.iter().map(|t| t.id));
    }
    let island_graph = without_nodes(line_graph, &removed);

    let spurs: Vec<(ComponentId, Vec<TerminalId>)> = sockets
        .iter()
        .filter(|s| s.class == SocketClass::Spur)
        .filter_map(|s| circuit.component(s.component))
        .map(|c| {
            let line = c
                .terminals
                .iter()
                .filter(|t| t.family.conductor() == Conductor::Line && !removed.contains(&t.id))
                .map(|t| t.id)
                .collect();
            (c.id, line)
        })
        .collect();

    let mut grouped: HashSet<ComponentId> = HashSet::new();
    let mut groups = Vec::new();
    for (id, terminals) in &spurs {
        if grouped.contains(id) {
            continue;
        }
        let Some(start) = terminals.first() else {
            continue;
        };
        let island = reachable_set(&island_graph, *start);
        let members: Vec<ComponentId> = spurs
            .iter()
            .filter(|(_, ts)| ts.iter().any(|t| island.contains(t)))
            .map(|(other, _)| *other)
            .collect();
        grouped.extend(members.iter().copied());
        if members.len() >= 2 {
            groups.push(members);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Wire, WireKind};
    use crate::components::{Component, ComponentKind};
    use crate::solver::reachability::supply_reach;

    fn link(circuit: Circuit, a: &Component, ta: &str, b: &Component, tb: &str, c: Conductor) -> Circuit {
        circuit.with_wire(
            Wire::new(a.terminal_id(ta).unwrap(), b.terminal_id(tb).unwrap(), c.into())
                .with_size(if c == Conductor::Earth { 1.5 } else { 2.5 }),
        )
    }

    fn socket_end(conductor: Conductor, end: char) -> String {
        format!("{}_{}", conductor, end)
    }

    /// Supply -> S1 -> S2 -> Supply in all three families.
    fn ring_of_two() -> (Circuit, Component, Component, Component) {
        let supply = Component::new(ComponentKind::Supply, Point::default());
        let s1 = Component::new(ComponentKind::DoubleSocket, Point::new(300.0, 0.0));
        let s2 = Component::new(ComponentKind::DoubleSocket, Point::new(600.0, 0.0));
        let mut circuit = Circuit::new()
            .with_component(supply.clone())
            .with_component(s1.clone())
            .with_component(s2.clone());
        for c in Conductor::ALL {
            let s = c.supply_terminal();
            circuit = link(circuit, &supply, s, &s1, &socket_end(c, 'A'), c);
            circuit = link(circuit, &s1, &socket_end(c, 'B'), &s2, &socket_end(c, 'A'), c);
            circuit = link(circuit, &s2, &socket_end(c, 'B'), &supply, s, c);
        }
        (circuit, supply, s1, s2)
    }

    fn class_of(analysis: &RingAnalysis, id: ComponentId) -> SocketClass {
        analysis
            .sockets
            .iter()
            .find(|s| s.component == id)
            .map(|s| s.class)
            .unwrap()
    }

    #[test]
    fn test_ring_of_two_sockets() {
        let (circuit, _, s1, s2) = ring_of_two();
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert!(analysis.rings.line && analysis.rings.neutral && analysis.rings.earth);
        assert!(analysis.ring_circuit);
        assert_eq!(class_of(&analysis, s1.id), SocketClass::InRing);
        assert_eq!(class_of(&analysis, s2.id), SocketClass::InRing);
        assert!(analysis.spur_off_spur.is_empty());
    }

    #[test]
    fn test_ring_needs_every_family() {
        let (circuit, _, _, _) = ring_of_two();
        let earth_return = circuit
            .wires
            .iter()
            .rev()
            .find(|w| w.kind == WireKind::Earth)
            .map(|w| w.id)
            .unwrap();
        let circuit = circuit.without_wire(earth_return).unwrap();
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert!(analysis.rings.line);
        assert!(!analysis.rings.earth);
        assert!(!analysis.ring_circuit);
    }

    #[test]
    fn test_isolated_socket() {
        let (circuit, _, _, _) = ring_of_two();
        let lonely = Component::new(ComponentKind::SingleSocket, Point::new(0.0, 500.0));
        let circuit = circuit.with_component(lonely.clone());
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert_eq!(class_of(&analysis, lonely.id), SocketClass::Isolated);
    }

    #[test]
    fn test_spur_and_spur_off_spur() {
        let (circuit, _, s1, _) = ring_of_two();
        let spur = Component::new(ComponentKind::SingleSocket, Point::new(300.0, 300.0));
        let circuit = circuit.with_component(spur.clone());
        let mut circuit = circuit;
        for c in Conductor::ALL {
            circuit = link(circuit, &s1, &socket_end(c, 'B'), &spur, &socket_end(c, 'A'), c);
        }
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert_eq!(class_of(&analysis, s1.id), SocketClass::InRing);
        assert_eq!(class_of(&analysis, spur.id), SocketClass::Spur);
        assert!(analysis.spur_off_spur.is_empty());

        // Looped in at the spur's own terminals, leaving its B side free.
        let second = Component::new(ComponentKind::SingleSocket, Point::new(300.0, 600.0));
        let mut circuit = circuit.with_component(second.clone());
        for c in Conductor::ALL {
            circuit = link(circuit, &spur, &socket_end(c, 'A'), &second, &socket_end(c, 'A'), c);
        }
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert_eq!(class_of(&analysis, spur.id), SocketClass::Spur);
        assert_eq!(class_of(&analysis, second.id), SocketClass::Spur);
        assert_eq!(analysis.spur_off_spur.len(), 1);
        let group: HashSet<_> = analysis.spur_off_spur[0].iter().copied().collect();
        assert_eq!(group, HashSet::from([spur.id, second.id]));
    }

    #[test]
    fn test_radial_run_through_both_ends_is_in_ring() {
        let supply = Component::new(ComponentKind::Supply, Point::default());
        let s1 = Component::new(ComponentKind::DoubleSocket, Point::new(300.0, 0.0));
        let s2 = Component::new(ComponentKind::DoubleSocket, Point::new(600.0, 0.0));
        let mut circuit = Circuit::new()
            .with_component(supply.clone())
            .with_component(s1.clone())
            .with_component(s2.clone());
        for c in Conductor::ALL {
            circuit = link(circuit, &supply, c.supply_terminal(), &s1, &socket_end(c, 'A'), c);
            circuit = link(circuit, &s1, &socket_end(c, 'B'), &s2, &socket_end(c, 'A'), c);
        }
        let reach = supply_reach(&circuit);
        let analysis = analyze_rings(&circuit, reach.as_ref());
        assert!(!analysis.rings.line);
        assert_eq!(class_of(&analysis, s1.id), SocketClass::InRing);
        assert_eq!(class_of(&analysis, s2.id), SocketClass::Spur);
        assert!(analysis.spur_off_spur.is_empty());
    }

    #[test]
    fn test_no_supply_means_no_rings() {
        let (circuit, supply, _, _) = ring_of_two();
        let circuit = circuit.without_component(supply.id).unwrap();
        let analysis = analyze_rings(&circuit, None);
        assert!(!analysis.rings.line);
        assert!(analysis
            .sockets
            .iter()
            .all(|s| s.class == SocketClass::Spur));
    }
}
