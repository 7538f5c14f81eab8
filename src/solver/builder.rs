//! Connectivity graph construction.
//!
//! Graphs are derived from a [`Circuit`] on every call and never cached.
//! Nodes are terminal ids; edges come from conducting wires and from the
//! internal links of each component in its current state.
//!
//! Family filtering:
//! - A terminal is a node when its conductor is in the filter.
//! - A wire is an edge when it is not broken and both endpoint conductors
//!   are in the filter. A tagged wire also needs its tag (line for a sleeved
//!   core) in the filter; a generic tag matches any filter.
//! - An internal link is an edge when both terminal conductors are in the
//!   filter. Splice junction links are included in every filter.
//!
//! Wires referencing missing terminals are skipped.

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use super::analyzer::AnalysisConfig;
use crate::circuit::{Circuit, Conductor, FamilyFilter, TerminalId, Wire, WireFault, WireKind};
use crate::components::{Component, Terminal};

/// Unweighted adjacency: terminal id to neighbouring terminal ids.
///
/// Parallel wires between one pair of terminals become a single edge.
pub type Adjacency = HashMap<TerminalId, HashSet<TerminalId>>;

/// Weighted adjacency: terminal id to outgoing edges.
pub type WeightedAdjacency = HashMap<TerminalId, Vec<WeightedEdge>>;

/// A resistance-weighted edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub to: TerminalId,
    /// Edge resistance in ohms (never negative)
    pub resistance: f64,
}

/// Copper conductor resistance at 20 °C in mΩ/m, keyed by CSA in mm².
const CONDUCTOR_RESISTANCE_MOHM_PER_M: [(f64, f64); 8] = [
    (1.0, 18.10),
    (1.5, 12.10),
    (2.5, 7.41),
    (4.0, 4.61),
    (6.0, 3.08),
    (10.0, 1.83),
    (16.0, 1.15),
    (25.0, 0.727),
];

/// Resistivity of annealed copper in Ω·mm²/m, for sizes outside the table.
const COPPER_RESISTIVITY: f64 = 0.017_24;

/// Default CSA assumed for a wire with no declared size.
pub fn default_size_mm2(kind: WireKind) -> f64 {
    match kind {
        // Circuit protective conductor of 2.5 mm² twin and earth
        WireKind::Earth => 1.5,
        WireKind::Line | WireKind::Neutral | WireKind::Generic => 2.5,
    }
}

/// Conductor resistance per metre for a CSA in mm².
pub fn resistance_per_metre(size_mm2: f64) -> f64 {
    CONDUCTOR_RESISTANCE_MOHM_PER_M
        .iter()
        .find(|(csa, _)| (csa - size_mm2).abs() < 1e-6)
        .map(|(_, mohm)| mohm / 1000.0)
        .unwrap_or_else(|| COPPER_RESISTIVITY / size_mm2.max(f64::EPSILON))
}

fn admits(filter: Option<FamilyFilter>, conductor: Conductor) -> bool {
    filter.map_or(true, |f| f.contains(conductor))
}

fn wire_matches(wire: &Wire, a: &Terminal, b: &Terminal, filter: Option<FamilyFilter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let tag_ok = wire
        .effective_kind()
        .conductor()
        .map_or(true, |tag| filter.contains(tag));
    tag_ok && filter.contains(a.family.conductor()) && filter.contains(b.family.conductor())
}

fn link_matches(component: &Component, a: &Terminal, b: &Terminal, filter: Option<FamilyFilter>) -> bool {
    component.kind.is_transparent()
        || (admits(filter, a.family.conductor()) && admits(filter, b.family.conductor()))
}

fn report_dangling(wire: &Wire) {
    if cfg!(debug_assertions) {
        warn!(wire = %wire.id, "skipping wire with a missing terminal");
    } else {
        trace!(wire = %wire.id, "skipping wire with a missing terminal");
    }
}

/// Visit every edge admitted by `filter`, with the wire it came from (or
/// `None` for an internal link).
fn for_each_edge<'c>(
    circuit: &'c Circuit,
    filter: Option<FamilyFilter>,
    mut visit: impl FnMut(TerminalId, TerminalId, Option<&'c Wire>),
) {
    let index = circuit.terminal_index();

    for wire in &circuit.wires {
        if !wire.conducts() {
            continue;
        }
        let (Some((_, a)), Some((_, b))) = (index.get(&wire.a), index.get(&wire.b)) else {
            report_dangling(wire);
            continue;
        };
        if wire_matches(wire, a, b, filter) {
            visit(wire.a, wire.b, Some(wire));
        }
    }

    for component in &circuit.components {
        for (a, b) in component.link_pairs() {
            let (Some(a), Some(b)) = (component.terminal(&a), component.terminal(&b)) else {
                continue;
            };
            if link_matches(component, a, b, filter) {
                visit(a.id, b.id, None);
            }
        }
    }
}

fn seed_nodes<V: Default>(circuit: &Circuit, filter: Option<FamilyFilter>) -> HashMap<TerminalId, V> {
    circuit
        .components
        .iter()
        .flat_map(|c| c.terminals.iter())
        .filter(|t| admits(filter, t.family.conductor()))
        .map(|t| (t.id, V::default()))
        .collect()
}

/// Build the unweighted connectivity graph.
///
/// With `filter == None` every terminal, conducting wire and internal link
/// is included.
pub fn build_graph(circuit: &Circuit, filter: Option<FamilyFilter>) -> Adjacency {
    let mut graph: Adjacency = seed_nodes(circuit, filter);
    for_each_edge(circuit, filter, |a, b, _| {
        graph.entry(a).or_default().insert(b);
        graph.entry(b).or_default().insert(a);
    });
    graph
}

/// Resistance of one wire in ohms, or `None` if its length is unknown.
pub fn wire_resistance(circuit: &Circuit, wire: &Wire, config: &AnalysisConfig) -> Option<f64> {
    let length = circuit.wire_length_m(wire, config.units_per_metre)?;
    let size = wire
        .size_mm2
        .unwrap_or_else(|| default_size_mm2(wire.effective_kind()));
    let mut resistance = length.max(0.0) * resistance_per_metre(size) + 2.0 * config.contact_resistance;
    if wire.fault == WireFault::HighResistance {
        resistance += config.high_resistance_penalty;
    }
    Some(resistance)
}

/// Build the resistance-weighted graph used for meter readings.
///
/// Internal links weigh one contact resistance regardless of geometry.
pub fn build_weighted_graph(
    circuit: &Circuit,
    filter: Option<FamilyFilter>,
    config: &AnalysisConfig,
) -> WeightedAdjacency {
    let mut graph: WeightedAdjacency = seed_nodes(circuit, filter);
    for_each_edge(circuit, filter, |a, b, wire| {
        let resistance = match wire {
            Some(wire) => match wire_resistance(circuit, wire, config) {
                Some(r) => r,
                None => return,
            },
            None => config.contact_resistance,
        };
        graph
            .entry(a)
            .or_default()
            .push(WeightedEdge { to: b, resistance });
        graph
            .entry(b)
            .or_default()
            .push(WeightedEdge { to: a, resistance });
    });
    graph
}

/// Number of conducting wires attached to each terminal.
pub fn wire_degree(circuit: &Circuit) -> HashMap<TerminalId, usize> {
    let mut degree = HashMap::new();
    for wire in circuit.wires.iter().filter(|w| w.conducts()) {
        *degree.entry(wire.a).or_insert(0) += 1;
        *degree.entry(wire.b).or_insert(0) += 1;
    }
    degree
}
