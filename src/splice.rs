//! Cutting a wire in two with a transparent junction.
//!
//! [`cut_wire`] only plans the cut. The caller applies it with
//! [`Circuit::apply_splice`], which swaps the old wire for the junction and
//! its two replacement wires in one snapshot step.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::circuit::{Circuit, Point, TerminalFamily, TerminalId, Wire, WireFault, WireId};
use crate::components::Component;
use crate::error::{Result, WiringError};

/// A planned cut: the junction to insert, the wire it replaces and the two
/// wires that take its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Splice {
    pub junction: Component,
    pub removed_wire: WireId,
    /// Original start to junction `A`, then junction `B` to original end.
    /// Only the first carries the original's fault.
    pub new_wires: [Wire; 2],
}

fn junction_family(circuit: &Circuit, wire: &Wire) -> TerminalFamily {
    circuit
        .find_terminal(wire.a)
        .map(|(_, t)| t.family)
        .or_else(|| wire.kind.conductor().map(TerminalFamily::from))
        .unwrap_or(TerminalFamily::Line)
}

fn segment(original: &Wire, a: TerminalId, b: TerminalId, fault: WireFault) -> Wire {
    Wire {
        size_mm2: original.size_mm2,
        fault,
        switched_live: original.switched_live,
        ..Wire::new(a, b, original.kind)
    }
}

/// Plan a cut of `wire_id` at the point on the wire closest to `at`.
///
/// Returns `None` when the wire or either endpoint is missing, or when the
/// cut would land within `tolerance` of an endpoint.
pub fn cut_wire(circuit: &Circuit, wire_id: WireId, at: Point, tolerance: f64) -> Option<Splice> {
    let wire = circuit.wire(wire_id)?;
    let start = circuit.terminal_position(wire.a)?;
    let end = circuit.terminal_position(wire.b)?;
    let (cut, _) = at.project_onto_segment(start, end);
    if cut.distance(start) <= tolerance || cut.distance(end) <= tolerance {
        debug!(wire = %wire_id, "cut too close to a terminal");
        return None;
    }

    let junction = Component::junction(junction_family(circuit, wire), cut);
    let near = junction.terminal_id("A")?;
    let far = junction.terminal_id("B")?;
    Some(Splice {
        new_wires: [
            segment(wire, wire.a, near, wire.fault),
            segment(wire, far, wire.b, WireFault::None),
        ],
        removed_wire: wire_id,
        junction,
    })
}

impl Circuit {
    /// Snapshot with a planned cut applied.
    ///
    /// Fails without changing anything if the wire being replaced is gone.
    pub fn apply_splice(&self, splice: &Splice) -> Result<Circuit> {
        let mut next = self.without_wire(splice.removed_wire)?;
        if next.component(splice.junction.id).is_some() {
            return Err(WiringError::invalid_state(
                splice.junction.id,
                "splice already applied",
            ));
        }
        next.components.push(splice.junction.clone());
        next.wires.extend(splice.new_wires.iter().cloned());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Conductor, WireKind};
    use crate::components::ComponentKind;
    use crate::solver::{build_graph, reachable_set, read_meter, AnalysisConfig};
    use approx::assert_relative_eq;

    /// Two connector blocks 1000 units (10 m) apart joined by one wire.
    fn ten_metre_run(kind: WireKind) -> (Circuit, WireId) {
        let left = Component::new(ComponentKind::ConnectorL2, Point::new(0.0, 0.0));
        let right = Component::new(ComponentKind::ConnectorL2, Point::new(1000.0, 0.0));
        // Both T1 terminals share the same offset, so the run is exactly 1000 units
        let wire = Wire::new(
            left.terminal_id("T1").unwrap(),
            right.terminal_id("T1").unwrap(),
            kind,
        )
        .with_size(2.5)
        .with_length(12.0)
        .with_fault(WireFault::HighResistance);
        let id = wire.id;
        let circuit = Circuit::new()
            .with_component(left)
            .with_component(right)
            .with_wire(wire);
        (circuit, id)
    }

    #[test]
    fn test_midpoint_cut_preserves_length() {
        let (circuit, id) = ten_metre_run(WireKind::Line);
        let original = circuit.wire(id).unwrap();
        let total = circuit.geometric_length_m(original, 100.0).unwrap();
        assert_relative_eq!(total, 10.0, epsilon = 1e-9);

        let splice = cut_wire(&circuit, id, Point::new(500.0, 30.0), 10.0).unwrap();
        assert_eq!(splice.junction.position, Point::new(500.0, 0.0));
        let next = circuit.apply_splice(&splice).unwrap();

        let lengths: f64 = splice
            .new_wires
            .iter()
            .map(|w| next.geometric_length_m(w, 100.0).unwrap())
            .sum();
        assert_relative_eq!(lengths, 10.0, epsilon = 1e-9);
        assert!(next.wire(id).is_none());
        assert_eq!(next.wires.len(), 2);
    }

    #[test]
    fn test_new_wires_inherit_all_but_length() {
        let (circuit, id) = ten_metre_run(WireKind::Line);
        let splice = cut_wire(&circuit, id, Point::new(300.0, 0.0), 10.0).unwrap();
        for wire in &splice.new_wires {
            assert_eq!(wire.kind, WireKind::Line);
            assert_eq!(wire.size_mm2, Some(2.5));
            assert_eq!(wire.length_m, None);
        }
        assert_eq!(splice.new_wires[0].fault, WireFault::HighResistance);
        assert_eq!(splice.new_wires[1].fault, WireFault::None);
    }

    #[test]
    fn test_cut_adds_only_joint_resistance() {
        let (mut circuit, id) = ten_metre_run(WireKind::Line);
        circuit.wires[0].length_m = None;
        let config = AnalysisConfig::default();
        let left = circuit.wire(id).unwrap().a;
        let right = circuit.wire(id).unwrap().b;
        let before = read_meter(&circuit, left, right, &config);

        let splice = cut_wire(&circuit, id, Point::new(400.0, 0.0), 10.0).unwrap();
        let next = circuit.apply_splice(&splice).unwrap();
        let after = read_meter(&next, left, right, &config);

        // Two extra wire ends plus the junction's own link
        let before = before.resistance.get(Conductor::Line).resistance;
        let after = after.resistance.get(Conductor::Line).resistance;
        assert_relative_eq!(before, 10.0 * 0.00741 + 2.0 * 0.005 + 1.0, epsilon = 1e-9);
        assert_relative_eq!(after - before, 3.0 * config.contact_resistance, epsilon = 1e-9);
    }

    #[test]
    fn test_junction_is_transparent() {
        let (circuit, id) = ten_metre_run(WireKind::Line);
        let splice = cut_wire(&circuit, id, Point::new(500.0, 0.0), 10.0).unwrap();
        let next = circuit.apply_splice(&splice).unwrap();
        let a = splice.junction.terminal_id("A").unwrap();
        let b = splice.junction.terminal_id("B").unwrap();
        for c in Conductor::ALL {
            let graph = build_graph(&next, Some(c.into()));
            assert!(reachable_set(&graph, a).contains(&b), "{c} blocked");
        }
    }

    #[test]
    fn test_cut_near_endpoint_is_refused() {
        let (circuit, id) = ten_metre_run(WireKind::Line);
        assert!(cut_wire(&circuit, id, Point::new(-5.0, 0.0), 10.0).is_none());
        assert!(cut_wire(&circuit, id, Point::new(1200.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_junction_family_from_first_endpoint() {
        let (circuit, id) = ten_metre_run(WireKind::Generic);
        let splice = cut_wire(&circuit, id, Point::new(500.0, 0.0), 10.0).unwrap();
        assert!(splice
            .junction
            .terminals
            .iter()
            .all(|t| t.family == TerminalFamily::Line));
    }

    #[test]
    fn test_stale_splice_is_rejected() {
        let (circuit, id) = ten_metre_run(WireKind::Line);
        let splice = cut_wire(&circuit, id, Point::new(500.0, 0.0), 10.0).unwrap();
        let next = circuit.apply_splice(&splice).unwrap();
        assert!(matches!(
            next.apply_splice(&splice),
            Err(WiringError::WireNotFound { .. })
        ));
    }
}
