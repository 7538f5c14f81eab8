//! Circuit validation.

use std::collections::HashSet;
use std::mem::discriminant;

use tracing::warn;

use crate::circuit::{ComponentId, WireId};
use crate::error::{Result, WiringError};

use super::Circuit;

/// Tolerated inconsistencies found in a circuit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Wires with an endpoint that no longer exists
    pub dangling_wires: Vec<WireId>,
    /// Components whose state does not belong to their variant
    pub state_mismatches: Vec<ComponentId>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_wires.is_empty() && self.state_mismatches.is_empty()
    }
}

/// Validate a circuit before analysis.
///
/// Fails on construction-time misuse:
/// - Duplicate terminal ids
/// - Internal links naming terminals the component does not own
///
/// Reports, without failing:
/// - Wires referencing missing terminals (analysis skips them)
/// - Component states that do not fit their variant (analysis links nothing)
pub fn validate_circuit(circuit: &Circuit) -> Result<ValidationReport> {
    let mut seen = HashSet::new();
    for component in &circuit.components {
        for terminal in &component.terminals {
            if !seen.insert(terminal.id) {
                return Err(WiringError::DuplicateTerminal {
                    terminal: terminal.id,
                });
            }
        }
        component.check_links()?;
    }

    let mut report = ValidationReport::default();
    for wire in &circuit.wires {
        if !seen.contains(&wire.a) || !seen.contains(&wire.b) {
            warn!(wire = %wire.id, "wire references a missing terminal");
            report.dangling_wires.push(wire.id);
        }
    }

    for component in &circuit.components {
        if discriminant(&component.state) != discriminant(&component.kind.default_state()) {
            warn!(component = %component.id, kind = %component.kind, "state does not match variant");
            report.state_mismatches.push(component.id);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, TerminalId, Wire, WireKind};
    use crate::components::{Component, ComponentKind, ComponentState};

    #[test]
    fn test_clean_circuit() {
        let circuit = Circuit::new()
            .with_component(Component::new(ComponentKind::Supply, Point::default()))
            .with_component(Component::new(ComponentKind::TwoWaySwitch, Point::default()));
        assert!(validate_circuit(&circuit).unwrap().is_clean());
    }

    #[test]
    fn test_duplicate_terminal_is_fatal() {
        let supply = Component::new(ComponentKind::Supply, Point::default());
        let mut copy = supply.clone();
        copy.id = ComponentId::new();
        let circuit = Circuit::new().with_component(supply).with_component(copy);
        assert!(matches!(
            validate_circuit(&circuit),
            Err(WiringError::DuplicateTerminal { .. })
        ));
    }

    #[test]
    fn test_dangling_wire_is_reported() {
        let supply = Component::new(ComponentKind::Supply, Point::default());
        let wire = Wire::new(supply.terminal_id("L").unwrap(), TerminalId::new(), WireKind::Line);
        let id = wire.id;
        let circuit = Circuit::new().with_component(supply).with_wire(wire);
        let report = validate_circuit(&circuit).unwrap();
        assert_eq!(report.dangling_wires, vec![id]);
    }

    #[test]
    fn test_state_mismatch_is_reported() {
        let switch = Component::new(ComponentKind::OneWaySwitch, Point::default())
            .with_state(ComponentState::Selector { position: 1 });
        let id = switch.id;
        let circuit = Circuit::new().with_component(switch);
        assert_eq!(validate_circuit(&circuit).unwrap().state_mismatches, vec![id]);
    }
}
