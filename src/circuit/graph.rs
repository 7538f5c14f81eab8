//! Circuit snapshot structure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::{ComponentId, Point, TerminalId, WireFault, WireId};
use super::wire::Wire;
use crate::components::{Component, Terminal};
use crate::error::{Result, WiringError};

/// An immutable snapshot of placed components and the wires between them.
///
/// Every mutation returns a new snapshot and leaves `self` untouched, so a
/// caller can keep previous snapshots for undo. The connectivity graph is
/// never stored here; analyses rebuild it on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// All placed components
    pub components: Vec<Component>,
    /// All explicit wires
    pub wires: Vec<Wire>,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a circuit from existing collections.
    pub fn from_parts(components: Vec<Component>, wires: Vec<Wire>) -> Self {
        Self { components, wires }
    }

    /// Find a component by id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Find a wire by id.
    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    /// Find the component owning a terminal, together with the terminal.
    pub fn find_terminal(&self, id: TerminalId) -> Option<(&Component, &Terminal)> {
        self.components.iter().find_map(|c| {
            c.terminals
                .iter()
                .find(|t| t.id == id)
                .map(|t| (c, t))
        })
    }

    /// Index every terminal by id.
    pub fn terminal_index(&self) -> HashMap<TerminalId, (&Component, &Terminal)> {
        self.components
            .iter()
            .flat_map(|c| c.terminals.iter().map(move |t| (t.id, (c, t))))
            .collect()
    }

    /// Absolute canvas position of a terminal.
    pub fn terminal_position(&self, id: TerminalId) -> Option<Point> {
        self.find_terminal(id)
            .map(|(component, terminal)| component.position + terminal.offset)
    }

    /// Reference source for analysis: the first supply, or failing that the
    /// first consumer unit.
    pub fn reference_source(&self) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.kind.is_supply())
            .or_else(|| self.components.iter().find(|c| c.kind.is_consumer_unit()))
    }

    /// Straight-line length of a wire in metres, ignoring any explicit length.
    pub fn geometric_length_m(&self, wire: &Wire, units_per_metre: f64) -> Option<f64> {
        let a = self.terminal_position(wire.a)?;
        let b = self.terminal_position(wire.b)?;
        Some(a.distance(b) / units_per_metre)
    }

    /// Run length of a wire in metres: explicit length if set, else geometric.
    pub fn wire_length_m(&self, wire: &Wire, units_per_metre: f64) -> Option<f64> {
        wire.length_m
            .or_else(|| self.geometric_length_m(wire, units_per_metre))
    }

    /// Resolve a probe written as `COMPONENT:TERMINAL` or as a bare terminal
    /// uuid.
    ///
    /// The component part matches a label, the short display id (`C1a2b3c4d`)
    /// or the full uuid.
    pub fn resolve_probe(&self, probe: &str) -> Result<TerminalId> {
        let unknown = || WiringError::UnknownProbe {
            probe: probe.to_string(),
        };
        let Some((component, terminal)) = probe.split_once(':') else {
            let id = probe.parse::<uuid::Uuid>().map(TerminalId).map_err(|_| unknown())?;
            return self
                .find_terminal(id)
                .map(|(_, t)| t.id)
                .ok_or(WiringError::TerminalNotFound { terminal: id });
        };
        self.components
            .iter()
            .filter(|c| {
                c.label == component
                    || c.id.to_string() == component
                    || c.id.0.to_string() == component
            })
            .find_map(|c| c.terminal_id(terminal))
            .ok_or_else(unknown)
    }

    /// Wires attached to a terminal.
    pub fn wires_at(&self, terminal: TerminalId) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |w| w.touches(terminal))
    }

    // ============ Snapshot Mutations ============

    /// Snapshot with a component added.
    pub fn with_component(&self, component: Component) -> Circuit {
        let mut next = self.clone();
        next.components.push(component);
        next
    }

    /// Snapshot with a component removed, along with every wire touching it.
    pub fn without_component(&self, id: ComponentId) -> Result<Circuit> {
        let component = self
            .component(id)
            .ok_or(WiringError::ComponentNotFound { component: id })?;
        let mut next = self.clone();
        next.wires.retain(|w| !component.owns(w.a) && !component.owns(w.b));
        next.components.retain(|c| c.id != id);
        Ok(next)
    }

    /// Snapshot with a wire added.
    pub fn with_wire(&self, wire: Wire) -> Circuit {
        let mut next = self.clone();
        next.wires.push(wire);
        next
    }

    /// Snapshot with a wire removed.
    pub fn without_wire(&self, id: WireId) -> Result<Circuit> {
        if self.wire(id).is_none() {
            return Err(WiringError::WireNotFound { wire: id });
        }
        let mut next = self.clone();
        next.wires.retain(|w| w.id != id);
        Ok(next)
    }

    /// Snapshot with one wire edited in place.
    pub fn with_wire_edit(&self, id: WireId, edit: impl FnOnce(&mut Wire)) -> Result<Circuit> {
        let mut next = self.clone();
        let wire = next
            .wires
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WiringError::WireNotFound { wire: id })?;
        edit(wire);
        Ok(next)
    }

    /// Snapshot with a fault set on a wire.
    pub fn with_wire_fault(&self, id: WireId, fault: WireFault) -> Result<Circuit> {
        self.with_wire_edit(id, |w| w.fault = fault)
    }

    /// Snapshot with one component edited in place.
    pub fn with_component_edit(
        &self,
        id: ComponentId,
        edit: impl FnOnce(&mut Component) -> Result<()>,
    ) -> Result<Circuit> {
        let mut next = self.clone();
        let component = next
            .components
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(WiringError::ComponentNotFound { component: id })?;
        edit(component)?;
        Ok(next)
    }

    /// Snapshot with a component's control operated.
    pub fn toggled(&self, id: ComponentId) -> Result<Circuit> {
        self.with_component_edit(id, Component::toggle)
    }

    /// Snapshot with a consumer-unit breaker opened or closed.
    pub fn with_way(&self, id: ComponentId, way: usize, closed: bool) -> Result<Circuit> {
        self.with_component_edit(id, |c| c.set_way(way, closed))
    }

    /// Snapshot with a split-load RCD bank switched.
    pub fn with_rcd(&self, id: ComponentId, bank: usize, on: bool) -> Result<Circuit> {
        self.with_component_edit(id, |c| c.set_rcd(bank, on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::WireKind;
    use crate::components::ComponentKind;

    fn supply_and_lamp() -> (Circuit, ComponentId, ComponentId) {
        let supply = Component::new(ComponentKind::Supply, Point::new(0.0, 0.0));
        let lamp = Component::new(ComponentKind::Lamp, Point::new(300.0, 400.0));
        let wire = Wire::new(
            supply.terminal_id("L").unwrap(),
            lamp.terminal_id("L").unwrap(),
            WireKind::Line,
        );
        let (s, l) = (supply.id, lamp.id);
        let circuit = Circuit::new()
            .with_component(supply)
            .with_component(lamp)
            .with_wire(wire);
        (circuit, s, l)
    }

    #[test]
    fn test_remove_component_purges_wires() {
        let (circuit, _, lamp) = supply_and_lamp();
        let next = circuit.without_component(lamp).unwrap();
        assert_eq!(next.components.len(), 1);
        assert!(next.wires.is_empty());
        // Original snapshot untouched
        assert_eq!(circuit.wires.len(), 1);
    }

    #[test]
    fn test_resolve_probe() {
        let (circuit, supply, _) = supply_and_lamp();
        let supply = circuit.component(supply).unwrap();
        let expected = supply.terminal_id("N").unwrap();
        assert_eq!(circuit.resolve_probe(&format!("{}:N", supply.id)).unwrap(), expected);
        assert_eq!(circuit.resolve_probe(&expected.0.to_string()).unwrap(), expected);
        assert!(matches!(
            circuit.resolve_probe("Nowhere:L"),
            Err(WiringError::UnknownProbe { .. })
        ));
        assert!(matches!(
            circuit.resolve_probe(&uuid::Uuid::new_v4().to_string()),
            Err(WiringError::TerminalNotFound { .. })
        ));
    }

    #[test]
    fn test_geometric_length() {
        let (circuit, _, _) = supply_and_lamp();
        let wire = &circuit.wires[0];
        // L terminals share the same offset, so the run is a 300/400/500 triangle
        let length = circuit.wire_length_m(wire, 100.0).unwrap();
        assert!((length - 5.0).abs() < 1e-9);

        let explicit = wire.clone().with_length(12.0);
        assert_eq!(circuit.wire_length_m(&explicit, 100.0), Some(12.0));
    }

    #[test]
    fn test_reference_source_prefers_supply() {
        let cu = Component::new(ComponentKind::ConsumerUnit, Point::default());
        let circuit = Circuit::new().with_component(cu.clone());
        assert_eq!(circuit.reference_source().map(|c| c.id), Some(cu.id));

        let supply = Component::new(ComponentKind::Supply, Point::default());
        let circuit = circuit.with_component(supply.clone());
        assert_eq!(circuit.reference_source().map(|c| c.id), Some(supply.id));
    }

    #[test]
    fn test_toggle_missing_component() {
        let circuit = Circuit::new();
        assert!(matches!(
            circuit.toggled(ComponentId::new()),
            Err(WiringError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_wire_fault_snapshot() {
        let (circuit, _, _) = supply_and_lamp();
        let id = circuit.wires[0].id;
        let next = circuit.with_wire_fault(id, WireFault::Open).unwrap();
        assert_eq!(next.wires[0].fault, WireFault::Open);
        assert_eq!(circuit.wires[0].fault, WireFault::None);
    }
}
