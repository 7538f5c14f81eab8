//! Saved circuit documents.
//!
//! A document is a versioned JSON object holding the component and wire
//! collections exactly as the analysis engine sees them:
//!
//! ```text
//! {
//!   "version": 1,
//!   "components": [ { "id", "kind", "label", "position", "terminals", "state" } ],
//!   "wires":      [ { "id", "a", "b", "kind", "size_mm2"?, "length_m"?, "fault", "switched_live" } ]
//! }
//! ```
//!
//! Loading validates the circuit: duplicate terminal ids and broken
//! internal links are rejected, dangling wires are only reported.

mod schema;

pub use schema::{CircuitDocument, DOCUMENT_VERSION};

use tracing::debug;

use crate::circuit::{validate_circuit, Circuit};
use crate::error::{Result, WiringError};

/// Parse a document string into a validated circuit.
pub fn parse(input: &str) -> Result<Circuit> {
    let document: CircuitDocument = serde_json::from_str(input)?;
    if document.version != DOCUMENT_VERSION {
        return Err(WiringError::UnsupportedDocumentVersion {
            found: document.version,
            expected: DOCUMENT_VERSION,
        });
    }
    let circuit = document.into_circuit();
    let report = validate_circuit(&circuit)?;
    debug!(
        components = circuit.components.len(),
        wires = circuit.wires.len(),
        clean = report.is_clean(),
        "loaded circuit document"
    );
    Ok(circuit)
}

/// Serialize a circuit as a pretty-printed document.
pub fn to_string(circuit: &Circuit) -> Result<String> {
    Ok(serde_json::to_string_pretty(&CircuitDocument::from_circuit(circuit))?)
}

/// Parse a circuit document file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Circuit> {
    let content = std::fs::read_to_string(path).map_err(|e| WiringError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

/// Write a circuit document file.
#[cfg(feature = "cli")]
pub fn save_file(path: &std::path::Path, circuit: &Circuit) -> Result<()> {
    let content = to_string(circuit)?;
    std::fs::write(path, content).map_err(|e| WiringError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Point, Wire, WireFault, WireKind};
    use crate::components::{Component, ComponentKind};

    fn sample() -> Circuit {
        let cu = Component::new(ComponentKind::SplitLoadConsumerUnit, Point::default())
            .with_label("Kitchen CU");
        let socket = Component::new(ComponentKind::DoubleSocket, Point::new(250.0, 80.0));
        let wire = Wire::new(
            cu.terminal_id("W1_L").unwrap(),
            socket.terminal_id("L_A").unwrap(),
            WireKind::Line,
        )
        .with_size(2.5)
        .with_length(7.5)
        .with_fault(WireFault::HighResistance);
        Circuit::new()
            .with_component(cu)
            .with_component(socket)
            .with_wire(wire)
    }

    #[test]
    fn test_round_trip_keeps_every_field() {
        let base = sample();
        let circuit = base.toggled(base.components[0].id).unwrap();
        let text = to_string(&circuit).unwrap();
        assert_eq!(parse(&text).unwrap(), circuit);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let text = r#"{ "version": 99, "components": [], "wires": [] }"#;
        assert!(matches!(
            parse(text),
            Err(WiringError::UnsupportedDocumentVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_optional_wire_fields_default() {
        let circuit = sample();
        let mut value: serde_json::Value = serde_json::from_str(&to_string(&circuit).unwrap()).unwrap();
        let wire = value["wires"][0].as_object_mut().unwrap();
        for key in ["size_mm2", "length_m", "fault", "switched_live"] {
            wire.remove(key);
        }
        let loaded = parse(&value.to_string()).unwrap();
        assert_eq!(loaded.wires[0].size_mm2, None);
        assert_eq!(loaded.wires[0].fault, WireFault::None);
        assert!(!loaded.wires[0].switched_live);
    }

    #[test]
    fn test_rejects_duplicate_terminals() {
        let lamp = Component::new(ComponentKind::Lamp, Point::default());
        let circuit = Circuit::new().with_component(lamp.clone()).with_component(lamp);
        let text = to_string(&circuit).unwrap();
        assert!(matches!(parse(&text), Err(WiringError::DuplicateTerminal { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse("{ not json"), Err(WiringError::DocumentParse(_))));
    }
}
