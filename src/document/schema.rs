//! On-disk document layout.

use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, Wire};
use crate::components::Component;

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Serialized form of a circuit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDocument {
    pub version: u32,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl CircuitDocument {
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            components: circuit.components.clone(),
            wires: circuit.wires.clone(),
        }
    }

    pub fn into_circuit(self) -> Circuit {
        Circuit::from_parts(self.components, self.wires)
    }
}
