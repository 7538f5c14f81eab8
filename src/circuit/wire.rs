//! Explicit conductors between two terminals.

use serde::{Deserialize, Serialize};

use super::types::{TerminalId, WireFault, WireId, WireKind};

/// A wire joining exactly two terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub a: TerminalId,
    pub b: TerminalId,
    pub kind: WireKind,
    /// Conductor cross-sectional area in mm²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mm2: Option<f64>,
    /// Explicit run length in metres; geometric distance otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_m: Option<f64>,
    #[serde(default)]
    pub fault: WireFault,
    /// Neutral-coloured core sleeved brown and used as a switch leg
    #[serde(default)]
    pub switched_live: bool,
}

impl Wire {
    /// Create a wire with a fresh id.
    pub fn new(a: TerminalId, b: TerminalId, kind: WireKind) -> Self {
        Self {
            id: WireId::new(),
            a,
            b,
            kind,
            size_mm2: None,
            length_m: None,
            fault: WireFault::None,
            switched_live: false,
        }
    }

    pub fn with_size(mut self, size_mm2: f64) -> Self {
        self.size_mm2 = Some(size_mm2);
        self
    }

    pub fn with_length(mut self, length_m: f64) -> Self {
        self.length_m = Some(length_m);
        self
    }

    pub fn with_fault(mut self, fault: WireFault) -> Self {
        self.fault = fault;
        self
    }

    /// Mark the core as re-identified line (brown sleeve on a blue core).
    pub fn sleeved(mut self) -> Self {
        self.switched_live = true;
        self
    }

    /// Tag used for family matching: a sleeved core counts as line.
    pub fn effective_kind(&self) -> WireKind {
        if self.switched_live {
            WireKind::Line
        } else {
            self.kind
        }
    }

    /// Whether the wire still carries current (not broken).
    pub fn conducts(&self) -> bool {
        self.fault != WireFault::Open
    }

    pub fn touches(&self, terminal: TerminalId) -> bool {
        self.a == terminal || self.b == terminal
    }

    /// The far end of the wire seen from `terminal`.
    pub fn other_end(&self, terminal: TerminalId) -> Option<TerminalId> {
        if self.a == terminal {
            Some(self.b)
        } else if self.b == terminal {
            Some(self.a)
        } else {
            None
        }
    }
}
