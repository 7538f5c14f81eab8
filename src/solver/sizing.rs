//! Cable sizing rules.
//!
//! Minimum conductor sizes are simplified teaching values keyed by component
//! variant and by whether the terminal is an earth or a live conductor.
//! Regions differ only on lighting circuits and main bonding.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::circuit::{Circuit, TerminalId, Wire, WireId, WireKind};
use crate::components::{Component, ComponentKind, Terminal};

/// Tolerance applied when comparing declared and required sizes.
pub const CSA_EPSILON: f64 = 1e-6;

/// Wiring regulations region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Uk,
    Eu,
}

impl Region {
    /// Base lighting-circuit conductor size.
    pub fn lighting_csa(&self) -> f64 {
        match self {
            Region::Uk => 1.0,
            Region::Eu => 1.5,
        }
    }

    /// Minimum main protective bonding conductor size.
    pub fn bonding_csa(&self) -> f64 {
        match self {
            Region::Uk => 10.0,
            Region::Eu => 6.0,
        }
    }
}

/// How strictly draw-time choices are policed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Anything goes; undersized choices get a hint
    #[default]
    Free,
    /// Undersized choices are refused with an explanation
    Learning,
    /// No hints; sizing is marked afterwards
    Assessment,
}

/// Minimum CSA in mm² for a conductor landing on `terminal` of `component`.
/// Zero means unconstrained.
pub fn required_minimum_csa(component: &Component, terminal: &Terminal, region: Region) -> f64 {
    let earth = terminal.family.is_earth();
    let pick = |live: f64, cpc: f64| if earth { cpc } else { live };
    match component.kind {
        ComponentKind::Lamp
        | ComponentKind::ExtractorFan
        | ComponentKind::CeilingRose
        | ComponentKind::OneWaySwitch
        | ComponentKind::TwoWaySwitch
        | ComponentKind::IntermediateSwitch => region.lighting_csa(),
        ComponentKind::SingleSocket
        | ComponentKind::DoubleSocket
        | ComponentKind::SwitchedFusedSpur
        | ComponentKind::UnswitchedFusedSpur
        | ComponentKind::ImmersionHeater
        | ComponentKind::DoublePoleSwitch => pick(2.5, 1.5),
        ComponentKind::CookerControlUnit
        | ComponentKind::CookerOutlet
        | ComponentKind::EvCharger => pick(6.0, 2.5),
        ComponentKind::Shower => pick(10.0, 4.0),
        // Meter tails land on the incoming terminals only
        ComponentKind::ConsumerUnit | ComponentKind::SplitLoadConsumerUnit => {
            if matches!(terminal.name.as_str(), "L" | "N" | "E") {
                pick(25.0, 16.0)
            } else {
                0.0
            }
        }
        // A bare supply feeds whatever circuit is drawn from it
        ComponentKind::Supply
        | ComponentKind::ConnectorL2
        | ComponentKind::ConnectorN2
        | ComponentKind::ConnectorE2
        | ComponentKind::ConnectorL3
        | ComponentKind::ConnectorN3
        | ComponentKind::ConnectorE3
        | ComponentKind::JunctionBox
        | ComponentKind::Junction
        | ComponentKind::BondingClamp => 0.0,
    }
}

fn endpoint_requirement(circuit: &Circuit, terminal: TerminalId, region: Region) -> f64 {
    circuit
        .find_terminal(terminal)
        .map(|(component, terminal)| required_minimum_csa(component, terminal, region))
        .unwrap_or(0.0)
}

fn is_bonding(circuit: &Circuit, wire: &Wire) -> bool {
    wire.effective_kind() == WireKind::Earth
        && [wire.a, wire.b].iter().any(|t| {
            circuit
                .find_terminal(*t)
                .is_some_and(|(c, _)| c.kind == ComponentKind::BondingClamp)
        })
}

/// Minimum CSA in mm² for a wire: the larger endpoint requirement, raised
/// to the regional bonding floor for main bonding conductors.
pub fn wire_required_minimum_csa(circuit: &Circuit, wire: &Wire, region: Region) -> f64 {
    let mut required = endpoint_requirement(circuit, wire.a, region)
        .max(endpoint_requirement(circuit, wire.b, region));
    if is_bonding(circuit, wire) {
        required = required.max(region.bonding_csa());
    }
    required
}

/// Whether a declared size falls short of a requirement. Undeclared sizes
/// are never undersized.
pub fn undersized(size_mm2: Option<f64>, required_mm2: f64) -> bool {
    size_mm2.is_some_and(|size| size < required_mm2 - CSA_EPSILON)
}

/// Whether a wire's declared size is below its requirement.
pub fn is_undersized(circuit: &Circuit, wire: &Wire, region: Region) -> bool {
    undersized(wire.size_mm2, wire_required_minimum_csa(circuit, wire, region))
}

/// An existing wire below its minimum size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingIssue {
    pub wire: WireId,
    pub size_mm2: f64,
    pub required_mm2: f64,
}

/// Flag every undersized wire in the circuit.
pub fn audit_wires(circuit: &Circuit, region: Region) -> Vec<SizingIssue> {
    let mut issues = Vec::new();
    for wire in &circuit.wires {
        let required = wire_required_minimum_csa(circuit, wire, region);
        let Some(size) = wire.size_mm2 else {
            continue;
        };
        if undersized(Some(size), required) {
            warn!(
                wire = %wire.id,
                "Wire {:.1} mm² undersized: needs at least {:.1} mm²",
                size, required
            );
            issues.push(SizingIssue {
                wire: wire.id,
                size_mm2: size,
                required_mm2: required,
            });
        }
    }
    issues
}

/// Outcome of a draw-time wire size choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WireChoice {
    Accepted,
    /// Allowed, with a hint for the user
    Advisory { message: String },
    /// Refused by the current mode
    Rejected { message: String },
}

impl WireChoice {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, WireChoice::Rejected { .. })
    }
}

/// Judge a prospective wire before it is drawn.
pub fn check_wire_choice(
    circuit: &Circuit,
    candidate: &Wire,
    region: Region,
    mode: SimulationMode,
) -> WireChoice {
    let required = wire_required_minimum_csa(circuit, candidate, region);
    if !undersized(candidate.size_mm2, required) {
        return WireChoice::Accepted;
    }
    let message = format!(
        "{:.1} mm² is too small here; use at least {:.1} mm²",
        candidate.size_mm2.unwrap_or_default(),
        required
    );
    match mode {
        SimulationMode::Free => WireChoice::Advisory { message },
        SimulationMode::Learning => WireChoice::Rejected { message },
        SimulationMode::Assessment => WireChoice::Accepted,
    }
}
