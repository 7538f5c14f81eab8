//! Voltage model.
//!
//! Potentials follow from reachability alone: a terminal reachable from the
//! supply line sits at the system voltage, one reachable from neutral or
//! earth sits at 0 V, anything else is floating. Line takes precedence, so a
//! shorted neutral reads live.

use serde::{Deserialize, Serialize};

use super::reachability::{supply_reach, SupplyReach};
use crate::circuit::{Circuit, Conductor, TerminalId};

/// Voltmeter reading between two probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageReading {
    /// Potential of probe A in volts, `None` when floating
    pub va: Option<f64>,
    /// Potential of probe B in volts, `None` when floating
    pub vb: Option<f64>,
    /// `va - vb`, `None` unless both potentials are defined
    pub vab: Option<f64>,
}

/// Potential of a terminal relative to earth, `None` when floating.
pub fn potential(reach: &SupplyReach, terminal: TerminalId, system_voltage: f64) -> Option<f64> {
    if reach.reaches(Conductor::Line, terminal) {
        Some(system_voltage)
    } else if reach.reaches(Conductor::Neutral, terminal) || reach.reaches(Conductor::Earth, terminal)
    {
        Some(0.0)
    } else {
        None
    }
}

/// Voltage between two probe terminals using precomputed reachability.
pub fn voltage_between(
    reach: &SupplyReach,
    a: TerminalId,
    b: TerminalId,
    system_voltage: f64,
) -> VoltageReading {
    let va = potential(reach, a, system_voltage);
    let vb = potential(reach, b, system_voltage);
    VoltageReading {
        va,
        vb,
        vab: va.zip(vb).map(|(va, vb)| va - vb),
    }
}

/// Measure the voltage between two probe terminals.
///
/// Returns `None` when the circuit has no supply or consumer unit to act as
/// the reference.
pub fn measure_voltage(
    circuit: &Circuit,
    a: TerminalId,
    b: TerminalId,
    system_voltage: f64,
) -> Option<VoltageReading> {
    let reach = supply_reach(circuit)?;
    Some(voltage_between(&reach, a, b, system_voltage))
}
