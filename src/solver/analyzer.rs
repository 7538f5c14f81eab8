//! Main analysis interface.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::builder::{build_graph, build_weighted_graph};
use super::path::{shortest_resistance, PathResult};
use super::reachability::{reachable_set, supply_reach, SupplyReach};
use super::rings::{analyze_rings, RingAnalysis};
use super::sizing::{audit_wires, check_wire_choice, Region, SimulationMode, SizingIssue, WireChoice};
use super::voltage::{voltage_between, VoltageReading};
use crate::circuit::{Circuit, ComponentId, Conductor, PerConductor, Point, TerminalId, Wire, WireId};
use crate::splice::{cut_wire, Splice};
use crate::SYSTEM_VOLTAGE;

/// Default drawing units per metre of cable.
pub const DEFAULT_UNITS_PER_METRE: f64 = 100.0;

/// Default resistance of one terminal contact in ohms.
pub const DEFAULT_CONTACT_RESISTANCE: f64 = 0.005;

/// Configuration for the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Regulations used for cable sizing.
    pub region: Region,
    /// How draw-time wire choices are policed.
    pub mode: SimulationMode,
    /// Treat a neutral-earth short as dangerous.
    pub neutral_earth_fatal: bool,
    /// Potential of the line conductor in volts.
    pub system_voltage: f64,
    /// Drawing units per metre, for wires without an explicit length.
    pub units_per_metre: f64,
    /// Resistance of one terminal contact (ohms).
    pub contact_resistance: f64,
    /// Extra resistance of a wire with a high-resistance fault (ohms).
    pub high_resistance_penalty: f64,
    /// Closest a cut may land to either end of a wire, in drawing units.
    pub cut_tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            mode: SimulationMode::default(),
            neutral_earth_fatal: false,
            system_voltage: SYSTEM_VOLTAGE,
            units_per_metre: DEFAULT_UNITS_PER_METRE,
            contact_resistance: DEFAULT_CONTACT_RESISTANCE,
            high_resistance_penalty: 1.0,
            cut_tolerance: 10.0,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn with_mode(mut self, mode: SimulationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Count a neutral-earth short as dangerous.
    ///
    /// Off by default: on a TN-C-S supply neutral and earth are joined
    /// upstream anyway, so a downstream N-E fault only diverts current.
    pub fn with_neutral_earth_fatal(mut self, fatal: bool) -> Self {
        self.neutral_earth_fatal = fatal;
        self
    }

    pub fn with_system_voltage(mut self, volts: f64) -> Self {
        self.system_voltage = volts;
        self
    }

    /// Set the drawing scale used to derive wire lengths.
    pub fn with_units_per_metre(mut self, units: f64) -> Self {
        self.units_per_metre = units;
        self
    }

    pub fn with_cut_tolerance(mut self, tolerance: f64) -> Self {
        self.cut_tolerance = tolerance;
        self
    }
}

/// Conductor families shorted together at the supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shorts {
    pub line_neutral: bool,
    pub line_earth: bool,
    pub neutral_earth: bool,
}

impl Shorts {
    /// Whether any short present is dangerous under `neutral_earth_fatal`.
    pub fn dangerous(&self, neutral_earth_fatal: bool) -> bool {
        self.line_neutral || self.line_earth || (neutral_earth_fatal && self.neutral_earth)
    }

    pub fn any(&self) -> bool {
        self.line_neutral || self.line_earth || self.neutral_earth
    }

    /// Short labels in the form shown to users.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.line_neutral, "L-N"),
            (self.line_earth, "L-E"),
            (self.neutral_earth, "N-E"),
        ]
        .into_iter()
        .filter_map(|(present, label)| present.then_some(label))
        .collect()
    }
}

/// Whether a load would run, and whether it is earthed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatus {
    pub component: ComponentId,
    pub energised: bool,
    pub earth_ok: bool,
}

/// Everything derived from one circuit snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Supply or consumer unit used as the reference, if any
    pub source: Option<ComponentId>,
    /// Terminals reachable from the supply, per family, sorted
    pub reach: PerConductor<Vec<TerminalId>>,
    pub shorts: Shorts,
    /// Shorts judged against the configured neutral-earth policy
    pub dangerous: bool,
    pub rings: RingAnalysis,
    pub loads: Vec<LoadStatus>,
    pub undersized: Vec<SizingIssue>,
}

/// Resistance and voltage between two probes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterReading {
    /// Lowest resistance path in each family's graph
    pub resistance: PerConductor<PathResult>,
    /// `None` when the circuit has no reference source
    pub voltage: Option<VoltageReading>,
}

/// Supply terminals joined to each other in the unfiltered graph.
pub fn detect_shorts(circuit: &Circuit, reach: Option<&SupplyReach>) -> Shorts {
    let Some(reach) = reach else {
        return Shorts::default();
    };
    let t = &reach.terminals;
    let graph = build_graph(circuit, None);
    let from_line = t.line.map(|l| reachable_set(&graph, l)).unwrap_or_default();
    let from_neutral = t.neutral.map(|n| reachable_set(&graph, n)).unwrap_or_default();
    let hit = |set: &HashSet<TerminalId>, target: Option<TerminalId>| {
        target.is_some_and(|id| set.contains(&id))
    };
    Shorts {
        line_neutral: hit(&from_line, t.neutral),
        line_earth: hit(&from_line, t.earth),
        neutral_earth: hit(&from_neutral, t.earth),
    }
}

/// Energisation and earthing of every load.
pub fn load_statuses(circuit: &Circuit, reach: Option<&SupplyReach>, dangerous: bool) -> Vec<LoadStatus> {
    let reached = |conductor: Conductor, id: Option<TerminalId>| {
        reach
            .zip(id)
            .is_some_and(|(r, id)| r.reaches(conductor, id))
    };
    circuit
        .components
        .iter()
        .filter(|c| c.kind.is_load())
        .map(|load| LoadStatus {
            component: load.id,
            energised: !dangerous
                && reached(Conductor::Line, load.terminal_id("L"))
                && reached(Conductor::Neutral, load.terminal_id("N")),
            earth_ok: reached(Conductor::Earth, load.terminal_id("E")),
        })
        .collect()
}

/// Read resistance in each family and voltage between two probes.
pub fn read_meter(circuit: &Circuit, a: TerminalId, b: TerminalId, config: &AnalysisConfig) -> MeterReading {
    let resistance = PerConductor::from_fn(|c| {
        let graph = build_weighted_graph(circuit, Some(c.into()), config);
        shortest_resistance(&graph, a, b)
    });
    let voltage = supply_reach(circuit).map(|reach| voltage_between(&reach, a, b, config.system_voltage));
    MeterReading { resistance, voltage }
}

fn sorted(set: &HashSet<TerminalId>) -> Vec<TerminalId> {
    let mut ids: Vec<TerminalId> = set.iter().copied().collect();
    ids.sort();
    ids
}

/// The circuit analyzer.
///
/// Holds configuration only. Every query takes the circuit snapshot to
/// analyse and rebuilds whatever graphs it needs.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full analysis pass over a snapshot.
    pub fn analyze(&self, circuit: &Circuit) -> AnalysisReport {
        debug!(
            components = circuit.components.len(),
            wires = circuit.wires.len(),
            "analysing circuit"
        );
        let reach = supply_reach(circuit);
        if reach.is_none() {
            debug!("no supply or consumer unit; nothing is energised");
        }

        let shorts = detect_shorts(circuit, reach.as_ref());
        let dangerous = shorts.dangerous(self.config.neutral_earth_fatal);
        if shorts.any() {
            info!(shorts = ?shorts.labels(), dangerous, "short circuit at supply");
        }

        let rings = analyze_rings(circuit, reach.as_ref());
        let loads = load_statuses(circuit, reach.as_ref(), dangerous);
        let undersized = audit_wires(circuit, self.config.region);

        AnalysisReport {
            source: reach.as_ref().map(|r| r.source),
            reach: PerConductor::from_fn(|c| {
                reach
                    .as_ref()
                    .map(|r| sorted(r.reach.get(c)))
                    .unwrap_or_default()
            }),
            shorts,
            dangerous,
            rings,
            loads,
            undersized,
        }
    }

    /// Meter reading between two probe terminals.
    pub fn meter(&self, circuit: &Circuit, a: TerminalId, b: TerminalId) -> MeterReading {
        read_meter(circuit, a, b, &self.config)
    }

    /// Judge a wire before it is drawn, under the configured region and mode.
    pub fn check_wire(&self, circuit: &Circuit, candidate: &Wire) -> WireChoice {
        check_wire_choice(circuit, candidate, self.config.region, self.config.mode)
    }

    /// Plan a cut using the configured tolerance.
    pub fn cut(&self, circuit: &Circuit, wire: WireId, at: Point) -> Option<Splice> {
        cut_wire(circuit, wire, at, self.config.cut_tolerance)
    }
}
