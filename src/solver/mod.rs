//! Circuit analysis engine.
//!
//! Every analysis is a pure function of a [`Circuit`](crate::Circuit)
//! snapshot. Graphs are rebuilt on each call and never cached.
//!
//! ## Pipeline
//!
//! 1. [`builder`] turns terminals, wires and internal links into an
//!    adjacency structure, optionally restricted to conductor families
//! 2. [`reachability`] runs breadth-first reach and cycle checks over it
//! 3. [`path`] finds the lowest-resistance route for meter readings
//! 4. [`voltage`], [`rings`] and [`sizing`] derive user-facing facts
//!
//! The [`Analyzer`] ties these together under one [`AnalysisConfig`].

pub mod analyzer;
pub mod builder;
pub mod path;
pub mod reachability;
pub mod rings;
pub mod sizing;
pub mod voltage;

pub use analyzer::{
    detect_shorts, load_statuses, read_meter, AnalysisConfig, AnalysisReport, Analyzer,
    LoadStatus, MeterReading, Shorts,
};
pub use builder::{build_graph, build_weighted_graph, Adjacency, WeightedAdjacency, WeightedEdge};
pub use path::{shortest_resistance, PathResult};
pub use reachability::{cycle_nodes, has_cycle, reachable_set, supply_reach, SupplyReach};
pub use rings::{analyze_rings, RingAnalysis, SocketClass, SocketStatus};
pub use sizing::{
    audit_wires, check_wire_choice, is_undersized, required_minimum_csa,
    wire_required_minimum_csa, Region, SimulationMode, SizingIssue, WireChoice,
};
pub use voltage::{measure_voltage, VoltageReading};
