//! # Wiring Core
//!
//! Topology analysis engine for an interactive domestic wiring simulator.
//!
//! This library provides:
//! - A component model for UK/EU wiring accessories with state-dependent
//!   internal links (switch contacts, breakers, connector commoning)
//! - Per-conductor-family reachability, ring detection and short detection
//! - Lowest-resistance paths and voltages between meter probes
//! - Cable-sizing checks and draw-time guidance
//! - Wire cutting with transparent splice junctions
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`circuit`] - Immutable circuit snapshots, ids and validation
//! - [`components`] - Component variants, terminal layouts and link rules
//! - [`solver`] - Graph construction and every analysis over it
//! - [`splice`] - Planning and applying wire cuts
//! - [`document`] - Versioned JSON documents for save and load
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! wiring kitchen.json --region uk --probe "Supply:L" --probe "Socket 1:L_A"
//! ```
//!
//! ### Library
//!
//! ```
//! use wiring_core::circuit::{Circuit, Point, Wire, WireKind};
//! use wiring_core::components::{Component, ComponentKind};
//! use wiring_core::Analyzer;
//!
//! let supply = Component::new(ComponentKind::Supply, Point::default());
//! let lamp = Component::new(ComponentKind::Lamp, Point::new(400.0, 0.0));
//! let mut circuit = Circuit::new();
//! for name in ["L", "N", "E"] {
//!     let wire = Wire::new(
//!         supply.terminal_id(name).unwrap(),
//!         lamp.terminal_id(name).unwrap(),
//!         WireKind::Generic,
//!     );
//!     circuit = circuit.with_wire(wire);
//! }
//! let circuit = circuit.with_component(supply).with_component(lamp);
//!
//! let report = Analyzer::new().analyze(&circuit);
//! assert!(report.loads[0].energised);
//! ```
//!
//! ## Analysis Method
//!
//! Terminals are graph nodes. Conducting wires and the internal links a
//! component's current state produces are undirected edges. Each query:
//!
//! 1. Rebuilds the graph, optionally keeping only one conductor family
//! 2. Runs breadth-first reach from the supply's L, N and E terminals
//! 3. Derives shorts, rings, energised loads and potentials from the reach
//!    sets, or runs Dijkstra over resistance-weighted edges for the meter

pub mod circuit;
pub mod components;
pub mod document;
pub mod error;
pub mod solver;
pub mod splice;

// Re-export main types for convenience
pub use circuit::Circuit;
pub use error::{Result, WiringError};
pub use solver::{AnalysisConfig, AnalysisReport, Analyzer, MeterReading};
pub use splice::{cut_wire, Splice};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmWiringSim;

/// Nominal single-phase supply voltage in volts
pub const SYSTEM_VOLTAGE: f64 = 230.0;
