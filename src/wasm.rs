//! WASM bindings for Wiring Core.
//!
//! This module exposes the analysis engine to a browser canvas. Everything
//! crosses the boundary as JSON strings in the saved-document schema.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmWiringSim } from 'wiring_core';
//!
//! await init();
//!
//! const sim = new WasmWiringSim(documentJson, 'uk', 'learning');
//! const report = JSON.parse(sim.analyze());
//! const reading = JSON.parse(sim.meter(probeA, probeB));
//! sim.toggle(switchId);
//! ```

use serde::de::DeserializeOwned;
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, ComponentId, Point, TerminalId, Wire, WireId};
use crate::document;
use crate::error::WiringError;
use crate::solver::{AnalysisConfig, Analyzer, Region, SimulationMode};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(error: WiringError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn wasm_error(message: impl Into<String>) -> JsValue {
    to_js(WiringError::WasmError {
        message: message.into(),
    })
}

/// Parse a snake_case enum name such as `"uk"` or `"learning"`.
fn parse_name<T: DeserializeOwned>(name: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_lowercase()))
        .map_err(|_| wasm_error(format!("unknown option '{name}'")))
}

fn parse_uuid(id: &str) -> Result<Uuid, JsValue> {
    Uuid::parse_str(id).map_err(|_| wasm_error(format!("malformed id '{id}'")))
}

/// WASM-compatible wiring simulator.
///
/// Holds the current circuit snapshot on behalf of the page. Every mutation
/// replaces the snapshot; a rejected mutation leaves it unchanged.
#[wasm_bindgen]
pub struct WasmWiringSim {
    circuit: Circuit,
    analyzer: Analyzer,
}

#[wasm_bindgen]
impl WasmWiringSim {
    /// Load a circuit document.
    ///
    /// # Arguments
    /// * `document_json` - A saved circuit document
    /// * `region` - `"uk"` or `"eu"`
    /// * `mode` - `"free"`, `"learning"` or `"assessment"`
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: &str, region: &str, mode: &str) -> Result<WasmWiringSim, JsValue> {
        let circuit = document::parse(document_json).map_err(to_js)?;
        let config = AnalysisConfig::new()
            .with_region(parse_name::<Region>(region)?)
            .with_mode(parse_name::<SimulationMode>(mode)?);
        Ok(WasmWiringSim {
            circuit,
            analyzer: Analyzer::with_config(config),
        })
    }

    /// Replace the circuit with a new document.
    #[wasm_bindgen]
    pub fn load(&mut self, document_json: &str) -> Result<(), JsValue> {
        self.circuit = document::parse(document_json).map_err(to_js)?;
        Ok(())
    }

    /// Current circuit as a document.
    #[wasm_bindgen]
    pub fn document(&self) -> Result<String, JsValue> {
        document::to_string(&self.circuit).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_neutral_earth_fatal(&mut self, fatal: bool) {
        let config = self.analyzer.config().clone().with_neutral_earth_fatal(fatal);
        self.analyzer = Analyzer::with_config(config);
    }

    /// Full analysis report as JSON.
    #[wasm_bindgen]
    pub fn analyze(&self) -> Result<String, JsValue> {
        let report = self.analyzer.analyze(&self.circuit);
        serde_json::to_string(&report).map_err(|e| to_js(e.into()))
    }

    /// Meter reading between two terminal ids as JSON.
    ///
    /// Open lines serialize their infinite resistance as `null`.
    #[wasm_bindgen]
    pub fn meter(&self, probe_a: &str, probe_b: &str) -> Result<String, JsValue> {
        let a = TerminalId(parse_uuid(probe_a)?);
        let b = TerminalId(parse_uuid(probe_b)?);
        let reading = self.analyzer.meter(&self.circuit, a, b);
        serde_json::to_string(&reading).map_err(|e| to_js(e.into()))
    }

    /// Operate a switch, breaker main or fused spur.
    #[wasm_bindgen]
    pub fn toggle(&mut self, component_id: &str) -> Result<(), JsValue> {
        let id = ComponentId(parse_uuid(component_id)?);
        self.circuit = self.circuit.toggled(id).map_err(to_js)?;
        Ok(())
    }

    /// Open or close one consumer-unit way.
    #[wasm_bindgen]
    pub fn set_way(&mut self, component_id: &str, way: usize, closed: bool) -> Result<(), JsValue> {
        let id = ComponentId(parse_uuid(component_id)?);
        self.circuit = self.circuit.with_way(id, way, closed).map_err(to_js)?;
        Ok(())
    }

    /// Switch one RCD bank (0 or 1) of a split-load consumer unit.
    #[wasm_bindgen]
    pub fn set_rcd(&mut self, component_id: &str, bank: usize, on: bool) -> Result<(), JsValue> {
        let id = ComponentId(parse_uuid(component_id)?);
        self.circuit = self.circuit.with_rcd(id, bank, on).map_err(to_js)?;
        Ok(())
    }

    /// Fit or remove an RCBO on one split-load way.
    #[wasm_bindgen]
    pub fn set_rcbo(&mut self, component_id: &str, way: usize, fitted: bool) -> Result<(), JsValue> {
        let id = ComponentId(parse_uuid(component_id)?);
        self.circuit = self
            .circuit
            .with_component_edit(id, |c| c.set_rcbo(way, fitted))
            .map_err(to_js)?;
        Ok(())
    }

    /// Judge a wire (JSON) before drawing it; returns the outcome as JSON.
    #[wasm_bindgen]
    pub fn check_wire(&self, wire_json: &str) -> Result<String, JsValue> {
        let wire: Wire = serde_json::from_str(wire_json).map_err(|e| to_js(e.into()))?;
        let choice = self.analyzer.check_wire(&self.circuit, &wire);
        serde_json::to_string(&choice).map_err(|e| to_js(e.into()))
    }

    /// Add a wire (JSON) if the current mode allows it.
    ///
    /// Returns `false` when the wire was refused.
    #[wasm_bindgen]
    pub fn add_wire(&mut self, wire_json: &str) -> Result<bool, JsValue> {
        let wire: Wire = serde_json::from_str(wire_json).map_err(|e| to_js(e.into()))?;
        if !self.analyzer.check_wire(&self.circuit, &wire).is_allowed() {
            return Ok(false);
        }
        self.circuit = self.circuit.with_wire(wire);
        Ok(true)
    }

    #[wasm_bindgen]
    pub fn remove_wire(&mut self, wire_id: &str) -> Result<(), JsValue> {
        let id = WireId(parse_uuid(wire_id)?);
        self.circuit = self.circuit.without_wire(id).map_err(to_js)?;
        Ok(())
    }

    /// Cut a wire at the canvas point nearest `(x, y)`.
    ///
    /// Returns the new junction's id, or `undefined` when the cut lands too
    /// close to a terminal.
    #[wasm_bindgen]
    pub fn cut(&mut self, wire_id: &str, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        let id = WireId(parse_uuid(wire_id)?);
        let Some(splice) = self.analyzer.cut(&self.circuit, id, Point::new(x, y)) else {
            return Ok(None);
        };
        self.circuit = self.circuit.apply_splice(&splice).map_err(to_js)?;
        Ok(Some(splice.junction.id.0.to_string()))
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the nominal system voltage.
#[wasm_bindgen]
pub fn system_voltage() -> f64 {
    crate::SYSTEM_VOLTAGE
}
