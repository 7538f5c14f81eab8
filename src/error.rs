//! Error types for the wiring simulator.
//!
//! This module provides a unified error type [`WiringError`] for the few
//! operations that can genuinely fail: constructing components, looking up
//! ids for a mutation, and loading or saving documents.
//!
//! Analyses never return errors. "No supply", "no path" and "floating node"
//! are ordinary values in the analysis results.

use thiserror::Error;

use crate::circuit::{ComponentId, TerminalId, WireId};

/// Result type alias using [`WiringError`].
pub type Result<T> = std::result::Result<T, WiringError>;

/// Unified error type for all wiring operations.
#[derive(Error, Debug)]
pub enum WiringError {
    // ============ Construction Errors ============
    /// Requested component variant does not exist
    #[error("Unknown component variant '{variant}'")]
    UnknownComponentVariant { variant: String },

    /// Two terminals share an id
    #[error("Duplicate terminal id {terminal}")]
    DuplicateTerminal { terminal: TerminalId },

    /// An internal link names a terminal the component does not own
    #[error("Component {component} links unknown terminal '{terminal}'")]
    UnknownLinkTerminal {
        component: ComponentId,
        terminal: String,
    },

    /// State does not fit the component variant
    #[error("Invalid state for component {component}: {message}")]
    InvalidState {
        component: ComponentId,
        message: String,
    },

    // ============ Lookup Errors ============
    /// Component not found in circuit
    #[error("Component {component} not found in circuit")]
    ComponentNotFound { component: ComponentId },

    /// Wire not found in circuit
    #[error("Wire {wire} not found in circuit")]
    WireNotFound { wire: WireId },

    /// Terminal not found in circuit
    #[error("Terminal {terminal} not found in circuit")]
    TerminalNotFound { terminal: TerminalId },

    /// A probe name matched no terminal
    #[error("No terminal matches probe '{probe}' (use COMPONENT:TERMINAL)")]
    UnknownProbe { probe: String },

    // ============ Document Errors ============
    /// Document was written by an incompatible schema version
    #[error("Unsupported document version {found} (expected {expected})")]
    UnsupportedDocumentVersion { found: u32, expected: u32 },

    /// Malformed document contents
    #[error("Failed to parse circuit document: {0}")]
    DocumentParse(#[from] serde_json::Error),

    /// Error reading a circuit file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a circuit file
    #[error("Failed to write circuit file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl WiringError {
    /// Create an unknown component variant error
    pub fn unknown_variant(variant: impl Into<String>) -> Self {
        Self::UnknownComponentVariant {
            variant: variant.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(component: ComponentId, message: impl Into<String>) -> Self {
        Self::InvalidState {
            component,
            message: message.into(),
        }
    }
}
