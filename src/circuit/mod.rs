//! Circuit representation and validation.
//!
//! This module provides the data model the analysis engine reads: the
//! [`Circuit`] snapshot holding components and [`Wire`]s, the id newtypes
//! and conductor tags, and integrity checks.

mod graph;
mod types;
mod validate;
mod wire;

pub use graph::Circuit;
pub use types::*;
pub use validate::{validate_circuit, ValidationReport};
pub use wire::Wire;
