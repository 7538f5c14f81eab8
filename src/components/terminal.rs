//! Terminals: named connection points owned by a component.

use serde::{Deserialize, Serialize};

use crate::circuit::{Point, TerminalFamily, TerminalId};

/// Horizontal pitch between neighbouring terminals, in canvas units.
const TERMINAL_PITCH: f64 = 20.0;

/// A connection point on a component.
///
/// The family is fixed at creation; the offset is only used to place wire
/// ends on the canvas and to measure geometric wire length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: TerminalId,
    pub name: String,
    pub family: TerminalFamily,
    /// Position relative to the owning component
    pub offset: Point,
}

impl Terminal {
    /// Create a terminal with a fresh id.
    pub fn new(name: impl Into<String>, family: TerminalFamily, offset: Point) -> Self {
        Self {
            id: TerminalId::new(),
            name: name.into(),
            family,
            offset,
        }
    }
}

/// Lay out a terminal list in a single row centred on the component origin.
pub(crate) fn row<N: Into<String>>(specs: Vec<(N, TerminalFamily)>) -> Vec<Terminal> {
    let count = specs.len();
    let start = -(count.saturating_sub(1) as f64) * TERMINAL_PITCH / 2.0;
    specs
        .into_iter()
        .enumerate()
        .map(|(i, (name, family))| {
            Terminal::new(
                name,
                family,
                Point::new(start + i as f64 * TERMINAL_PITCH, 0.0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_is_centred() {
        let terminals = row(vec![
            ("L", TerminalFamily::Line),
            ("N", TerminalFamily::Neutral),
            ("E", TerminalFamily::Earth),
        ]);
        assert_eq!(terminals.len(), 3);
        assert_eq!(terminals[0].offset, Point::new(-20.0, 0.0));
        assert_eq!(terminals[1].offset, Point::new(0.0, 0.0));
        assert_eq!(terminals[2].offset, Point::new(20.0, 0.0));
        assert_ne!(terminals[0].id, terminals[1].id);
    }
}
