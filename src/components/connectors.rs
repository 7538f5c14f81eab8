//! Connectors: connector blocks, commoning blocks, junction boxes, splice
//! junctions and bonding clamps.

use super::terminal::{row, Terminal};
use super::{pair, ComponentKind, LinkPair};
use crate::circuit::{Point, TerminalFamily};

pub(super) fn layout(kind: ComponentKind) -> Vec<Terminal> {
    use TerminalFamily::*;
    let specs: Vec<(&str, TerminalFamily)> = match kind {
        ComponentKind::ConnectorL2 => vec![("T1", Line), ("T2", Line)],
        ComponentKind::ConnectorN2 => vec![("T1", Neutral), ("T2", Neutral)],
        ComponentKind::ConnectorE2 => vec![("T1", Earth), ("T2", Earth)],
        ComponentKind::ConnectorL3 => vec![("T1", Line), ("T2", Line), ("T3", Line)],
        ComponentKind::ConnectorN3 => {
            vec![("T1", Neutral), ("T2", Neutral), ("T3", Neutral)]
        }
        ComponentKind::ConnectorE3 => vec![("T1", Earth), ("T2", Earth), ("T3", Earth)],
        ComponentKind::JunctionBox => vec![
            ("L_1", Line),
            ("L_2", Line),
            ("L_3", Line),
            ("N_1", Neutral),
            ("N_2", Neutral),
            ("N_3", Neutral),
            ("E_1", Earth),
            ("E_2", Earth),
            ("E_3", Earth),
        ],
        ComponentKind::BondingClamp => vec![("E", Earth)],
        _ => Vec::new(),
    };
    row(specs)
}

/// Two-terminal splice junction, both terminals carrying `family`.
///
/// Both terminals sit on the junction origin so a cut wire keeps its
/// overall geometric length.
pub(super) fn junction_layout(family: TerminalFamily) -> Vec<Terminal> {
    ["A", "B"]
        .into_iter()
        .map(|name| Terminal::new(name, family, Point::default()))
        .collect()
}

pub(super) fn links(kind: ComponentKind) -> Vec<LinkPair> {
    match kind {
        ComponentKind::ConnectorL2
        | ComponentKind::ConnectorN2
        | ComponentKind::ConnectorE2 => vec![pair("T1", "T2")],
        ComponentKind::ConnectorL3
        | ComponentKind::ConnectorN3
        | ComponentKind::ConnectorE3 => vec![pair("T1", "T2"), pair("T1", "T3")],
        ComponentKind::JunctionBox => ["L", "N", "E"]
            .iter()
            .flat_map(|c| {
                [
                    pair(format!("{c}_1"), format!("{c}_2")),
                    pair(format!("{c}_1"), format!("{c}_3")),
                ]
            })
            .collect(),
        ComponentKind::Junction => vec![pair("A", "B")],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_junction_box_commons_each_family() {
        let pairs = links(ComponentKind::JunctionBox);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&pair("N_1", "N_3")));
    }

    #[test]
    fn test_junction_layout_family() {
        let terminals = junction_layout(TerminalFamily::Neutral);
        assert!(terminals
            .iter()
            .all(|t| t.family == TerminalFamily::Neutral && t.offset == Point::default()));
    }
}
