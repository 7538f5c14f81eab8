//! Control components: light switches, double-pole isolators and the
//! cooker control unit.

use super::terminal::{row, Terminal};
use super::{pair, ComponentKind, ComponentState, LinkPair};
use crate::circuit::TerminalFamily;

pub(super) fn layout(kind: ComponentKind) -> Vec<Terminal> {
    use TerminalFamily::*;
    let specs = match kind {
        ComponentKind::OneWaySwitch => vec![("COM", Common), ("L1", L1), ("E", Earth)],
        ComponentKind::TwoWaySwitch => {
            vec![("COM", Common), ("L1", L1), ("L2", L2), ("E", Earth)]
        }
        ComponentKind::IntermediateSwitch => vec![
            ("L1A", L1),
            ("L1B", L1),
            ("L2A", L2),
            ("L2B", L2),
            ("E", Earth),
        ],
        ComponentKind::DoublePoleSwitch => vec![
            ("LIN", Line),
            ("LOUT", Line),
            ("NIN", Neutral),
            ("NOUT", Neutral),
            ("E", Earth),
        ],
        ComponentKind::CookerControlUnit => vec![
            ("LIN", Line),
            ("LOUT", Line),
            ("NIN", Neutral),
            ("NOUT", Neutral),
            ("EIN", Earth),
            ("EOUT", Earth),
        ],
        _ => Vec::new(),
    };
    row(specs)
}

pub(super) fn links(kind: ComponentKind, state: &ComponentState) -> Vec<LinkPair> {
    match (kind, state) {
        (ComponentKind::OneWaySwitch, ComponentState::Toggle { on: true }) => {
            vec![pair("COM", "L1")]
        }
        (ComponentKind::TwoWaySwitch, ComponentState::Selector { position }) => {
            if *position == 0 {
                vec![pair("COM", "L1")]
            } else {
                vec![pair("COM", "L2")]
            }
        }
        (ComponentKind::IntermediateSwitch, ComponentState::Selector { position }) => {
            if *position == 0 {
                vec![pair("L1A", "L1B"), pair("L2A", "L2B")]
            } else {
                vec![pair("L1A", "L2B"), pair("L2A", "L1B")]
            }
        }
        (ComponentKind::DoublePoleSwitch, ComponentState::Toggle { on: true }) => {
            vec![pair("LIN", "LOUT"), pair("NIN", "NOUT")]
        }
        (ComponentKind::CookerControlUnit, ComponentState::Toggle { on }) => {
            let mut pairs = vec![pair("EIN", "EOUT")];
            if *on {
                pairs.push(pair("LIN", "LOUT"));
                pairs.push(pair("NIN", "NOUT"));
            }
            pairs
        }
        // Earth is continuous through a CCU whatever its state
        (ComponentKind::CookerControlUnit, _) => vec![pair("EIN", "EOUT")],
        _ => Vec::new(),
    }
}
