//! Wiring accessories and current-using equipment.
//!
//! Sockets and fused connection units have paired entries (`_A`/`_B`,
//! `IN`/`OUT`) for each conductor so that two cables can land on one
//! terminal, as they do on a real faceplate.

use super::terminal::{row, Terminal};
use super::{pair, ComponentKind, ComponentState, LinkPair};
use crate::circuit::TerminalFamily;

pub(super) fn layout(kind: ComponentKind) -> Vec<Terminal> {
    use TerminalFamily::*;
    let specs = match kind {
        ComponentKind::Lamp
        | ComponentKind::ExtractorFan
        | ComponentKind::ImmersionHeater
        | ComponentKind::Shower
        | ComponentKind::EvCharger
        | ComponentKind::CookerOutlet => vec![("L", Line), ("N", Neutral), ("E", Earth)],
        ComponentKind::SingleSocket | ComponentKind::DoubleSocket => vec![
            ("L_A", Line),
            ("L_B", Line),
            ("N_A", Neutral),
            ("N_B", Neutral),
            ("E_A", Earth),
            ("E_B", Earth),
        ],
        ComponentKind::SwitchedFusedSpur | ComponentKind::UnswitchedFusedSpur => vec![
            ("LIN", Line),
            ("LOUT", Line),
            ("NIN", Neutral),
            ("NOUT", Neutral),
            ("EIN", Earth),
            ("EOUT", Earth),
        ],
        ComponentKind::CeilingRose => vec![
            ("LOOP_1", Line),
            ("LOOP_2", Line),
            ("LOOP_3", Line),
            ("SL_1", Line),
            ("SL_2", Line),
            ("N_1", Neutral),
            ("N_2", Neutral),
            ("N_3", Neutral),
            ("E_1", Earth),
            ("E_2", Earth),
            ("E_3", Earth),
        ],
        _ => Vec::new(),
    };
    row(specs)
}

pub(super) fn links(kind: ComponentKind, state: &ComponentState) -> Vec<LinkPair> {
    match kind {
        ComponentKind::SingleSocket | ComponentKind::DoubleSocket => vec![
            pair("L_A", "L_B"),
            pair("N_A", "N_B"),
            pair("E_A", "E_B"),
        ],
        ComponentKind::UnswitchedFusedSpur => vec![
            pair("LIN", "LOUT"),
            pair("NIN", "NOUT"),
            pair("EIN", "EOUT"),
        ],
        ComponentKind::SwitchedFusedSpur => {
            let mut pairs = vec![pair("EIN", "EOUT")];
            if matches!(state, ComponentState::Toggle { on: true }) {
                pairs.push(pair("LIN", "LOUT"));
                pairs.push(pair("NIN", "NOUT"));
            }
            pairs
        }
        ComponentKind::CeilingRose => vec![
            pair("LOOP_1", "LOOP_2"),
            pair("LOOP_1", "LOOP_3"),
            pair("SL_1", "SL_2"),
            pair("N_1", "N_2"),
            pair("N_1", "N_3"),
            pair("E_1", "E_2"),
            pair("E_1", "E_3"),
        ],
        // Loads never join their own terminals
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lamp_has_no_internal_links() {
        assert!(links(ComponentKind::Lamp, &ComponentState::Fixed).is_empty());
    }

    #[test]
    fn test_switched_fcu_keeps_earth() {
        let off = links(
            ComponentKind::SwitchedFusedSpur,
            &ComponentState::Toggle { on: false },
        );
        assert_eq!(off, vec![pair("EIN", "EOUT")]);
        let on = links(
            ComponentKind::SwitchedFusedSpur,
            &ComponentState::Toggle { on: true },
        );
        assert_eq!(on.len(), 3);
    }

    #[test]
    fn test_rose_switched_live_is_separate_from_loop() {
        let pairs = links(ComponentKind::CeilingRose, &ComponentState::Fixed);
        assert!(!pairs
            .iter()
            .any(|(a, b)| a.starts_with("LOOP") && b.starts_with("SL")));
    }
}
