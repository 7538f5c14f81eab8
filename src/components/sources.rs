//! Sources: the supply origin and consumer units.
//!
//! Every source exposes `L`, `N` and `E` reference terminals. A consumer unit
//! additionally has one line output per way plus neutral and earth bar
//! outputs. Way numbering on terminal names is 1-based; way indices in state
//! are 0-based.

use super::terminal::{row, Terminal};
use super::{pair, ComponentKind, ComponentState, LinkPair};
use crate::circuit::TerminalFamily;

/// Number of ways on a standard consumer unit.
pub const CONSUMER_UNIT_WAYS: usize = 6;

/// Number of ways on each RCD bank of a split-load consumer unit.
pub const SPLIT_LOAD_BANK_WAYS: usize = 3;

pub(super) fn consumer_unit_state() -> ComponentState {
    ComponentState::ConsumerUnit {
        main_on: true,
        ways: vec![true; CONSUMER_UNIT_WAYS],
    }
}

pub(super) fn split_load_state() -> ComponentState {
    let ways = SPLIT_LOAD_BANK_WAYS * 2;
    ComponentState::SplitLoad {
        main_on: true,
        rcd_on: [true, true],
        ways: vec![true; ways],
        rcbo: vec![false; ways],
    }
}

fn supply_terminals() -> Vec<(String, TerminalFamily)> {
    vec![
        ("L".to_string(), TerminalFamily::Line),
        ("N".to_string(), TerminalFamily::Neutral),
        ("E".to_string(), TerminalFamily::Earth),
    ]
}

pub(super) fn layout(kind: ComponentKind) -> Vec<Terminal> {
    let mut specs = supply_terminals();
    match kind {
        ComponentKind::ConsumerUnit => {
            for way in 1..=CONSUMER_UNIT_WAYS {
                specs.push((format!("W{way}_L"), TerminalFamily::Line));
                specs.push((format!("N{way}"), TerminalFamily::Neutral));
                specs.push((format!("E{way}"), TerminalFamily::Earth));
            }
        }
        ComponentKind::SplitLoadConsumerUnit => {
            for way in 1..=SPLIT_LOAD_BANK_WAYS * 2 {
                specs.push((format!("W{way}_L"), TerminalFamily::Line));
                specs.push((format!("W{way}_N"), TerminalFamily::Neutral));
                specs.push((format!("E{way}"), TerminalFamily::Earth));
            }
        }
        _ => {}
    }
    row(specs)
}

pub(super) fn links(kind: ComponentKind, state: &ComponentState) -> Vec<LinkPair> {
    match (kind, state) {
        (ComponentKind::ConsumerUnit, ComponentState::ConsumerUnit { main_on, ways }) => {
            let mut pairs = Vec::new();
            for way in 1..=CONSUMER_UNIT_WAYS {
                // Earth bar is never switched
                pairs.push(pair("E", format!("E{way}")));
                if !*main_on {
                    continue;
                }
                // Double-pole main switch isolates the neutral bar too
                pairs.push(pair("N", format!("N{way}")));
                if ways.get(way - 1).copied().unwrap_or(false) {
                    pairs.push(pair("L", format!("W{way}_L")));
                }
            }
            pairs
        }
        (
            ComponentKind::SplitLoadConsumerUnit,
            ComponentState::SplitLoad {
                main_on,
                rcd_on,
                ways,
                rcbo,
            },
        ) => {
            let mut pairs = Vec::new();
            for way in 1..=SPLIT_LOAD_BANK_WAYS * 2 {
                pairs.push(pair("E", format!("E{way}")));
                let index = way - 1;
                let bank_on = *main_on && rcd_on[index / SPLIT_LOAD_BANK_WAYS];
                if !bank_on {
                    continue;
                }
                let closed = ways.get(index).copied().unwrap_or(false);
                let is_rcbo = rcbo.get(index).copied().unwrap_or(false);
                if closed {
                    pairs.push(pair("L", format!("W{way}_L")));
                }
                // An RCBO breaks its neutral as well; a plain MCB does not
                if closed || !is_rcbo {
                    pairs.push(pair("N", format!("W{way}_N")));
                }
            }
            pairs
        }
        // Supply, or a state that does not belong to the variant: nothing linked
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has(pairs: &[LinkPair], a: &str, b: &str) -> bool {
        pairs.iter().any(|(x, y)| x == a && y == b)
    }

    #[test]
    fn test_consumer_unit_main_switch() {
        let state = ComponentState::ConsumerUnit {
            main_on: false,
            ways: vec![true; CONSUMER_UNIT_WAYS],
        };
        let pairs = links(ComponentKind::ConsumerUnit, &state);
        assert!(!has(&pairs, "L", "W1_L"));
        assert!(!has(&pairs, "N", "N1"));
        assert!(has(&pairs, "E", "E1"));
    }

    #[test]
    fn test_split_load_rcd_bank() {
        let state = ComponentState::SplitLoad {
            main_on: true,
            rcd_on: [true, false],
            ways: vec![true; 6],
            rcbo: vec![false; 6],
        };
        let pairs = links(ComponentKind::SplitLoadConsumerUnit, &state);
        assert!(has(&pairs, "L", "W1_L"));
        assert!(has(&pairs, "N", "W3_N"));
        assert!(!has(&pairs, "L", "W4_L"));
        assert!(!has(&pairs, "N", "W4_N"));
        assert!(has(&pairs, "E", "E4"));
    }

    #[test]
    fn test_split_load_rcbo_breaks_neutral() {
        let mut ways = vec![true; 6];
        ways[1] = false;
        ways[2] = false;
        let mut rcbo = vec![false; 6];
        rcbo[1] = true;
        let state = ComponentState::SplitLoad {
            main_on: true,
            rcd_on: [true, true],
            ways,
            rcbo,
        };
        let pairs = links(ComponentKind::SplitLoadConsumerUnit, &state);
        // RCBO way off: both poles open
        assert!(!has(&pairs, "L", "W2_L"));
        assert!(!has(&pairs, "N", "W2_N"));
        // MCB way off: neutral stays on the bar
        assert!(!has(&pairs, "L", "W3_L"));
        assert!(has(&pairs, "N", "W3_N"));
    }

    #[test]
    fn test_supply_has_no_links() {
        assert!(links(ComponentKind::Supply, &ComponentState::Fixed).is_empty());
        assert_eq!(layout(ComponentKind::Supply).len(), 3);
    }
}
