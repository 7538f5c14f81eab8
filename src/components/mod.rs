//! Component models for the wiring simulator.
//!
//! This module provides every placeable component:
//! - Sources: Supply, Consumer Unit, Split-load Consumer Unit
//! - Controls: 1-way, 2-way, intermediate and double-pole switches, Cooker Control Unit
//! - Accessories: sockets, fused connection units, ceiling rose, loads
//! - Connectors: connector blocks, junction box, splice junction, bonding clamp
//!
//! Each variant contributes a fixed terminal layout and an internal-link rule:
//! a pure function of the component state producing the pairs of terminal
//! names that are electrically common. The analysis engine only consumes the
//! terminal list and the link pairs; it never branches on the variant.

mod accessories;
mod connectors;
mod controls;
mod sources;
mod terminal;

pub use sources::{CONSUMER_UNIT_WAYS, SPLIT_LOAD_BANK_WAYS};
pub use terminal::Terminal;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::circuit::{ComponentId, Point, TerminalFamily, TerminalId};
use crate::error::{Result, WiringError};

/// A pair of terminal names that are electrically common.
pub type LinkPair = (String, String);

pub(crate) fn pair(a: impl Into<String>, b: impl Into<String>) -> LinkPair {
    (a.into(), b.into())
}

/// Component variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    // Sources
    Supply,
    ConsumerUnit,
    SplitLoadConsumerUnit,
    // Loads
    Lamp,
    ExtractorFan,
    ImmersionHeater,
    Shower,
    EvCharger,
    CookerOutlet,
    // Controls
    OneWaySwitch,
    TwoWaySwitch,
    IntermediateSwitch,
    DoublePoleSwitch,
    CookerControlUnit,
    // Accessories
    SingleSocket,
    DoubleSocket,
    SwitchedFusedSpur,
    UnswitchedFusedSpur,
    CeilingRose,
    // Connectors
    ConnectorL2,
    ConnectorN2,
    ConnectorE2,
    ConnectorL3,
    ConnectorN3,
    ConnectorE3,
    JunctionBox,
    Junction,
    BondingClamp,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 28] = [
        ComponentKind::Supply,
        ComponentKind::ConsumerUnit,
        ComponentKind::SplitLoadConsumerUnit,
        ComponentKind::Lamp,
        ComponentKind::ExtractorFan,
        ComponentKind::ImmersionHeater,
        ComponentKind::Shower,
        ComponentKind::EvCharger,
        ComponentKind::CookerOutlet,
        ComponentKind::OneWaySwitch,
        ComponentKind::TwoWaySwitch,
        ComponentKind::IntermediateSwitch,
        ComponentKind::DoublePoleSwitch,
        ComponentKind::CookerControlUnit,
        ComponentKind::SingleSocket,
        ComponentKind::DoubleSocket,
        ComponentKind::SwitchedFusedSpur,
        ComponentKind::UnswitchedFusedSpur,
        ComponentKind::CeilingRose,
        ComponentKind::ConnectorL2,
        ComponentKind::ConnectorN2,
        ComponentKind::ConnectorE2,
        ComponentKind::ConnectorL3,
        ComponentKind::ConnectorN3,
        ComponentKind::ConnectorE3,
        ComponentKind::JunctionBox,
        ComponentKind::Junction,
        ComponentKind::BondingClamp,
    ];

    /// Stable tag used in documents and on the command line.
    pub fn tag(&self) -> &'static str {
        match self {
            ComponentKind::Supply => "supply",
            ComponentKind::ConsumerUnit => "consumer_unit",
            ComponentKind::SplitLoadConsumerUnit => "split_load_consumer_unit",
            ComponentKind::Lamp => "lamp",
            ComponentKind::ExtractorFan => "extractor_fan",
            ComponentKind::ImmersionHeater => "immersion_heater",
            ComponentKind::Shower => "shower",
            ComponentKind::EvCharger => "ev_charger",
            ComponentKind::CookerOutlet => "cooker_outlet",
            ComponentKind::OneWaySwitch => "one_way_switch",
            ComponentKind::TwoWaySwitch => "two_way_switch",
            ComponentKind::IntermediateSwitch => "intermediate_switch",
            ComponentKind::DoublePoleSwitch => "double_pole_switch",
            ComponentKind::CookerControlUnit => "cooker_control_unit",
            ComponentKind::SingleSocket => "single_socket",
            ComponentKind::DoubleSocket => "double_socket",
            ComponentKind::SwitchedFusedSpur => "switched_fused_spur",
            ComponentKind::UnswitchedFusedSpur => "unswitched_fused_spur",
            ComponentKind::CeilingRose => "ceiling_rose",
            ComponentKind::ConnectorL2 => "connector_l2",
            ComponentKind::ConnectorN2 => "connector_n2",
            ComponentKind::ConnectorE2 => "connector_e2",
            ComponentKind::ConnectorL3 => "connector_l3",
            ComponentKind::ConnectorN3 => "connector_n3",
            ComponentKind::ConnectorE3 => "connector_e3",
            ComponentKind::JunctionBox => "junction_box",
            ComponentKind::Junction => "junction",
            ComponentKind::BondingClamp => "bonding_clamp",
        }
    }

    /// Human-readable default label.
    pub fn display_name(&self) -> &'static str {
        match self {
            ComponentKind::Supply => "Supply",
            ComponentKind::ConsumerUnit => "Consumer Unit",
            ComponentKind::SplitLoadConsumerUnit => "Split-load Consumer Unit",
            ComponentKind::Lamp => "Lamp",
            ComponentKind::ExtractorFan => "Extractor Fan",
            ComponentKind::ImmersionHeater => "Immersion Heater",
            ComponentKind::Shower => "Electric Shower",
            ComponentKind::EvCharger => "EV Charger",
            ComponentKind::CookerOutlet => "Cooker Outlet",
            ComponentKind::OneWaySwitch => "1-way Switch",
            ComponentKind::TwoWaySwitch => "2-way Switch",
            ComponentKind::IntermediateSwitch => "Intermediate Switch",
            ComponentKind::DoublePoleSwitch => "Double-pole Switch",
            ComponentKind::CookerControlUnit => "Cooker Control Unit",
            ComponentKind::SingleSocket => "Single Socket",
            ComponentKind::DoubleSocket => "Double Socket",
            ComponentKind::SwitchedFusedSpur => "Switched FCU",
            ComponentKind::UnswitchedFusedSpur => "Unswitched FCU",
            ComponentKind::CeilingRose => "Ceiling Rose",
            ComponentKind::ConnectorL2 => "Connector (L, 2-way)",
            ComponentKind::ConnectorN2 => "Connector (N, 2-way)",
            ComponentKind::ConnectorE2 => "Connector (E, 2-way)",
            ComponentKind::ConnectorL3 => "Commoning Block (L, 3-way)",
            ComponentKind::ConnectorN3 => "Commoning Block (N, 3-way)",
            ComponentKind::ConnectorE3 => "Commoning Block (E, 3-way)",
            ComponentKind::JunctionBox => "Junction Box",
            ComponentKind::Junction => "Junction",
            ComponentKind::BondingClamp => "Bonding Clamp",
        }
    }

    /// Origin of supply (the meter tails end).
    pub fn is_supply(&self) -> bool {
        matches!(self, ComponentKind::Supply)
    }

    pub fn is_consumer_unit(&self) -> bool {
        matches!(
            self,
            ComponentKind::ConsumerUnit | ComponentKind::SplitLoadConsumerUnit
        )
    }

    /// Socket-outlets taking part in ring/spur classification.
    pub fn is_socket(&self) -> bool {
        matches!(self, ComponentKind::SingleSocket | ComponentKind::DoubleSocket)
    }

    /// Current-using equipment with L, N and E terminals.
    pub fn is_load(&self) -> bool {
        matches!(
            self,
            ComponentKind::Lamp
                | ComponentKind::ExtractorFan
                | ComponentKind::ImmersionHeater
                | ComponentKind::Shower
                | ComponentKind::EvCharger
                | ComponentKind::CookerOutlet
        )
    }

    /// Components whose internal links join terminals of every family.
    pub fn is_transparent(&self) -> bool {
        matches!(self, ComponentKind::Junction)
    }

    /// State a freshly placed component starts in.
    pub fn default_state(&self) -> ComponentState {
        match self {
            ComponentKind::Supply
            | ComponentKind::Lamp
            | ComponentKind::ExtractorFan
            | ComponentKind::ImmersionHeater
            | ComponentKind::Shower
            | ComponentKind::EvCharger
            | ComponentKind::CookerOutlet
            | ComponentKind::SingleSocket
            | ComponentKind::DoubleSocket
            | ComponentKind::UnswitchedFusedSpur
            | ComponentKind::CeilingRose
            | ComponentKind::ConnectorL2
            | ComponentKind::ConnectorN2
            | ComponentKind::ConnectorE2
            | ComponentKind::ConnectorL3
            | ComponentKind::ConnectorN3
            | ComponentKind::ConnectorE3
            | ComponentKind::JunctionBox
            | ComponentKind::Junction
            | ComponentKind::BondingClamp => ComponentState::Fixed,
            ComponentKind::OneWaySwitch
            | ComponentKind::DoublePoleSwitch
            | ComponentKind::SwitchedFusedSpur
            | ComponentKind::CookerControlUnit => ComponentState::Toggle { on: false },
            ComponentKind::TwoWaySwitch | ComponentKind::IntermediateSwitch => {
                ComponentState::Selector { position: 0 }
            }
            ComponentKind::ConsumerUnit => sources::consumer_unit_state(),
            ComponentKind::SplitLoadConsumerUnit => sources::split_load_state(),
        }
    }

    fn terminals(&self) -> Vec<Terminal> {
        match self {
            ComponentKind::Supply
            | ComponentKind::ConsumerUnit
            | ComponentKind::SplitLoadConsumerUnit => sources::layout(*self),
            ComponentKind::OneWaySwitch
            | ComponentKind::TwoWaySwitch
            | ComponentKind::IntermediateSwitch
            | ComponentKind::DoublePoleSwitch
            | ComponentKind::CookerControlUnit => controls::layout(*self),
            ComponentKind::Lamp
            | ComponentKind::ExtractorFan
            | ComponentKind::ImmersionHeater
            | ComponentKind::Shower
            | ComponentKind::EvCharger
            | ComponentKind::CookerOutlet
            | ComponentKind::SingleSocket
            | ComponentKind::DoubleSocket
            | ComponentKind::SwitchedFusedSpur
            | ComponentKind::UnswitchedFusedSpur
            | ComponentKind::CeilingRose => accessories::layout(*self),
            ComponentKind::ConnectorL2
            | ComponentKind::ConnectorN2
            | ComponentKind::ConnectorE2
            | ComponentKind::ConnectorL3
            | ComponentKind::ConnectorN3
            | ComponentKind::ConnectorE3
            | ComponentKind::JunctionBox
            | ComponentKind::BondingClamp => connectors::layout(*self),
            ComponentKind::Junction => connectors::junction_layout(TerminalFamily::Line),
        }
    }

    /// Internal-link rule: terminal-name pairs common in the given state.
    pub fn link_pairs(&self, state: &ComponentState) -> Vec<LinkPair> {
        match self {
            ComponentKind::Supply
            | ComponentKind::ConsumerUnit
            | ComponentKind::SplitLoadConsumerUnit => sources::links(*self, state),
            ComponentKind::OneWaySwitch
            | ComponentKind::TwoWaySwitch
            | ComponentKind::IntermediateSwitch
            | ComponentKind::DoublePoleSwitch
            | ComponentKind::CookerControlUnit => controls::links(*self, state),
            ComponentKind::Lamp
            | ComponentKind::ExtractorFan
            | ComponentKind::ImmersionHeater
            | ComponentKind::Shower
            | ComponentKind::EvCharger
            | ComponentKind::CookerOutlet
            | ComponentKind::SingleSocket
            | ComponentKind::DoubleSocket
            | ComponentKind::SwitchedFusedSpur
            | ComponentKind::UnswitchedFusedSpur
            | ComponentKind::CeilingRose => accessories::links(*self, state),
            ComponentKind::ConnectorL2
            | ComponentKind::ConnectorN2
            | ComponentKind::ConnectorE2
            | ComponentKind::ConnectorL3
            | ComponentKind::ConnectorN3
            | ComponentKind::ConnectorE3
            | ComponentKind::JunctionBox
            | ComponentKind::Junction
            | ComponentKind::BondingClamp => connectors::links(*self),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ComponentKind {
    type Err = WiringError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ComponentKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag() == wanted)
            .ok_or_else(|| WiringError::unknown_variant(s))
    }
}

/// Mutable state of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentState {
    /// No user-adjustable state
    Fixed,
    /// On/off control (1-way and double-pole switches, CCU, switched FCU)
    Toggle { on: bool },
    /// Two-position changeover (2-way and intermediate switches)
    Selector { position: u8 },
    /// Main switch plus one breaker per way
    ConsumerUnit { main_on: bool, ways: Vec<bool> },
    /// Main switch, two RCD-protected banks, per-way breakers, RCBO ways
    SplitLoad {
        main_on: bool,
        rcd_on: [bool; 2],
        ways: Vec<bool>,
        rcbo: Vec<bool>,
    },
}

/// A placed circuit element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub label: String,
    /// Canvas position (rendering and wire geometry only)
    pub position: Point,
    pub terminals: Vec<Terminal>,
    pub state: ComponentState,
}

impl Component {
    /// Create a component of the given variant with fresh ids.
    pub fn new(kind: ComponentKind, position: Point) -> Self {
        Self {
            id: ComponentId::new(),
            kind,
            label: kind.display_name().to_string(),
            position,
            terminals: kind.terminals(),
            state: kind.default_state(),
        }
    }

    /// Create a component from its variant tag.
    pub fn create(variant: &str, position: Point) -> Result<Self> {
        Ok(Self::new(variant.parse()?, position))
    }

    /// Create a splice junction whose two terminals carry `family`.
    pub fn junction(family: TerminalFamily, position: Point) -> Self {
        Self {
            id: ComponentId::new(),
            kind: ComponentKind::Junction,
            label: ComponentKind::Junction.display_name().to_string(),
            position,
            terminals: connectors::junction_layout(family),
            state: ComponentState::Fixed,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_state(mut self, state: ComponentState) -> Self {
        self.state = state;
        self
    }

    /// Find a terminal by name.
    pub fn terminal(&self, name: &str) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.name == name)
    }

    /// Find a terminal id by name.
    pub fn terminal_id(&self, name: &str) -> Option<TerminalId> {
        self.terminal(name).map(|t| t.id)
    }

    pub fn owns(&self, terminal: TerminalId) -> bool {
        self.terminals.iter().any(|t| t.id == terminal)
    }

    /// Absolute canvas position of one of this component's terminals.
    pub fn terminal_position(&self, terminal: TerminalId) -> Option<Point> {
        self.terminals
            .iter()
            .find(|t| t.id == terminal)
            .map(|t| self.position + t.offset)
    }

    /// Terminal-name pairs common in the current state.
    pub fn link_pairs(&self) -> Vec<LinkPair> {
        self.kind.link_pairs(&self.state)
    }

    /// Current internal links resolved to terminal ids.
    ///
    /// Pairs naming a terminal this component does not own are skipped;
    /// [`Component::check_links`] reports them.
    pub fn internal_links(&self) -> Vec<(TerminalId, TerminalId)> {
        self.link_pairs()
            .iter()
            .filter_map(|(a, b)| Some((self.terminal_id(a)?, self.terminal_id(b)?)))
            .collect()
    }

    /// Verify every link pair names an owned terminal.
    pub fn check_links(&self) -> Result<()> {
        for (a, b) in self.link_pairs() {
            for name in [a, b] {
                if self.terminal(&name).is_none() {
                    return Err(WiringError::UnknownLinkTerminal {
                        component: self.id,
                        terminal: name,
                    });
                }
            }
        }
        Ok(())
    }

    /// Advance the user-facing control: flip a toggle, move a selector, or
    /// flip the main switch of a consumer unit.
    pub fn toggle(&mut self) -> Result<()> {
        match &mut self.state {
            ComponentState::Toggle { on } => *on = !*on,
            ComponentState::Selector { position } => *position = (*position + 1) % 2,
            ComponentState::ConsumerUnit { main_on, .. }
            | ComponentState::SplitLoad { main_on, .. } => *main_on = !*main_on,
            ComponentState::Fixed => {
                return Err(WiringError::invalid_state(
                    self.id,
                    format!("{} has no control to toggle", self.kind.display_name()),
                ))
            }
        }
        Ok(())
    }

    /// Open or close the breaker of a consumer-unit way (0-based).
    pub fn set_way(&mut self, way: usize, closed: bool) -> Result<()> {
        let ways = match &mut self.state {
            ComponentState::ConsumerUnit { ways, .. } | ComponentState::SplitLoad { ways, .. } => {
                ways
            }
            _ => {
                return Err(WiringError::invalid_state(
                    self.id,
                    "component has no protective ways",
                ))
            }
        };
        let count = ways.len();
        let slot = ways.get_mut(way).ok_or_else(|| {
            WiringError::invalid_state(self.id, format!("way {} out of range (0..{count})", way))
        })?;
        *slot = closed;
        Ok(())
    }

    /// Switch one RCD bank of a split-load consumer unit (0 or 1).
    pub fn set_rcd(&mut self, bank: usize, on: bool) -> Result<()> {
        match &mut self.state {
            ComponentState::SplitLoad { rcd_on, .. } if bank < rcd_on.len() => {
                rcd_on[bank] = on;
                Ok(())
            }
            _ => Err(WiringError::invalid_state(
                self.id,
                format!("no RCD bank {bank}"),
            )),
        }
    }

    /// Fit or remove an RCBO on a split-load way (0-based).
    pub fn set_rcbo(&mut self, way: usize, fitted: bool) -> Result<()> {
        match &mut self.state {
            ComponentState::SplitLoad { rcbo, .. } if way < rcbo.len() => {
                rcbo[way] = fitted;
                Ok(())
            }
            _ => Err(WiringError::invalid_state(
                self.id,
                format!("no RCBO slot for way {way}"),
            )),
        }
    }
}
