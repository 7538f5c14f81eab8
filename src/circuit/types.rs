//! Core types for circuit representation.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Allocate a fresh id. Ids are never reused within a session.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let simple = self.0.simple().to_string();
                write!(f, "{}{}", $prefix, &simple[..8])
            }
        }
    };
}

uuid_id!(
    /// A unique identifier for a placed component.
    ComponentId,
    "C"
);
uuid_id!(
    /// A unique identifier for a terminal, unique across the whole circuit.
    TerminalId,
    "T"
);
uuid_id!(
    /// A unique identifier for a wire.
    WireId,
    "W"
);

/// A 2D position in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Closest point to `self` on the segment `a`-`b`, with its parameter
    /// clamped to [0, 1].
    pub fn project_onto_segment(&self, a: Point, b: Point) -> (Point, f64) {
        let ab = b - a;
        let len_sq = ab.x * ab.x + ab.y * ab.y;
        if len_sq == 0.0 {
            return (a, 0.0);
        }
        let ap = *self - a;
        let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
        (Point::new(a.x + ab.x * t, a.y + ab.y * t), t)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The three conductor families of a single-phase installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conductor {
    Line,
    Neutral,
    Earth,
}

impl Conductor {
    pub const ALL: [Conductor; 3] = [Conductor::Line, Conductor::Neutral, Conductor::Earth];

    /// Name of the reference terminal carrying this conductor on a supply.
    pub fn supply_terminal(&self) -> &'static str {
        match self {
            Conductor::Line => "L",
            Conductor::Neutral => "N",
            Conductor::Earth => "E",
        }
    }
}

impl fmt::Display for Conductor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conductor::Line => write!(f, "L"),
            Conductor::Neutral => write!(f, "N"),
            Conductor::Earth => write!(f, "E"),
        }
    }
}

/// Family tag fixed on a terminal when its component is created.
///
/// Switch contacts carry their own families but are line conductors for
/// every analysis purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalFamily {
    Line,
    Neutral,
    Earth,
    /// Switch common contact
    Common,
    /// First switch way / strapper
    L1,
    /// Second switch way / strapper
    L2,
}

impl TerminalFamily {
    /// The conductor this terminal belongs to.
    pub fn conductor(&self) -> Conductor {
        match self {
            TerminalFamily::Neutral => Conductor::Neutral,
            TerminalFamily::Earth => Conductor::Earth,
            TerminalFamily::Line
            | TerminalFamily::Common
            | TerminalFamily::L1
            | TerminalFamily::L2 => Conductor::Line,
        }
    }

    pub fn is_earth(&self) -> bool {
        self.conductor() == Conductor::Earth
    }
}

impl From<Conductor> for TerminalFamily {
    fn from(conductor: Conductor) -> Self {
        match conductor {
            Conductor::Line => TerminalFamily::Line,
            Conductor::Neutral => TerminalFamily::Neutral,
            Conductor::Earth => TerminalFamily::Earth,
        }
    }
}

/// Conductor tag carried by a wire, independent of its endpoints' families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireKind {
    Line,
    Neutral,
    Earth,
    /// Unspecified core; matches every family filter
    #[default]
    Generic,
}

impl WireKind {
    /// The conductor this tag names, `None` for generic wires.
    pub fn conductor(&self) -> Option<Conductor> {
        match self {
            WireKind::Line => Some(Conductor::Line),
            WireKind::Neutral => Some(Conductor::Neutral),
            WireKind::Earth => Some(Conductor::Earth),
            WireKind::Generic => None,
        }
    }
}

impl From<Conductor> for WireKind {
    fn from(conductor: Conductor) -> Self {
        match conductor {
            Conductor::Line => WireKind::Line,
            Conductor::Neutral => WireKind::Neutral,
            Conductor::Earth => WireKind::Earth,
        }
    }
}

/// Fault injected on a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFault {
    #[default]
    None,
    /// Broken conductor; the wire no longer conducts
    Open,
    /// Loose or corroded joint; conducts with a penalty resistance
    HighResistance,
}

/// A set of conductor families used to filter graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FamilyFilter {
    pub line: bool,
    pub neutral: bool,
    pub earth: bool,
}

impl FamilyFilter {
    pub const ALL: FamilyFilter = FamilyFilter {
        line: true,
        neutral: true,
        earth: true,
    };

    /// Filter admitting a single conductor family.
    pub fn only(conductor: Conductor) -> Self {
        Self {
            line: conductor == Conductor::Line,
            neutral: conductor == Conductor::Neutral,
            earth: conductor == Conductor::Earth,
        }
    }

    pub fn contains(&self, conductor: Conductor) -> bool {
        match conductor {
            Conductor::Line => self.line,
            Conductor::Neutral => self.neutral,
            Conductor::Earth => self.earth,
        }
    }
}

impl From<Conductor> for FamilyFilter {
    fn from(conductor: Conductor) -> Self {
        Self::only(conductor)
    }
}

/// One value per conductor family.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerConductor<T> {
    pub line: T,
    pub neutral: T,
    pub earth: T,
}

impl<T> PerConductor<T> {
    /// Build by evaluating `f` once per family, in L, N, E order.
    pub fn from_fn(mut f: impl FnMut(Conductor) -> T) -> Self {
        Self {
            line: f(Conductor::Line),
            neutral: f(Conductor::Neutral),
            earth: f(Conductor::Earth),
        }
    }

    pub fn get(&self, conductor: Conductor) -> &T {
        match conductor {
            Conductor::Line => &self.line,
            Conductor::Neutral => &self.neutral,
            Conductor::Earth => &self.earth,
        }
    }
}

impl PerConductor<bool> {
    pub fn all(&self) -> bool {
        self.line && self.neutral && self.earth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_fresh() {
        let a = TerminalId::new();
        let b = TerminalId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with('T'));
    }

    #[test]
    fn test_switch_families_are_line_conductors() {
        assert_eq!(TerminalFamily::Common.conductor(), Conductor::Line);
        assert_eq!(TerminalFamily::L2.conductor(), Conductor::Line);
        assert!(TerminalFamily::Earth.is_earth());
    }

    #[test]
    fn test_projection_clamps_to_segment() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let (p, t) = Point::new(5.0, 3.0).project_onto_segment(a, b);
        assert_eq!(p, Point::new(5.0, 0.0));
        assert!((t - 0.5).abs() < 1e-12);

        let (p, t) = Point::new(-4.0, 1.0).project_onto_segment(a, b);
        assert_eq!(p, a);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_family_filter() {
        let f = FamilyFilter::only(Conductor::Neutral);
        assert!(f.contains(Conductor::Neutral));
        assert!(!f.contains(Conductor::Line));
        assert!(FamilyFilter::ALL.contains(Conductor::Earth));
    }
}
