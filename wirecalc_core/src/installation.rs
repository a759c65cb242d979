//! # Installation Parameters
//!
//! Electrical system topology and raceway method: the two installation
//! choices that decide conductor counts, reference voltages, ampacity table
//! partitions and the raceway sizing rule.
//!
//! ## Topology Summary
//!
//! | Topology           | Energized conductors | Reference voltage | Drop factor |
//! |--------------------|----------------------|-------------------|-------------|
//! | Single-phase       | 2                    | phase-to-neutral  | 2           |
//! | Two-phase          | 3                    | phase-to-neutral  | 1           |
//! | Delta three-phase  | 3                    | phase-to-phase    | √3          |
//! | Wye three-phase    | 4                    | phase-to-neutral  | 1           |
//!
//! A bare system voltage is read phase-to-neutral for single-phase circuits
//! and phase-to-phase for every other topology (127 V, 220 V, 440 V, ...).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::units::Volts;

/// Electrical system wiring configuration
///
/// Deserializes through [`FromStr`], so unknown names surface as
/// [`CalcError::InvalidTopology`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Topology {
    /// 1 phase + neutral
    SinglePhase,
    /// 2 phases + neutral
    TwoPhase,
    /// 3 phases, 3 wires
    Delta,
    /// 3 phases + neutral, 4 wires
    Wye,
}

impl Topology {
    /// All topologies for UI selection
    pub const ALL: [Topology; 4] = [
        Topology::SinglePhase,
        Topology::TwoPhase,
        Topology::Delta,
        Topology::Wye,
    ];

    /// Energized (current-carrying) conductors per circuit
    pub fn conductor_count(&self) -> u32 {
        match self {
            Topology::SinglePhase => 2,
            Topology::TwoPhase => 3,
            Topology::Delta => 3,
            Topology::Wye => 4,
        }
    }

    /// Number of phase (ungrounded) conductors
    pub fn phase_count(&self) -> u32 {
        match self {
            Topology::SinglePhase => 1,
            Topology::TwoPhase => 2,
            Topology::Delta | Topology::Wye => 3,
        }
    }

    /// Whether the circuit carries a neutral conductor
    pub fn has_neutral(&self) -> bool {
        !matches!(self, Topology::Delta)
    }

    /// True for delta and wye systems (√3 current formula)
    pub fn is_three_phase(&self) -> bool {
        matches!(self, Topology::Delta | Topology::Wye)
    }

    /// Voltage-drop multiplier applied to I·Z·L
    pub fn drop_factor(&self) -> f64 {
        match self {
            Topology::SinglePhase => 2.0,
            Topology::TwoPhase => 1.0,
            Topology::Delta => 3f64.sqrt(),
            Topology::Wye => 1.0,
        }
    }

    /// Voltage the drop percentage is referred to
    pub fn reference(&self) -> VoltageReference {
        match self {
            Topology::Delta => VoltageReference::PhaseToPhase,
            _ => VoltageReference::PhaseToNeutral,
        }
    }

    /// Voltage the nominal current formula is written against, and how a
    /// system voltage without an explicit reference is read
    pub fn supply_reference(&self) -> VoltageReference {
        match self {
            Topology::SinglePhase => VoltageReference::PhaseToNeutral,
            _ => VoltageReference::PhaseToPhase,
        }
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Topology::SinglePhase => "Single-phase (1F-2H)",
            Topology::TwoPhase => "Two-phase (2F-3H)",
            Topology::Delta => "Three-phase delta (3F-3H)",
            Topology::Wye => "Three-phase wye (3F-4H)",
        }
    }
}

impl FromStr for Topology {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single-phase" | "monofasico" | "1f" => Ok(Topology::SinglePhase),
            "two-phase" | "bifasico" | "2f" => Ok(Topology::TwoPhase),
            "delta" | "trifasico-delta" | "3f3h" => Ok(Topology::Delta),
            "wye" | "trifasico-estrella" | "3f4h" => Ok(Topology::Wye),
            _ => Err(CalcError::InvalidTopology { name: s.to_string() }),
        }
    }
}

impl TryFrom<String> for Topology {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which voltage a nominal system voltage refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VoltageReference {
    #[default]
    PhaseToNeutral,
    PhaseToPhase,
}

impl VoltageReference {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            VoltageReference::PhaseToNeutral => "V(F-N)",
            VoltageReference::PhaseToPhase => "V(F-F)",
        }
    }
}

/// Both voltages of a supply, resolved once from whichever one was given.
///
/// V_FF = √3 × V_FN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemVoltage {
    pub phase_to_phase: Volts,
    pub phase_to_neutral: Volts,
}

impl SystemVoltage {
    /// Resolve from `voltage`, read as `supplied`
    pub fn resolve(voltage: Volts, supplied: VoltageReference) -> Self {
        match supplied {
            VoltageReference::PhaseToPhase => SystemVoltage {
                phase_to_phase: voltage,
                phase_to_neutral: voltage / 3f64.sqrt(),
            },
            VoltageReference::PhaseToNeutral => SystemVoltage {
                phase_to_phase: voltage * 3f64.sqrt(),
                phase_to_neutral: voltage,
            },
        }
    }

    /// Resolve for a topology; an unset reference takes [`Topology::supply_reference`]
    pub fn for_topology(
        topology: Topology,
        voltage: Volts,
        supplied: Option<VoltageReference>,
    ) -> Self {
        Self::resolve(voltage, supplied.unwrap_or(topology.supply_reference()))
    }

    /// The voltage in the given reference
    pub fn get(&self, reference: VoltageReference) -> Volts {
        match reference {
            VoltageReference::PhaseToPhase => self.phase_to_phase,
            VoltageReference::PhaseToNeutral => self.phase_to_neutral,
        }
    }
}

/// Conduit material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConduitKind {
    Pvc,
    Aluminum,
    /// Rigid heavy-wall steel (tubo conduit pared gruesa)
    SteelThick,
    /// Thin-wall steel / EMT (tubo conduit pared delgada)
    SteelThin,
}

impl ConduitKind {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            ConduitKind::Pvc => "PVC conduit",
            ConduitKind::Aluminum => "Aluminum conduit",
            ConduitKind::SteelThick => "Heavy-wall steel conduit",
            ConduitKind::SteelThin => "Thin-wall steel conduit",
        }
    }

    /// Steel is magnetic and raises reactance and AC resistance
    pub fn is_magnetic(&self) -> bool {
        matches!(self, ConduitKind::SteelThick | ConduitKind::SteelThin)
    }
}

/// Raceway installation method
///
/// Serializes as a single tag:
///
/// ```json
/// "conduit-pvc"   "conduit-steel-thin"   "spaced-tray"   "triangular-tray"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacewayMethod {
    ConduitPvc,
    ConduitAluminum,
    ConduitSteelThick,
    ConduitSteelThin,
    /// Single conductors laid in a tray with one diameter spacing
    SpacedTray,
    /// Conductors bundled in triangular (triplexed) arrangement in a tray
    TriangularTray,
}

/// Ampacity table partition a raceway method reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmpacityClass {
    /// NOM Table 310-15(b)(16): not more than three conductors in raceway
    Raceway,
    /// NOM Table 310-15(b)(17): single conductors in free air
    FreeAir,
    /// NOM Table 310-15(b)(20): triplexed conductors in free air
    Triplexed,
}

impl RacewayMethod {
    /// All raceway methods for UI selection
    pub const ALL: [RacewayMethod; 6] = [
        RacewayMethod::ConduitPvc,
        RacewayMethod::ConduitAluminum,
        RacewayMethod::ConduitSteelThick,
        RacewayMethod::ConduitSteelThin,
        RacewayMethod::SpacedTray,
        RacewayMethod::TriangularTray,
    ];

    /// Conduit kind, or `None` for trays
    pub fn conduit_kind(&self) -> Option<ConduitKind> {
        match self {
            RacewayMethod::ConduitPvc => Some(ConduitKind::Pvc),
            RacewayMethod::ConduitAluminum => Some(ConduitKind::Aluminum),
            RacewayMethod::ConduitSteelThick => Some(ConduitKind::SteelThick),
            RacewayMethod::ConduitSteelThin => Some(ConduitKind::SteelThin),
            RacewayMethod::SpacedTray | RacewayMethod::TriangularTray => None,
        }
    }

    /// True for either tray arrangement
    pub fn is_tray(&self) -> bool {
        self.conduit_kind().is_none()
    }

    /// Ampacity table partition for this method
    pub fn ampacity_class(&self) -> AmpacityClass {
        match self {
            RacewayMethod::SpacedTray => AmpacityClass::FreeAir,
            RacewayMethod::TriangularTray => AmpacityClass::Triplexed,
            _ => AmpacityClass::Raceway,
        }
    }

    /// Triangular arrangement has no 60 °C ampacity column
    pub fn has_60c_column(&self) -> bool {
        !matches!(self, RacewayMethod::TriangularTray)
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            RacewayMethod::SpacedTray => "Cable tray, spaced conductors",
            RacewayMethod::TriangularTray => "Cable tray, triangular arrangement",
            conduit => conduit
                .conduit_kind()
                .map(|k| k.display_name())
                .unwrap_or("Conduit"),
        }
    }
}

impl std::fmt::Display for RacewayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
