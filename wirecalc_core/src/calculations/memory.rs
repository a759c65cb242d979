//! # Calculation Memory
//!
//! Runs the full chain for one circuit and assembles the report:
//!
//! ```text
//! 1 validation → 2 ambient temperature → 3 nominal current →
//! 4 temperature rating → 5 current adjustment → 6 feeder conductor →
//! 7 ground conductor → 8 raceway sizing → 9 voltage drop → report
//! ```
//!
//! The first failing stage aborts the run; its error is wrapped in
//! [`CalcError::Stage`] and reads `step N (stage): cause`.
//!
//! The supplied voltage is resolved once into a [`SystemVoltage`]. Nominal
//! current reads it in the topology's supply reference and voltage drop in
//! the topology's drop reference, so 440 V phase-to-phase and 254 V
//! phase-to-neutral describe the same wye system.
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::calculations::memory::{calculate_memory, CircuitInput};
//! use wirecalc_core::settings::GlobalSettings;
//! use wirecalc_core::tables::nom_tables;
//!
//! let input: CircuitInput = serde_json::from_str(r#"{
//!     "label": "AHF-01",
//!     "equipment": { "source": "manual", "mode": "amperage", "amperes": 50.0 },
//!     "topology": "wye",
//!     "voltage": 220.0,
//!     "state": "Aguascalientes",
//!     "raceway": "conduit-pvc",
//!     "breaker_a": 100.0,
//!     "length_m": 10.0
//! }"#).unwrap();
//!
//! let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();
//! assert_eq!(report.nominal_current.0, 50.0);
//! assert!(report.compliant);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::adjustment::{adjust_current_at, resolve_ambient, AdjustmentInput, AdjustmentResult};
use super::conductor::{select_feeder_for, select_ground_for, FeederResult, GroundResult};
use super::current::{nominal_current, EquipmentRating, EquipmentSource, ResolvedEquipment};
use super::raceway::{size_raceway, RacewayResult, RacewaySizingInput};
use super::temperature::select_rating;
use super::voltage_drop::{self, DropMethod, VoltageDropInput, VoltageDropResult};
use crate::conductors::{ConductorMaterial, TemperatureRating};
use crate::equations::{Equation, EquationTracker, EquationUsage};
use crate::errors::{CalcError, CalcResult, Stage};
use crate::installation::{RacewayMethod, SystemVoltage, Topology, VoltageReference};
use crate::nom_factors::{nom_ref, EquipmentCategory};
use crate::settings::GlobalSettings;
use crate::tables::LookupTables;
use crate::units::{Amperes, Meters, Volts};

fn one() -> u32 {
    1
}

/// Equipment and installation parameters for one circuit.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "TR-01",
///   "equipment": { "source": "catalog", "key": "TR-112.5" },
///   "topology": "delta",
///   "voltage": 480.0,
///   "state": "Nuevo León",
///   "raceway": "spaced-tray",
///   "breaker_a": 175.0,
///   "length_m": 45.0,
///   "material": "Copper",
///   "parallel_per_phase": 1,
///   "raceways": 1,
///   "max_voltage_drop_percent": 3.0,
///   "control_cable_diameters_mm": [12.5]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitInput {
    /// Circuit label (e.g., "AHF-01", "Feeder to TR-2")
    pub label: String,

    pub equipment: EquipmentSource,

    /// Usage category for manual entries; catalog records carry their own
    #[serde(default)]
    pub category: EquipmentCategory,

    pub topology: Topology,

    /// Nominal system voltage (V), one of the standard voltages
    pub voltage: Volts,

    /// What `voltage` refers to; unset reads it phase-to-neutral for
    /// single-phase and phase-to-phase for every other topology
    #[serde(default)]
    pub voltage_reference: Option<VoltageReference>,

    /// Installation state, keys the ambient temperature table
    pub state: String,

    pub raceway: RacewayMethod,

    /// Protective device (ITM) rating (A)
    pub breaker_a: f64,

    /// One-way run length (m)
    pub length_m: f64,

    #[serde(default)]
    pub material: ConductorMaterial,

    #[serde(default = "one")]
    pub parallel_per_phase: u32,

    #[serde(default = "one")]
    pub raceways: u32,

    /// Allowed voltage drop (%); unset takes the settings default
    #[serde(default)]
    pub max_voltage_drop_percent: Option<f64>,

    /// Forces the ampacity column
    #[serde(default)]
    pub temperature_override: Option<TemperatureRating>,

    /// Outer diameters of control cables sharing the raceway (mm)
    #[serde(default)]
    pub control_cable_diameters_mm: Vec<f64>,

    /// Unset takes the settings default
    #[serde(default)]
    pub drop_method: Option<DropMethod>,
}

impl CircuitInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if self.state.trim().is_empty() {
            return Err(CalcError::missing_field("state"));
        }
        Volts::standard(self.voltage.0)?;
        if !self.breaker_a.is_finite() || self.breaker_a <= 0.0 {
            return Err(CalcError::invalid_input(
                "breaker_a",
                self.breaker_a.to_string(),
                "Breaker rating must be positive",
            ));
        }
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(CalcError::InvalidLength { length_m: self.length_m });
        }
        if self.parallel_per_phase < 1 {
            return Err(CalcError::InvalidParallelCount {
                count: self.parallel_per_phase,
            });
        }
        if self.raceways < 1 {
            return Err(CalcError::InvalidRacewayCount { count: self.raceways });
        }
        if let Some(limit) = self.max_voltage_drop_percent {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(CalcError::InvalidLimit { percent: limit });
            }
        }
        if let Some(d) = self.control_cable_diameters_mm.iter().find(|d| !d.is_finite() || **d <= 0.0) {
            return Err(CalcError::invalid_input(
                "control_cable_diameters_mm",
                d.to_string(),
                "Control cable diameters must be positive",
            ));
        }
        Ok(())
    }
}

/// The complete calculation memory of one circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub label: String,
    /// Code edition the memory was calculated under
    pub code: String,
    pub equipment: ResolvedEquipment,
    pub topology: Topology,
    pub voltage: Volts,
    /// How `voltage` was read
    pub voltage_reference: VoltageReference,
    pub system_voltage: SystemVoltage,
    pub state: String,
    pub raceway_method: RacewayMethod,
    pub breaker_a: f64,
    pub length: Meters,

    pub ambient_c: i32,
    pub nominal_current: Amperes,
    pub temperature_rating: TemperatureRating,
    /// Rating came from the input rather than the termination rule
    pub temperature_overridden: bool,
    pub adjustment: AdjustmentResult,
    pub feeder: FeederResult,
    pub ground: GroundResult,
    pub raceway: RacewayResult,
    pub voltage_drop: VoltageDropResult,

    /// Feeder ampacity suffices and the voltage drop is within its limit
    pub compliant: bool,

    /// Equations applied, in order
    pub equations: Vec<EquationUsage>,
}

impl MemoryReport {
    /// Tracker over the recorded equations, for the PDF appendix
    pub fn equation_tracker(&self) -> EquationTracker {
        EquationTracker::from(self.equations.clone())
    }
}

fn at<T>(stage: Stage, result: CalcResult<T>) -> CalcResult<T> {
    result.map_err(|e| e.at_stage(stage))
}

/// Calculate the memory of one circuit.
///
/// Tables are only read; distinct circuits may be calculated in parallel
/// against the same tables.
pub fn calculate_memory(
    tables: &dyn LookupTables,
    input: &CircuitInput,
    settings: &GlobalSettings,
) -> CalcResult<MemoryReport> {
    let label = input.label.as_str();
    let mut tracker = EquationTracker::new();

    // 1. Validation
    at(Stage::Validation, input.validate().and_then(|_| settings.validate()))?;
    let max_percent = input
        .max_voltage_drop_percent
        .unwrap_or(settings.max_voltage_drop_percent);
    let drop_method = input.drop_method.unwrap_or(settings.drop_method);
    let voltage_reference = input
        .voltage_reference
        .unwrap_or(input.topology.supply_reference());
    let system_voltage = SystemVoltage::resolve(input.voltage, voltage_reference);
    debug!(
        circuit = label,
        v_ff = system_voltage.phase_to_phase.0,
        v_fn = system_voltage.phase_to_neutral.0,
        "input valid"
    );

    // 2. Ambient temperature
    let ambient_c = at(Stage::AmbientTemperature, resolve_ambient(tables, &input.state))?;
    debug!(circuit = label, state = %input.state, ambient_c, "ambient temperature resolved");

    // 3. Nominal current
    let equipment = at(Stage::NominalCurrent, input.equipment.resolve(tables, input.category))?;
    let nominal = at(
        Stage::NominalCurrent,
        nominal_current(
            &equipment.rating,
            input.topology,
            system_voltage.get(input.topology.supply_reference()),
        ),
    )?;
    if let EquipmentRating::Power { .. } = equipment.rating {
        let equation = if input.topology.is_three_phase() {
            Equation::NominalCurrentThreePhase
        } else {
            Equation::NominalCurrentSinglePhase
        };
        tracker.record_for_circuit(equation, "Nominal current", label);
    }
    debug!(circuit = label, nominal_a = nominal.0, "nominal current");

    // 4. Temperature rating
    let rating = select_rating(nominal, input.raceway, input.temperature_override);
    if input.temperature_override.is_none() {
        tracker.record_for_circuit(Equation::TerminationRating, "Temperature rating", label);
    }
    debug!(circuit = label, rating = %rating, "temperature rating selected");

    // 5. Current adjustment
    let adjustment_input = AdjustmentInput {
        nominal,
        state: input.state.clone(),
        raceway: input.raceway,
        topology: input.topology,
        category: equipment.category,
        parallel_per_phase: input.parallel_per_phase,
        raceways: input.raceways,
        rating,
    };
    let adjustment = at(
        Stage::CurrentAdjustment,
        adjust_current_at(tables, &adjustment_input, ambient_c),
    )?;
    tracker.record_for_circuit(Equation::AdjustedCurrent, "Design current", label);

    // 6. Feeder conductor
    let mut feeder = at(
        Stage::FeederConductor,
        select_feeder_for(
            tables,
            adjustment.adjusted,
            input.parallel_per_phase,
            input.raceway,
            input.material,
            rating,
        ),
    )?;
    tracker.record_for_circuit(Equation::FeederAmpacity, "Feeder conductor", label);

    // 7. Ground conductor
    let ground = at(
        Stage::GroundConductor,
        select_ground_for(tables, input.breaker_a, input.material),
    )?;
    tracker.record_for_circuit(Equation::GroundConductor, "Grounding conductor", label);

    // 8. Raceway sizing
    let raceway = at(
        Stage::RacewaySizing,
        size_raceway(
            tables,
            &RacewaySizingInput {
                method: input.raceway,
                topology: input.topology,
                parallel_per_phase: input.parallel_per_phase,
                raceways: input.raceways,
                phase: &feeder.conductor,
                ground: &ground.conductor,
                control_diameters_mm: &input.control_cable_diameters_mm,
            },
        ),
    )?;
    let raceway_equation = match input.raceway {
        RacewayMethod::SpacedTray => Equation::SpacedTrayWidth,
        RacewayMethod::TriangularTray => Equation::TriangularTrayWidth,
        _ => Equation::ConduitFill,
    };
    tracker.record_for_circuit(raceway_equation, "Raceway sizing", label);

    // 9. Voltage drop
    let impedance = at(
        Stage::VoltageDrop,
        tables
            .impedance(feeder.conductor.calibre, input.raceway, feeder.conductor.material)
            .ok_or_else(|| {
                CalcError::lookup_miss(
                    nom_ref::IMPEDANCE,
                    format!("{} {} in {}", feeder.conductor.calibre, feeder.conductor.material, input.raceway),
                )
            }),
    )?;
    feeder.conductor = feeder
        .conductor
        .clone()
        .with_impedance(impedance.resistance, impedance.reactance);

    let drop = at(
        Stage::VoltageDrop,
        voltage_drop::calculate(&VoltageDropInput {
            resistance: impedance.resistance,
            reactance: impedance.reactance,
            topology: input.topology,
            parallel_per_phase: input.parallel_per_phase,
            length: Meters(input.length_m),
            voltage: system_voltage.get(input.topology.reference()),
            reference: input.topology.reference(),
            current: adjustment.adjusted,
            max_percent,
            method: drop_method,
            power_factor: equipment.rating.power_factor(),
        }),
    )?;
    let impedance_equation = match drop.method {
        DropMethod::Magnitude => Equation::ImpedanceMagnitude,
        DropMethod::PowerFactor => Equation::EffectiveImpedance,
    };
    tracker.record_for_circuit(impedance_equation, "Voltage drop", label);
    tracker.record_for_circuit(Equation::VoltageDrop, "Voltage drop", label);
    tracker.record_for_circuit(Equation::VoltageDropPercent, "Voltage drop", label);

    if !drop.compliant {
        warn!(
            circuit = label,
            percent = drop.percent,
            limit = drop.limit_percent,
            "voltage drop exceeds limit"
        );
    }

    let compliant = drop.compliant && feeder.is_sufficient();
    info!(
        circuit = label,
        feeder = %feeder.conductor.designation(),
        raceway = %raceway.size_label,
        drop_percent = drop.percent,
        compliant,
        "calculation memory complete"
    );

    Ok(MemoryReport {
        label: input.label.clone(),
        code: settings.code.clone(),
        equipment,
        topology: input.topology,
        voltage: input.voltage,
        voltage_reference,
        system_voltage,
        state: input.state.clone(),
        raceway_method: input.raceway,
        breaker_a: input.breaker_a,
        length: Meters(input.length_m),
        ambient_c,
        nominal_current: nominal,
        temperature_rating: rating,
        temperature_overridden: input.temperature_override.is_some(),
        adjustment,
        feeder,
        ground,
        raceway,
        voltage_drop: drop,
        compliant,
        equations: tracker.into_usages(),
    })
}
