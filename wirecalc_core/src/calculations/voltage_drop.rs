//! # Voltage Drop
//!
//! Drop along the run for the selected conductor, using the AC impedance
//! of Chapter 10, Table 9:
//!
//! ```text
//! R_eff, X_eff = R / p, X / p
//! Z            = √(R_eff² + X_eff²)             magnitude method
//!              = R_eff·cosθ + X_eff·sinθ        power-factor method
//! ΔV           = k × I × Z × L / 1000           k = 2 | 1 | √3 | 1
//! %ΔV          = ΔV / V_ref × 100
//! ```
//!
//! Delta systems refer the drop to the phase-to-phase voltage; every other
//! topology to phase-to-neutral. A voltage given with the other reference
//! is converted with V_FF = √3 × V_FN.
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::calculations::voltage_drop::{calculate, DropMethod, VoltageDropInput};
//! use wirecalc_core::installation::{Topology, VoltageReference};
//! use wirecalc_core::units::{Amperes, Meters, OhmsPerKm, Volts};
//!
//! let input = VoltageDropInput {
//!     resistance: OhmsPerKm(0.62),
//!     reactance: OhmsPerKm(0.148),
//!     topology: Topology::SinglePhase,
//!     parallel_per_phase: 1,
//!     length: Meters(30.0),
//!     voltage: Volts(127.0),
//!     reference: VoltageReference::PhaseToNeutral,
//!     current: Amperes(70.0),
//!     max_percent: 3.0,
//!     method: DropMethod::Magnitude,
//!     power_factor: None,
//! };
//! let result = calculate(&input).unwrap();
//! assert!((result.drop_volts - 2.677).abs() < 0.001);
//! assert!(result.compliant);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CalcError, CalcResult};
use crate::installation::{Topology, VoltageReference};
use crate::units::{Amperes, Meters, OhmsPerKm, Volts};

/// How the impedance term is formed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DropMethod {
    /// √(R² + X²)
    #[default]
    Magnitude,
    /// R cosθ + X sinθ, when the load power factor is known
    PowerFactor,
}

impl DropMethod {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            DropMethod::Magnitude => "Impedance magnitude",
            DropMethod::PowerFactor => "Effective impedance (R cosθ + X sinθ)",
        }
    }
}

/// Inputs to the voltage drop calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropInput {
    /// Table resistance of one conductor
    pub resistance: OhmsPerKm,
    /// Table reactance of one conductor
    pub reactance: OhmsPerKm,
    pub topology: Topology,
    pub parallel_per_phase: u32,
    /// One-way run length
    pub length: Meters,
    /// Nominal system voltage
    pub voltage: Volts,
    /// Which voltage `voltage` refers to
    pub reference: VoltageReference,
    pub current: Amperes,
    /// Maximum allowed drop (%)
    pub max_percent: f64,
    pub method: DropMethod,
    /// Load power factor, used by [`DropMethod::PowerFactor`]
    pub power_factor: Option<f64>,
}

/// Voltage drop and compliance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoltageDropResult {
    pub resistance_eff: OhmsPerKm,
    pub reactance_eff: OhmsPerKm,
    /// Impedance term per km (Ω/km)
    pub impedance_term: f64,
    /// Method actually applied
    pub method: DropMethod,
    /// Topology multiplier k
    pub drop_factor: f64,
    pub drop_volts: f64,
    /// Voltage the percentage is referred to
    pub reference_voltage: Volts,
    pub reference: VoltageReference,
    pub percent: f64,
    pub limit_percent: f64,
    pub compliant: bool,
}

impl VoltageDropInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.length.0.is_finite() || self.length.0 <= 0.0 {
            return Err(CalcError::InvalidLength { length_m: self.length.0 });
        }
        if self.parallel_per_phase < 1 {
            return Err(CalcError::InvalidParallelCount {
                count: self.parallel_per_phase,
            });
        }
        if !self.max_percent.is_finite() || self.max_percent <= 0.0 {
            return Err(CalcError::InvalidLimit {
                percent: self.max_percent,
            });
        }
        if self.voltage.0 <= 0.0 {
            return Err(CalcError::InvalidVoltage {
                volts: self.voltage.0,
                reason: "voltage must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Express `voltage` (given as `supplied`) in the reference the topology uses
pub fn reference_voltage(topology: Topology, voltage: Volts, supplied: VoltageReference) -> Volts {
    match (supplied, topology.reference()) {
        (VoltageReference::PhaseToNeutral, VoltageReference::PhaseToPhase) => voltage * 3f64.sqrt(),
        (VoltageReference::PhaseToPhase, VoltageReference::PhaseToNeutral) => voltage / 3f64.sqrt(),
        _ => voltage,
    }
}

/// Calculate the voltage drop for a run.
pub fn calculate(input: &VoltageDropInput) -> CalcResult<VoltageDropResult> {
    input.validate()?;

    let parallel = input.parallel_per_phase as f64;
    let r = input.resistance / parallel;
    let x = input.reactance / parallel;

    let magnitude = (r.0.powi(2) + x.0.powi(2)).sqrt();
    let (method, impedance_term) = match (input.method, input.power_factor) {
        (DropMethod::PowerFactor, Some(pf)) if pf > 0.0 && pf <= 1.0 => {
            let sin = (1.0 - pf * pf).sqrt();
            (DropMethod::PowerFactor, r.0 * pf + x.0 * sin)
        }
        (DropMethod::PowerFactor, pf) => {
            warn!(
                power_factor = ?pf,
                "power-factor drop method needs a power factor in (0, 1]; using impedance magnitude"
            );
            (DropMethod::Magnitude, magnitude)
        }
        (DropMethod::Magnitude, _) => (DropMethod::Magnitude, magnitude),
    };

    let drop_factor = input.topology.drop_factor();
    let drop_volts = drop_factor * input.current.0 * impedance_term * input.length.km();

    let reference = input.topology.reference();
    let reference_voltage = reference_voltage(input.topology, input.voltage, input.reference);
    let percent = drop_volts / reference_voltage.0 * 100.0;

    Ok(VoltageDropResult {
        resistance_eff: r,
        reactance_eff: x,
        impedance_term,
        method,
        drop_factor,
        drop_volts,
        reference_voltage,
        reference,
        percent,
        limit_percent: input.max_percent,
        compliant: percent <= input.max_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> VoltageDropInput {
        VoltageDropInput {
            resistance: OhmsPerKm(0.62),
            reactance: OhmsPerKm(0.148),
            topology: Topology::SinglePhase,
            parallel_per_phase: 1,
            length: Meters(30.0),
            voltage: Volts(127.0),
            reference: VoltageReference::PhaseToNeutral,
            current: Amperes(70.0),
            max_percent: 3.0,
            method: DropMethod::Magnitude,
            power_factor: None,
        }
    }

    #[test]
    fn test_single_phase_reference_example() {
        let r = calculate(&base()).unwrap();
        assert!((r.impedance_term - 0.63742).abs() < 1e-5);
        assert!((r.drop_volts - 2.677).abs() < 1e-3);
        assert!((r.percent - 2.108).abs() < 1e-3);
        assert!(r.compliant);
        assert_eq!(r.reference_voltage, Volts(127.0));
    }

    #[test]
    fn test_parallel_halves_impedance() {
        let mut input = base();
        input.parallel_per_phase = 2;
        let r = calculate(&input).unwrap();
        assert_eq!(r.resistance_eff, OhmsPerKm(0.31));
        assert!((r.drop_volts - 2.677 / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_delta_refers_to_phase_to_phase() {
        let mut input = base();
        input.topology = Topology::Delta;
        input.voltage = Volts(127.0);
        let r = calculate(&input).unwrap();
        assert_eq!(r.reference, VoltageReference::PhaseToPhase);
        assert!((r.reference_voltage.0 - 127.0 * 3f64.sqrt()).abs() < 1e-9);

        input.reference = VoltageReference::PhaseToPhase;
        input.voltage = Volts(220.0);
        let r = calculate(&input).unwrap();
        assert_eq!(r.reference_voltage, Volts(220.0));
        assert!((r.drop_factor - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_wye_converts_phase_to_phase_input() {
        let mut input = base();
        input.topology = Topology::Wye;
        input.reference = VoltageReference::PhaseToPhase;
        input.voltage = Volts(220.0);
        let r = calculate(&input).unwrap();
        assert!((r.reference_voltage.0 - 220.0 / 3f64.sqrt()).abs() < 1e-9);
        assert_eq!(r.drop_factor, 1.0);
    }

    #[test]
    fn test_power_factor_method() {
        let mut input = base();
        input.method = DropMethod::PowerFactor;
        input.power_factor = Some(0.8);
        let r = calculate(&input).unwrap();
        assert_eq!(r.method, DropMethod::PowerFactor);
        assert!((r.impedance_term - (0.62 * 0.8 + 0.148 * 0.6)).abs() < 1e-9);

        // no power factor known: magnitude applies
        input.power_factor = None;
        let fallback = calculate(&input).unwrap();
        assert_eq!(fallback.method, DropMethod::Magnitude);
        assert!((fallback.impedance_term - (0.62f64.powi(2) + 0.148f64.powi(2)).sqrt()).abs() < 1e-12);

        input.power_factor = Some(1.5);
        assert_eq!(calculate(&input).unwrap().method, DropMethod::Magnitude);
    }

    #[test]
    fn test_non_compliant_limit() {
        let mut input = base();
        input.max_percent = 2.0;
        assert!(!calculate(&input).unwrap().compliant);
    }

    #[test]
    fn test_validation() {
        let mut input = base();
        input.length = Meters(0.0);
        assert!(matches!(calculate(&input), Err(CalcError::InvalidLength { .. })));

        let mut input = base();
        input.parallel_per_phase = 0;
        assert!(matches!(calculate(&input), Err(CalcError::InvalidParallelCount { .. })));

        let mut input = base();
        input.max_percent = 0.0;
        assert!(matches!(calculate(&input), Err(CalcError::InvalidLimit { .. })));
    }
}
