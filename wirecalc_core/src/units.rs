//! # Unit Types
//!
//! Type-safe wrappers for electrical and installation units. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers).
//!
//! ## SI Units (Primary)
//!
//! NOM-001-SEDE tables are metric, so WireCalc works in SI throughout:
//! - Current: amperes (A)
//! - Potential: volts (V)
//! - Power: watts (W), kilowatts (kW)
//! - Length: meters (m) for runs, millimeters (mm) for diameters and widths
//! - Area: square millimeters (mm²)
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::units::{Kilowatts, Watts, Volts};
//!
//! let p: Watts = Kilowatts(15.0).into();
//! assert_eq!(p.0, 15_000.0);
//!
//! assert!(Volts::standard(220.0).is_ok());
//! assert!(Volts::standard(221.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::errors::{CalcError, CalcResult};

/// Standard system voltages accepted for a circuit (V)
pub const STANDARD_VOLTAGES: [f64; 11] = [
    120.0, 127.0, 208.0, 220.0, 240.0, 254.0, 277.0, 440.0, 460.0, 480.0, 600.0,
];

// ============================================================================
// Electrical Units
// ============================================================================

/// Current in amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amperes(pub f64);

impl Amperes {
    /// Validated current: must be finite and strictly positive
    pub fn positive(value: f64) -> CalcResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(CalcError::InvalidCurrent { amperes: value });
        }
        Ok(Amperes(value))
    }
}

/// Potential in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

impl Volts {
    /// Validated system voltage: must be one of [`STANDARD_VOLTAGES`]
    pub fn standard(value: f64) -> CalcResult<Self> {
        if value <= 0.0 {
            return Err(CalcError::InvalidVoltage {
                volts: value,
                reason: "voltage must be positive".to_string(),
            });
        }
        if !STANDARD_VOLTAGES.iter().any(|v| (v - value).abs() < 1e-9) {
            return Err(CalcError::InvalidVoltage {
                volts: value,
                reason: "not a standard system voltage".to_string(),
            });
        }
        Ok(Volts(value))
    }
}

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl From<Kilowatts> for Watts {
    fn from(kw: Kilowatts) -> Self {
        Watts(kw.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(w: Watts) -> Self {
        Kilowatts(w.0 / 1000.0)
    }
}

/// Resistance or reactance per kilometer of conductor
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OhmsPerKm(pub f64);

// ============================================================================
// Length and Area Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl Meters {
    /// Length in kilometers, the unit impedance tables are expressed in
    pub fn km(self) -> f64 {
        self.0 / 1000.0
    }
}

/// Area in square millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Amperes);
impl_arithmetic!(Volts);
impl_arithmetic!(Watts);
impl_arithmetic!(Kilowatts);
impl_arithmetic!(OhmsPerKm);
impl_arithmetic!(Meters);
impl_arithmetic!(Millimeters);
impl_arithmetic!(SqMm);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilowatts_to_watts() {
        let kw = Kilowatts(1.5);
        let w: Watts = kw.into();
        assert_eq!(w.0, 1500.0);
    }

    #[test]
    fn test_meters_to_km() {
        assert_eq!(Meters(30.0).km(), 0.03);
        let mm: Millimeters = Meters(0.3).into();
        assert!((mm.0 - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Amperes(10.0);
        let b = Amperes(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_standard_voltage() {
        assert!(Volts::standard(127.0).is_ok());
        assert!(Volts::standard(480.0).is_ok());
        assert!(matches!(Volts::standard(0.0), Err(CalcError::InvalidVoltage { .. })));
        assert!(matches!(Volts::standard(230.0), Err(CalcError::InvalidVoltage { .. })));
    }

    #[test]
    fn test_positive_current() {
        assert!(Amperes::positive(0.1).is_ok());
        assert!(matches!(Amperes::positive(0.0), Err(CalcError::InvalidCurrent { .. })));
        assert!(Amperes::positive(f64::NAN).is_err());
    }

    #[test]
    fn test_serialization() {
        let a = Amperes(12.5);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "12.5");
        let roundtrip: Amperes = serde_json::from_str(&json).unwrap();
        assert_eq!(a, roundtrip);
    }
}
