//! # Error Types
//!
//! Structured error types for wirecalc_core. Every failure carries enough
//! context (field, value, table, stage) for an engineer or a calling program
//! to see which part of the calculation memory could not be justified.
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::InvalidLength { length_m });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-3.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for wirecalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Broad classes of failure, used by callers that only need to decide
/// whether the input or the installation is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Missing or out-of-range field, unrecognized enumerated value
    InputValidation,
    /// No table entry for a given key
    LookupMiss,
    /// No catalog entry large enough
    NoFit,
    /// Distribution or factor invariant broken
    InvariantViolation,
    /// Report rendering failed
    Rendering,
}

/// Orchestrator stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Validation,
    AmbientTemperature,
    NominalCurrent,
    TemperatureRating,
    CurrentAdjustment,
    FeederConductor,
    GroundConductor,
    RacewaySizing,
    VoltageDrop,
}

impl Stage {
    /// All stages in the order the orchestrator runs them
    pub const ALL: [Stage; 9] = [
        Stage::Validation,
        Stage::AmbientTemperature,
        Stage::NominalCurrent,
        Stage::TemperatureRating,
        Stage::CurrentAdjustment,
        Stage::FeederConductor,
        Stage::GroundConductor,
        Stage::RacewaySizing,
        Stage::VoltageDrop,
    ];

    /// 1-based step number shown in error messages and reports
    pub fn step(&self) -> u8 {
        match self {
            Stage::Validation => 1,
            Stage::AmbientTemperature => 2,
            Stage::NominalCurrent => 3,
            Stage::TemperatureRating => 4,
            Stage::CurrentAdjustment => 5,
            Stage::FeederConductor => 6,
            Stage::GroundConductor => 7,
            Stage::RacewaySizing => 8,
            Stage::VoltageDrop => 9,
        }
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Validation => "input validation",
            Stage::AmbientTemperature => "ambient temperature",
            Stage::NominalCurrent => "nominal current",
            Stage::TemperatureRating => "temperature rating selection",
            Stage::CurrentAdjustment => "current adjustment",
            Stage::FeederConductor => "feeder conductor selection",
            Stage::GroundConductor => "ground conductor selection",
            Stage::RacewaySizing => "raceway sizing",
            Stage::VoltageDrop => "voltage drop",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.step(), self.display_name())
    }
}

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by callers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Current must be strictly positive
    #[error("Invalid current: {amperes} A - current must be positive")]
    InvalidCurrent { amperes: f64 },

    /// Voltage is non-positive or not one of the standard system voltages
    #[error("Invalid voltage: {volts} V - {reason}")]
    InvalidVoltage { volts: f64, reason: String },

    /// Power must be strictly positive
    #[error("Invalid power: {watts} W - power must be positive")]
    InvalidPower { watts: f64 },

    /// Power factor outside (0, 1]
    #[error("Invalid power factor: {power_factor} - must be in (0, 1]")]
    InvalidPowerFactor { power_factor: f64 },

    /// Topology name not recognized
    #[error("Invalid topology: '{name}' - expected single-phase, two-phase, delta or wye")]
    InvalidTopology { name: String },

    /// Run length must be strictly positive
    #[error("Invalid length: {length_m} m - length must be positive")]
    InvalidLength { length_m: f64 },

    /// Conductors per phase must be at least 1
    #[error("Invalid parallel conductor count: {count} - at least one conductor per phase is required")]
    InvalidParallelCount { count: u32 },

    /// Raceway count must be at least 1
    #[error("Invalid raceway count: {count} - at least one raceway is required")]
    InvalidRacewayCount { count: u32 },

    /// Voltage-drop limit must be strictly positive
    #[error("Invalid voltage drop limit: {percent}% - limit must be positive")]
    InvalidLimit { percent: f64 },

    /// Raceway sizing received no conductors
    #[error("Empty conductor list - at least one conductor group is required to size a raceway")]
    EmptyConductorList,

    /// No table entry for the given key
    #[error("Lookup miss in {table}: no entry for {key}")]
    LookupMiss { table: String, key: String },

    /// No conductor in the table can carry the required current/rating
    #[error("No sufficient conductor in {table}: {required:.2} {unit} exceeds the largest entry")]
    NoSufficientConductor {
        table: String,
        required: f64,
        unit: String,
    },

    /// No raceway size in the table fits the required area/width
    #[error("No raceway fits in {table}: {required:.2} {unit} exceeds the largest size")]
    NoFit {
        table: String,
        required: f64,
        unit: String,
    },

    /// Conductors cannot be split evenly across raceways
    #[error("Uneven distribution: {conductors} conductors cannot be split evenly across {raceways} raceways")]
    UnevenDistribution { conductors: u32, raceways: u32 },

    /// An adjustment factor is zero or negative
    #[error("Non-positive factor: {factor} = {value}")]
    NonPositiveFactor { factor: String, value: f64 },

    /// PDF or text rendering failed
    #[error("Render error: {reason}")]
    Render { reason: String },

    /// A stage of the orchestrated calculation failed
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        source: Box<CalcError>,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a LookupMiss error
    pub fn lookup_miss(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::LookupMiss {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a NoSufficientConductor error
    pub fn no_sufficient_conductor(
        table: impl Into<String>,
        required: f64,
        unit: impl Into<String>,
    ) -> Self {
        CalcError::NoSufficientConductor {
            table: table.into(),
            required,
            unit: unit.into(),
        }
    }

    /// Create a NoFit error
    pub fn no_fit(table: impl Into<String>, required: f64, unit: impl Into<String>) -> Self {
        CalcError::NoFit {
            table: table.into(),
            required,
            unit: unit.into(),
        }
    }

    /// Create a NonPositiveFactor error
    pub fn non_positive_factor(factor: impl Into<String>, value: f64) -> Self {
        CalcError::NonPositiveFactor {
            factor: factor.into(),
            value,
        }
    }

    /// Tag this error with the orchestrator stage that produced it
    pub fn at_stage(self, stage: Stage) -> Self {
        CalcError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Stage that produced this error, if it was raised by the orchestrator
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CalcError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// The underlying error, with any stage tag removed
    pub fn root_cause(&self) -> &CalcError {
        match self {
            CalcError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Classify the error into the four-way taxonomy (plus rendering)
    pub fn category(&self) -> ErrorCategory {
        match self.root_cause() {
            CalcError::LookupMiss { .. } => ErrorCategory::LookupMiss,
            CalcError::NoSufficientConductor { .. } | CalcError::NoFit { .. } => ErrorCategory::NoFit,
            CalcError::UnevenDistribution { .. } | CalcError::NonPositiveFactor { .. } => {
                ErrorCategory::InvariantViolation
            }
            CalcError::Render { .. } => ErrorCategory::Rendering,
            _ => ErrorCategory::InputValidation,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidCurrent { .. } => "INVALID_CURRENT",
            CalcError::InvalidVoltage { .. } => "INVALID_VOLTAGE",
            CalcError::InvalidPower { .. } => "INVALID_POWER",
            CalcError::InvalidPowerFactor { .. } => "INVALID_POWER_FACTOR",
            CalcError::InvalidTopology { .. } => "INVALID_TOPOLOGY",
            CalcError::InvalidLength { .. } => "INVALID_LENGTH",
            CalcError::InvalidParallelCount { .. } => "INVALID_PARALLEL_COUNT",
            CalcError::InvalidRacewayCount { .. } => "INVALID_RACEWAY_COUNT",
            CalcError::InvalidLimit { .. } => "INVALID_LIMIT",
            CalcError::EmptyConductorList => "EMPTY_CONDUCTOR_LIST",
            CalcError::LookupMiss { .. } => "LOOKUP_MISS",
            CalcError::NoSufficientConductor { .. } => "NO_SUFFICIENT_CONDUCTOR",
            CalcError::NoFit { .. } => "NO_FIT",
            CalcError::UnevenDistribution { .. } => "UNEVEN_DISTRIBUTION",
            CalcError::NonPositiveFactor { .. } => "NON_POSITIVE_FACTOR",
            CalcError::Render { .. } => "RENDER_ERROR",
            CalcError::Stage { source, .. } => source.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length_m", "-5.0", "Length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::lookup_miss("ambient", "Atlantis").error_code(), "LOOKUP_MISS");
        assert_eq!(CalcError::EmptyConductorList.error_code(), "EMPTY_CONDUCTOR_LIST");
    }

    #[test]
    fn test_stage_message_names_step() {
        let err = CalcError::no_sufficient_conductor("ampacity", 900.0, "A").at_stage(Stage::FeederConductor);
        let msg = err.to_string();
        assert!(msg.starts_with("step 6 (feeder conductor selection):"), "got {}", msg);
        assert_eq!(err.stage(), Some(Stage::FeederConductor));
        assert_eq!(err.error_code(), "NO_SUFFICIENT_CONDUCTOR");
    }

    #[test]
    fn test_category_sees_through_stage() {
        let err = CalcError::UnevenDistribution { conductors: 4, raceways: 3 }.at_stage(Stage::CurrentAdjustment);
        assert_eq!(err.category(), ErrorCategory::InvariantViolation);
        assert_eq!(CalcError::InvalidPower { watts: 0.0 }.category(), ErrorCategory::InputValidation);
        assert_eq!(CalcError::no_fit("conduit", 1.0, "mm²").category(), ErrorCategory::NoFit);
    }

    #[test]
    fn test_stage_steps_are_sequential() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.step() as usize, i + 1);
        }
    }
}
