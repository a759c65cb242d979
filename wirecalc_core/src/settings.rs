//! # Settings
//!
//! Calculation defaults and the title block printed on the memory.
//!
//! ## Example
//!
//! ```rust
//! use wirecalc_core::settings::{GlobalSettings, ReportMetadata};
//!
//! let settings: GlobalSettings = serde_json::from_str(r#"{ "max_voltage_drop_percent": 2.0 }"#).unwrap();
//! assert_eq!(settings.code, "NOM-001-SEDE-2012");
//! assert_eq!(settings.max_voltage_drop_percent, 2.0);
//!
//! let meta = ReportMetadata::new("Ing. R. Salas", "25-042", "Planta Norte");
//! assert_eq!(meta.job_id, "25-042");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::voltage_drop::DropMethod;
use crate::errors::{CalcError, CalcResult};
use crate::nom_factors::DEFAULT_MAX_VOLTAGE_DROP_PERCENT;

/// Defaults applied to circuits that leave them unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Installation code edition printed on the memory
    pub code: String,

    /// Voltage drop limit (%) for circuits without their own
    pub max_voltage_drop_percent: f64,

    /// Voltage drop method for circuits without their own
    pub drop_method: DropMethod,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: "NOM-001-SEDE-2012".to_string(),
            max_voltage_drop_percent: DEFAULT_MAX_VOLTAGE_DROP_PERCENT,
            drop_method: DropMethod::Magnitude,
        }
    }
}

impl GlobalSettings {
    /// Validate the defaults
    pub fn validate(&self) -> CalcResult<()> {
        if !self.max_voltage_drop_percent.is_finite() || self.max_voltage_drop_percent <= 0.0 {
            return Err(CalcError::InvalidLimit {
                percent: self.max_voltage_drop_percent,
            });
        }
        Ok(())
    }
}

/// Title block of a calculation memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the memory was produced
    pub generated: DateTime<Utc>,
}

impl ReportMetadata {
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        ReportMetadata {
            engineer: engineer.into(),
            job_id: job_id.into(),
            client: client.into(),
            generated: Utc::now(),
        }
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        ReportMetadata::new("", "", "")
    }
}
