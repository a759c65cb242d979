//! # wirecalc_core - Electrical Installation Calculation Engine
//!
//! `wirecalc_core` produces the "calculation memory" of a low-voltage circuit
//! under NOM-001-SEDE: nominal current, ampacity adjustment, feeder and
//! grounding conductors, raceway size and voltage drop. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions over read-only lookup tables
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types tagged with the failing step
//! - **Auditable**: Every formula applied is recorded with its code reference
//!
//! ## Quick Start
//!
//! ```rust
//! use wirecalc_core::{calculate_memory, nom_tables, CircuitInput, GlobalSettings};
//!
//! let input: CircuitInput = serde_json::from_str(r#"{
//!     "label": "TR-01",
//!     "equipment": { "source": "catalog", "key": "TR-45" },
//!     "topology": "wye",
//!     "voltage": 220.0,
//!     "state": "Jalisco",
//!     "raceway": "conduit-pvc",
//!     "breaker_a": 150.0,
//!     "length_m": 25.0
//! }"#).unwrap();
//!
//! let report = calculate_memory(nom_tables(), &input, &GlobalSettings::default()).unwrap();
//! println!("{} in {}", report.feeder.conductor.designation(), report.raceway.size_label);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The calculation chain and its orchestrator
//! - [`tables`] - Lookup table contract and bundled NOM reference data
//! - [`conductors`] - Calibres, materials, insulation and temperature ratings
//! - [`installation`] - Topologies and raceway installation methods
//! - [`nom_factors`] - Code constants and section references
//! - [`equations`] - Equation registry for the PDF appendix
//! - [`pdf`] - Typst rendering of the calculation memory
//! - [`settings`] - Calculation defaults and report metadata
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod conductors;
pub mod equations;
pub mod errors;
pub mod installation;
pub mod nom_factors;
pub mod pdf;
pub mod settings;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::memory::{calculate_memory, CircuitInput, MemoryReport};
pub use errors::{CalcError, CalcResult, Stage};
pub use settings::{GlobalSettings, ReportMetadata};
pub use tables::{nom_tables, LookupTables, TableSet};
