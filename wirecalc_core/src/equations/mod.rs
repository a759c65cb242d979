//! # Calculation Equations
//!
//! The formulas behind a calculation memory, each tied to the NOM-001-SEDE
//! section it comes from. The orchestrator records every equation it
//! applies so the PDF memory can list them in an appendix.
//!
//! ## Modules
//!
//! - [`registry`] - Equation metadata and tracking for the PDF appendix
//!
//! ## References
//!
//! - NOM-001-SEDE-2012: Instalaciones Eléctricas (utilización)
//! - Chapter 10 tables: conductor dimensions, conduit areas, AC impedance

pub mod registry;

pub use registry::{
    CodeReference, Equation, EquationCategory, EquationMetadata, EquationTracker, EquationUsage, Variable,
    ALL_EQUATIONS,
};
