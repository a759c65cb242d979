//! # Electrical Calculations
//!
//! The calculation chain of a circuit memory. Each step follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function from input (and read-only tables) to result
//!
//! ## Available Calculations
//!
//! - [`current`] - Nominal current from amperage or power
//! - [`temperature`] - Ampacity column (60/75/90 °C)
//! - [`adjustment`] - Usage, temperature and grouping factors
//! - [`conductor`] - Feeder and grounding conductor selection
//! - [`raceway`] - Conduit fill, spaced tray, triangular tray
//! - [`voltage_drop`] - Topology-aware voltage drop
//! - [`memory`] - Orchestrates all of the above into a [`MemoryReport`]

pub mod adjustment;
pub mod conductor;
pub mod current;
pub mod memory;
pub mod raceway;
pub mod temperature;
pub mod voltage_drop;

pub use adjustment::{AdjustmentInput, AdjustmentResult};
pub use conductor::{FeederResult, GroundResult};
pub use current::{EquipmentRating, EquipmentSource};
pub use memory::{calculate_memory, CircuitInput, MemoryReport};
pub use raceway::{RacewayDetail, RacewayResult};
pub use voltage_drop::{DropMethod, VoltageDropInput, VoltageDropResult};
