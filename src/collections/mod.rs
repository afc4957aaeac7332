//! Working tables of the family builder
//!
//! The base table holds every individual eligible for classification; the
//! family table accumulates the assignments produced by the rule cascade.

pub mod family;
pub mod individual;

// Re-export specialized collections for convenience
pub use family::{FamilyTable, InsertOutcome};
pub use individual::IndividualTable;
