//! Domain models for the family builder
//!
//! This module contains the individual rows read from the survey tables and
//! the family rows produced from them.

pub mod conversion;
pub mod family;
pub mod individual;

// Re-export commonly used types
pub use family::{FamilyAssignment, FamilyMember, FamilyRecord, Rule};
pub use individual::{Individual, IndividualRecord};
