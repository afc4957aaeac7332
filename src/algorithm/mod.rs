//! Algorithm implementations for the family builder
//!
//! This module contains the rule cascade that partitions households into
//! families.

pub mod family;
