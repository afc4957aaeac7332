//! Household to family partitioning
//!
//! Rules are applied in priority order over the individuals not yet assigned:
//! reference families (10), couples (21, 22), singletons (31 to 34), children
//! of a parent or declarant (41 to 48), tax-only individuals (50, 51) and the
//! residual rules (61 to 63). The finalizer then ranks children and derives
//! each member's role.

pub mod base;
pub mod cascade;
pub mod children;
pub mod couples;
pub mod finalize;
pub mod pipeline;
pub mod residual;
pub mod secondary;
pub mod statistics;

// Re-export commonly used items
pub use base::BaseTableBuilder;
pub use cascade::Cascade;
pub use children::ParentLink;
pub use finalize::{FinalizedFamilies, finalize};
pub use pipeline::{FamilyOutcome, FamilyPipeline, load_records};
pub use statistics::RunReport;
