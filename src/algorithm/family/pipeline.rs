//! Per-year family pipeline
//!
//! Reads the input relations of one survey year from a store, runs the rule
//! cascade in priority order and writes the family table back.

use itertools::Itertools;

use super::base::BaseTableBuilder;
use super::cascade::Cascade;
use super::children::{ParentLink, attach_to_declarant, attach_to_parent};
use super::couples::{assign_couples, assign_reference_families, assign_singles};
use super::finalize::finalize;
use super::residual::{assign_residual_singles, attach_residual_children};
use super::secondary::merge_secondary;
use super::statistics::RunReport;
use crate::config::FamilyConfig;
use crate::error::Result;
use crate::models::family::{FamilyMember, FamilyRecord};
use crate::models::individual::IndividualRecord;
use crate::schema::{conform_batch, ensure_schema, family_schema, individual_schema};
use crate::store::TableStore;
use crate::utils::logging::log_anomaly;

const TOTAL_STEPS: usize = 9;

/// Result of one per-year run
#[derive(Debug, Clone)]
pub struct FamilyOutcome {
    /// Finalized members in assignment order
    pub members: Vec<FamilyMember>,
    /// Output rows, parallel to `members`
    pub records: Vec<FamilyRecord>,
    pub report: RunReport,
}

/// Builds the family table of a survey year
#[derive(Debug, Clone, Copy)]
pub struct FamilyPipeline<'a> {
    config: &'a FamilyConfig,
}

impl<'a> FamilyPipeline<'a> {
    #[must_use]
    pub const fn new(config: &'a FamilyConfig) -> Self {
        Self { config }
    }

    /// Read the inputs of `year` from `store`, build the family table and
    /// write it back
    ///
    /// The minimum wage of `year` is resolved before any table is read.
    pub fn run<S: TableStore + ?Sized>(&self, store: &mut S, year: i32) -> Result<RunReport> {
        self.config.wage_floor(year)?;
        let tables = &self.config.tables;

        let main = load_records(store, &tables.individuals, year)?;
        let future_children = load_records(store, &tables.future_children, year)?;
        let secondary = load_records(store, &tables.secondary, year)?;

        let outcome = self.build(year, &main, &future_children, &secondary)?;

        let batch = FamilyRecord::to_record_batch(&outcome.records)?;
        ensure_schema(&batch, &family_schema(), &tables.families)?;
        store.put(&tables.families, year, batch)?;
        log::info!(
            "Stored {} family rows as {} for {year}",
            outcome.records.len(),
            tables.families
        );
        Ok(outcome.report)
    }

    /// Run the rule cascade on in-memory records
    ///
    /// # Arguments
    /// * `year` - Survey year
    /// * `main` - Main survey individuals
    /// * `future_children` - Children not yet born at the survey date
    /// * `secondary` - Individuals known only from tax returns
    pub fn build(
        &self,
        year: i32,
        main: &[IndividualRecord],
        future_children: &[IndividualRecord],
        secondary: &[IndividualRecord],
    ) -> Result<FamilyOutcome> {
        let wage_floor = self.config.wage_floor(year)?;
        log::info!("Starting family construction for {year}");
        log::info!("Annual wage floor: {wage_floor:.2}");

        log::info!("[Step 1/{TOTAL_STEPS}] Building base table");
        let builder = BaseTableBuilder::new(year, wage_floor);
        let mut report = RunReport::new(year);
        let base = builder.build(main, future_children, &mut report)?;
        let mut cascade = Cascade::new(base, report);

        log::info!("[Step 2/{TOTAL_STEPS}] Assigning reference families");
        assign_reference_families(&mut cascade)?;

        log::info!("[Step 3/{TOTAL_STEPS}] Assigning couples");
        assign_couples(&mut cascade)?;

        log::info!("[Step 4/{TOTAL_STEPS}] Assigning single adults");
        assign_singles(&mut cascade)?;

        log::info!("[Step 5/{TOTAL_STEPS}] Attaching children to their parents");
        attach_to_parent(&mut cascade, ParentLink::Mother)?;
        attach_to_parent(&mut cascade, ParentLink::Father)?;

        log::info!("[Step 6/{TOTAL_STEPS}] Attaching dependents to their declarant");
        attach_to_declarant(&mut cascade)?;

        log::info!("[Step 7/{TOTAL_STEPS}] Merging tax-only individuals");
        let secondary = builder.secondary_individuals(secondary, &mut cascade.report);
        let secondary_ids: Vec<i64> = secondary.iter().map(|i| i.id).collect();
        merge_secondary(&mut cascade, secondary, year)?;

        log::info!("[Step 8/{TOTAL_STEPS}] Resolving remaining individuals");
        attach_residual_children(&mut cascade)?;
        assign_residual_singles(&mut cascade)?;

        let unplaced: Vec<i64> = cascade
            .unassigned()
            .filter(|i| i.is_tax_only())
            .map(|i| i.id)
            .chain(secondary_ids)
            .filter(|id| !cascade.families.is_claimed(*id))
            .unique()
            .collect();
        log_anomaly("tax-only individuals left without a family", unplaced.len());

        log::info!("[Step {TOTAL_STEPS}/{TOTAL_STEPS}] Finalizing families");
        let Cascade {
            base,
            families,
            mut report,
        } = cascade;
        report.unplaced_secondary = unplaced;
        report.base_rows = base.len();
        report.relocated_members = families.relocated_count();
        log::info!(
            "{} members followed their anchor into another family",
            report.relocated_members
        );
        let assignments = families.into_rows();
        report.record_rules(&assignments);
        let finalized = finalize(&assignments, &mut report);
        report.output_rows = finalized.records.len();

        log::info!("Family construction complete");
        log::info!("{}", report.generate_summary());
        Ok(FamilyOutcome {
            members: finalized.members,
            records: finalized.records,
            report,
        })
    }
}

/// Read a table and deserialize it into individual records
pub fn load_records<S: TableStore + ?Sized>(
    store: &S,
    name: &str,
    year: i32,
) -> Result<Vec<IndividualRecord>> {
    let batch = store.get(name, year)?;
    let batch = conform_batch(&batch, &individual_schema(), name)?;
    let records = IndividualRecord::from_record_batch(&batch)?;
    log::info!("Loaded {} rows from {name} for {year}", records.len());
    Ok(records)
}
