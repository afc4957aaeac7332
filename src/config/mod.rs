//! Configuration for a family-building run.
//!
//! A `FamilyConfig` is constructed once per run and passed into the pipeline;
//! nothing in the crate keeps configuration in global state.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FamilyError, Result};

/// Number of monthly wages in the annual wage floor
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Default share of the annual minimum wage a young adult must earn to count
/// as self-supporting
pub const DEFAULT_WAGE_FLOOR_SHARE: f64 = 0.55;

/// Gross monthly minimum wage by year
///
/// Years absent from the table are an error: the builder never guesses a wage
/// level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinimumWageTable {
    monthly: BTreeMap<i32, f64>,
}

impl MinimumWageTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            monthly: BTreeMap::new(),
        }
    }

    /// Add or replace the monthly minimum wage for a year
    #[must_use]
    pub fn with_year(mut self, year: i32, monthly_wage: f64) -> Self {
        self.monthly.insert(year, monthly_wage);
        self
    }

    /// Monthly minimum wage for `year`
    pub fn minimum_wage(&self, year: i32) -> Result<f64> {
        self.monthly
            .get(&year)
            .copied()
            .ok_or(FamilyError::UnknownYear(year))
    }

    /// Years covered by the table, ascending
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.monthly.keys().copied()
    }
}

impl Default for MinimumWageTable {
    fn default() -> Self {
        Self::new()
            .with_year(2006, 1254.0)
            .with_year(2007, 1280.0)
            .with_year(2008, 1308.0)
            .with_year(2009, 1337.0)
    }
}

/// Names of the tables read and written in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    /// Main survey individuals
    pub individuals: String,
    /// Children expected but not yet born at survey time
    pub future_children: String,
    /// Individuals enumerated only on tax returns
    pub secondary: String,
    /// Output family table
    pub families: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            individuals: "indivim".to_string(),
            future_children: "enfants_a_naitre".to_string(),
            secondary: "fipDat".to_string(),
            families: "famc".to_string(),
        }
    }
}

/// Configuration for the family builder
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyConfig {
    /// Monthly minimum wage lookup
    pub minimum_wage: MinimumWageTable,
    /// Share of the annual minimum wage used as the income floor
    pub wage_floor_share: WageFloorShare,
    /// Store table names
    pub tables: TableNames,
}

/// Wrapper giving the floor share its own serde default
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WageFloorShare(pub f64);

impl Default for WageFloorShare {
    fn default() -> Self {
        Self(DEFAULT_WAGE_FLOOR_SHARE)
    }
}

impl FamilyConfig {
    /// Load a configuration from a JSON file
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FamilyError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a meaningful floor
    pub fn validate(&self) -> Result<()> {
        let share = self.wage_floor_share.0;
        if !share.is_finite() || share < 0.0 {
            return Err(FamilyError::Config(format!(
                "wage floor share must be a non-negative number, got {share}"
            )));
        }
        if let Some((year, wage)) = self
            .minimum_wage
            .monthly
            .iter()
            .find(|(_, wage)| !wage.is_finite() || **wage <= 0.0)
        {
            return Err(FamilyError::Config(format!(
                "minimum wage for {year} must be positive, got {wage}"
            )));
        }
        Ok(())
    }

    /// Annual income a young adult must reach to be treated as self-supporting
    pub fn wage_floor(&self, year: i32) -> Result<f64> {
        let monthly = self.minimum_wage.minimum_wage(year)?;
        Ok(monthly * MONTHS_PER_YEAR * self.wage_floor_share.0)
    }
}

impl fmt::Display for FamilyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Family Builder Configuration:")?;
        writeln!(f, "  Wage Floor Share: {}", self.wage_floor_share.0)?;
        for (year, wage) in &self.minimum_wage.monthly {
            writeln!(f, "  Minimum Wage {year}: {wage}")?;
        }
        writeln!(f, "  Individuals Table: {}", self.tables.individuals)?;
        writeln!(f, "  Future Children Table: {}", self.tables.future_children)?;
        writeln!(f, "  Secondary Table: {}", self.tables.secondary)?;
        writeln!(f, "  Families Table: {}", self.tables.families)?;
        Ok(())
    }
}
