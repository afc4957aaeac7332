//! Individual entity model
//!
//! `IndividualRecord` mirrors one row of the input survey tables with every
//! column as stored, nulls included. `Individual` is the typed row the rule
//! cascade works on: keys resolved, codes parsed, and the derived age and
//! income flags computed once.

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use super::conversion;
use crate::error::Result;
use crate::schema::individual_schema;

/// Raw individual row from the survey or tax tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualRecord {
    #[serde(rename = "ident")]
    pub household_id: i64,
    #[serde(rename = "noi")]
    pub person_index: i64,
    #[serde(rename = "noindiv")]
    pub individual_id: Option<i64>,
    /// Role in the household (1 reference person, 2 partner, 3 child, 4 other)
    #[serde(rename = "lpr")]
    pub household_role_code: Option<i32>,
    /// Relationship to the reference person
    #[serde(rename = "lien")]
    pub relationship_code: Option<i32>,
    #[serde(rename = "cohab")]
    pub cohabits: Option<i32>,
    #[serde(rename = "sexe")]
    pub sex: Option<i32>,
    #[serde(rename = "agepf")]
    pub age_for_family: Option<i32>,
    #[serde(rename = "naia")]
    pub birth_year: Option<i32>,
    #[serde(rename = "naim")]
    pub birth_month: Option<i32>,
    /// Annual wage income
    #[serde(rename = "ztsai")]
    pub income: Option<f64>,
    #[serde(rename = "noimer")]
    pub mother_index: Option<i64>,
    #[serde(rename = "noiper")]
    pub father_index: Option<i64>,
    #[serde(rename = "noicon")]
    pub partner_index: Option<i64>,
    /// Person index of the declarant of the attached tax return
    #[serde(rename = "noidec")]
    pub tax_declarant_code: Option<i64>,
    #[serde(rename = "declar1")]
    pub declaration_id: Option<String>,
    #[serde(rename = "persfip")]
    pub dependent_status: Option<String>,
    #[serde(rename = "rga")]
    pub tax_relationship_code: Option<i32>,
    #[serde(rename = "quelfic")]
    pub source_file_kind: Option<String>,
    #[serde(rename = "agepr")]
    pub reference_person_age: Option<i32>,
}

impl IndividualRecord {
    /// Create a record with only its keys and household role set
    #[must_use]
    pub fn new(household_id: i64, person_index: i64, household_role_code: i32) -> Self {
        Self {
            household_id,
            person_index,
            individual_id: Some(conversion::individual_id(household_id, person_index)),
            household_role_code: Some(household_role_code),
            ..Default::default()
        }
    }

    /// Key derived from household and person keys
    #[must_use]
    pub const fn derived_id(&self) -> i64 {
        conversion::individual_id(self.household_id, self.person_index)
    }

    /// Convert records to a batch with the declared individual schema
    pub fn to_record_batch(records: &[Self]) -> Result<RecordBatch> {
        let schema = individual_schema();
        Ok(serde_arrow::to_record_batch(schema.fields(), &records)?)
    }

    /// Deserialize a batch already conformed to the individual schema
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Vec<Self>> {
        Ok(serde_arrow::from_record_batch(batch)?)
    }
}

/// Role of a person in the household grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HouseholdRole {
    ReferencePerson = 1,
    Partner = 2,
    ChildOfReference = 3,
    Other = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

/// Position of a person on their tax return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxRole {
    /// "vous"
    Declarant,
    /// "conj"
    Spouse,
    /// "pac", a dependent relative
    Dependent,
}

/// Which enumeration a record comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFile {
    /// Plain survey record ("EE")
    MainSurvey,
    /// Individual known only from a tax return ("FIP")
    TaxOnly,
    /// Any other survey sub-file
    Other,
}

/// Age bracket used by the family rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBracket {
    /// Under 16
    Minor,
    /// 16 to 20 inclusive
    YoungAdult,
    /// 21 and over
    Adult,
    /// No usable age
    Unknown,
}

/// Typed individual row with derived flags
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub id: i64,
    pub household_id: i64,
    pub person_index: i64,
    pub role: HouseholdRole,
    pub relationship_code: Option<i32>,
    pub cohabits: bool,
    pub sex: Option<Sex>,
    pub age: Option<i32>,
    pub age_bracket: AgeBracket,
    pub birth_year: Option<i32>,
    /// Income reaches the annual wage floor of the run year
    pub clears_wage_floor: bool,
    pub mother_index: Option<i64>,
    pub father_index: Option<i64>,
    pub partner_index: Option<i64>,
    pub declarant_index: Option<i64>,
    pub tax_role: Option<TaxRole>,
    pub tax_relationship_code: Option<i32>,
    pub source: SourceFile,
    pub reference_person_age: Option<i32>,
}

impl Individual {
    /// Build the typed row from a raw record
    ///
    /// # Arguments
    /// * `record` - The raw row
    /// * `year` - Survey year, used to derive a missing age
    /// * `wage_floor` - Annual income floor for the year
    pub fn from_record(record: &IndividualRecord, year: i32, wage_floor: f64) -> Result<Self> {
        let age = record.age_for_family.or_else(|| {
            conversion::age_from_birth(year, record.birth_year, record.birth_month)
        });
        let declarant_index = record.tax_declarant_code.or_else(|| {
            conversion::declarant_from_declaration(record.declaration_id.as_deref())
        });

        Ok(Self {
            id: record.derived_id(),
            household_id: record.household_id,
            person_index: record.person_index,
            role: conversion::household_role(record.household_role_code)?,
            relationship_code: record.relationship_code,
            cohabits: conversion::is_cohabiting(record.cohabits),
            sex: conversion::sex(record.sex),
            age,
            age_bracket: conversion::age_bracket(age),
            birth_year: record.birth_year,
            clears_wage_floor: conversion::clears_wage_floor(record.income, wage_floor),
            mother_index: record.mother_index,
            father_index: record.father_index,
            partner_index: record.partner_index,
            declarant_index,
            tax_role: conversion::tax_role(record.dependent_status.as_deref()),
            tax_relationship_code: record.tax_relationship_code,
            source: conversion::source_file(record.source_file_kind.as_deref()),
            reference_person_age: record.reference_person_age,
        })
    }

    /// Family key anchored on another member of the same household
    #[must_use]
    pub const fn family_id_for(&self, anchor_index: i64) -> i64 {
        conversion::individual_id(self.household_id, anchor_index)
    }

    #[must_use]
    pub const fn is_minor(&self) -> bool {
        matches!(self.age_bracket, AgeBracket::Minor)
    }

    #[must_use]
    pub const fn is_young_adult(&self) -> bool {
        matches!(self.age_bracket, AgeBracket::YoungAdult)
    }

    #[must_use]
    pub const fn is_adult(&self) -> bool {
        matches!(self.age_bracket, AgeBracket::Adult)
    }

    /// Known only from a tax return
    #[must_use]
    pub const fn is_tax_only(&self) -> bool {
        matches!(self.source, SourceFile::TaxOnly)
    }

    #[must_use]
    pub fn is_role(&self, role: HouseholdRole) -> bool {
        self.role == role
    }

    /// Child or other relative of the reference person (role 3 or 4)
    #[must_use]
    pub fn is_dependent_member(&self) -> bool {
        self.role >= HouseholdRole::ChildOfReference
    }
}
