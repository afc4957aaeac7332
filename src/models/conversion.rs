//! Named conversions from nullable survey columns to typed values
//!
//! Every null-handling rule the builder relies on lives here so it can be
//! tested on its own.

use super::individual::{AgeBracket, HouseholdRole, Sex, SourceFile, TaxRole};
use crate::error::{FamilyError, Result};

/// Upper bound (exclusive) of the minor bracket
pub const MINOR_AGE_LIMIT: i32 = 16;
/// Upper bound (inclusive) of the young adult bracket
pub const YOUNG_ADULT_MAX_AGE: i32 = 20;
/// Birth month from which a child has not yet had their birthday at the
/// survey reference date
pub const LATE_BIRTH_MONTH: i32 = 7;

/// Global individual key derived from household and person keys
#[must_use]
pub const fn individual_id(household_id: i64, person_index: i64) -> i64 {
    100 * household_id + person_index
}

/// Null income counts as no income
#[must_use]
pub fn income_or_zero(income: Option<f64>) -> f64 {
    income.filter(|value| !value.is_nan()).unwrap_or(0.0)
}

/// Whether an income reaches the annual wage floor, nulls coerced to zero
#[must_use]
pub fn clears_wage_floor(income: Option<f64>, floor: f64) -> bool {
    income_or_zero(income) >= floor
}

/// Age bracket; a null age belongs to no bracket
#[must_use]
pub const fn age_bracket(age: Option<i32>) -> AgeBracket {
    match age {
        None => AgeBracket::Unknown,
        Some(age) if age < MINOR_AGE_LIMIT => AgeBracket::Minor,
        Some(age) if age <= YOUNG_ADULT_MAX_AGE => AgeBracket::YoungAdult,
        Some(_) => AgeBracket::Adult,
    }
}

/// Age at the survey reference date derived from birth year and month
///
/// People born from July onward are counted one year younger. An unknown
/// month is treated as an early birth.
#[must_use]
pub fn age_from_birth(year: i32, birth_year: Option<i32>, birth_month: Option<i32>) -> Option<i32> {
    let birth_year = birth_year?;
    match birth_month {
        Some(month) if month >= LATE_BIRTH_MONTH => Some(year - birth_year - 1),
        _ => Some(year - birth_year),
    }
}

/// Person index of the declarant, read from the first two characters of a
/// tax return identifier
#[must_use]
pub fn declarant_from_declaration(declaration: Option<&str>) -> Option<i64> {
    declaration
        .and_then(|value| value.get(0..2))
        .and_then(|prefix| prefix.trim().parse::<i64>().ok())
}

/// Only an explicit `1` marks cohabitation
#[must_use]
pub const fn is_cohabiting(cohab: Option<i32>) -> bool {
    matches!(cohab, Some(1))
}

/// Household role code, which must be present and one of 1 to 4
pub fn household_role(code: Option<i32>) -> Result<HouseholdRole> {
    match code {
        Some(1) => Ok(HouseholdRole::ReferencePerson),
        Some(2) => Ok(HouseholdRole::Partner),
        Some(3) => Ok(HouseholdRole::ChildOfReference),
        Some(4) => Ok(HouseholdRole::Other),
        other => Err(FamilyError::InvalidValue {
            column: "lpr".to_string(),
            value: other.map_or_else(|| "null".to_string(), |code| code.to_string()),
        }),
    }
}

/// Sex code; anything but 1 or 2 is unknown
#[must_use]
pub const fn sex(code: Option<i32>) -> Option<Sex> {
    match code {
        Some(1) => Some(Sex::Male),
        Some(2) => Some(Sex::Female),
        _ => None,
    }
}

/// Position on the tax return
#[must_use]
pub fn tax_role(status: Option<&str>) -> Option<TaxRole> {
    match status.map(str::trim) {
        Some("vous") => Some(TaxRole::Declarant),
        Some("conj") => Some(TaxRole::Spouse),
        Some("pac") => Some(TaxRole::Dependent),
        _ => None,
    }
}

/// Source file of a record
#[must_use]
pub fn source_file(code: Option<&str>) -> SourceFile {
    match code.map(str::trim) {
        Some("EE") => SourceFile::MainSurvey,
        Some("FIP") => SourceFile::TaxOnly,
        _ => SourceFile::Other,
    }
}
