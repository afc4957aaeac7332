use famc_builder::models::Rule;

use crate::utils::{build, person, record_of, tax_only, test_wage_floor};

fn rule_of(outcome: &famc_builder::FamilyOutcome, individual_id: i64) -> Rule {
    outcome
        .members
        .iter()
        .find(|m| m.individual_id == individual_id)
        .map(|m| m.rule)
        .unwrap()
}

#[test]
fn test_mother_link_beats_residual_rule() {
    let mut mother = person(3, 3, 4, 35, 2);
    mother.partner_index = None;
    let mut child = person(3, 4, 4, 5, 1);
    child.mother_index = Some(3);
    let unlinked = person(3, 5, 4, 6, 2);
    let main = vec![person(3, 1, 1, 70, 1), mother, child, unlinked];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 304), Rule::ChildOfMother);
    assert_eq!(record_of(&outcome.records, 304).family_id, 303);
    assert_eq!(record_of(&outcome.records, 304).role_code, 2);
    assert_eq!(rule_of(&outcome, 303), Rule::Mother);
    assert_eq!(record_of(&outcome.records, 303).role_code, 0);

    assert_eq!(rule_of(&outcome, 305), Rule::ResidualMinor);
    assert_eq!(record_of(&outcome.records, 305).family_id, 301);
}

#[test]
fn test_father_and_partner_promoted() {
    let mut father = person(4, 3, 4, 40, 1);
    father.partner_index = Some(4);
    let partner = person(4, 4, 4, 38, 2);
    let mut child = person(4, 5, 4, 17, 2);
    child.father_index = Some(3);
    let main = vec![person(4, 1, 1, 72, 2), father, partner, child];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 405), Rule::ChildOfFather);
    assert_eq!(rule_of(&outcome, 403), Rule::Father);
    assert_eq!(rule_of(&outcome, 404), Rule::FatherPartner);
    for id in [403, 404, 405] {
        assert_eq!(record_of(&outcome.records, id).family_id, 403);
    }
    assert_eq!(record_of(&outcome.records, 403).role_code, 0);
    assert_eq!(record_of(&outcome.records, 404).role_code, 1);
    assert_eq!(record_of(&outcome.records, 405).role_code, 2);
}

#[test]
fn test_couple_outside_reference_couple() {
    let mut man = person(5, 3, 3, 28, 1);
    man.cohabits = Some(1);
    man.partner_index = Some(4);
    let mut woman = person(5, 4, 4, 27, 2);
    woman.cohabits = Some(1);
    woman.partner_index = Some(3);
    let main = vec![person(5, 1, 1, 55, 1), man, woman];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 503), Rule::CoupleMan);
    assert_eq!(rule_of(&outcome, 504), Rule::CoupleWoman);
    assert_eq!(record_of(&outcome.records, 503).role_code, 0);
    assert_eq!(record_of(&outcome.records, 504).family_id, 503);
    assert_eq!(record_of(&outcome.records, 504).role_code, 1);
}

#[test]
fn test_young_earner_leaves_reference_family() {
    let mut earner = person(6, 3, 3, 19, 1);
    earner.income = Some(test_wage_floor() + 1.0);
    let mut student = person(6, 4, 3, 19, 2);
    student.income = Some(test_wage_floor() - 1.0);
    let main = vec![person(6, 1, 1, 48, 2), earner, student];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 603), Rule::SingleYoungEarner);
    assert_eq!(record_of(&outcome.records, 603).family_id, 603);
    assert_eq!(rule_of(&outcome, 604), Rule::ReferencePerson);
    assert_eq!(record_of(&outcome.records, 604).family_id, 601);
}

#[test]
fn test_dependent_attached_to_declarant() {
    let mut declarant = person(7, 2, 4, 66, 2);
    declarant.dependent_status = Some("vous".to_string());
    let mut grandchild = person(7, 3, 4, 12, 1);
    grandchild.dependent_status = Some("pac".to_string());
    grandchild.declaration_id = Some("02-0042".to_string());
    let main = vec![person(7, 1, 1, 70, 1), declarant, grandchild];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 703), Rule::ChildOfDeclarant);
    assert_eq!(record_of(&outcome.records, 703).family_id, 702);
    assert_eq!(rule_of(&outcome, 702), Rule::Declarant);
    assert_eq!(record_of(&outcome.records, 702).role_code, 0);
}

#[test]
fn test_tax_only_child_joins_declarant() {
    let main = vec![person(8, 1, 1, 50, 1)];
    let secondary = vec![tax_only(8, 5, 19, 1)];

    let outcome = build(&main, &[], &secondary);

    assert_eq!(outcome.report.secondary_admitted, 1);
    assert_eq!(rule_of(&outcome, 805), Rule::SecondaryChild);
    assert_eq!(record_of(&outcome.records, 805).family_id, 801);
    assert_eq!(record_of(&outcome.records, 805).role_code, 2);
    assert_eq!(rule_of(&outcome, 801), Rule::SecondaryDeclarant);
    assert_eq!(record_of(&outcome.records, 801).role_code, 0);
}

#[test]
fn test_young_relative_of_older_reference_person() {
    let mut nephew = person(9, 3, 4, 18, 1);
    nephew.relationship_code = Some(4);
    nephew.reference_person_age = Some(52);
    let mut lodger = person(9, 4, 4, 18, 2);
    lodger.relationship_code = Some(5);
    lodger.reference_person_age = Some(52);
    let main = vec![person(9, 1, 1, 52, 1), nephew, lodger];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 903), Rule::ResidualYoungAdult);
    assert_eq!(record_of(&outcome.records, 903).family_id, 901);
    assert_eq!(rule_of(&outcome, 904), Rule::ResidualSingle);
    assert_eq!(record_of(&outcome.records, 904).family_id, 904);
}

#[test]
fn test_young_earning_son_leaves_before_mother_link() {
    let mut mother = person(10, 2, 4, 44, 2);
    mother.partner_index = None;
    let mut son = person(10, 3, 4, 19, 1);
    son.mother_index = Some(2);
    son.income = Some(test_wage_floor() + 1.0);
    let mut sister = person(10, 4, 4, 17, 2);
    sister.mother_index = Some(2);
    let main = vec![person(10, 1, 1, 75, 1), mother, son, sister];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 1003), Rule::SingleYoungEarner);
    assert_eq!(record_of(&outcome.records, 1003).family_id, 1003);
    assert_eq!(record_of(&outcome.records, 1003).role_code, 0);
    assert_eq!(rule_of(&outcome, 1004), Rule::ChildOfMother);
    assert_eq!(record_of(&outcome.records, 1004).family_id, 1002);
}

#[test]
fn test_reference_person_taken_in_by_partner_brings_family() {
    let mut reference = person(11, 1, 1, 45, 1);
    reference.partner_index = Some(2);
    let mut partner = person(11, 2, 2, 43, 2);
    partner.partner_index = Some(1);
    let mut child = person(11, 4, 4, 5, 1);
    child.mother_index = Some(2);
    let main = vec![reference, partner, person(11, 3, 3, 8, 2), child];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 1101), Rule::MotherPartner);
    assert_eq!(rule_of(&outcome, 1102), Rule::Mother);
    assert_eq!(rule_of(&outcome, 1103), Rule::ReferencePerson);
    assert_eq!(record_of(&outcome.records, 1101).family_id, 1102);
    assert_eq!(record_of(&outcome.records, 1101).role_code, 1);
    assert_eq!(record_of(&outcome.records, 1102).role_code, 0);
    assert_eq!(record_of(&outcome.records, 1103).family_id, 1102);
    assert_eq!(record_of(&outcome.records, 1103).role_code, 2);
    assert_eq!(record_of(&outcome.records, 1104).family_id, 1102);
    assert_eq!(record_of(&outcome.records, 1104).role_code, 3);
    assert_eq!(outcome.report.family_count, 1);
    assert_eq!(outcome.report.families_without_single_head, 0);
    assert_eq!(outcome.report.relocated_members, 1);
}

#[test]
fn test_minor_left_on_moved_reference_person_follows_it() {
    let mut reference = person(12, 1, 1, 45, 1);
    reference.partner_index = Some(3);
    let mut partner = person(12, 3, 4, 43, 2);
    partner.partner_index = Some(1);
    let mut child = person(12, 4, 4, 5, 1);
    child.mother_index = Some(3);
    let nephew = person(12, 5, 4, 9, 1);
    let main = vec![reference, partner, child, nephew];

    let outcome = build(&main, &[], &[]);

    assert_eq!(rule_of(&outcome, 1205), Rule::ResidualMinor);
    for id in [1201, 1203, 1204, 1205] {
        assert_eq!(record_of(&outcome.records, id).family_id, 1203);
    }
    assert_eq!(outcome.report.families_without_single_head, 0);
}

#[test]
fn test_tax_only_row_without_role_skipped() {
    let main = vec![person(8, 1, 1, 50, 1)];
    let mut unusable = tax_only(8, 6, 19, 1);
    unusable.household_role_code = None;
    let secondary = vec![tax_only(8, 5, 19, 1), unusable];

    let outcome = build(&main, &[], &secondary);

    assert_eq!(outcome.report.skipped_secondary, 1);
    assert_eq!(outcome.report.secondary_admitted, 1);
    assert_eq!(rule_of(&outcome, 805), Rule::SecondaryChild);
    assert!(outcome.records.iter().all(|r| r.individual_id != 806));
    assert!(outcome.report.unplaced_secondary.is_empty());
}
