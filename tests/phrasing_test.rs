//! Tests for the lexical input screens, dedup keys, and the rule catalog.

use bribe_the_scale::catalog::{self, RuleId};
use bribe_the_scale::normalize::{UNKNOWN_OBJECT, UsedObjectRegistry, canonical_key};
use bribe_the_scale::phrasing::{bulk_material_without_count, contains_explicit_measure};

#[test]
fn test_canonical_key_lowercases_and_collapses_whitespace() {
    assert_eq!(canonical_key("  Red   BRICK "), "red brick");
    assert_eq!(canonical_key("brick"), "brick");
}

#[test]
fn test_canonical_key_empty_maps_to_sentinel() {
    assert_eq!(canonical_key(""), UNKNOWN_OBJECT);
    assert_eq!(canonical_key("   "), UNKNOWN_OBJECT);
}

#[test]
fn test_registry_grows_monotonically() {
    let mut registry = UsedObjectRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.insert("brick".to_string()));
    assert!(!registry.insert("brick".to_string()));
    assert!(registry.contains("brick"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_spaced_measure_detected() {
    assert!(contains_explicit_measure("1 kg of flour"));
    assert!(contains_explicit_measure("about 500 ml water"));
    assert!(contains_explicit_measure("2.5 pounds of sugar"));
}

#[test]
fn test_glued_measure_detected() {
    assert!(contains_explicit_measure("500g of sand"));
    assert!(contains_explicit_measure("a 1.5kg dumbbell"));
}

#[test]
fn test_plain_object_is_not_a_measure() {
    assert!(!contains_explicit_measure("a cast iron skillet"));
    assert!(!contains_explicit_measure("gravestone"));
    // A bare unit word with no quantity is not an explicit measure.
    assert!(!contains_explicit_measure("a pound cake"));
}

#[test]
fn test_bare_bulk_material_flagged() {
    assert!(bulk_material_without_count("flour"));
    assert!(bulk_material_without_count("some sand"));
}

#[test]
fn test_counted_or_contained_material_allowed() {
    assert!(!bulk_material_without_count("a bag of flour"));
    assert!(!bulk_material_without_count("10 grains of rice"));
    assert!(!bulk_material_without_count("bottle of water"));
}

#[test]
fn test_non_material_input_not_flagged() {
    assert!(!bulk_material_without_count("a brick"));
}

#[test]
fn test_contradiction_pairs_are_symmetric() {
    assert!(catalog::contradicts(
        RuleId::StartsWithVowel,
        &[RuleId::StartsWithConsonant]
    ));
    assert!(catalog::contradicts(
        RuleId::StartsWithConsonant,
        &[RuleId::StartsWithVowel]
    ));
    assert!(catalog::contradicts(RuleId::MadeOfMetal, &[RuleId::IsAlive]));
    assert!(!catalog::contradicts(RuleId::IsFood, &[RuleId::FitsInOneHand]));
}

#[test]
fn test_catalog_texts_stay_short() {
    for definition in catalog::all_definitions() {
        assert!(
            definition.text.split_whitespace().count() <= 4,
            "rule text too long: {}",
            definition.text
        );
        assert!(!definition.semantic.is_empty());
    }
}

#[test]
fn test_rule_ids_round_trip_kebab_case() {
    let id: RuleId = "fits-in-one-hand".parse().expect("parse failed");
    assert_eq!(id, RuleId::FitsInOneHand);
    assert_eq!(RuleId::FitsInOneHand.to_string(), "fits-in-one-hand");
    assert!("no-such-rule".parse::<RuleId>().is_err());
}
