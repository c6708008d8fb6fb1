//! Static allowlist of rule predicates and their contradiction pairs.
//!
//! The engine never evaluates a predicate itself; each rule carries a
//! judge-facing semantic sentence and the judging collaborator reports a
//! per-rule boolean in its verdict.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Identifier of a rule predicate from the fixed catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RuleId {
    /// Item name starts with a consonant.
    StartsWithConsonant,
    /// Item name starts with a vowel.
    StartsWithVowel,
    /// Item is a living thing.
    IsAlive,
    /// Item is edible.
    IsFood,
    /// Item fits in one hand.
    FitsInOneHand,
    /// Item has wheels.
    HasWheels,
    /// Item is primarily metal.
    MadeOfMetal,
    /// Item is a household item.
    HouseholdItem,
    /// Item is found outdoors.
    FoundOutdoors,
    /// Item is used every day.
    UsedEveryDay,
    /// Item fits in a backpack.
    FitsInBackpack,
    /// Item is colorful.
    IsColorful,
}

/// Immutable definition of one rule predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    /// Catalog identifier.
    pub id: RuleId,
    /// Human-readable predicate text, at most four words.
    pub text: &'static str,
    /// Sentence handed to the judging collaborator for evaluation.
    pub semantic: &'static str,
}

/// Rule pairs that may never be active at the same time.
const CONTRADICTIONS: [(RuleId, RuleId); 3] = [
    (RuleId::StartsWithConsonant, RuleId::StartsWithVowel),
    (RuleId::IsAlive, RuleId::MadeOfMetal),
    (RuleId::IsFood, RuleId::MadeOfMetal),
];

/// Looks up the definition for a rule id.
pub fn definition(id: RuleId) -> RuleDefinition {
    let (text, semantic) = match id {
        RuleId::StartsWithConsonant => (
            "starts with consonant",
            "The item's common name must start with a consonant.",
        ),
        RuleId::StartsWithVowel => (
            "starts with vowel",
            "The item's common name must start with a vowel.",
        ),
        RuleId::IsAlive => ("is alive", "The item must be a living thing."),
        RuleId::IsFood => ("is food", "The item must be something people eat."),
        RuleId::FitsInOneHand => (
            "fits in one hand",
            "The item must fit in one adult hand.",
        ),
        RuleId::HasWheels => ("has wheels", "The item must have wheels."),
        RuleId::MadeOfMetal => (
            "made of metal",
            "The item must be made mostly of metal.",
        ),
        RuleId::HouseholdItem => (
            "household item",
            "The item must be a common household item.",
        ),
        RuleId::FoundOutdoors => (
            "found outdoors",
            "The item must normally be found outdoors.",
        ),
        RuleId::UsedEveryDay => (
            "used every day",
            "The item must be something people use every day.",
        ),
        RuleId::FitsInBackpack => (
            "fits in a backpack",
            "The item must fit inside a school backpack.",
        ),
        RuleId::IsColorful => ("is colorful", "The item must be visibly colorful."),
    };
    RuleDefinition { id, text, semantic }
}

/// Returns every rule definition in the catalog.
pub fn all_definitions() -> Vec<RuleDefinition> {
    RuleId::iter().map(definition).collect()
}

/// Checks whether `candidate` contradicts any rule in `active`.
pub fn contradicts(candidate: RuleId, active: &[RuleId]) -> bool {
    CONTRADICTIONS.iter().any(|&(a, b)| {
        (candidate == a && active.contains(&b)) || (candidate == b && active.contains(&a))
    })
}
