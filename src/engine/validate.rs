//! Deterministic validation pipeline for one submitted phrase.
//!
//! Checks run in a fixed priority order and short-circuit on the first
//! failure. The order is a correctness contract: it determines which
//! failure reason the player sees, so an explicit-measure phrase fails the
//! measure ban even when its weight is also out of range.

use super::session::GameSession;
use crate::catalog::{self, RuleId};
use crate::normalize;
use crate::phrasing;
use crate::verdict::JudgeVerdict;
use serde::Serialize;
use tracing::{debug, instrument};

/// Why a submission failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The phrase carried an explicit mass/volume measure.
    ExplicitMeasure,
    /// A bulk material was named without a countable unit.
    BulkMaterial,
    /// Trick or self-referential phrasing.
    TrickPhrasing,
    /// Gibberish or a logically paradoxical object.
    NotReal,
    /// The canonical key was already scored as a pass.
    Duplicate,
    /// The weight estimate fell outside the window.
    OutOfRange,
    /// An active rule predicate was not satisfied.
    RuleFailed,
}

/// Outcome of the validation pipeline; created and consumed within one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the submission passed every check.
    pub pass: bool,
    /// First failed check, if any.
    pub failure_reason: Option<FailureReason>,
    /// The rule that failed, when the reason is a rule failure.
    pub rule_fail: Option<RuleId>,
    /// True when the result was forced by the judge fallback policy.
    pub fallback_mode: bool,
}

impl ValidationResult {
    fn pass() -> Self {
        Self {
            pass: true,
            failure_reason: None,
            rule_fail: None,
            fallback_mode: false,
        }
    }

    fn fail(reason: FailureReason) -> Self {
        Self {
            pass: false,
            failure_reason: Some(reason),
            rule_fail: None,
            fallback_mode: false,
        }
    }

    /// Forced pass used when the judge could not produce valid output.
    pub fn fallback_pass() -> Self {
        Self {
            pass: true,
            failure_reason: None,
            rule_fail: None,
            fallback_mode: true,
        }
    }

    /// Player-facing explanation of this result.
    pub fn describe(&self, verdict: &JudgeVerdict, session: &GameSession) -> String {
        match self.failure_reason {
            None if self.fallback_mode => verdict.reason_short.clone(),
            None => "Within range and all active rules satisfied.".to_string(),
            Some(FailureReason::ExplicitMeasure) => {
                "Explicit measure phrasing is banned: name the object, not its weight."
                    .to_string()
            }
            Some(FailureReason::BulkMaterial) => {
                "Bulk material needs a countable unit (a bag, a bottle, a count).".to_string()
            }
            Some(FailureReason::TrickPhrasing) => {
                "Trick or self-referential phrasing is rejected.".to_string()
            }
            Some(FailureReason::NotReal) => {
                "That is not a real, weighable object.".to_string()
            }
            Some(FailureReason::Duplicate) => {
                format!("Already used: \"{}\".", verdict.canonical_name)
            }
            Some(FailureReason::OutOfRange) => format!(
                "Estimated {} g is outside range {}-{} g.",
                verdict.estimated_weight_g, session.min_weight_g, session.max_weight_g
            ),
            Some(FailureReason::RuleFailed) => match self.rule_fail {
                Some(rule) => format!("Rule failed: {}.", catalog::definition(rule).text),
                None => "An active rule was not satisfied.".to_string(),
            },
        }
    }
}

/// Runs the fixed-priority validation pipeline.
///
/// Pure function of its inputs: re-validating the same triple yields the
/// same result.
#[instrument(skip_all, fields(turn = session.turn_number, canonical = %verdict.canonical_name))]
pub fn validate(raw_input: &str, verdict: &JudgeVerdict, session: &GameSession) -> ValidationResult {
    // 1. Explicit-measure ban: the lexical screen catches what the judge
    //    missed, and the judge flag catches spelled-out units.
    if verdict.used_explicit_measure || phrasing::contains_explicit_measure(raw_input) {
        debug!("Failed explicit-measure ban");
        return ValidationResult::fail(FailureReason::ExplicitMeasure);
    }

    // 2. Bulk material without a countable unit.
    if phrasing::bulk_material_without_count(raw_input) {
        debug!("Failed bulk-material screen");
        return ValidationResult::fail(FailureReason::BulkMaterial);
    }

    // 3. Trick phrasing.
    if verdict.used_trick_phrasing {
        debug!("Failed trick-phrasing check");
        return ValidationResult::fail(FailureReason::TrickPhrasing);
    }

    // 4. Realness.
    if !verdict.is_real {
        debug!("Failed realness check");
        return ValidationResult::fail(FailureReason::NotReal);
    }

    // 5. Duplicate canonical key.
    let key = normalize::canonical_key(&verdict.canonical_name);
    if session.used.contains(&key) {
        debug!(key = %key, "Failed duplicate check");
        return ValidationResult::fail(FailureReason::Duplicate);
    }

    // 6. Range, inclusive on both ends.
    if verdict.estimated_weight_g < session.min_weight_g
        || verdict.estimated_weight_g > session.max_weight_g
    {
        debug!(weight_g = verdict.estimated_weight_g, "Failed range check");
        return ValidationResult::fail(FailureReason::OutOfRange);
    }

    // 7. Active rule predicates. A missing check fails closed.
    for &rule in &session.active_rules {
        if verdict.rule_checks.get(&rule).copied() != Some(true) {
            debug!(rule = %rule, "Failed active-rule check");
            return ValidationResult {
                pass: false,
                failure_reason: Some(FailureReason::RuleFailed),
                rule_fail: Some(rule),
                fallback_mode: false,
            };
        }
    }

    ValidationResult::pass()
}
