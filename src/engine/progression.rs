//! Difficulty progression: judge-proposed mutations folded over the session.
//!
//! Actions apply strictly in the order the judge proposed them. Each action
//! is guarded on its own: one that would break the `min < max` invariant is
//! discarded with the prior bounds kept, and processing continues with the
//! next action.

use super::session::GameSession;
use crate::catalog;
use crate::config::GameConfig;
use crate::verdict::ProgressionAction;
use tracing::{debug, instrument, warn};

/// Rounds a bound to a human-friendly 1/2/5/10 mantissa.
pub fn nice_round(value: f64) -> u64 {
    if value <= 1.0 {
        return 1;
    }
    let exponent = value.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let normalized = value / magnitude;

    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    ((nice * magnitude) as u64).max(1)
}

/// Applies up to the configured number of progression actions to the session.
///
/// Returns a human-readable log of what was applied, skipped, or discarded.
#[instrument(skip_all, fields(turn = session.turn_number, actions = actions.len()))]
pub fn apply(
    actions: &[ProgressionAction],
    session: &mut GameSession,
    config: &GameConfig,
) -> Vec<String> {
    let mut applied = Vec::new();

    for &action in actions.iter().take(*config.max_progression_actions()) {
        match action {
            ProgressionAction::ShrinkMax => {
                let new_max = nice_round(session.max_weight_g as f64 * config.max_shrink_factor());
                if new_max <= session.min_weight_g {
                    warn!(
                        new_max,
                        min_g = session.min_weight_g,
                        "Discarding shrink_max: bounds would invert"
                    );
                    applied.push("shrink_max_discarded_invalid_bounds".to_string());
                } else {
                    session.max_weight_g = new_max;
                    applied.push(format!("shrink_max:{}", new_max));
                }
            }
            ProgressionAction::RaiseMin => {
                let new_min =
                    nice_round(session.min_weight_g as f64 * config.minimum_enlarge_factor());
                if new_min >= session.max_weight_g {
                    warn!(
                        new_min,
                        max_g = session.max_weight_g,
                        "Discarding raise_min: bounds would invert"
                    );
                    applied.push("raise_min_discarded_invalid_bounds".to_string());
                } else {
                    session.min_weight_g = new_min;
                    applied.push(format!("raise_min:{}", new_min));
                }
            }
            ProgressionAction::AddRule(rule) => {
                if session.turn_number < *config.rule_add_min_turn() {
                    debug!(rule = %rule, "Skipping add_rule: too early");
                    applied.push("add_rule_skipped_too_early".to_string());
                } else if session.active_rules.len() >= *config.max_rules() {
                    debug!(rule = %rule, "Skipping add_rule: rule slots full");
                    applied.push("add_rule_skipped_max_rules".to_string());
                } else if session.active_rules.contains(&rule) {
                    debug!(rule = %rule, "Skipping add_rule: already active");
                    applied.push("add_rule_skipped_duplicate".to_string());
                } else if catalog::contradicts(rule, &session.active_rules) {
                    debug!(rule = %rule, "Skipping add_rule: contradicts an active rule");
                    applied.push("add_rule_skipped_contradiction".to_string());
                } else {
                    session.active_rules.push(rule);
                    applied.push(format!("add_rule:{}", rule));
                }
            }
            ProgressionAction::Hold => {
                applied.push("hold".to_string());
            }
        }

        debug_assert!(session.min_weight_g < session.max_weight_g);
    }

    debug!(
        min_g = session.min_weight_g,
        max_g = session.max_weight_g,
        rules = session.active_rules.len(),
        ?applied,
        "Progression applied"
    );
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleId;

    fn session(min_g: u64, max_g: u64) -> GameSession {
        let mut session = GameSession::new(&GameConfig::default());
        session.min_weight_g = min_g;
        session.max_weight_g = max_g;
        session
    }

    #[test]
    fn test_nice_round_snaps_to_1_2_5_10_mantissa() {
        assert_eq!(nice_round(1_340_000.0), 1_000_000);
        assert_eq!(nice_round(2_800_000.0), 2_000_000);
        assert_eq!(nice_round(4_200.0), 5_000);
        assert_eq!(nice_round(8_000.0), 10_000);
        assert_eq!(nice_round(0.3), 1);
    }

    #[test]
    fn test_shrink_max_uses_factor_and_nice_round() {
        let mut session = session(1, 10_000_000);
        let log = apply(
            &[ProgressionAction::ShrinkMax],
            &mut session,
            &GameConfig::default(),
        );
        // 10_000_000 * 0.2 = 2_000_000, already nice.
        assert_eq!(session.max_weight_g, 2_000_000);
        assert_eq!(log, vec!["shrink_max:2000000"]);
    }

    #[test]
    fn test_raise_min_uses_factor_and_nice_round() {
        let mut session = session(1, 10_000_000);
        let log = apply(
            &[ProgressionAction::RaiseMin],
            &mut session,
            &GameConfig::default(),
        );
        // 1 * 5.0 = 5, nice-rounds to 5.
        assert_eq!(session.min_weight_g, 5);
        assert_eq!(log, vec!["raise_min:5"]);
    }

    #[test]
    fn test_invalid_bounds_action_discarded_and_fold_continues() {
        // Shrinking the max below the min must be discarded while the
        // following action still applies.
        let mut session = session(900, 1000);
        session.turn_number = 5;
        let log = apply(
            &[
                ProgressionAction::ShrinkMax,
                ProgressionAction::AddRule(RuleId::IsFood),
            ],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(session.max_weight_g, 1000);
        assert_eq!(session.min_weight_g, 900);
        assert_eq!(
            log,
            vec!["shrink_max_discarded_invalid_bounds", "add_rule:is-food"]
        );
        assert_eq!(session.active_rules, vec![RuleId::IsFood]);
    }

    #[test]
    fn test_actions_beyond_per_turn_cap_ignored() {
        let mut session = session(1, 10_000_000);
        let log = apply(
            &[
                ProgressionAction::Hold,
                ProgressionAction::Hold,
                ProgressionAction::ShrinkMax,
            ],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(log, vec!["hold", "hold"]);
        assert_eq!(session.max_weight_g, 10_000_000);
    }

    #[test]
    fn test_add_rule_too_early_skipped() {
        let mut session = session(1, 10_000_000);
        session.turn_number = 2;
        let log = apply(
            &[ProgressionAction::AddRule(RuleId::IsFood)],
            &mut session,
            &GameConfig::default(),
        );
        assert!(session.active_rules.is_empty());
        assert_eq!(log, vec!["add_rule_skipped_too_early"]);
    }

    #[test]
    fn test_add_rule_applies_from_min_turn() {
        let mut session = session(1, 10_000_000);
        session.turn_number = 3;
        let log = apply(
            &[ProgressionAction::AddRule(RuleId::IsFood)],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(session.active_rules, vec![RuleId::IsFood]);
        assert_eq!(log, vec!["add_rule:is-food"]);
    }

    #[test]
    fn test_add_rule_duplicate_skipped() {
        let mut session = session(1, 10_000_000);
        session.turn_number = 5;
        session.active_rules.push(RuleId::IsFood);
        let log = apply(
            &[ProgressionAction::AddRule(RuleId::IsFood)],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(session.active_rules.len(), 1);
        assert_eq!(log, vec!["add_rule_skipped_duplicate"]);
    }

    #[test]
    fn test_add_rule_contradiction_skipped() {
        let mut session = session(1, 10_000_000);
        session.turn_number = 5;
        session.active_rules.push(RuleId::StartsWithVowel);
        let log = apply(
            &[ProgressionAction::AddRule(RuleId::StartsWithConsonant)],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(session.active_rules, vec![RuleId::StartsWithVowel]);
        assert_eq!(log, vec!["add_rule_skipped_contradiction"]);
    }

    #[test]
    fn test_add_rule_slots_full_skipped() {
        let mut session = session(1, 10_000_000);
        session.turn_number = 9;
        session.active_rules = vec![
            RuleId::IsFood,
            RuleId::FitsInOneHand,
            RuleId::HouseholdItem,
        ];
        let log = apply(
            &[ProgressionAction::AddRule(RuleId::IsColorful)],
            &mut session,
            &GameConfig::default(),
        );
        assert_eq!(session.active_rules.len(), 3);
        assert_eq!(log, vec!["add_rule_skipped_max_rules"]);
    }

    #[test]
    fn test_hold_leaves_session_unchanged() {
        let mut session = session(100, 5000);
        let log = apply(&[ProgressionAction::Hold], &mut session, &GameConfig::default());
        assert_eq!(session.min_weight_g, 100);
        assert_eq!(session.max_weight_g, 5000);
        assert_eq!(log, vec!["hold"]);
    }
}
