//! Judge request/response shapes and schema validation of raw judge output.
//!
//! The judging collaborator returns free-form JSON; [`JudgeVerdict::from_payload`]
//! is the schema gate that decides whether a payload is usable for turn
//! resolution. The retry-then-fallback policy around it lives in
//! [`crate::engine::turn`].

use crate::catalog::{self, RuleId};
use crate::config::GameConfig;
use crate::normalize;
use derive_more::{Display, Error};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

/// A judge-proposed difficulty mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "rule", rename_all = "snake_case")]
pub enum ProgressionAction {
    /// Tighten the upper weight bound.
    ShrinkMax,
    /// Raise the lower weight bound.
    RaiseMin,
    /// Activate a rule from the catalog.
    AddRule(RuleId),
    /// Leave the session unchanged.
    Hold,
}

/// Structured output of the judging collaborator for one turn.
///
/// Created and consumed within a single turn; never persisted.
#[derive(Debug, Clone)]
pub struct JudgeVerdict {
    /// Stable object class name used for dedup.
    pub canonical_name: String,
    /// How the judge read the player's phrase.
    pub interpreted_meaning: String,
    /// Weight estimate in grams, at least 1.
    pub estimated_weight_g: u64,
    /// False for gibberish or logically paradoxical objects.
    pub is_real: bool,
    /// The judge could not settle on one reading.
    pub needs_clarification: bool,
    /// The phrase carried an explicit mass/volume measure.
    pub used_explicit_measure: bool,
    /// The phrase was trick or self-referential.
    pub used_trick_phrasing: bool,
    /// Per-rule verdicts for the active rules.
    pub rule_checks: BTreeMap<RuleId, bool>,
    /// Short machine-facing reason.
    pub reason_short: String,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Optional player-facing quip, clamped to two lines downstream.
    pub ui_answer: Option<String>,
    /// Proposed difficulty mutations, in application order.
    pub progression_actions: Vec<ProgressionAction>,
}

/// The judge's payload did not satisfy the verdict schema.
#[derive(Debug, Clone, Display, Error)]
#[display("schema violation: {message}")]
pub struct SchemaViolation {
    /// What was missing or mistyped.
    pub message: String,
}

impl SchemaViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl JudgeVerdict {
    /// Validates a raw judge payload against the verdict schema.
    ///
    /// String fields with sensible defaults (canonical name, interpreted
    /// meaning, short reason) are defaulted rather than rejected; a missing
    /// or non-numeric weight, missing boolean flags, a malformed rule-check
    /// map, or more than `max_actions` progression actions reject the
    /// payload.
    pub fn from_payload(
        payload: &Value,
        raw_input: &str,
        config: &GameConfig,
    ) -> Result<Self, SchemaViolation> {
        let object = payload
            .as_object()
            .ok_or_else(|| SchemaViolation::new("payload must be a JSON object"))?;

        let canonical_name = non_empty_string(object.get("canonical_name"))
            .unwrap_or_else(|| raw_input.trim().to_string());
        let interpreted_meaning = non_empty_string(object.get("interpreted_meaning"))
            .unwrap_or_else(|| raw_input.trim().to_string());

        let weight = object
            .get("estimated_weight_g")
            .and_then(Value::as_f64)
            .filter(|w| w.is_finite())
            .ok_or_else(|| SchemaViolation::new("estimated_weight_g must be numeric"))?;
        let estimated_weight_g = (weight.round().max(1.0)) as u64;

        let is_real = coerce_bool(object.get("is_real"), "is_real")?;
        let used_explicit_measure =
            coerce_bool(object.get("used_explicit_measure"), "used_explicit_measure")?;
        let used_trick_phrasing =
            coerce_bool(object.get("used_trick_phrasing"), "used_trick_phrasing")?;
        let needs_clarification = match object.get("needs_clarification") {
            None | Some(Value::Null) => false,
            other => coerce_bool(other, "needs_clarification")?,
        };

        let rule_checks = parse_rule_checks(object.get("rule_checks"))?;
        let progression_actions = parse_progression_actions(
            object.get("progression_actions"),
            *config.max_progression_actions(),
        )?;

        let reason_short = non_empty_string(object.get("reason_short"))
            .map(|s| s.chars().take(180).collect())
            .unwrap_or_else(|| "Judged by collaborator.".to_string());

        Ok(Self {
            canonical_name,
            interpreted_meaning,
            estimated_weight_g,
            is_real,
            needs_clarification,
            used_explicit_measure,
            used_trick_phrasing,
            rule_checks,
            reason_short,
            notes: non_empty_string(object.get("notes")),
            ui_answer: non_empty_string(object.get("ui_answer")),
            progression_actions,
        })
    }

    /// Builds the forced-pass verdict used after a failed retry.
    ///
    /// The canonical name is the raw input under dedup whitespace rules (or
    /// the sentinel if empty), the weight is the rounded midpoint of the
    /// current bounds, and no progression is proposed.
    pub fn fallback(raw_input: &str, min_weight_g: u64, max_weight_g: u64) -> Self {
        let midpoint = ((min_weight_g + max_weight_g) as f64 / 2.0).round() as u64;
        Self {
            canonical_name: normalize::canonical_key(raw_input),
            interpreted_meaning: raw_input.trim().to_string(),
            estimated_weight_g: midpoint.max(1),
            is_real: true,
            needs_clarification: false,
            used_explicit_measure: false,
            used_trick_phrasing: false,
            rule_checks: BTreeMap::new(),
            reason_short: "Judge unavailable; fallback scoring applied.".to_string(),
            notes: None,
            ui_answer: None,
            progression_actions: Vec::new(),
        }
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn coerce_bool(value: Option<&Value>, field: &str) -> Result<bool, SchemaViolation> {
    match value {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "pass" | "ok" => Ok(true),
            "false" | "no" | "fail" => Ok(false),
            _ => Err(SchemaViolation::new(format!(
                "{} must be boolean-like",
                field
            ))),
        },
        _ => Err(SchemaViolation::new(format!(
            "{} must be boolean-like",
            field
        ))),
    }
}

fn parse_rule_checks(
    value: Option<&Value>,
) -> Result<BTreeMap<RuleId, bool>, SchemaViolation> {
    let map = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map,
        _ => return Err(SchemaViolation::new("rule_checks must be an object")),
    };

    let mut checks = BTreeMap::new();
    for (key, entry) in map {
        let Ok(rule_id) = RuleId::from_str(key) else {
            warn!(rule = %key, "Ignoring rule check for unknown rule id");
            continue;
        };
        let ok = coerce_bool(Some(entry), "rule_checks value")?;
        checks.insert(rule_id, ok);
    }
    Ok(checks)
}

fn parse_progression_actions(
    value: Option<&Value>,
    max_actions: usize,
) -> Result<Vec<ProgressionAction>, SchemaViolation> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        _ => return Err(SchemaViolation::new("progression_actions must be a list")),
    };

    if entries.len() > max_actions {
        return Err(SchemaViolation::new(format!(
            "progression_actions length {} exceeds maximum {}",
            entries.len(),
            max_actions
        )));
    }

    let mut actions = Vec::new();
    for entry in entries {
        let (kind, rule) = match entry {
            Value::String(kind) => (kind.trim().to_lowercase(), None),
            Value::Object(map) => {
                let kind = map
                    .get("type")
                    .and_then(Value::as_str)
                    .map(|s| s.trim().to_lowercase())
                    .ok_or_else(|| {
                        SchemaViolation::new("progression action object requires a type")
                    })?;
                (kind, map.get("rule").and_then(Value::as_str))
            }
            _ => {
                return Err(SchemaViolation::new(
                    "progression action must be a string or an object",
                ));
            }
        };

        match kind.as_str() {
            "shrink_max" => actions.push(ProgressionAction::ShrinkMax),
            "raise_min" => actions.push(ProgressionAction::RaiseMin),
            "hold" => actions.push(ProgressionAction::Hold),
            "add_rule" => match rule.map(str::trim).map(RuleId::from_str) {
                Some(Ok(rule_id)) => actions.push(ProgressionAction::AddRule(rule_id)),
                _ => {
                    warn!(rule = ?rule, "Skipping add_rule action with unknown rule id");
                }
            },
            other => {
                warn!(action = %other, "Skipping unknown progression action");
            }
        }
    }
    Ok(actions)
}

/// Request handed to the judging collaborator for one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnContext {
    /// The player's raw phrase.
    pub input_text: String,
    /// Current turn number.
    pub turn: u64,
    /// Current weight window.
    pub range_g: WeightRange,
    /// Active rule definitions to check independently.
    pub active_rules: Vec<ActiveRule>,
    /// Canonical keys already used this session.
    pub used_canonical: Vec<String>,
    /// Progression limits the judge must respect when proposing actions.
    pub progression: ProgressionLimits,
    /// Interpretation policy hints.
    pub policy: JudgingPolicy,
}

/// Inclusive weight window in grams.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WeightRange {
    /// Lower bound.
    pub min: u64,
    /// Upper bound.
    pub max: u64,
}

/// One active rule, as presented to the judge.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRule {
    /// Catalog identifier the judge must echo in `rule_checks`.
    pub id: RuleId,
    /// Short predicate text.
    pub text: &'static str,
    /// Evaluation sentence.
    pub semantic: &'static str,
}

/// Progression limits included in the turn context.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressionLimits {
    /// Most actions the judge may propose per turn.
    pub max_actions: usize,
    /// Earliest turn an add-rule action can apply.
    pub rule_add_min_turn: u64,
    /// Maximum simultaneously active rules.
    pub max_rules: usize,
    /// Shrink factor for the upper bound.
    pub max_shrink_factor: f64,
    /// Enlarge factor for the lower bound.
    pub minimum_enlarge_factor: f64,
}

/// Interpretation policy hints for the judge.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JudgingPolicy {
    /// Plural phrasing without a count means a single item.
    pub plural_without_count_means_one: bool,
    /// Unknown items still get a best-effort estimate.
    pub estimate_unknown_anyway: bool,
    /// Explicit measure phrases are banned.
    pub explicit_measure_banned: bool,
}

impl TurnContext {
    /// Assembles the context for the current session state.
    pub fn new(
        input_text: &str,
        turn: u64,
        min_weight_g: u64,
        max_weight_g: u64,
        active_rules: &[RuleId],
        used_canonical: Vec<String>,
        config: &GameConfig,
    ) -> Self {
        Self {
            input_text: input_text.to_string(),
            turn,
            range_g: WeightRange {
                min: min_weight_g,
                max: max_weight_g,
            },
            active_rules: active_rules
                .iter()
                .map(|&id| {
                    let def = catalog::definition(id);
                    ActiveRule {
                        id,
                        text: def.text,
                        semantic: def.semantic,
                    }
                })
                .collect(),
            used_canonical,
            progression: ProgressionLimits {
                max_actions: *config.max_progression_actions(),
                rule_add_min_turn: *config.rule_add_min_turn(),
                max_rules: *config.max_rules(),
                max_shrink_factor: *config.max_shrink_factor(),
                minimum_enlarge_factor: *config.minimum_enlarge_factor(),
            },
            policy: JudgingPolicy {
                plural_without_count_means_one: true,
                estimate_unknown_anyway: true,
                explicit_measure_banned: true,
            },
        }
    }
}
