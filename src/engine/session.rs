//! The per-run session aggregate and its presentation snapshot.

use crate::catalog::RuleId;
use crate::config::GameConfig;
use crate::normalize::UsedObjectRegistry;
use serde::Serialize;
use tracing::info;

/// Where the session is in the turn cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player's next phrase.
    WaitingInput,
    /// A judge call is in flight.
    Evaluating,
    /// A verdict is being applied.
    Verdict,
    /// Paused; resumes to the prior phase.
    Paused {
        /// Phase to restore on resume.
        prior: Box<Phase>,
    },
    /// Terminal until an explicit restart.
    GameOver,
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// The wall-clock countdown expired.
    Timer,
    /// The player ran out of lives.
    NoLives,
    /// The player typed the end command.
    EndCommand,
}

/// Mutable state of one game run.
///
/// Exclusively owned by the turn state machine that created it; mutated at
/// most once per resolved turn and discarded on restart.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) lives: u32,
    pub(crate) score: u64,
    pub(crate) min_weight_g: u64,
    pub(crate) max_weight_g: u64,
    pub(crate) active_rules: Vec<RuleId>,
    pub(crate) turn_number: u64,
    pub(crate) used: UsedObjectRegistry,
    pub(crate) phase: Phase,
    pub(crate) game_over_reason: Option<GameOverReason>,
}

impl GameSession {
    /// Creates a fresh session from the configured starting values.
    pub fn new(config: &GameConfig) -> Self {
        info!(
            lives = *config.start_lives(),
            min_g = *config.start_min_weight_g(),
            max_g = *config.start_max_weight_g(),
            "Creating game session"
        );
        Self {
            lives: *config.start_lives(),
            score: 0,
            min_weight_g: *config.start_min_weight_g(),
            max_weight_g: *config.start_max_weight_g(),
            active_rules: Vec::new(),
            turn_number: 1,
            used: UsedObjectRegistry::new(),
            phase: Phase::WaitingInput,
            game_over_reason: None,
        }
    }

    /// Remaining lives.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Cumulative score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Lower weight bound in grams.
    pub fn min_weight_g(&self) -> u64 {
        self.min_weight_g
    }

    /// Upper weight bound in grams.
    pub fn max_weight_g(&self) -> u64 {
        self.max_weight_g
    }

    /// Active rules, in activation order.
    pub fn active_rules(&self) -> &[RuleId] {
        &self.active_rules
    }

    /// Current turn number, starting at 1.
    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    /// Registry of canonical keys that already scored a pass.
    pub fn used(&self) -> &UsedObjectRegistry {
        &self.used
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the run has ended.
    pub fn game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver)
    }

    /// Ends the run. A reason set earlier wins; later signals are ignored.
    pub(crate) fn end(&mut self, reason: GameOverReason) {
        if self.game_over() {
            return;
        }
        info!(?reason, turn = self.turn_number, score = self.score, "Game over");
        self.phase = Phase::GameOver;
        self.game_over_reason = Some(reason);
    }

    /// Presentation-facing snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            lives: self.lives,
            score: self.score,
            min_g: self.min_weight_g,
            max_g: self.max_weight_g,
            active_rules: self.active_rules.clone(),
            turn_number: self.turn_number,
            game_over: self.game_over(),
            game_over_reason: self.game_over_reason,
        }
    }
}

/// Read-only session view exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Remaining lives.
    pub lives: u32,
    /// Cumulative score.
    pub score: u64,
    /// Lower weight bound in grams.
    pub min_g: u64,
    /// Upper weight bound in grams.
    pub max_g: u64,
    /// Active rules in activation order.
    pub active_rules: Vec<RuleId>,
    /// Current turn number.
    pub turn_number: u64,
    /// Whether the run has ended.
    pub game_over: bool,
    /// Why the run ended, when it has.
    pub game_over_reason: Option<GameOverReason>,
}
