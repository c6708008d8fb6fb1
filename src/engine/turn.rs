//! The turn state machine: sequences validation, scoring, and progression
//! for one submission and enforces the timing contracts.
//!
//! Exactly one turn may be in flight per session. The only suspension point
//! is the judge call; no session state is mutated concurrently with that
//! wait, and a timer expiry arriving mid-turn is queued and honored after
//! the turn resolves.

use super::progression;
use super::scoring;
use super::session::{GameOverReason, GameSession, Phase, SessionSnapshot};
use super::validate::{self, FailureReason, ValidationResult};
use crate::banter::{self, Banter};
use crate::catalog::RuleId;
use crate::config::GameConfig;
use crate::judge::{Judge, JudgeError};
use crate::normalize;
use crate::verdict::{JudgeVerdict, TurnContext};
use derive_more::{Display, Error};
use serde::Serialize;
use tokio::time::{Duration, Instant, sleep};
use tracing::{debug, info, instrument, warn};

/// Number of judge attempts before the fallback verdict kicks in.
const JUDGE_ATTEMPTS: u32 = 2;

/// Error surfaced to the caller for an unresolvable submission.
///
/// In every case the turn is not consumed: no life is lost and the turn
/// number does not advance.
#[derive(Debug, Clone, Display, Error)]
pub enum TurnError {
    /// A turn is already being evaluated.
    #[display("a turn is already in flight")]
    TurnInFlight,
    /// The session is paused and must be resumed first.
    #[display("the session is paused")]
    SessionPaused,
    /// The judging collaborator was unreachable.
    #[display("judge unavailable: {source}")]
    JudgeUnavailable {
        /// The underlying transport failure.
        source: JudgeError,
    },
}

/// Result of one submission, tagged for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The run had already ended.
    GameOver {
        /// Player-facing message.
        message: String,
        /// Session snapshot.
        state: SessionSnapshot,
    },
    /// Empty or whitespace input; nothing happened.
    EmptyInput {
        /// Player-facing re-prompt.
        message: String,
        /// Session snapshot.
        state: SessionSnapshot,
    },
    /// The end command was typed; the run is over.
    EndCommand {
        /// Player-facing message.
        message: String,
        /// Session snapshot.
        state: SessionSnapshot,
    },
    /// A queued timer expiry ended the run before the judge was consulted.
    TimerExpired {
        /// Player-facing message.
        message: String,
        /// Session snapshot.
        state: SessionSnapshot,
    },
    /// A turn was resolved.
    TurnResult(Box<TurnReport>),
}

/// Presentation-facing payload of one resolved turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// Whether the submission passed.
    pub pass: bool,
    /// Canonical object class the judge resolved the phrase to.
    pub canonical_name: String,
    /// How the judge read the phrase.
    pub interpreted_meaning: String,
    /// Weight estimate in grams.
    pub weight_g: u64,
    /// Player-facing explanation of the result.
    pub reason: String,
    /// Optional judge notes.
    pub notes: Option<String>,
    /// First failed check, if any.
    pub failure_reason: Option<FailureReason>,
    /// The rule that failed, when a rule failed.
    pub rule_fail: Option<RuleId>,
    /// Short quip, at most two lines.
    pub ui_answer: String,
    /// True when the judge fallback policy forced this pass.
    pub fallback_mode: bool,
    /// Points awarded for this turn.
    pub award: u64,
    /// Progression log: applied, skipped, and discarded actions.
    pub progression_applied: Vec<String>,
    /// Session snapshot after the turn.
    pub state: SessionSnapshot,
}

/// Orchestrates one turn end to end against a judging collaborator.
#[derive(Debug)]
pub struct TurnStateMachine<J> {
    judge: J,
    config: GameConfig,
    session: GameSession,
    banter: Banter,
    pending_timer_expiry: bool,
}

impl<J: Judge> TurnStateMachine<J> {
    /// Creates a state machine with a fresh session.
    #[instrument(skip(config, judge))]
    pub fn new(config: GameConfig, judge: J) -> Self {
        let session = GameSession::new(&config);
        Self {
            judge,
            config,
            session,
            banter: Banter::seeded(42),
            pending_timer_expiry: false,
        }
    }

    /// Current session state.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Presentation snapshot of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Discards the session and starts a new run.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> SessionSnapshot {
        info!("Resetting session");
        self.session = GameSession::new(&self.config);
        self.pending_timer_expiry = false;
        self.session.snapshot()
    }

    /// Pauses the session. No-op when already paused or over.
    pub fn pause(&mut self) -> SessionSnapshot {
        match &self.session.phase {
            Phase::GameOver | Phase::Paused { .. } => {}
            prior => {
                let prior = Box::new(prior.clone());
                debug!(?prior, "Pausing session");
                self.session.phase = Phase::Paused { prior };
            }
        }
        self.session.snapshot()
    }

    /// Resumes a paused session to its prior phase. No-op otherwise.
    pub fn resume(&mut self) -> SessionSnapshot {
        if let Phase::Paused { prior } = &self.session.phase {
            let prior = (**prior).clone();
            debug!(?prior, "Resuming session");
            self.session.phase = prior;
        }
        self.session.snapshot()
    }

    /// Signals that the external wall-clock timer expired.
    ///
    /// Authoritative only while waiting for input; during an in-flight turn
    /// the expiry is queued and honored once the turn resolves. The timer is
    /// considered paused while the session is paused.
    #[instrument(skip(self))]
    pub fn timer_expired(&mut self) -> SessionSnapshot {
        match self.session.phase {
            Phase::WaitingInput => {
                self.session.end(GameOverReason::Timer);
            }
            Phase::Evaluating | Phase::Verdict => {
                info!("Timer expired mid-turn; queueing game over");
                self.pending_timer_expiry = true;
            }
            Phase::Paused { .. } | Phase::GameOver => {}
        }
        self.session.snapshot()
    }

    /// Resolves one submission.
    ///
    /// # Errors
    ///
    /// [`TurnError::SessionPaused`] when the session is paused,
    /// [`TurnError::TurnInFlight`] when called while a turn is being
    /// evaluated (defense in depth; the presentation layer should already
    /// prevent this), and [`TurnError::JudgeUnavailable`] when the judge
    /// transport fails. In every case the input is not consumed.
    #[instrument(skip(self, input_text), fields(turn = self.session.turn_number))]
    pub async fn submit(&mut self, input_text: &str) -> Result<SubmitOutcome, TurnError> {
        if self.session.game_over() {
            debug!("Submission blocked: game over");
            return Ok(SubmitOutcome::GameOver {
                message: "Game is already over. Start a new run.".to_string(),
                state: self.session.snapshot(),
            });
        }
        if matches!(self.session.phase, Phase::Paused { .. }) {
            warn!("Rejecting submission while paused");
            return Err(TurnError::SessionPaused);
        }
        if self.session.phase != Phase::WaitingInput {
            warn!(phase = ?self.session.phase, "Rejecting submission while turn in flight");
            return Err(TurnError::TurnInFlight);
        }

        let raw = input_text.trim();
        if raw.is_empty() {
            debug!("Empty input; re-prompting");
            return Ok(SubmitOutcome::EmptyInput {
                message: "Type one item to continue.".to_string(),
                state: self.session.snapshot(),
            });
        }

        if raw.eq_ignore_ascii_case(self.config.end_command()) {
            info!("End command received");
            self.session.end(GameOverReason::EndCommand);
            return Ok(SubmitOutcome::EndCommand {
                message: "Run ended by command.".to_string(),
                state: self.session.snapshot(),
            });
        }

        // A timer expiry observed before the judge call is dispatched aborts
        // the turn with no side effects beyond the game-over transition.
        if self.pending_timer_expiry {
            self.session.end(GameOverReason::Timer);
            return Ok(SubmitOutcome::TimerExpired {
                message: "Time is up.".to_string(),
                state: self.session.snapshot(),
            });
        }

        self.session.phase = Phase::Evaluating;
        let evaluation_started = Instant::now();

        let (verdict, fallback) = match self.consult_judge(raw).await {
            Ok(outcome) => outcome,
            Err(source) => {
                // Transport failure: surface it, do not consume the turn.
                self.session.phase = Phase::WaitingInput;
                return Err(TurnError::JudgeUnavailable { source });
            }
        };

        let result = if fallback {
            ValidationResult::fallback_pass()
        } else {
            validate::validate(raw, &verdict, &self.session)
        };

        self.enforce_pacing_floor(evaluation_started).await;
        self.session.phase = Phase::Verdict;

        let report = self.apply_verdict(&verdict, result);

        if self.session.lives == 0 {
            self.session.end(GameOverReason::NoLives);
        } else if self.pending_timer_expiry {
            self.session.end(GameOverReason::Timer);
        } else {
            self.session.phase = Phase::WaitingInput;
        }

        let mut report = report;
        report.state = self.session.snapshot();
        info!(
            pass = report.pass,
            canonical = %report.canonical_name,
            score = self.session.score,
            lives = self.session.lives,
            "Turn resolved"
        );
        Ok(SubmitOutcome::TurnResult(Box::new(report)))
    }

    /// One judge request with exactly one bounded retry on malformed output.
    ///
    /// Returns the verdict and whether it is the fallback. Transport
    /// failures propagate immediately and are never retried here.
    async fn consult_judge(&self, raw: &str) -> Result<(JudgeVerdict, bool), JudgeError> {
        let context = TurnContext::new(
            raw,
            self.session.turn_number,
            self.session.min_weight_g,
            self.session.max_weight_g,
            &self.session.active_rules,
            self.session.used.keys().map(str::to_string).collect(),
            &self.config,
        );

        for attempt in 1..=JUDGE_ATTEMPTS {
            match self.judge.interpret(&context).await {
                Ok(payload) => {
                    match JudgeVerdict::from_payload(&payload, raw, &self.config) {
                        Ok(verdict) => {
                            debug!(attempt, "Judge payload accepted");
                            return Ok((verdict, false));
                        }
                        Err(violation) => {
                            warn!(attempt, error = %violation, "Judge payload rejected");
                        }
                    }
                }
                Err(error) if error.is_transport() => return Err(error),
                Err(error) => {
                    warn!(attempt, error = %error, "Judge output malformed");
                }
            }
        }

        warn!("Judge output malformed twice; entering fallback mode");
        Ok((
            JudgeVerdict::fallback(raw, self.session.min_weight_g, self.session.max_weight_g),
            true,
        ))
    }

    /// Delays verdict emission to the configured pacing floor.
    async fn enforce_pacing_floor(&self, started: Instant) {
        let floor = Duration::from_secs_f64(self.config.evaluation_min_seconds().max(0.0));
        let elapsed = started.elapsed();
        if elapsed < floor {
            debug!(remaining_ms = (floor - elapsed).as_millis() as u64, "Pacing verdict emission");
            sleep(floor - elapsed).await;
        }
    }

    /// Applies a validated verdict to the session and builds the report.
    fn apply_verdict(&mut self, verdict: &JudgeVerdict, result: ValidationResult) -> TurnReport {
        let reason = result.describe(verdict, &self.session);
        let mut award = 0;
        let mut progression_applied = Vec::new();

        if result.pass {
            self.session
                .used
                .insert(normalize::canonical_key(&verdict.canonical_name));
            // Award is computed against the pre-progression state.
            award = scoring::award_for_pass(&self.session);
            self.session.score += award;
            progression_applied = progression::apply(
                &verdict.progression_actions,
                &mut self.session,
                &self.config,
            );
        } else {
            self.session.lives = self.session.lives.saturating_sub(1);
        }

        self.session.turn_number += 1;

        let ui_answer = verdict
            .ui_answer
            .as_deref()
            .map(banter::limit_two_lines)
            .unwrap_or_else(|| {
                if result.pass {
                    self.banter.success_line().to_string()
                } else {
                    self.banter.roast_line().to_string()
                }
            });

        TurnReport {
            pass: result.pass,
            canonical_name: verdict.canonical_name.clone(),
            interpreted_meaning: verdict.interpreted_meaning.clone(),
            weight_g: verdict.estimated_weight_g,
            reason,
            notes: verdict.notes.clone(),
            failure_reason: result.failure_reason,
            rule_fail: result.rule_fail,
            ui_answer,
            fallback_mode: result.fallback_mode,
            award,
            progression_applied,
            // Overwritten with the post-transition snapshot by the caller.
            state: self.session.snapshot(),
        }
    }
}
