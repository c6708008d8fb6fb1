//! Bribe the Scale - turn resolution engine for a weight-window guessing game.
//!
//! Each round the player names an object they believe falls inside the
//! current weight window and satisfies the active rules. An LLM judging
//! collaborator interprets the phrase and estimates a weight; the engine
//! here decides pass/fail deterministically and evolves difficulty.
//!
//! # Architecture
//!
//! - **Engine**: session state, validation pipeline, progression, scoring,
//!   and the turn state machine with its timing contracts
//! - **Judge**: the external oracle seam (OpenAI/Anthropic adapter plus a
//!   scripted fake for tests)
//! - **Server**: axum HTTP facade for the presentation layer
//!
//! # Example
//!
//! ```no_run
//! use bribe_the_scale::config::GameConfig;
//! use bribe_the_scale::engine::TurnStateMachine;
//! use bribe_the_scale::judge::LlmJudge;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let judge = LlmJudge::new(config.judge().clone(), "sk-...".to_string());
//! let mut engine = TurnStateMachine::new(config, judge);
//!
//! let outcome = engine.submit("a cast iron skillet").await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod banter;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod judge;
pub mod normalize;
pub mod phrasing;
pub mod server;
pub mod verdict;

// Crate-level exports - engine
pub use engine::{
    FailureReason, GameOverReason, GameSession, Phase, SessionSnapshot, SubmitOutcome, TurnError,
    TurnReport, TurnStateMachine, ValidationResult,
};

// Crate-level exports - judge seam
pub use judge::{Judge, JudgeError, LlmJudge, ScriptedJudge};

// Crate-level exports - configuration
pub use config::{ConfigError, GameConfig, JudgeProvider, JudgeSettings};

// Crate-level exports - verdict shapes
pub use verdict::{JudgeVerdict, ProgressionAction, TurnContext};

// Crate-level exports - rule catalog
pub use catalog::{RuleDefinition, RuleId};
